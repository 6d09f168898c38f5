//! Resource Storage
//! Mission: SQLite persistence for the order and prescription domains

use crate::models::{
    Client, Customization, HistoryEntry, Image, NewClient, NewCustomization, NewHistoryEntry,
    NewImage, NewOrder, NewOrderItem, NewPrescription, NewProduct, Order, OrderItem, Prescription,
    Product, UpdateClient, UpdateCustomization, UpdateHistoryEntry, UpdateImage, UpdateOrder,
    UpdateOrderItem, UpdatePrescription, UpdateProduct,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

/// Resource storage with SQLite backend.
///
/// Short-lived connections are opened per operation; SQLite serializes
/// writers internally, so the struct is freely shared across request tasks.
pub struct Database {
    db_path: String,
}

impl Database {
    /// Create a new database handle and initialize the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let db = Self {
            db_path: db_path.to_string(),
        };
        db.init_db()?;
        Ok(db)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                contact TEXT NOT NULL,
                address TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                base_cost REAL NOT NULL,
                profit_margin REAL NOT NULL,
                main_material TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER NOT NULL,
                total_value REAL NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (client_id) REFERENCES clients(id)
            );
            CREATE TABLE IF NOT EXISTS order_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL,
                unit_price REAL NOT NULL,
                FOREIGN KEY (order_id) REFERENCES orders(id),
                FOREIGN KEY (product_id) REFERENCES products(id)
            );
            CREATE TABLE IF NOT EXISTS customizations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                added_cost REAL NOT NULL,
                details TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                added_cost REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS prescriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER NOT NULL,
                medication TEXT NOT NULL,
                dosage TEXT NOT NULL,
                instructions TEXT,
                start_date TEXT NOT NULL,
                end_date TEXT,
                FOREIGN KEY (client_id) REFERENCES clients(id)
            );
            CREATE TABLE IF NOT EXISTS histories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prescription_id INTEGER NOT NULL,
                taken_at TEXT NOT NULL,
                note TEXT,
                FOREIGN KEY (prescription_id) REFERENCES prescriptions(id)
            );",
        )
        .context("Failed to initialize resource schema")?;

        Ok(())
    }

    fn conn(&self) -> Result<Connection> {
        Connection::open(&self.db_path).context("Failed to open database")
    }

    // ---- clients ----

    fn row_to_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
        Ok(Client {
            id: row.get(0)?,
            name: row.get(1)?,
            contact: row.get(2)?,
            address: row.get(3)?,
        })
    }

    pub fn create_client(&self, new: &NewClient) -> Result<Client> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO clients (name, contact, address) VALUES (?1, ?2, ?3)",
            params![new.name, new.contact, new.address],
        )?;

        Ok(Client {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            contact: new.contact.clone(),
            address: new.address.clone(),
        })
    }

    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, contact, address FROM clients")?;
        let clients = stmt
            .query_map([], Self::row_to_client)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }

    pub fn get_client(&self, id: i64) -> Result<Option<Client>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, contact, address FROM clients WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::row_to_client) {
            Ok(client) => Ok(Some(client)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_client(&self, id: i64, changes: &UpdateClient) -> Result<Option<Client>> {
        let Some(current) = self.get_client(id)? else {
            return Ok(None);
        };

        let updated = Client {
            id,
            name: changes.name.clone().unwrap_or(current.name),
            contact: changes.contact.clone().unwrap_or(current.contact),
            address: changes.address.clone().unwrap_or(current.address),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE clients SET name = ?1, contact = ?2, address = ?3 WHERE id = ?4",
            params![updated.name, updated.contact, updated.address, id],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_client(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM clients WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- products ----

    fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: row.get(2)?,
            base_cost: row.get(3)?,
            profit_margin: row.get(4)?,
            main_material: row.get(5)?,
        })
    }

    pub fn create_product(&self, new: &NewProduct) -> Result<Product> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO products (name, kind, base_cost, profit_margin, main_material)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.name,
                new.kind,
                new.base_cost,
                new.profit_margin,
                new.main_material
            ],
        )?;

        Ok(Product {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            kind: new.kind.clone(),
            base_cost: new.base_cost,
            profit_margin: new.profit_margin,
            main_material: new.main_material.clone(),
        })
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, kind, base_cost, profit_margin, main_material FROM products",
        )?;
        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, kind, base_cost, profit_margin, main_material
             FROM products WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::row_to_product) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_product(&self, id: i64, changes: &UpdateProduct) -> Result<Option<Product>> {
        let Some(current) = self.get_product(id)? else {
            return Ok(None);
        };

        let updated = Product {
            id,
            name: changes.name.clone().unwrap_or(current.name),
            kind: changes.kind.clone().unwrap_or(current.kind),
            base_cost: changes.base_cost.unwrap_or(current.base_cost),
            profit_margin: changes.profit_margin.unwrap_or(current.profit_margin),
            main_material: changes
                .main_material
                .clone()
                .unwrap_or(current.main_material),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE products SET name = ?1, kind = ?2, base_cost = ?3, profit_margin = ?4,
             main_material = ?5 WHERE id = ?6",
            params![
                updated.name,
                updated.kind,
                updated.base_cost,
                updated.profit_margin,
                updated.main_material,
                id
            ],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_product(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- orders ----

    fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
        Ok(Order {
            id: row.get(0)?,
            client_id: row.get(1)?,
            total_value: row.get(2)?,
            status: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// Create an order, together with any inline items, in one transaction.
    pub fn create_order(&self, new: &NewOrder) -> Result<Order> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let created_at = Utc::now().to_rfc3339();

        tx.execute(
            "INSERT INTO orders (client_id, total_value, status, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.client_id, new.total_value, new.status, created_at],
        )?;
        let order_id = tx.last_insert_rowid();

        if let Some(items) = &new.items {
            for item in items {
                tx.execute(
                    "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![order_id, item.product_id, item.quantity, item.unit_price],
                )?;
            }
        }

        tx.commit()?;

        Ok(Order {
            id: order_id,
            client_id: new.client_id,
            total_value: new.total_value,
            status: new.status.clone(),
            created_at,
        })
    }

    pub fn list_orders(&self) -> Result<Vec<Order>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, client_id, total_value, status, created_at FROM orders")?;
        let orders = stmt
            .query_map([], Self::row_to_order)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    pub fn get_order(&self, id: i64) -> Result<Option<Order>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, client_id, total_value, status, created_at FROM orders WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::row_to_order) {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_order(&self, id: i64, changes: &UpdateOrder) -> Result<Option<Order>> {
        let Some(current) = self.get_order(id)? else {
            return Ok(None);
        };

        let updated = Order {
            id,
            client_id: changes.client_id.unwrap_or(current.client_id),
            total_value: changes.total_value.unwrap_or(current.total_value),
            status: changes.status.clone().unwrap_or(current.status),
            created_at: current.created_at,
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE orders SET client_id = ?1, total_value = ?2, status = ?3 WHERE id = ?4",
            params![updated.client_id, updated.total_value, updated.status, id],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_order(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Items belonging to one order
    pub fn list_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, order_id, product_id, quantity, unit_price
             FROM order_items WHERE order_id = ?1",
        )?;
        let items = stmt
            .query_map(params![order_id], Self::row_to_order_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    // ---- order items ----

    fn row_to_order_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderItem> {
        Ok(OrderItem {
            id: row.get(0)?,
            order_id: row.get(1)?,
            product_id: row.get(2)?,
            quantity: row.get(3)?,
            unit_price: row.get(4)?,
        })
    }

    pub fn create_order_item(&self, new: &NewOrderItem) -> Result<OrderItem> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.order_id, new.product_id, new.quantity, new.unit_price],
        )?;

        Ok(OrderItem {
            id: conn.last_insert_rowid(),
            order_id: new.order_id,
            product_id: new.product_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
        })
    }

    pub fn list_order_items(&self) -> Result<Vec<OrderItem>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, order_id, product_id, quantity, unit_price FROM order_items")?;
        let items = stmt
            .query_map([], Self::row_to_order_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get_order_item(&self, id: i64) -> Result<Option<OrderItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, order_id, product_id, quantity, unit_price FROM order_items WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::row_to_order_item) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_order_item(
        &self,
        id: i64,
        changes: &UpdateOrderItem,
    ) -> Result<Option<OrderItem>> {
        let Some(current) = self.get_order_item(id)? else {
            return Ok(None);
        };

        let updated = OrderItem {
            id,
            order_id: changes.order_id.unwrap_or(current.order_id),
            product_id: changes.product_id.unwrap_or(current.product_id),
            quantity: changes.quantity.unwrap_or(current.quantity),
            unit_price: changes.unit_price.unwrap_or(current.unit_price),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE order_items SET order_id = ?1, product_id = ?2, quantity = ?3,
             unit_price = ?4 WHERE id = ?5",
            params![
                updated.order_id,
                updated.product_id,
                updated.quantity,
                updated.unit_price,
                id
            ],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_order_item(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM order_items WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- customizations ----

    fn row_to_customization(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customization> {
        Ok(Customization {
            id: row.get(0)?,
            kind: row.get(1)?,
            added_cost: row.get(2)?,
            details: row.get(3)?,
        })
    }

    pub fn create_customization(&self, new: &NewCustomization) -> Result<Customization> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO customizations (kind, added_cost, details) VALUES (?1, ?2, ?3)",
            params![new.kind, new.added_cost, new.details],
        )?;

        Ok(Customization {
            id: conn.last_insert_rowid(),
            kind: new.kind.clone(),
            added_cost: new.added_cost,
            details: new.details.clone(),
        })
    }

    pub fn list_customizations(&self) -> Result<Vec<Customization>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, kind, added_cost, details FROM customizations")?;
        let customizations = stmt
            .query_map([], Self::row_to_customization)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(customizations)
    }

    pub fn get_customization(&self, id: i64) -> Result<Option<Customization>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, kind, added_cost, details FROM customizations WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::row_to_customization) {
            Ok(customization) => Ok(Some(customization)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_customization(
        &self,
        id: i64,
        changes: &UpdateCustomization,
    ) -> Result<Option<Customization>> {
        let Some(current) = self.get_customization(id)? else {
            return Ok(None);
        };

        let updated = Customization {
            id,
            kind: changes.kind.clone().unwrap_or(current.kind),
            added_cost: changes.added_cost.unwrap_or(current.added_cost),
            details: changes.details.clone().unwrap_or(current.details),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE customizations SET kind = ?1, added_cost = ?2, details = ?3 WHERE id = ?4",
            params![updated.kind, updated.added_cost, updated.details, id],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_customization(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM customizations WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- images ----

    fn row_to_image(row: &rusqlite::Row<'_>) -> rusqlite::Result<Image> {
        Ok(Image {
            id: row.get(0)?,
            source: row.get(1)?,
            added_cost: row.get(2)?,
        })
    }

    pub fn create_image(&self, new: &NewImage) -> Result<Image> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO images (source, added_cost) VALUES (?1, ?2)",
            params![new.source, new.added_cost],
        )?;

        Ok(Image {
            id: conn.last_insert_rowid(),
            source: new.source.clone(),
            added_cost: new.added_cost,
        })
    }

    pub fn list_images(&self) -> Result<Vec<Image>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, source, added_cost FROM images")?;
        let images = stmt
            .query_map([], Self::row_to_image)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(images)
    }

    pub fn get_image(&self, id: i64) -> Result<Option<Image>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, source, added_cost FROM images WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::row_to_image) {
            Ok(image) => Ok(Some(image)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_image(&self, id: i64, changes: &UpdateImage) -> Result<Option<Image>> {
        let Some(current) = self.get_image(id)? else {
            return Ok(None);
        };

        let updated = Image {
            id,
            source: changes.source.clone().unwrap_or(current.source),
            added_cost: changes.added_cost.unwrap_or(current.added_cost),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE images SET source = ?1, added_cost = ?2 WHERE id = ?3",
            params![updated.source, updated.added_cost, id],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_image(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM images WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- prescriptions ----

    fn row_to_prescription(row: &rusqlite::Row<'_>) -> rusqlite::Result<Prescription> {
        Ok(Prescription {
            id: row.get(0)?,
            client_id: row.get(1)?,
            medication: row.get(2)?,
            dosage: row.get(3)?,
            instructions: row.get(4)?,
            start_date: row.get(5)?,
            end_date: row.get(6)?,
        })
    }

    pub fn create_prescription(&self, new: &NewPrescription) -> Result<Prescription> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO prescriptions (client_id, medication, dosage, instructions, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.client_id,
                new.medication,
                new.dosage,
                new.instructions,
                new.start_date,
                new.end_date
            ],
        )?;

        Ok(Prescription {
            id: conn.last_insert_rowid(),
            client_id: new.client_id,
            medication: new.medication.clone(),
            dosage: new.dosage.clone(),
            instructions: new.instructions.clone(),
            start_date: new.start_date.clone(),
            end_date: new.end_date.clone(),
        })
    }

    pub fn list_prescriptions(&self) -> Result<Vec<Prescription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, client_id, medication, dosage, instructions, start_date, end_date
             FROM prescriptions",
        )?;
        let prescriptions = stmt
            .query_map([], Self::row_to_prescription)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prescriptions)
    }

    pub fn get_prescription(&self, id: i64) -> Result<Option<Prescription>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, client_id, medication, dosage, instructions, start_date, end_date
             FROM prescriptions WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::row_to_prescription) {
            Ok(prescription) => Ok(Some(prescription)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_prescription(
        &self,
        id: i64,
        changes: &UpdatePrescription,
    ) -> Result<Option<Prescription>> {
        let Some(current) = self.get_prescription(id)? else {
            return Ok(None);
        };

        let updated = Prescription {
            id,
            client_id: current.client_id,
            medication: changes.medication.clone().unwrap_or(current.medication),
            dosage: changes.dosage.clone().unwrap_or(current.dosage),
            instructions: changes.instructions.clone().or(current.instructions),
            start_date: changes.start_date.clone().unwrap_or(current.start_date),
            end_date: changes.end_date.clone().or(current.end_date),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE prescriptions SET medication = ?1, dosage = ?2, instructions = ?3,
             start_date = ?4, end_date = ?5 WHERE id = ?6",
            params![
                updated.medication,
                updated.dosage,
                updated.instructions,
                updated.start_date,
                updated.end_date,
                id
            ],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_prescription(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ---- histories ----

    fn row_to_history(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryEntry> {
        Ok(HistoryEntry {
            id: row.get(0)?,
            prescription_id: row.get(1)?,
            taken_at: row.get(2)?,
            note: row.get(3)?,
        })
    }

    pub fn create_history_entry(&self, new: &NewHistoryEntry) -> Result<HistoryEntry> {
        let taken_at = new
            .taken_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO histories (prescription_id, taken_at, note) VALUES (?1, ?2, ?3)",
            params![new.prescription_id, taken_at, new.note],
        )?;

        Ok(HistoryEntry {
            id: conn.last_insert_rowid(),
            prescription_id: new.prescription_id,
            taken_at,
            note: new.note.clone(),
        })
    }

    pub fn list_history_entries(&self) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, prescription_id, taken_at, note FROM histories")?;
        let entries = stmt
            .query_map([], Self::row_to_history)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn get_history_entry(&self, id: i64) -> Result<Option<HistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, prescription_id, taken_at, note FROM histories WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::row_to_history) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_history_entry(
        &self,
        id: i64,
        changes: &UpdateHistoryEntry,
    ) -> Result<Option<HistoryEntry>> {
        let Some(current) = self.get_history_entry(id)? else {
            return Ok(None);
        };

        let updated = HistoryEntry {
            id,
            prescription_id: current.prescription_id,
            taken_at: changes.taken_at.clone().unwrap_or(current.taken_at),
            note: changes.note.clone().or(current.note),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE histories SET taken_at = ?1, note = ?2 WHERE id = ?3",
            params![updated.taken_at, updated.note, id],
        )?;

        Ok(Some(updated))
    }

    pub fn delete_history_entry(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM histories WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}
