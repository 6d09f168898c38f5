//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::{Role, UpdateUserRequest, User};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_login TEXT
            )",
            [],
        )?;

        // Create default admin user if none exists
        self.create_default_admin(&conn)?;

        Ok(())
    }

    /// Create default admin user for initial setup
    fn create_default_admin(&self, conn: &Connection) -> Result<()> {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE role = 'admin'",
                [],
                |row| row.get(0),
            )
            .context("Failed to check for admin users")?;

        if count == 0 {
            let password_hash =
                hash("admin123", DEFAULT_COST).context("Failed to hash password")?;

            conn.execute(
                "INSERT INTO users (name, email, password_hash, role, created_at, last_login)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    "Administrator",
                    "admin@atelier.local",
                    password_hash,
                    Role::Admin.as_str(),
                    Utc::now().to_rfc3339(),
                    Option::<String>::None,
                ],
            )
            .context("Failed to insert admin user")?;

            info!("Default admin user created (email: admin@atelier.local, password: admin123)");
            warn!("CHANGE DEFAULT PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        let role_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: Role::from_str(&role_str).unwrap_or(Role::User),
            created_at: row.get(5)?,
            last_login: row.get(6)?,
        })
    }

    /// Get user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at, last_login
             FROM users WHERE email = ?1",
        )?;

        match stmt.query_row(params![email], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at, last_login
             FROM users WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify email and password.
    ///
    /// A wrong password or unknown email both come back as `Ok(false)`; the
    /// error path is reserved for a malformed stored hash or database failure.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        match self.get_user_by_email(email)? {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Stored password hash is malformed")?;
                Ok(valid)
            }
            None => Ok(false),
        }
    }

    /// Create a new user
    pub fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;
        let created_at = Utc::now().to_rfc3339();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash, role, created_at, last_login)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                name,
                email,
                password_hash,
                role.as_str(),
                created_at,
                Option::<String>::None,
            ],
        )
        .context("Failed to insert user")?;

        let user = User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at,
            last_login: None,
        };

        info!("Created user: {} ({})", user.email, user.role.as_str());

        Ok(user)
    }

    /// Apply a partial update; a supplied password is re-hashed before storage.
    /// Returns `None` if the user does not exist.
    pub fn update_user(&self, id: i64, changes: &UpdateUserRequest) -> Result<Option<User>> {
        let Some(current) = self.get_user(id)? else {
            return Ok(None);
        };

        let password_hash = match &changes.password {
            Some(password) => hash(password, DEFAULT_COST).context("Failed to hash password")?,
            None => current.password_hash,
        };

        let updated = User {
            id,
            name: changes.name.clone().unwrap_or(current.name),
            email: current.email,
            password_hash,
            role: changes.role.unwrap_or(current.role),
            created_at: current.created_at,
            last_login: current.last_login,
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "UPDATE users SET name = ?1, password_hash = ?2, role = ?3 WHERE id = ?4",
            params![updated.name, updated.password_hash, updated.role.as_str(), id],
        )
        .context("Failed to update user")?;

        Ok(Some(updated))
    }

    /// Record a successful login timestamp
    pub fn touch_last_login(&self, id: i64) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), id],
        )
        .context("Failed to record last login")?;
        Ok(())
    }

    /// List all users (admin only)
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, role, created_at, last_login FROM users",
        )?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Delete a user by ID. Returns false if no such user existed.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        if rows_affected > 0 {
            info!("Deleted user: {}", id);
        }

        Ok(rows_affected > 0)
    }
}
