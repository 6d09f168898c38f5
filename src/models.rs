//! Domain Models
//! Mission: Typed request/response contracts for every resource

use serde::{Deserialize, Serialize};

/// Client of the shop (orders) or patient (prescriptions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

/// Product available for custom orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub base_cost: f64,
    pub profit_margin: f64,
    pub main_material: String,
}

#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub kind: String,
    pub base_cost: f64,
    pub profit_margin: f64,
    pub main_material: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub base_cost: Option<f64>,
    pub profit_margin: Option<f64>,
    pub main_material: Option<String>,
}

/// Customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub total_value: f64,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub client_id: i64,
    pub total_value: f64,
    pub status: String,
    /// Items may be created together with the order
    pub items: Option<Vec<NewOrderItemInline>>,
}

/// Order item supplied inline with an order creation
#[derive(Debug, Deserialize)]
pub struct NewOrderItemInline {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrder {
    pub client_id: Option<i64>,
    pub total_value: Option<f64>,
    pub status: Option<String>,
}

/// Line item of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderItem {
    pub order_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
}

/// Product customization option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customization {
    pub id: i64,
    pub kind: String,
    pub added_cost: f64,
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCustomization {
    pub kind: String,
    pub added_cost: f64,
    pub details: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomization {
    pub kind: Option<String>,
    pub added_cost: Option<f64>,
    pub details: Option<String>,
}

/// Printable image attached to customizations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub source: String,
    pub added_cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewImage {
    pub source: String,
    pub added_cost: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateImage {
    pub source: Option<String>,
    pub added_cost: Option<f64>,
}

/// Medication prescription for a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: i64,
    pub client_id: i64,
    pub medication: String,
    pub dosage: String,
    pub instructions: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewPrescription {
    pub client_id: i64,
    pub medication: String,
    pub dosage: String,
    pub instructions: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePrescription {
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Intake/dispensation log entry for a prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub prescription_id: i64,
    pub taken_at: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewHistoryEntry {
    pub prescription_id: i64,
    /// Defaults to the current time when absent
    pub taken_at: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateHistoryEntry {
    pub taken_at: Option<String>,
    pub note: Option<String>,
}
