use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A catalog product. `price` is in minor currency units (cents).
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
    pub created_at: DateTime<Utc>,
}
