use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductView;
use crate::schema::{basket_items, baskets, order_items, orders, products};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
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

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub picture_url: String,
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        ProductView {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            picture_url: row.picture_url,
            product_type: row.product_type,
            brand: row.brand,
            quantity_in_stock: row.quantity_in_stock,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = baskets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BasketRow {
    pub id: String,
    pub payment_intent_id: Option<String>,
    pub client_secret: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = baskets)]
pub struct NewBasketRow {
    pub id: String,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = basket_items)]
#[diesel(belongs_to(BasketRow, foreign_key = basket_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BasketItemRow {
    pub id: Uuid,
    pub basket_id: String,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = basket_items)]
pub struct NewBasketItemRow {
    pub id: Uuid,
    pub basket_id: String,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub buyer_email: String,
    pub ship_name: String,
    pub ship_line1: String,
    pub ship_line2: Option<String>,
    pub ship_city: String,
    pub ship_state: Option<String>,
    pub ship_postal_code: String,
    pub ship_country: String,
    pub card_brand: String,
    pub card_last4: i32,
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub payment_intent_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub buyer_email: String,
    pub ship_name: String,
    pub ship_line1: String,
    pub ship_line2: Option<String>,
    pub ship_city: String,
    pub ship_state: Option<String>,
    pub ship_postal_code: String,
    pub ship_country: String,
    pub card_brand: String,
    pub card_last4: i32,
    pub card_exp_month: i32,
    pub card_exp_year: i32,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub payment_intent_id: String,
    pub status: String,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub picture_url: String,
    pub price: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub picture_url: String,
    pub price: i64,
    pub quantity: i32,
}
