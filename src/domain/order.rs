use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shipping destination captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddress {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

/// Card summary returned by the payment provider once the intent succeeds.
/// Field names follow the provider's wire format (`exp_month`, `exp_year`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentSummary {
    pub brand: String,
    pub last4: i32,
    pub exp_month: i32,
    pub exp_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    PaymentReceived,
    PaymentFailed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::PaymentReceived => "PaymentReceived",
            OrderStatus::PaymentFailed => "PaymentFailed",
        }
    }
}

/// One requested line of an assembly: which product and how many units.
/// Prices are deliberately absent; they are read from the live product rows
/// inside the assembly transaction.
#[derive(Debug, Clone)]
pub struct RequestedLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Everything the order store needs to run one assembly transaction.
#[derive(Debug, Clone)]
pub struct AssembleOrderCommand {
    pub buyer_email: String,
    pub payment_intent_id: String,
    pub lines: Vec<RequestedLine>,
    pub shipping_address: ShippingAddress,
    pub payment_summary: PaymentSummary,
}

/// Immutable snapshot of a product at the moment the order was assembled.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_id: Uuid,
    pub name: String,
    pub picture_url: String,
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub buyer_email: String,
    pub shipping_address: ShippingAddress,
    pub payment_summary: PaymentSummary,
    pub items: Vec<OrderItemView>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub payment_intent_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl OrderView {
    pub fn total(&self) -> i64 {
        self.subtotal + self.delivery_fee
    }
}
