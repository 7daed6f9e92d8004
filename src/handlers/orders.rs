use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{OrderView, PaymentSummary, ShippingAddress};
use crate::errors::AppError;
use crate::handlers::basket::BASKET_COOKIE;
use crate::handlers::identity::BuyerIdentity;
use crate::AppAssembler;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_summary: PaymentSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub picture_url: String,
    /// Unit price snapshotted at assembly time, in minor currency units.
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub buyer_email: String,
    pub shipping_address: ShippingAddress,
    pub payment_summary: PaymentSummary,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
    pub payment_intent_id: String,
    pub status: String,
    pub created_at: String,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        let total = order.total();
        OrderResponse {
            id: order.id,
            buyer_email: order.buyer_email,
            shipping_address: order.shipping_address,
            payment_summary: order.payment_summary,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product_id: i.product_id,
                    name: i.name,
                    picture_url: i.picture_url,
                    price: i.price,
                    quantity: i.quantity,
                })
                .collect(),
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            total,
            payment_intent_id: order.payment_intent_id,
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Assembles the caller's basket into an order: checks stock, decrements it,
/// computes the delivery fee, and persists the whole aggregate in a single
/// transaction. Re-posting for the same payment intent updates the existing
/// order instead of creating a second one.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order assembled", body = OrderResponse),
        (status = 400, description = "Basket invalid, items out of stock, or write failed"),
        (status = 401, description = "Caller is not authenticated"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    assembler: web::Data<AppAssembler>,
    identity: BuyerIdentity,
    req: HttpRequest,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(basket_id) = req.cookie(BASKET_COOKIE).map(|c| c.value().to_string()) else {
        return Err(AppError::BadRequest(
            "Basket is empty or not found".to_string(),
        ));
    };
    let body = body.into_inner();

    let order = web::block(move || {
        assembler.assemble_order(
            &basket_id,
            &identity.0,
            body.shipping_address,
            body.payment_summary,
        )
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// Lists the authenticated buyer's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Caller is not authenticated"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_orders(
    assembler: web::Data<AppAssembler>,
    identity: BuyerIdentity,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || assembler.list_orders(&identity.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/orders/{id}
///
/// Returns one of the caller's orders. Another buyer's order id yields 404,
/// not 403, so order ids are not probeable.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Caller is not authenticated"),
        (status = 404, description = "No such order for this buyer"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order_details(
    assembler: web::Data<AppAssembler>,
    identity: BuyerIdentity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || assembler.get_order(id, &identity.0))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}
