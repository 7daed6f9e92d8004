use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::basket::BasketView;
use crate::domain::ports::BasketStore;
use crate::errors::AppError;
use crate::infrastructure::basket_repo::DieselBasketStore;

/// Cookie holding the opaque basket id. The basket is not tied to a user
/// account; whoever presents the cookie owns the basket.
pub const BASKET_COOKIE: &str = "basketId";

const BASKET_COOKIE_DAYS: i64 = 30;

#[derive(Debug, Serialize, ToSchema)]
pub struct BasketItemResponse {
    pub product_id: Uuid,
    pub name: String,
    /// Live catalog price in minor currency units, not a basket-time snapshot.
    pub price: i64,
    pub picture_url: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BasketResponse {
    pub basket_id: String,
    pub items: Vec<BasketItemResponse>,
    pub payment_intent_id: Option<String>,
    pub client_secret: Option<String>,
}

impl From<BasketView> for BasketResponse {
    fn from(basket: BasketView) -> Self {
        BasketResponse {
            basket_id: basket.id,
            items: basket
                .items
                .into_iter()
                .map(|i| BasketItemResponse {
                    product_id: i.product_id,
                    name: i.product_name,
                    price: i.unit_price,
                    picture_url: i.picture_url,
                    quantity: i.quantity,
                })
                .collect(),
            payment_intent_id: basket.payment_intent_id,
            client_secret: basket.client_secret,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BasketItemParams {
    pub product_id: Uuid,
    /// Units to add or remove. Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

fn basket_id_from(req: &HttpRequest) -> Option<String> {
    req.cookie(BASKET_COOKIE).map(|c| c.value().to_string())
}

/// GET /api/basket
#[utoipa::path(
    get,
    path = "/api/basket",
    responses(
        (status = 200, description = "The caller's basket", body = BasketResponse),
        (status = 404, description = "No basket under the presented cookie"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "basket"
)]
pub async fn get_basket(
    baskets: web::Data<DieselBasketStore>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let Some(basket_id) = basket_id_from(&req) else {
        return Err(AppError::NotFound);
    };

    let basket = web::block(move || baskets.get_basket_with_items(&basket_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match basket {
        Some(b) => Ok(HttpResponse::Ok().json(BasketResponse::from(b))),
        None => Err(AppError::NotFound),
    }
}

/// POST /api/basket?product_id=&quantity=
///
/// Adds units of a product to the caller's basket. The basket is created on
/// first interaction and its id handed back in the `basketId` cookie.
#[utoipa::path(
    post,
    path = "/api/basket",
    params(BasketItemParams),
    responses(
        (status = 201, description = "Item added", body = BasketResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "basket"
)]
pub async fn add_item(
    baskets: web::Data<DieselBasketStore>,
    req: HttpRequest,
    query: web::Query<BasketItemParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    if params.quantity <= 0 {
        return Err(AppError::BadRequest("Quantity must be positive".to_string()));
    }

    let (basket_id, is_new) = match basket_id_from(&req) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    let id_for_block = basket_id.clone();
    let basket = web::block(move || {
        baskets.add_item(&id_for_block, params.product_id, params.quantity)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut response = HttpResponse::Created();
    if is_new {
        response.cookie(
            Cookie::build(BASKET_COOKIE, basket_id)
                .path("/")
                .max_age(Duration::days(BASKET_COOKIE_DAYS))
                .http_only(true)
                .finish(),
        );
    }
    Ok(response.json(BasketResponse::from(basket)))
}

/// DELETE /api/basket?product_id=&quantity=
#[utoipa::path(
    delete,
    path = "/api/basket",
    params(BasketItemParams),
    responses(
        (status = 200, description = "Item removed", body = BasketResponse),
        (status = 404, description = "Basket or line not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "basket"
)]
pub async fn remove_item(
    baskets: web::Data<DieselBasketStore>,
    req: HttpRequest,
    query: web::Query<BasketItemParams>,
) -> Result<HttpResponse, AppError> {
    let Some(basket_id) = basket_id_from(&req) else {
        return Err(AppError::NotFound);
    };
    let params = query.into_inner();
    if params.quantity <= 0 {
        return Err(AppError::BadRequest("Quantity must be positive".to_string()));
    }

    let basket = web::block(move || {
        baskets.remove_item(&basket_id, params.product_id, params.quantity)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(BasketResponse::from(basket)))
}
