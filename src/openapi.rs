use utoipa::OpenApi;

use crate::domain::order::{PaymentSummary, ShippingAddress};
use crate::handlers::basket::{BasketItemResponse, BasketResponse};
use crate::handlers::orders::{CreateOrderRequest, OrderItemResponse, OrderResponse};
use crate::handlers::products::ProductResponse;

#[derive(OpenApi)]
#[openapi(
    info(title = "Store API", version = "1.0.0"),
    paths(
        crate::handlers::products::get_products,
        crate::handlers::products::get_product,
        crate::handlers::basket::get_basket,
        crate::handlers::basket::add_item,
        crate::handlers::basket::remove_item,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_orders,
        crate::handlers::orders::get_order_details,
    ),
    components(schemas(
        ProductResponse,
        BasketResponse,
        BasketItemResponse,
        CreateOrderRequest,
        OrderResponse,
        OrderItemResponse,
        ShippingAddress,
        PaymentSummary,
    )),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "basket", description = "Cookie-keyed shopping basket"),
        (name = "orders", description = "Order assembly and retrieval"),
    )
)]
pub struct ApiDoc;
