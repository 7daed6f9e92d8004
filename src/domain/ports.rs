use uuid::Uuid;

use super::basket::BasketView;
use super::errors::DomainError;
use super::order::{AssembleOrderCommand, OrderView};
use super::product::ProductView;

pub trait CatalogStore: Send + Sync + 'static {
    fn list_products(&self) -> Result<Vec<ProductView>, DomainError>;
    fn find_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
}

pub trait BasketStore: Send + Sync + 'static {
    /// Returns the basket with its items and referenced products eagerly
    /// loaded, or `None` if no basket exists under `basket_id`.
    fn get_basket_with_items(&self, basket_id: &str) -> Result<Option<BasketView>, DomainError>;

    /// Adds `quantity` units of a product, creating the basket on first use
    /// and merging into an existing line for the same product.
    fn add_item(
        &self,
        basket_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<BasketView, DomainError>;

    /// Removes `quantity` units; the line is deleted once it reaches zero.
    fn remove_item(
        &self,
        basket_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<BasketView, DomainError>;

    /// Associates the basket with a payment-provider session.
    fn set_payment_intent(
        &self,
        basket_id: &str,
        payment_intent_id: &str,
        client_secret: &str,
    ) -> Result<(), DomainError>;
}

pub trait OrderStore: Send + Sync + 'static {
    /// Runs the stock check, stock decrement, and order upsert as one atomic
    /// unit of work. Either everything commits or nothing does.
    ///
    /// Idempotent on `payment_intent_id`: an existing order under the same
    /// intent has its items and totals replaced instead of being duplicated.
    fn assemble(&self, cmd: &AssembleOrderCommand) -> Result<OrderView, DomainError>;

    fn find_for_buyer(&self, id: Uuid, buyer_email: &str)
        -> Result<Option<OrderView>, DomainError>;

    fn list_for_buyer(&self, buyer_email: &str) -> Result<Vec<OrderView>, DomainError>;
}
