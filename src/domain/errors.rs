use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Basket missing, empty, or not yet associated with a payment intent.
    /// The client must fix the basket before retrying.
    #[error("Basket is empty or not found")]
    InvalidBasketState(String),

    /// One or more requested quantities exceed available stock. No stock is
    /// mutated and no order is created when this is returned.
    #[error("Some items out of stock")]
    InsufficientStock { product: String },

    /// The durable write did not commit. Safe to retry: order assembly is
    /// idempotent on the payment-intent id.
    #[error("Problem creating order")]
    PersistenceFailure,

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}
