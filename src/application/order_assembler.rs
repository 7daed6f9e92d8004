use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    AssembleOrderCommand, OrderView, PaymentSummary, RequestedLine, ShippingAddress,
};
use crate::domain::ports::{BasketStore, OrderStore};

/// Turns a basket into a durable order: validates the basket, then hands the
/// requested lines to the order store, which reserves stock, computes charges,
/// and persists the order as one atomic unit of work, idempotent on the
/// basket's payment-intent id.
pub struct OrderAssembler<B, O> {
    baskets: B,
    orders: O,
}

impl<B: BasketStore, O: OrderStore> OrderAssembler<B, O> {
    pub fn new(baskets: B, orders: O) -> Self {
        Self { baskets, orders }
    }

    pub fn assemble_order(
        &self,
        basket_id: &str,
        buyer_email: &str,
        shipping_address: ShippingAddress,
        payment_summary: PaymentSummary,
    ) -> Result<OrderView, DomainError> {
        let basket = self
            .baskets
            .get_basket_with_items(basket_id)?
            .ok_or_else(|| DomainError::InvalidBasketState("basket not found".to_string()))?;

        if basket.items.is_empty() {
            return Err(DomainError::InvalidBasketState(
                "basket has no items".to_string(),
            ));
        }

        let payment_intent_id = match basket.payment_intent_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(DomainError::InvalidBasketState(
                    "basket has no payment intent".to_string(),
                ))
            }
        };

        let cmd = AssembleOrderCommand {
            buyer_email: buyer_email.to_string(),
            payment_intent_id,
            lines: basket
                .items
                .iter()
                .map(|i| RequestedLine {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
            shipping_address,
            payment_summary,
        };

        let order = self.orders.assemble(&cmd)?;
        log::info!(
            "assembled order {} for intent {} (subtotal {}, delivery fee {})",
            order.id,
            order.payment_intent_id,
            order.subtotal,
            order.delivery_fee
        );
        Ok(order)
    }

    pub fn get_order(
        &self,
        id: Uuid,
        buyer_email: &str,
    ) -> Result<Option<OrderView>, DomainError> {
        self.orders.find_for_buyer(id, buyer_email)
    }

    pub fn list_orders(&self, buyer_email: &str) -> Result<Vec<OrderView>, DomainError> {
        self.orders.list_for_buyer(buyer_email)
    }
}
