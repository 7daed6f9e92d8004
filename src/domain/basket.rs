use uuid::Uuid;

/// A basket line with its referenced product eagerly loaded. Price and stock
/// come from the live product row, never from a basket-time snapshot.
#[derive(Debug, Clone)]
pub struct BasketItemView {
    pub product_id: Uuid,
    pub product_name: String,
    pub picture_url: String,
    pub unit_price: i64,
    pub quantity: i32,
}

/// A shopping basket addressed by an opaque client-held id (cookie value).
#[derive(Debug, Clone)]
pub struct BasketView {
    pub id: String,
    pub items: Vec<BasketItemView>,
    pub payment_intent_id: Option<String>,
    pub client_secret: Option<String>,
}

impl BasketView {
    pub fn is_ready_for_checkout(&self) -> bool {
        !self.items.is_empty()
            && self
                .payment_intent_id
                .as_deref()
                .is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket(items: usize, intent: Option<&str>) -> BasketView {
        BasketView {
            id: "b1".to_string(),
            items: (0..items)
                .map(|i| BasketItemView {
                    product_id: Uuid::new_v4(),
                    product_name: format!("p{}", i),
                    picture_url: String::new(),
                    unit_price: 100,
                    quantity: 1,
                })
                .collect(),
            payment_intent_id: intent.map(str::to_string),
            client_secret: None,
        }
    }

    #[test]
    fn ready_when_items_and_intent_present() {
        assert!(basket(1, Some("pi_123")).is_ready_for_checkout());
    }

    #[test]
    fn not_ready_without_items() {
        assert!(!basket(0, Some("pi_123")).is_ready_for_checkout());
    }

    #[test]
    fn not_ready_without_payment_intent() {
        assert!(!basket(2, None).is_ready_for_checkout());
    }

    #[test]
    fn not_ready_with_empty_payment_intent() {
        assert!(!basket(2, Some("")).is_ready_for_checkout());
    }
}
