//! Pricing policy constants and the pure charge computations used by order
//! assembly. All amounts are minor currency units (cents).

/// Orders strictly above this subtotal ship for free.
pub const FREE_DELIVERY_THRESHOLD: i64 = 10_000;

/// Flat delivery fee below the free-delivery threshold.
pub const STANDARD_DELIVERY_FEE: i64 = 500;

/// Step function of the subtotal: free above the threshold, flat fee otherwise.
pub fn delivery_fee(subtotal: i64) -> i64 {
    if subtotal > FREE_DELIVERY_THRESHOLD {
        0
    } else {
        STANDARD_DELIVERY_FEE
    }
}

/// Sum of `price * quantity` over (price, quantity) pairs.
pub fn subtotal<I>(lines: I) -> i64
where
    I: IntoIterator<Item = (i64, i32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| price * i64::from(quantity))
        .sum()
}
