pub mod basket;
pub mod identity;
pub mod orders;
pub mod products;
