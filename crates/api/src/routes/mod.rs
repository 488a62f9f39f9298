pub mod cart;
pub mod metrics;
pub mod orders;
pub mod products;
