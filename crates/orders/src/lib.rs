//! Order orchestrator.
//!
//! [`OrderService::create_order_from_cart`] reads the user's live cart,
//! re-validates every line against the catalog, snapshots names and prices
//! into order items and persists the order with its items as one unit. No
//! stock is reserved or decremented; the stock check at checkout is the
//! authoritative one.
//!
//! Reads are served cache-aside from [`OrderResponse`] projections; every
//! write deletes the affected entries.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod repository;
pub mod response;
pub mod service;
pub mod status;

pub use error::{OrderError, Result};
pub use memory::InMemoryOrderRepository;
pub use model::{NewOrder, NewOrderItem, Order, OrderItem};
pub use postgres::PostgresOrderRepository;
pub use repository::OrderRepository;
pub use response::{OrderItemResponse, OrderResponse};
pub use service::OrderService;
pub use status::OrderStatus;
