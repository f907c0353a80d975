//! Domain layer - Core marketplace types and conversion logic.
//!
//! Pure logic only: network profile resolution, amount conversion, catalog
//! shapes, and the error taxonomy. No I/O and no alloy types here
//! (hexagonal architecture inner ring); everything is testable in
//! isolation.

pub mod amount;
pub mod catalog;
pub mod error;
pub mod network;

// Re-export core types for convenience
pub use catalog::{Category, NewListing, Order, Product, RawItem, RawOrder};
pub use error::{MarketError, TxPhase};
pub use network::{NetworkProfile, ProfileTable};
