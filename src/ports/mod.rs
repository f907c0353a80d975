//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use-case layer requires from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ledger`: Mundo marketplace + payment-token contract calls
//! - `wallet`: External wallet session state and prompts
//! - `notify`: Transient progress events for multi-step operations

pub mod ledger;
pub mod notify;
pub mod wallet;
