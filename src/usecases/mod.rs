//! Use Cases Layer - Application Business Logic
//!
//! One orchestrator lives here: `MarketplaceClient`, the single point of
//! contact between every storefront surface and the ledger. It composes the
//! wallet-session, ledger, and progress ports with the domain's profile
//! table and amount conversion.

pub mod client;

pub use client::MarketplaceClient;
