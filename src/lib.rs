//! Mundo Market — Library Root
//!
//! Chain-aware client for the Mundo marketplace contracts on Celo.
//! Re-exports all modules for integration tests and the CLI binary.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
