//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `chain`: Celo blockchain interaction via alloy-rs
//! - `session`: watch-channel backed wallet session state
//! - `notify`: tracing-backed progress notifications

pub mod chain;
pub mod notify;
pub mod session;
