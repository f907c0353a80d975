//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`. All contract
//! addresses and RPC endpoints are externalized here - nothing is
//! hardcoded in the domain layer. The only constants the loader enforces
//! are the documented per-chain decimals and currency symbols, which a
//! config file is not allowed to contradict.

pub mod loader;

use serde::Deserialize;

use crate::domain::network::{NetworkProfile, ProfileTable};

/// Top-level client configuration, loaded from `config.toml` at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application identity and logging.
    pub app: AppSettings,
    /// One entry per supported network.
    pub networks: Vec<NetworkConfig>,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Human-readable application name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// One supported network and its deployed contracts.
///
/// Chain id, decimals, and currency symbol must match the documented
/// constants for that network; addresses and RPC endpoints are free.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name ("alfajores", "celo").
    pub name: String,
    /// EVM chain id.
    pub chain_id: u64,
    /// Payment-token decimal places.
    pub decimals: u32,
    /// Payment-token display symbol.
    pub currency_symbol: String,
    /// HTTP RPC endpoint.
    pub rpc_url: String,
    /// Deployed Mundo marketplace contract address.
    pub marketplace_address: String,
    /// Payment token (ERC-20) contract address.
    pub payment_token_address: String,
}

impl AppConfig {
    /// Build the immutable profile lookup table from validated config.
    pub fn profile_table(&self) -> ProfileTable {
        ProfileTable::new(self.networks.iter().map(|n| NetworkProfile {
            chain_id: n.chain_id,
            decimals: n.decimals,
            currency_symbol: n.currency_symbol.clone(),
            rpc_url: n.rpc_url.clone(),
            marketplace_address: n.marketplace_address.clone(),
            payment_token_address: n.payment_token_address.clone(),
        }))
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}
