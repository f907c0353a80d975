//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::network::known_network;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        app = %config.app.name,
        networks = config.networks.len(),
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - At least one network, no duplicate chain ids
/// - Chain ids limited to the documented networks, with matching
///   decimals and currency symbol
/// - Well-formed contract addresses and non-empty RPC endpoints
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.networks.is_empty(),
        "At least one network must be configured"
    );

    let mut seen = std::collections::HashSet::new();
    for (i, network) in config.networks.iter().enumerate() {
        anyhow::ensure!(
            seen.insert(network.chain_id),
            "Network {} ({}) duplicates chain id {}",
            i,
            network.name,
            network.chain_id
        );

        let (decimals, symbol) = known_network(network.chain_id).with_context(|| {
            format!(
                "Network {} ({}) has unsupported chain id {}",
                i, network.name, network.chain_id
            )
        })?;
        anyhow::ensure!(
            network.decimals == decimals,
            "Network {} ({}) must use {} decimals on chain {}, got {}",
            i,
            network.name,
            decimals,
            network.chain_id,
            network.decimals
        );
        anyhow::ensure!(
            network.currency_symbol == symbol,
            "Network {} ({}) must use currency {symbol} on chain {}, got {}",
            i,
            network.name,
            network.chain_id,
            network.currency_symbol
        );

        anyhow::ensure!(
            !network.rpc_url.is_empty(),
            "Network {} ({}) has empty rpc_url",
            i,
            network.name
        );
        for (field, addr) in [
            ("marketplace_address", &network.marketplace_address),
            ("payment_token_address", &network.payment_token_address),
        ] {
            anyhow::ensure!(
                is_hex_address(addr),
                "Network {} ({}) has malformed {field}: {addr}",
                i,
                network.name
            );
        }
    }

    Ok(())
}

/// 0x-prefixed, 20-byte hex address.
fn is_hex_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s[2..].bytes().all(|b| b.is_ascii_hexdigit())
}
