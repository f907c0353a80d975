//! Network profiles - Per-chain marketplace constants.
//!
//! The marketplace is deployed on exactly two Celo networks. Which contract
//! addresses, currency symbol, and decimal count apply is decided entirely
//! by the chain id of the live wallet session. Everything chain-specific is
//! bundled into one `NetworkProfile` and resolved through an immutable
//! lookup table, so call sites never branch on chain id themselves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Celo Alfajores testnet chain id.
pub const ALFAJORES_CHAIN_ID: u64 = 44787;

/// Celo mainnet chain id.
pub const CELO_CHAIN_ID: u64 = 42220;

/// Fixed (chain id, decimals, currency symbol) triples for the networks the
/// marketplace recognizes. Config may supply addresses and RPC endpoints,
/// but it may not contradict these constants.
pub const KNOWN_NETWORKS: [(u64, u32, &str); 2] = [
    (ALFAJORES_CHAIN_ID, 6, "USDC"),
    (CELO_CHAIN_ID, 18, "cKES"),
];

/// Everything chain-specific the client needs for one network.
///
/// Profiles are immutable once built. On a network change the whole profile
/// is swapped, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// EVM chain id this profile applies to.
    pub chain_id: u64,
    /// Decimal places of the payment token (atomic = human × 10^decimals).
    pub decimals: u32,
    /// Display symbol of the payment token ("USDC" / "cKES").
    pub currency_symbol: String,
    /// HTTP RPC endpoint for this network.
    pub rpc_url: String,
    /// Deployed Mundo marketplace contract address.
    pub marketplace_address: String,
    /// Payment token (ERC-20) contract address.
    pub payment_token_address: String,
}

/// Immutable chain-id → profile lookup table.
///
/// `resolve` is a pure lookup with no side effects. A miss means "the
/// marketplace is unavailable on this network", not an error condition.
#[derive(Debug, Clone, Default)]
pub struct ProfileTable {
    profiles: HashMap<u64, NetworkProfile>,
}

impl ProfileTable {
    /// Build a table from validated profiles. Later duplicates win, but the
    /// config loader rejects duplicate chain ids before this is reached.
    pub fn new(profiles: impl IntoIterator<Item = NetworkProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.chain_id, p)).collect(),
        }
    }

    /// Resolve the profile for a chain id, if the marketplace supports it.
    pub fn resolve(&self, chain_id: u64) -> Option<&NetworkProfile> {
        self.profiles.get(&chain_id)
    }

    /// Whether any profile is configured for this chain id.
    pub fn supports(&self, chain_id: u64) -> bool {
        self.profiles.contains_key(&chain_id)
    }

    /// Chain id an unsupported session is asked to switch to.
    ///
    /// The testnet is the designated fallback; if it is not configured the
    /// first configured network is used instead.
    pub fn switch_target(&self) -> Option<u64> {
        if self.profiles.contains_key(&ALFAJORES_CHAIN_ID) {
            return Some(ALFAJORES_CHAIN_ID);
        }
        self.profiles.keys().min().copied()
    }

    /// Number of configured networks.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no networks are configured.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Look up the documented (decimals, symbol) constants for a chain id.
pub fn known_network(chain_id: u64) -> Option<(u32, &'static str)> {
    KNOWN_NETWORKS
        .iter()
        .find(|(id, _, _)| *id == chain_id)
        .map(|(_, decimals, symbol)| (*decimals, *symbol))
}
