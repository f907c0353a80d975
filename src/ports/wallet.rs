//! Wallet Session Port - External Wallet Provider Interface
//!
//! The wallet session is owned by an external provider (browser extension,
//! MiniPay, a local signer in the CLI); this client only reads it. Session
//! state is injected through this trait rather than ambient globals so the
//! client is testable with a fake provider.
//!
//! `prompt_connect` and `request_chain_switch` are fire-and-forget: their
//! completion is observed through a later change in `state()`, never as a
//! return value.

use async_trait::async_trait;

/// Read-only view of the external wallet session. Derived, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Whether a wallet session exists.
    pub connected: bool,
    /// Chain id of the connected network, if any.
    pub chain_id: Option<u64>,
    /// Address of the connected account, if any.
    pub address: Option<String>,
}

impl SessionState {
    /// A connected session on the given chain.
    pub fn connected(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            connected: true,
            chain_id: Some(chain_id),
            address: Some(address.into()),
        }
    }
}

/// Trait for the external wallet session provider.
#[async_trait]
pub trait WalletSession: Send + Sync + 'static {
    /// Current session state. Cheap; called before every operation so the
    /// profile is always derived from the live chain id.
    fn state(&self) -> SessionState;

    /// Ask the provider to open its connect prompt.
    async fn prompt_connect(&self);

    /// Ask the provider to switch the session to `chain_id`. The switch is
    /// asynchronous on the provider side; callers re-check `state()` later.
    async fn request_chain_switch(&self, chain_id: u64);
}
