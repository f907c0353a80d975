//! Ledger Port - Marketplace and Payment-Token Contract Interface
//!
//! Defines the traits the client requires from the deployed Mundo
//! marketplace contract and its ERC-20 payment token. Amounts cross this
//! boundary in atomic units only; conversion to human units happens in the
//! use-case layer with the profile active at call time.
//!
//! Implementations wait for transaction confirmation before returning a
//! receipt. That property is what lets `buy_item` enforce its
//! approval-before-purchase ordering with plain sequential awaits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::catalog::{NewListing, RawItem, RawOrder};
use crate::domain::network::NetworkProfile;

/// Receipt of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash, 0x-prefixed.
    pub tx_hash: String,
    /// Block the transaction was mined in.
    pub block_number: u64,
}

/// Trait for the deployed Mundo marketplace contract.
#[async_trait]
pub trait MarketplaceLedger: Send + Sync + 'static {
    /// Address of the contract owner (gates the storefront's admin form).
    async fn owner(&self) -> anyhow::Result<String>;

    /// Submit a listing and wait for confirmation. The contract's rating
    /// argument is always zero for fresh listings.
    async fn list_item(&self, listing: &NewListing) -> anyhow::Result<TxReceipt>;

    /// Fetch every listed item, in ledger-reported order.
    async fn all_items(&self) -> anyhow::Result<Vec<RawItem>>;

    /// Fetch a single item by id.
    ///
    /// Returns `Ok(None)` when the ledger signals "no such item" — whether
    /// by reverting the call or by returning a zeroed sentinel tuple.
    async fn item(&self, id: u64) -> anyhow::Result<Option<RawItem>>;

    /// Submit a purchase referencing a prior confirmed approval and wait
    /// for confirmation.
    async fn buy(&self, id: u64, payment_token: &str) -> anyhow::Result<TxReceipt>;

    /// Fetch all orders recorded for a wallet address.
    async fn orders_for(&self, address: &str) -> anyhow::Result<Vec<RawOrder>>;

    /// Whether a token is on the contract's payment allow-list.
    async fn is_token_allowed(&self, token: &str) -> anyhow::Result<bool>;

    /// Allow-list a payment token (owner-only) and wait for confirmation.
    async fn allow_token(&self, token: &str) -> anyhow::Result<TxReceipt>;
}

/// Trait for the ERC-20 payment token contract.
#[async_trait]
pub trait PaymentToken: Send + Sync + 'static {
    /// Approve `spender` to transfer exactly `amount_atomic` and wait for
    /// the approval to confirm.
    async fn approve(&self, spender: &str, amount_atomic: u128) -> anyhow::Result<TxReceipt>;
}

/// Contract handles bound to one network profile.
///
/// Replaced wholesale on every network change; a handle bound to a previous
/// network must never serve a call on the new one.
#[derive(Clone)]
pub struct LedgerHandles {
    pub marketplace: Arc<dyn MarketplaceLedger>,
    pub payment_token: Arc<dyn PaymentToken>,
}

/// Constructs ledger handles for a resolved network profile.
///
/// The client calls this on every transition into a resolved profile, so
/// implementations must bind to the profile's addresses and RPC endpoint,
/// not to any previously seen network.
#[async_trait]
pub trait LedgerFactory: Send + Sync + 'static {
    async fn bind(&self, profile: &NetworkProfile) -> anyhow::Result<LedgerHandles>;
}
