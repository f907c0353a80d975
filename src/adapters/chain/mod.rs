//! Chain Adapters - Celo Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with chain-id validation per profile
//! - Mundo marketplace contract calls (catalog, listing, purchase, orders)
//! - ERC-20 payment-token approvals
//! - The `LedgerFactory` that rebinds everything on a network change

pub mod contracts;
pub mod provider;

pub use contracts::{Erc20Token, MundoContracts};
pub use provider::CeloProvider;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::instrument;

use crate::domain::network::NetworkProfile;
use crate::ports::ledger::{LedgerFactory, LedgerHandles};

/// Builds fresh provider + contract handles for a resolved profile.
///
/// Called by the client on every transition into a resolved profile, so a
/// network switch always gets handles bound to the new network's RPC
/// endpoint and addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CeloLedgerFactory;

#[async_trait]
impl LedgerFactory for CeloLedgerFactory {
    #[instrument(skip_all, fields(chain_id = profile.chain_id))]
    async fn bind(&self, profile: &NetworkProfile) -> Result<LedgerHandles> {
        let provider = Arc::new(CeloProvider::connect(profile).await?);

        let marketplace =
            MundoContracts::bind(Arc::clone(&provider), &profile.marketplace_address).await?;
        let payment_token =
            Erc20Token::bind(Arc::clone(&provider), &profile.payment_token_address).await?;

        Ok(LedgerHandles {
            marketplace: Arc::new(marketplace),
            payment_token: Arc::new(payment_token),
        })
    }
}
