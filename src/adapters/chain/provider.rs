//! Celo RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to one Celo network (Alfajores or mainnet) via
//! alloy-rs. Validates at bind time that the RPC endpoint really serves the
//! profile's chain id, so a misconfigured URL can never route marketplace
//! calls to the wrong network.
//!
//! In alloy 0.9, `ProviderBuilder::new().on_http()` returns a complex
//! filler type. We store it as a type-erased `dyn Provider` to keep
//! the API clean across the adapter layer.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::client::ClientBuilder;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::network::NetworkProfile;

/// Env var holding the hex-encoded private key of the local signer.
pub const WALLET_KEY_ENV: &str = "MUNDO_WALLET_KEY";

/// RPC provider bound to exactly one network profile.
///
/// Rebuilt from scratch on every network change; the marketplace client
/// never reuses a provider across chain ids.
pub struct CeloProvider {
    /// The alloy HTTP provider (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Chain id this provider was validated against.
    chain_id: u64,
    /// Address of the local signer, when one was configured.
    signer_address: Option<String>,
}

impl CeloProvider {
    /// Connect to the profile's RPC endpoint and validate its chain id.
    ///
    /// When `MUNDO_WALLET_KEY` is set the provider signs and submits
    /// transactions locally; without it the provider is read-only and
    /// mutating operations will fail at submission time.
    #[instrument(skip_all, fields(chain_id = profile.chain_id))]
    pub async fn connect(profile: &NetworkProfile) -> Result<Self> {
        let url = profile
            .rpc_url
            .parse()
            .with_context(|| format!("Invalid RPC URL: {}", profile.rpc_url))?;
        let client = ClientBuilder::default().http(url).boxed();

        let (provider, signer_address): (Arc<dyn Provider + Send + Sync>, _) =
            match std::env::var(WALLET_KEY_ENV) {
                Ok(key) => {
                    let signer: PrivateKeySigner = key
                        .trim()
                        .parse()
                        .context("MUNDO_WALLET_KEY is not a valid private key")?;
                    let address = format!("{:#x}", signer.address());
                    let wallet = EthereumWallet::from(signer);
                    let provider = ProviderBuilder::new().wallet(wallet).on_client(client);
                    (Arc::new(provider), Some(address))
                }
                Err(_) => {
                    let provider = ProviderBuilder::new().on_client(client);
                    (Arc::new(provider), None)
                }
            };

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != profile.chain_id {
            anyhow::bail!(
                "RPC endpoint serves chain {chain_id}, profile expects {}",
                profile.chain_id
            );
        }

        info!(
            chain_id,
            currency = %profile.currency_symbol,
            signing = signer_address.is_some(),
            "Connected to Celo RPC"
        );

        Ok(Self {
            provider,
            chain_id,
            signer_address,
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Chain id this provider was validated against at connect time.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Address of the configured local signer, if any.
    pub fn signer_address(&self) -> Option<&str> {
        self.signer_address.as_deref()
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
