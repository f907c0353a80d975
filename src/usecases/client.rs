//! Marketplace Client Use Case - Single Point of Contact with the Ledger
//!
//! Every storefront surface (catalog, categories, item detail, orders,
//! admin form) talks to the ledger through this one orchestrator. It owns:
//!
//! - connection gating (`ensure_ready`),
//! - network → profile resolution, re-derived from the live chain id
//!   before every call,
//! - contract-handle rebinding on network change (stale handles bound to a
//!   previous network are never reused),
//! - atomic ↔ human amount conversion at the port boundary,
//! - normalization of all ledger failures into `MarketError`.
//!
//! The client is stateless between calls except for the cached handle
//! binding, which is swapped wholesale when the session's chain id moves.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::amount;
use crate::domain::catalog::{Category, NewListing, Order, Product};
use crate::domain::error::{MarketError, TxPhase};
use crate::domain::network::{NetworkProfile, ProfileTable};
use crate::ports::ledger::{LedgerFactory, LedgerHandles, TxReceipt};
use crate::ports::notify::{NullSink, ProgressSink, TxProgress};
use crate::ports::wallet::WalletSession;

/// Handle binding for the profile most recently resolved.
#[derive(Clone)]
struct Binding {
    profile: NetworkProfile,
    handles: LedgerHandles,
}

/// Chain-aware client for the Mundo marketplace contracts.
pub struct MarketplaceClient {
    session: Arc<dyn WalletSession>,
    factory: Arc<dyn LedgerFactory>,
    profiles: ProfileTable,
    progress: Arc<dyn ProgressSink>,
    bound: RwLock<Option<Binding>>,
}

impl MarketplaceClient {
    /// Create a client over an injected wallet session and ledger factory.
    pub fn new(
        session: Arc<dyn WalletSession>,
        factory: Arc<dyn LedgerFactory>,
        profiles: ProfileTable,
    ) -> Self {
        Self {
            session,
            factory,
            profiles,
            progress: Arc::new(NullSink),
            bound: RwLock::new(None),
        }
    }

    /// Route transient progress events to the given sink.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Pure chain-id → profile lookup. No side effects.
    pub fn resolve_profile(&self, chain_id: u64) -> Option<&NetworkProfile> {
        self.profiles.resolve(chain_id)
    }

    /// Check the session is usable, prompting the provider when it is not.
    ///
    /// Returns false and opens the connect prompt when no session exists;
    /// returns false and requests a switch to the testnet when the session
    /// sits on an unrecognized chain. The switch completes asynchronously
    /// on the provider side and is observed via a later re-invocation.
    pub async fn ensure_ready(&self) -> bool {
        self.gate().await.is_ok()
    }

    /// List a new item for sale. The price is converted human → atomic with
    /// the profile active at call time; the ledger assigns the id and the
    /// rating starts at zero. Callers re-fetch the catalog afterwards.
    pub async fn list_item(
        &self,
        name: &str,
        category: Category,
        image_url: &str,
        price_human: &str,
        stock: u32,
        description: &str,
    ) -> Result<TxReceipt, MarketError> {
        let profile = self.gate().await?;
        let price_atomic = amount::to_atomic(price_human, profile.decimals)?;
        let handles = self.bind_for(&profile).await?;

        let listing = NewListing {
            name: name.to_string(),
            category,
            image_url: image_url.to_string(),
            price_atomic,
            stock,
            description: description.to_string(),
        };

        self.progress.progress(TxProgress::ListingPending);
        let receipt = handles
            .marketplace
            .list_item(&listing)
            .await
            .map_err(|e| MarketError::rejected(TxPhase::Listing, &e))?;
        self.progress.progress(TxProgress::Confirmed);

        info!(
            name,
            category = %category,
            price = price_human,
            tx = %receipt.tx_hash,
            "Listing confirmed"
        );
        Ok(receipt)
    }

    /// Fetch every listed item, prices converted with the live profile.
    ///
    /// Empty when no profile is active. Ledger-reported order is preserved;
    /// callers needing a stable order sort explicitly.
    pub async fn all_items(&self) -> Result<Vec<Product>, MarketError> {
        let Some(profile) = self.active_profile() else {
            return Ok(Vec::new());
        };
        let handles = self.bind_for(&profile).await?;

        let raw = handles
            .marketplace
            .all_items()
            .await
            .map_err(|e| MarketError::unavailable(&e))?;

        let mut products = Vec::with_capacity(raw.len());
        for item in &raw {
            match Product::from_raw(item, profile.decimals) {
                Some(p) => products.push(p),
                None => warn!(id = item.id, category = %item.category, "Skipping malformed item tuple"),
            }
        }
        debug!(
            chain_id = profile.chain_id,
            items = products.len(),
            "Catalog fetched"
        );
        Ok(products)
    }

    /// Fetch every listed item in one category.
    pub async fn items_in(&self, category: Category) -> Result<Vec<Product>, MarketError> {
        let mut items = self.all_items().await?;
        items.retain(|p| p.category == category);
        Ok(items)
    }

    /// Fetch a single item by id.
    ///
    /// The ledger signals a never-listed id either by reverting or by
    /// returning a zeroed sentinel tuple; both normalize to `NotFound`.
    pub async fn item(&self, id: u64) -> Result<Product, MarketError> {
        let profile = self.gate().await?;
        let handles = self.bind_for(&profile).await?;

        let raw = match handles.marketplace.item(id).await {
            Ok(Some(raw)) if !raw.is_placeholder() => raw,
            Ok(_) => return Err(MarketError::not_found(format!("item {id}"))),
            Err(e) => {
                debug!(id, error = %e, "getItem call failed, treating as missing");
                return Err(MarketError::not_found(format!("item {id}")));
            }
        };

        Product::from_raw(&raw, profile.decimals)
            .ok_or_else(|| MarketError::not_found(format!("item {id}")))
    }

    /// Buy an item. Two phases, strictly ordered:
    ///
    /// 1. fetch the atomic price and have the payment token approve the
    ///    marketplace for exactly that amount, waiting for confirmation;
    /// 2. submit the purchase and wait for confirmation.
    ///
    /// Phase 2 is never submitted when phase 1 fails — an unauthorized
    /// transfer would revert anyway and cost the user gas. The error names
    /// the failing phase so the UI can say "approval failed" rather than
    /// "purchase failed".
    pub async fn buy_item(&self, id: u64) -> Result<TxReceipt, MarketError> {
        let profile = self.gate().await?;
        let handles = self.bind_for(&profile).await?;

        let raw = match handles.marketplace.item(id).await {
            Ok(Some(raw)) if !raw.is_placeholder() => raw,
            Ok(_) => return Err(MarketError::not_found(format!("item {id}"))),
            Err(e) => {
                debug!(id, error = %e, "getItem call failed, treating as missing");
                return Err(MarketError::not_found(format!("item {id}")));
            }
        };

        self.progress.progress(TxProgress::ApprovalPending);
        let approval = handles
            .payment_token
            .approve(&profile.marketplace_address, raw.price_atomic)
            .await
            .map_err(|e| MarketError::rejected(TxPhase::Approval, &e))?;
        debug!(id, tx = %approval.tx_hash, "Approval confirmed");

        self.progress.progress(TxProgress::PurchasePending);
        let receipt = handles
            .marketplace
            .buy(id, &profile.payment_token_address)
            .await
            .map_err(|e| MarketError::rejected(TxPhase::Purchase, &e))?;
        self.progress.progress(TxProgress::Confirmed);

        info!(
            id,
            price_atomic = raw.price_atomic,
            currency = %profile.currency_symbol,
            tx = %receipt.tx_hash,
            "Purchase confirmed"
        );
        Ok(receipt)
    }

    /// Fetch the order history of a wallet address, costs converted with
    /// the live profile. Empty when no profile is active or the address has
    /// no orders. Ledger-reported order is preserved.
    pub async fn orders_for(&self, address: &str) -> Result<Vec<Order>, MarketError> {
        let Some(profile) = self.active_profile() else {
            return Ok(Vec::new());
        };
        let handles = self.bind_for(&profile).await?;

        let raw = handles
            .marketplace
            .orders_for(address)
            .await
            .map_err(|e| MarketError::unavailable(&e))?;

        let mut orders = Vec::with_capacity(raw.len());
        for order in &raw {
            match Order::from_raw(order, profile.decimals) {
                Some(o) => orders.push(o),
                None => warn!(item_id = order.item.id, "Skipping malformed order tuple"),
            }
        }
        Ok(orders)
    }

    /// Order history of the connected account. Empty when disconnected.
    pub async fn my_orders(&self) -> Result<Vec<Order>, MarketError> {
        let Some(address) = self.session.state().address else {
            return Ok(Vec::new());
        };
        self.orders_for(&address).await
    }

    /// Address of the marketplace contract owner on the active network.
    pub async fn owner(&self) -> Result<String, MarketError> {
        let profile = self.gate().await?;
        let handles = self.bind_for(&profile).await?;
        handles
            .marketplace
            .owner()
            .await
            .map_err(|e| MarketError::unavailable(&e))
    }

    /// Whether the active profile's payment token is on the contract's
    /// allow-list.
    pub async fn is_payment_token_allowed(&self) -> Result<bool, MarketError> {
        let profile = self.gate().await?;
        let handles = self.bind_for(&profile).await?;
        handles
            .marketplace
            .is_token_allowed(&profile.payment_token_address)
            .await
            .map_err(|e| MarketError::unavailable(&e))
    }

    /// Allow-list the active profile's payment token. Owner-only; the
    /// ledger reverts for anyone else.
    pub async fn allow_payment_token(&self) -> Result<TxReceipt, MarketError> {
        let profile = self.gate().await?;
        let handles = self.bind_for(&profile).await?;
        handles
            .marketplace
            .allow_token(&profile.payment_token_address)
            .await
            .map_err(|e| MarketError::rejected(TxPhase::TokenAdmin, &e))
    }

    // ── internals ───────────────────────────────────────────

    /// Gate shared by every operation that needs a usable session.
    async fn gate(&self) -> Result<NetworkProfile, MarketError> {
        let state = self.session.state();
        if !state.connected {
            warn!("No wallet session, opening connect prompt");
            self.session.prompt_connect().await;
            return Err(MarketError::NotConnected);
        }
        let Some(chain_id) = state.chain_id else {
            self.session.prompt_connect().await;
            return Err(MarketError::NotConnected);
        };
        match self.profiles.resolve(chain_id) {
            Some(profile) => Ok(profile.clone()),
            None => {
                if let Some(target) = self.profiles.switch_target() {
                    warn!(chain_id, target, "Unsupported network, requesting switch");
                    self.session.request_chain_switch(target).await;
                }
                Err(MarketError::UnsupportedNetwork { chain_id })
            }
        }
    }

    /// Profile for the live chain id, or `None` when the marketplace is
    /// unavailable on the current session. Never prompts.
    fn active_profile(&self) -> Option<NetworkProfile> {
        let state = self.session.state();
        if !state.connected {
            return None;
        }
        state
            .chain_id
            .and_then(|id| self.profiles.resolve(id))
            .cloned()
    }

    /// Handles bound to the given profile, rebuilding them when the cached
    /// binding belongs to a different network. The binding is replaced as
    /// one value, never patched.
    async fn bind_for(&self, profile: &NetworkProfile) -> Result<LedgerHandles, MarketError> {
        {
            let bound = self.bound.read().await;
            if let Some(b) = bound.as_ref() {
                if b.profile.chain_id == profile.chain_id {
                    return Ok(b.handles.clone());
                }
            }
        }

        info!(chain_id = profile.chain_id, "Binding contract handles");
        let handles = self
            .factory
            .bind(profile)
            .await
            .map_err(|e| MarketError::unavailable(&e))?;

        let mut bound = self.bound.write().await;
        *bound = Some(Binding {
            profile: profile.clone(),
            handles: handles.clone(),
        });
        Ok(handles)
    }
}
