//! Mundo Contract Interactions - Marketplace and Payment Token
//!
//! Implements the `MarketplaceLedger` and `PaymentToken` ports against the
//! deployed Mundo contract and its ERC-20 payment token via alloy-rs 0.9.
//! Contract addresses come from `config.toml` and are validated on-chain at
//! bind time. ABI encoding/decoding uses `sol!`-generated types; calls and
//! transactions go through the shared type-erased provider.
//!
//! Item tuples arrive positionally as
//! `[id, name, category, image, price, rating, stock, description]` and
//! order tuples as `[timestamp, item]`, matching the deployed contract.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::domain::catalog::{NewListing, RawItem, RawOrder};
use crate::ports::ledger::{MarketplaceLedger, PaymentToken, TxReceipt};

use super::provider::CeloProvider;

sol! {
    /// Item tuple as stored by the marketplace contract.
    #[derive(Debug)]
    struct MundoItem {
        uint256 id;
        string name;
        string category;
        string image;
        uint256 price;
        uint256 rating;
        uint256 stock;
        string description;
    }

    /// Order tuple as stored by the marketplace contract.
    #[derive(Debug)]
    struct MundoOrder {
        uint256 time;
        MundoItem item;
    }

    function owner() external view returns (address);
    function list(
        string name,
        string category,
        string image,
        uint256 price,
        uint256 rating,
        uint256 stock,
        string description
    ) external;
    function getAllMarketPlaceItems() external view returns (MundoItem[]);
    function getItem(uint256 id) external view returns (MundoItem);
    function buy(uint256 id, address payToken) external;
    function getAllOrders(address user) external view returns (MundoOrder[]);
    function checkAllowedTokens(address token) external view returns (bool);
    function addToken(address token) external;

    function approve(address spender, uint256 amount) external returns (bool);
}

/// Read-only call against a contract, returning the raw return bytes.
async fn eth_call(provider: &CeloProvider, to: Address, calldata: Vec<u8>) -> Result<Bytes> {
    let tx = TransactionRequest::default()
        .to(to)
        .input(Bytes::from(calldata).into());
    let inner = provider.inner();
    inner.call(&tx).await.context("Contract call failed")
}

/// Submit a transaction and wait until it is mined. Reverts surface as
/// errors so the use-case layer can map them to `TransactionRejected`.
async fn send_tx(provider: &CeloProvider, to: Address, calldata: Vec<u8>) -> Result<TxReceipt> {
    let tx = TransactionRequest::default()
        .to(to)
        .input(Bytes::from(calldata).into());

    let inner = provider.inner();
    let receipt = inner
        .send_transaction(tx)
        .await
        .context("Transaction submission failed")?
        .get_receipt()
        .await
        .context("Failed to await transaction receipt")?;

    if !receipt.status() {
        bail!(
            "Transaction {} reverted on-chain",
            receipt.transaction_hash
        );
    }

    Ok(TxReceipt {
        tx_hash: receipt.transaction_hash.to_string(),
        block_number: receipt.block_number.unwrap_or_default(),
    })
}

/// Validate that an address has deployed code on-chain.
///
/// Prevents a misconfigured `config.toml` from silently sending marketplace
/// calls into the void.
async fn require_code(provider: &CeloProvider, name: &str, addr: Address) -> Result<()> {
    let inner = provider.inner();
    let code = inner
        .get_code_at(addr)
        .await
        .with_context(|| format!("Failed to query code for {name}"))?;

    if code.is_empty() {
        bail!("Contract {name} at {addr} has no deployed code — check config.toml");
    }
    info!(contract = name, address = %addr, "Validated on-chain");
    Ok(())
}

fn decode_item(item: MundoItem) -> Result<RawItem> {
    Ok(RawItem {
        id: u64::try_from(item.id).map_err(|_| anyhow!("item id out of range"))?,
        name: item.name,
        category: item.category,
        image_url: item.image,
        price_atomic: u128::try_from(item.price).map_err(|_| anyhow!("price out of range"))?,
        rating: u32::try_from(item.rating).map_err(|_| anyhow!("rating out of range"))?,
        stock: u32::try_from(item.stock).map_err(|_| anyhow!("stock out of range"))?,
        description: item.description,
    })
}

fn parse_address(s: &str) -> Result<Address> {
    s.parse()
        .with_context(|| format!("Invalid contract address: {s}"))
}

/// `MarketplaceLedger` implementation bound to one deployed Mundo contract.
pub struct MundoContracts {
    provider: Arc<CeloProvider>,
    marketplace: Address,
}

impl MundoContracts {
    /// Bind to the marketplace contract and validate it exists on-chain.
    pub async fn bind(provider: Arc<CeloProvider>, marketplace: &str) -> Result<Self> {
        let marketplace = parse_address(marketplace)?;
        require_code(&provider, "Mundo marketplace", marketplace).await?;
        Ok(Self {
            provider,
            marketplace,
        })
    }
}

#[async_trait]
impl MarketplaceLedger for MundoContracts {
    #[instrument(skip(self))]
    async fn owner(&self) -> Result<String> {
        let ret = eth_call(&self.provider, self.marketplace, ownerCall {}.abi_encode()).await?;
        let decoded = ownerCall::abi_decode_returns(&ret, true)
            .context("Failed to decode owner() return")?;
        Ok(format!("{:#x}", decoded._0))
    }

    #[instrument(skip(self, listing), fields(name = %listing.name))]
    async fn list_item(&self, listing: &NewListing) -> Result<TxReceipt> {
        let calldata = listCall {
            name: listing.name.clone(),
            category: listing.category.to_string(),
            image: listing.image_url.clone(),
            price: U256::from(listing.price_atomic),
            rating: U256::ZERO,
            stock: U256::from(listing.stock),
            description: listing.description.clone(),
        }
        .abi_encode();

        send_tx(&self.provider, self.marketplace, calldata).await
    }

    #[instrument(skip(self))]
    async fn all_items(&self) -> Result<Vec<RawItem>> {
        let ret = eth_call(
            &self.provider,
            self.marketplace,
            getAllMarketPlaceItemsCall {}.abi_encode(),
        )
        .await?;
        let decoded = getAllMarketPlaceItemsCall::abi_decode_returns(&ret, true)
            .context("Failed to decode getAllMarketPlaceItems() return")?;

        let items = decoded
            ._0
            .into_iter()
            .map(decode_item)
            .collect::<Result<Vec<_>>>()?;
        debug!(items = items.len(), "Fetched marketplace items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn item(&self, id: u64) -> Result<Option<RawItem>> {
        let calldata = getItemCall { id: U256::from(id) }.abi_encode();
        // A revert here means the id was never listed; some contract builds
        // return a zeroed tuple instead. Both map to None.
        let Ok(ret) = eth_call(&self.provider, self.marketplace, calldata).await else {
            return Ok(None);
        };
        let decoded = getItemCall::abi_decode_returns(&ret, true)
            .context("Failed to decode getItem() return")?;
        Ok(Some(decode_item(decoded._0)?))
    }

    #[instrument(skip(self))]
    async fn buy(&self, id: u64, payment_token: &str) -> Result<TxReceipt> {
        let calldata = buyCall {
            id: U256::from(id),
            payToken: parse_address(payment_token)?,
        }
        .abi_encode();
        send_tx(&self.provider, self.marketplace, calldata).await
    }

    #[instrument(skip(self), fields(address = %address))]
    async fn orders_for(&self, address: &str) -> Result<Vec<RawOrder>> {
        let calldata = getAllOrdersCall {
            user: parse_address(address)?,
        }
        .abi_encode();
        let ret = eth_call(&self.provider, self.marketplace, calldata).await?;
        let decoded = getAllOrdersCall::abi_decode_returns(&ret, true)
            .context("Failed to decode getAllOrders() return")?;

        decoded
            ._0
            .into_iter()
            .map(|order| {
                Ok(RawOrder {
                    timestamp_secs: u64::try_from(order.time)
                        .map_err(|_| anyhow!("order timestamp out of range"))?,
                    item: decode_item(order.item)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn is_token_allowed(&self, token: &str) -> Result<bool> {
        let calldata = checkAllowedTokensCall {
            token: parse_address(token)?,
        }
        .abi_encode();
        let ret = eth_call(&self.provider, self.marketplace, calldata).await?;
        let decoded = checkAllowedTokensCall::abi_decode_returns(&ret, true)
            .context("Failed to decode checkAllowedTokens() return")?;
        Ok(decoded._0)
    }

    #[instrument(skip(self))]
    async fn allow_token(&self, token: &str) -> Result<TxReceipt> {
        let calldata = addTokenCall {
            token: parse_address(token)?,
        }
        .abi_encode();
        send_tx(&self.provider, self.marketplace, calldata).await
    }
}

/// `PaymentToken` implementation over the profile's ERC-20 contract.
pub struct Erc20Token {
    provider: Arc<CeloProvider>,
    token: Address,
}

impl Erc20Token {
    /// Bind to the payment token and validate it exists on-chain.
    pub async fn bind(provider: Arc<CeloProvider>, token: &str) -> Result<Self> {
        let token = parse_address(token)?;
        require_code(&provider, "Payment token", token).await?;
        Ok(Self { provider, token })
    }
}

#[async_trait]
impl PaymentToken for Erc20Token {
    #[instrument(skip(self), fields(spender = %spender))]
    async fn approve(&self, spender: &str, amount_atomic: u128) -> Result<TxReceipt> {
        let calldata = approveCall {
            spender: parse_address(spender)?,
            amount: U256::from(amount_atomic),
        }
        .abi_encode();
        send_tx(&self.provider, self.token, calldata).await
    }
}
