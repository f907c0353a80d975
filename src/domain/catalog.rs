//! Catalog domain types - Products, categories, and orders.
//!
//! Products and orders are created by the ledger, never locally; this module
//! only gives the raw positional tuples the contract returns a typed shape
//! and converts atomic prices into human units. Item tuples arrive as
//! `[id, name, category, image, price, rating, stock, description]`, order
//! tuples as `[timestamp, item]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount;

/// Closed set of product categories the storefront recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Pets,
}

impl Category {
    /// Parse the category string stored on the ledger.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "electronics" => Some(Self::Electronics),
            "clothing" => Some(Self::Clothing),
            "pets" => Some(Self::Pets),
            _ => None,
        }
    }

    /// The exact string the ledger stores for this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Pets => "pets",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item tuple exactly as decoded from the ledger, price still atomic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub price_atomic: u128,
    pub rating: u32,
    pub stock: u32,
    pub description: String,
}

impl RawItem {
    /// Whether this is the zeroed sentinel tuple some ledger builds return
    /// for an id that was never listed. Normalized to `NotFound` upstream.
    pub fn is_placeholder(&self) -> bool {
        self.id == 0 && self.name.is_empty()
    }
}

/// Order tuple as decoded from the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOrder {
    pub timestamp_secs: u64,
    pub item: RawItem,
}

/// A product listed on the marketplace, price in human units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Ledger-assigned listing id.
    pub id: u64,
    pub name: String,
    pub category: Category,
    pub image_url: String,
    /// Price in human units of the active network's currency.
    pub price: rust_decimal::Decimal,
    pub rating: u32,
    /// Units left in stock.
    pub stock: u32,
    pub description: String,
}

impl Product {
    /// Convert a raw ledger tuple using the decimal count of the profile
    /// active at call time.
    ///
    /// Returns `None` for tuples no valid listing could have produced
    /// (unknown category, price outside the representable range). Callers
    /// listing the catalog skip those; callers fetching a single item treat
    /// them as missing.
    pub fn from_raw(raw: &RawItem, decimals: u32) -> Option<Self> {
        let category = Category::parse(&raw.category)?;
        let price = amount::to_human(raw.price_atomic, decimals).ok()?;
        Some(Self {
            id: raw.id,
            name: raw.name.clone(),
            category,
            image_url: raw.image_url.clone(),
            price,
            rating: raw.rating,
            stock: raw.stock,
            description: raw.description.clone(),
        })
    }
}

/// A confirmed purchase, queried per wallet address. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// When the purchase transaction was confirmed.
    pub placed_at: DateTime<Utc>,
    /// Snapshot of the purchased item; `item.price` is the cost paid,
    /// converted with the profile active at query time.
    pub item: Product,
}

impl Order {
    /// Convert a raw ledger order tuple.
    pub fn from_raw(raw: &RawOrder, decimals: u32) -> Option<Self> {
        let item = Product::from_raw(&raw.item, decimals)?;
        let placed_at = DateTime::<Utc>::from_timestamp(i64::try_from(raw.timestamp_secs).ok()?, 0)?;
        Some(Self { placed_at, item })
    }
}

/// A listing about to be submitted, price already converted to atomic
/// units. The rating field is fixed to zero by the ledger contract's `list`
/// signature; it is not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub name: String,
    pub category: Category,
    pub image_url: String,
    pub price_atomic: u128,
    pub stock: u32,
    pub description: String,
}
