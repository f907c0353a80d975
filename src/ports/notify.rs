//! Progress Port - User-Facing Operation Status
//!
//! Multi-step operations emit transient progress events (approval pending →
//! purchase pending → confirmed) so the embedding UI can show accurate
//! status. The terminal outcome itself travels through the operation's
//! return value, not through this sink.

/// Progress stages of marketplace transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxProgress {
    /// Listing submitted, awaiting network confirmation.
    ListingPending,
    /// Payment-token approval submitted, awaiting confirmation.
    ApprovalPending,
    /// Purchase submitted, awaiting confirmation.
    PurchasePending,
    /// The operation's final transaction confirmed.
    Confirmed,
}

impl std::fmt::Display for TxProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ListingPending => "adding product, please wait",
            Self::ApprovalPending => "approving, please wait",
            Self::PurchasePending => "purchasing",
            Self::Confirmed => "confirmed",
        };
        f.write_str(s)
    }
}

/// Sink for transient progress notifications.
pub trait ProgressSink: Send + Sync + 'static {
    fn progress(&self, stage: TxProgress);
}

/// Sink that drops every event. Useful in tests and headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn progress(&self, _stage: TxProgress) {}
}
