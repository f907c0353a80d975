//! Error taxonomy for marketplace operations.
//!
//! Every ledger-call failure is caught at the `MarketplaceClient` boundary
//! and normalized into one of these variants; raw transport errors never
//! escape the use-case layer. No variant is retried automatically — each
//! failure is terminal for that user action.

use thiserror::Error;

use super::amount::AmountError;

/// Which on-chain step of an operation failed.
///
/// `buy` is two-phase: the token approval must confirm strictly before the
/// purchase is submitted, and the caller is told which phase failed so it
/// can show "approval failed" rather than a generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    /// Submitting a new listing.
    Listing,
    /// Payment-token approval preceding a purchase.
    Approval,
    /// The purchase transaction itself.
    Purchase,
    /// Owner-only token allow-listing.
    TokenAdmin,
}

impl std::fmt::Display for TxPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Listing => "listing",
            Self::Approval => "approval",
            Self::Purchase => "purchase",
            Self::TokenAdmin => "token admin",
        };
        f.write_str(s)
    }
}

/// Normalized failure modes of marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// No wallet session. Resolved by prompting a connect, not terminal.
    #[error("wallet is not connected")]
    NotConnected,

    /// Session exists but the chain maps to no profile. Resolved by
    /// prompting a network switch.
    #[error("chain {chain_id} is not supported by the marketplace")]
    UnsupportedNetwork { chain_id: u64 },

    /// Local validation of a human-readable amount failed before any
    /// network call was made.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// The wallet declined or the ledger reverted the transaction.
    #[error("{phase} transaction rejected: {reason}")]
    TransactionRejected { phase: TxPhase, reason: String },

    /// The queried id or address has no corresponding ledger record.
    #[error("no marketplace record for {what}")]
    NotFound { what: String },

    /// A read query failed at the transport level while a profile was
    /// active. Distinct from `NotFound`: the record may well exist.
    #[error("ledger unreachable: {reason}")]
    LedgerUnavailable { reason: String },
}

impl MarketError {
    pub(crate) fn rejected(phase: TxPhase, source: &anyhow::Error) -> Self {
        Self::TransactionRejected {
            phase,
            reason: format!("{source:#}"),
        }
    }

    pub(crate) fn unavailable(source: &anyhow::Error) -> Self {
        Self::LedgerUnavailable {
            reason: format!("{source:#}"),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_is_named_in_message() {
        let e = MarketError::TransactionRejected {
            phase: TxPhase::Approval,
            reason: "user declined".to_string(),
        };
        assert!(e.to_string().contains("approval"));

        let e = MarketError::TransactionRejected {
            phase: TxPhase::Purchase,
            reason: "reverted".to_string(),
        };
        assert!(e.to_string().contains("purchase"));
    }

    #[test]
    fn amount_errors_convert() {
        let e: MarketError = AmountError::NotANumber("abc".to_string()).into();
        assert!(matches!(e, MarketError::InvalidAmount(_)));
    }
}
