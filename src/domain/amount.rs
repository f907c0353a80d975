//! Amount conversion - Atomic ↔ human unit arithmetic.
//!
//! The ledger stores prices as atomic integers; users see decimal strings.
//! The conversion factor is `10^decimals` from the active network profile
//! (6 on Alfajores, 18 on mainnet). All conversion goes through
//! `rust_decimal` so no floating point ever touches a price.
//!
//! Callers must re-derive the profile from the live chain id immediately
//! before converting; converting with a stale decimal count after a network
//! switch is the bug class this module exists to prevent.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest decimal count any supported network uses (Celo mainnet).
pub const MAX_DECIMALS: u32 = 18;

/// Why a human-readable amount could not be converted to atomic units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("`{0}` is not a decimal number")]
    NotANumber(String),
    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),
    #[error("at most {max} fractional digits are representable, got {got}")]
    TooManyFractionalDigits { got: u32, max: u32 },
    #[error("amount does not fit in atomic units")]
    Overflow,
}

/// Convert a human-readable decimal string to atomic units.
///
/// Rejects negative values, inputs with more fractional digits than the
/// profile can represent (silent truncation would misprice the listing),
/// and values whose atomic representation overflows `u128`.
pub fn to_atomic(human: &str, decimals: u32) -> Result<u128, AmountError> {
    let value: Decimal = human
        .trim()
        .parse()
        .map_err(|_| AmountError::NotANumber(human.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(value));
    }

    let value = value.normalize();
    let scale = value.scale();
    if scale > decimals {
        return Err(AmountError::TooManyFractionalDigits {
            got: scale,
            max: decimals,
        });
    }

    let mantissa = u128::try_from(value.mantissa()).map_err(|_| AmountError::Overflow)?;
    let factor = 10u128
        .checked_pow(decimals - scale)
        .ok_or(AmountError::Overflow)?;
    mantissa.checked_mul(factor).ok_or(AmountError::Overflow)
}

/// Convert atomic units to a human-readable decimal value.
///
/// Trailing zeros are normalized away (`10.00` and `10` compare equal under
/// `Decimal` anyway, but the display form stays tidy).
pub fn to_human(atomic: u128, decimals: u32) -> Result<Decimal, AmountError> {
    let mantissa = i128::try_from(atomic).map_err(|_| AmountError::Overflow)?;
    Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map(|d| d.normalize())
        .map_err(|_| AmountError::Overflow)
}
