//! Error types for the money model.

use thiserror::Error;

/// Errors raised by [`Money`](super::Money) and [`Currency`](super::Currency)
/// construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The input is not a number, has more fractional digits than the
    /// currency allows, or does not fit in a 64-bit coin count.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The offending input, as the caller supplied it.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two amounts in different currencies were compared or combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Display name of the left operand's currency.
        left: String,
        /// Display name of the right operand's currency.
        right: String,
    },

    /// An asset declared more fractional digits than the network supports.
    #[error("invalid precision {precision}: at most {max} fractional digits")]
    InvalidPrecision {
        /// Declared precision.
        precision: u8,
        /// Largest precision accepted.
        max: u8,
    },

    /// An asset id that is empty or not valid base-58.
    #[error("invalid asset id {0:?}")]
    InvalidAssetId(String),
}

impl MoneyError {
    pub(crate) fn invalid_amount(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
