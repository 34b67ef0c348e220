//! Errors the transaction builder can return.

use thiserror::Error;

use crate::money::MoneyError;
use crate::validation::Field;

/// Why a transfer could not be built. Checked in declaration order; the
/// first failure is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("invalid recipient address {0:?}")]
    InvalidRecipient(String),

    /// Amount or fee did not parse, or the amount is not positive.
    #[error("invalid {field}: {source}")]
    InvalidAmount {
        field: Field,
        #[source]
        source: MoneyError,
    },

    #[error("transaction fee {fee} is below the minimum {minimum}")]
    FeeBelowMinimum { fee: String, minimum: String },

    /// Balances handed to the builder are not in the expected currencies.
    #[error("balance currency mismatch: {0}")]
    CurrencyMismatch(MoneyError),

    #[error("amount {amount} exceeds available balance {available}")]
    AmountExceedsBalance { amount: String, available: String },

    #[error("Not enough funds for the transfer transaction fee: fee {fee}, balance {available}")]
    InsufficientFeeFunds { fee: String, available: String },

    #[error("attachment is {length} bytes, at most {max} allowed")]
    AttachmentTooLong { length: usize, max: usize },
}

impl TransferError {
    /// The form field the error should be shown against, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            TransferError::InvalidRecipient(_) => Some(Field::Recipient),
            TransferError::InvalidAmount { field, .. } => Some(*field),
            TransferError::FeeBelowMinimum { .. } | TransferError::InsufficientFeeFunds { .. } => {
                Some(Field::Fee)
            }
            TransferError::AmountExceedsBalance { .. } => Some(Field::Amount),
            TransferError::CurrencyMismatch(_) | TransferError::AttachmentTooLong { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_form_fields() {
        assert_eq!(
            TransferError::InvalidRecipient("x".into()).field(),
            Some(Field::Recipient)
        );
        assert_eq!(
            TransferError::FeeBelowMinimum {
                fee: "0".into(),
                minimum: "1".into()
            }
            .field(),
            Some(Field::Fee)
        );
        assert_eq!(
            TransferError::InvalidAmount {
                field: Field::Amount,
                source: MoneyError::invalid_amount("x", "not a decimal number"),
            }
            .field(),
            Some(Field::Amount)
        );
        assert_eq!(
            TransferError::AttachmentTooLong { length: 141, max: 140 }.field(),
            None
        );
    }
}
