//! The transfer form as the user filled it in: three raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A form field that carries validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Recipient,
    Amount,
    Fee,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Recipient, Field::Amount, Field::Fee];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Recipient => "recipient",
            Field::Amount => "amount",
            Field::Fee => "fee",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw transfer input. Nothing is parsed or trimmed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferForm {
    pub recipient: String,
    pub amount: String,
    pub fee: String,
}

impl TransferForm {
    pub fn new(
        recipient: impl Into<String>,
        amount: impl Into<String>,
        fee: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            amount: amount.into(),
            fee: fee.into(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Recipient => &self.recipient,
            Field::Amount => &self.amount,
            Field::Fee => &self.fee,
        }
    }
}
