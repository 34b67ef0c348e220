//! Transaction value types.
//!
//! A [`Transaction`] is an unsigned transfer intent: everything the signing
//! service needs to produce a signature, and nothing it does not. It is
//! immutable once the builder hands it out.
//!
//! # Canonical Byte Format
//!
//! All integers are big-endian. Payments (type 2):
//!
//! ```text
//! [2][timestamp: 8][sender key: 32][recipient: 26][amount: 8][fee: 8]
//! ```
//!
//! Asset transfers (type 4):
//!
//! ```text
//! [4][sender key: 32][asset flag: 1][asset id: 0|32][fee asset flag: 1]
//! [timestamp: 8][amount: 8][fee: 8][recipient: 26][attachment len: 2][attachment]
//! ```
//!
//! The fee asset flag is always zero: fees are paid in the native currency.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::crypto::{blake2b_256, encode_base58, PublicKey};
use crate::identity::Address;
use crate::money::Money;

/// What the transaction does on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionKind {
    /// A native-currency payment.
    Payment,
    /// A transfer of an issued asset, with an optional attachment.
    AssetTransfer,
}

impl TransactionKind {
    /// The on-chain type byte.
    pub fn type_byte(&self) -> u8 {
        match self {
            TransactionKind::Payment => 2,
            TransactionKind::AssetTransfer => 4,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Payment => write!(f, "Payment"),
            TransactionKind::AssetTransfer => write!(f, "AssetTransfer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned, validated transfer.
///
/// Built only by [`super::TransactionBuilder`]. Fields are read through
/// accessors; there is no way to change one after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Money,
    fee: Money,
    recipient: Address,
    timestamp: i64,
    sender_address: Address,
    sender_public_key: PublicKey,
    attachment: Vec<u8>,
    asset_id: Option<Vec<u8>>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Money,
        fee: Money,
        recipient: Address,
        timestamp: i64,
        sender_address: Address,
        sender_public_key: PublicKey,
        attachment: Vec<u8>,
        asset_id: Option<Vec<u8>>,
    ) -> Self {
        Self {
            kind,
            amount,
            fee,
            recipient,
            timestamp,
            sender_address,
            sender_public_key,
            attachment,
            asset_id,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    /// Always in the native currency.
    pub fn fee(&self) -> &Money {
        &self.fee
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    /// Unix milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn sender_address(&self) -> &Address {
        &self.sender_address
    }

    pub fn sender_public_key(&self) -> &PublicKey {
        &self.sender_public_key
    }

    /// Empty for payments.
    pub fn attachment(&self) -> &[u8] {
        &self.attachment
    }

    /// Base-58 asset id; `None` for payments and native transfers.
    pub fn asset_id(&self) -> Option<String> {
        self.asset_id.as_deref().map(encode_base58)
    }

    /// The bytes the signing service signs. See the module docs for the
    /// layout.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(160 + self.attachment.len());
        buf.push(self.kind.type_byte());

        match self.kind {
            TransactionKind::Payment => {
                buf.extend_from_slice(&self.timestamp.to_be_bytes());
                buf.extend_from_slice(self.sender_public_key.as_bytes());
                buf.extend_from_slice(self.recipient.as_bytes());
                buf.extend_from_slice(&self.amount.coins().to_be_bytes());
                buf.extend_from_slice(&self.fee.coins().to_be_bytes());
            }
            TransactionKind::AssetTransfer => {
                buf.extend_from_slice(self.sender_public_key.as_bytes());
                match &self.asset_id {
                    Some(id) => {
                        buf.push(0x01);
                        buf.extend_from_slice(id);
                    }
                    None => buf.push(0x00),
                }
                // Fee asset: native.
                buf.push(0x00);
                buf.extend_from_slice(&self.timestamp.to_be_bytes());
                buf.extend_from_slice(&self.amount.coins().to_be_bytes());
                buf.extend_from_slice(&self.fee.coins().to_be_bytes());
                buf.extend_from_slice(self.recipient.as_bytes());
                // Attachment length is bounded by the builder, so it fits.
                buf.extend_from_slice(&(self.attachment.len() as u16).to_be_bytes());
                buf.extend_from_slice(&self.attachment);
            }
        }

        buf
    }

    /// `base58(blake2b_256(signable_bytes))`. Stable across signing.
    pub fn id(&self) -> String {
        encode_base58(&blake2b_256(&self.signable_bytes()))
    }
}

/// Serialises to the node's JSON shape. Amounts are integer coins, keys
/// and ids base-58. The sender's private key is not part of a transaction
/// and so can never appear here.
impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = match self.kind {
            TransactionKind::Payment => 8,
            TransactionKind::AssetTransfer => 10,
        };
        let mut s = serializer.serialize_struct("Transaction", fields)?;
        s.serialize_field("id", &self.id())?;
        s.serialize_field("type", &self.kind.type_byte())?;
        s.serialize_field("timestamp", &self.timestamp)?;
        s.serialize_field("sender", &self.sender_address)?;
        s.serialize_field("senderPublicKey", &self.sender_public_key)?;
        s.serialize_field("recipient", &self.recipient)?;
        s.serialize_field("amount", &self.amount.coins())?;
        s.serialize_field("fee", &self.fee.coins())?;
        if self.kind == TransactionKind::AssetTransfer {
            s.serialize_field("assetId", &self.asset_id())?;
            s.serialize_field("attachment", &encode_base58(&self.attachment))?;
        }
        s.end()
    }
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// What the user is asked to confirm before broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    /// Amount with symbol, e.g. `"10.05 USD"`.
    pub amount: String,
    pub amount_currency: String,
    /// Fee with symbol, e.g. `"0.00100000 WAVES"`.
    pub fee: String,
    pub fee_currency: String,
    pub recipient: String,
}

impl Confirmation {
    pub(crate) fn for_transaction(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount.format_amount(true),
            amount_currency: tx.amount.currency().display_name().to_string(),
            fee: tx.fee.format_amount(true),
            fee_currency: tx.fee.currency().display_name().to_string(),
            recipient: tx.recipient.to_base58(),
        }
    }
}

/// Builder output: the transaction plus its confirmation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltTransaction {
    pub transaction: Transaction,
    pub confirmation: Confirmation,
}
