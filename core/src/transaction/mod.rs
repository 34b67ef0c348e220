//! # Transaction Module
//!
//! Construction and hand-off of outgoing transfers. Every payment and asset
//! transfer the wallet sends is represented as a [`Transaction`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs     : Transaction, TransactionKind, Confirmation, canonical bytes
//! builder.rs   : TransactionBuilder, form -> validated unsigned transaction
//! broadcast.rs : BroadcastGate, one confirmed transaction in flight at most
//! error.rs     : TransferError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] checks the form against the
//!    balances and produces a [`BuiltTransaction`].
//! 2. **Confirm**: the caller shows the [`Confirmation`] and stages the
//!    transaction in a [`BroadcastGate`].
//! 3. **Broadcast**: the gate hands it, with the sender account, to a
//!    [`TransactionBroadcaster`] that signs and submits it.
//!
//! All amounts are integer coins. Fees are always native currency.

pub mod broadcast;
pub mod builder;
pub mod error;
pub mod types;

pub use broadcast::{BroadcastAck, BroadcastError, BroadcastGate, TransactionBroadcaster};
pub use builder::TransactionBuilder;
pub use error::TransferError;
pub use types::{BuiltTransaction, Confirmation, Transaction, TransactionKind};
