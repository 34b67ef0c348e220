//! # Broadcast Discipline
//!
//! Between "user confirmed" and "node answered" there must be exactly one
//! request in flight. The [`BroadcastGate`] stages the transaction the user
//! is looking at and hands it to a [`TransactionBroadcaster`] at most once:
//!
//! ```text
//! stage(built) -> broadcast() -> collaborator -> cleared
//!                    |
//!                    +-- nothing staged   -> NothingStaged
//!                    +-- already in flight -> AlreadyPending
//!                    +-- other account    -> SenderMismatch
//! ```
//!
//! The staged transaction and the pending flag are cleared as soon as the
//! collaborator returns, whatever it returned. Failed broadcasts are not
//! retried; the user builds a new transaction.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::types::{BuiltTransaction, Confirmation, Transaction};
use crate::identity::Account;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("no transaction is staged for broadcast")]
    NothingStaged,

    #[error("a broadcast is already in flight")]
    AlreadyPending,

    /// The signing account is not the one the transaction names.
    #[error("transaction belongs to {expected}, not {actual}")]
    SenderMismatch { expected: String, actual: String },

    /// The node answered with an error.
    #[error("Error:{error} - {message}")]
    Rejected { error: String, message: String },

    /// The request did not reach the node or the answer was unreadable.
    #[error("transport error: {0}")]
    Transport(String),
}

/// What the node returns for an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAck {
    pub id: String,
}

/// Signs a transaction with the sender's key and submits it to a node.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    async fn broadcast(
        &self,
        transaction: &Transaction,
        sender: &Account,
    ) -> Result<BroadcastAck, BroadcastError>;
}

#[derive(Default)]
struct GateState {
    staged: Option<BuiltTransaction>,
    pending: bool,
}

/// Holds at most one confirmed-but-unsent transaction.
#[derive(Default)]
pub struct BroadcastGate {
    state: Mutex<GateState>,
}

/// Clears the gate when the in-flight broadcast finishes or is dropped.
struct InFlight<'a>(&'a Mutex<GateState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock();
        state.staged = None;
        state.pending = false;
    }
}

impl BroadcastGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `built` for broadcast, replacing anything staged earlier.
    /// Refused while a broadcast is in flight.
    pub fn stage(&self, built: BuiltTransaction) -> Result<Confirmation, BroadcastError> {
        let mut state = self.state.lock();
        if state.pending {
            return Err(BroadcastError::AlreadyPending);
        }
        let confirmation = built.confirmation.clone();
        state.staged = Some(built);
        Ok(confirmation)
    }

    /// Drop the staged transaction without sending it.
    pub fn discard(&self) {
        let mut state = self.state.lock();
        if !state.pending {
            state.staged = None;
        }
    }

    /// Confirmation data of the staged transaction, if any.
    pub fn staged(&self) -> Option<Confirmation> {
        self.state
            .lock()
            .staged
            .as_ref()
            .map(|built| built.confirmation.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Send the staged transaction through `broadcaster`.
    pub async fn broadcast(
        &self,
        broadcaster: &dyn TransactionBroadcaster,
        sender: &Account,
    ) -> Result<BroadcastAck, BroadcastError> {
        let transaction = {
            let mut state = self.state.lock();
            let transaction = match &state.staged {
                Some(built) => built.transaction.clone(),
                None => return Err(BroadcastError::NothingStaged),
            };
            if state.pending {
                return Err(BroadcastError::AlreadyPending);
            }
            if transaction.sender_public_key() != sender.public_key() {
                return Err(BroadcastError::SenderMismatch {
                    expected: transaction.sender_address().to_base58(),
                    actual: sender.address().to_base58(),
                });
            }
            state.pending = true;
            transaction
        };
        let _in_flight = InFlight(&self.state);

        let result = broadcaster.broadcast(&transaction, sender).await;
        if let Ok(ack) = &result {
            debug!(id = %ack.id, kind = %transaction.kind(), "transaction broadcast");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkParams;
    use crate::identity::ChecksumAddressValidator;
    use crate::money::{Currency, Money};
    use crate::transaction::TransactionBuilder;
    use crate::validation::TransferForm;
    use crate::wallet::AccountBalances;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn built(sender: &Account) -> BuiltTransaction {
        let params = NetworkParams::default();
        let validator = ChecksumAddressValidator::new(params.network_byte);
        let recipient = Account::generate(params.network_byte);
        TransactionBuilder::new(&params, &validator)
            .timestamp(1_700_000_000_000)
            .build_payment(
                &TransferForm::new(recipient.address().to_base58(), "1", "0.001"),
                &Currency::wav(),
                sender,
                &AccountBalances::native_only(Money::from_coins(200_000_000, &Currency::wav())),
            )
            .unwrap()
    }

    #[derive(Default)]
    struct Recording {
        calls: AtomicUsize,
        reject: bool,
    }

    #[async_trait]
    impl TransactionBroadcaster for Recording {
        async fn broadcast(
            &self,
            transaction: &Transaction,
            _sender: &Account,
        ) -> Result<BroadcastAck, BroadcastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(BroadcastError::Rejected {
                    error: "112".into(),
                    message: "State check failed".into(),
                });
            }
            Ok(BroadcastAck {
                id: transaction.id(),
            })
        }
    }

    struct Held {
        release: Notify,
    }

    #[async_trait]
    impl TransactionBroadcaster for Held {
        async fn broadcast(
            &self,
            transaction: &Transaction,
            _sender: &Account,
        ) -> Result<BroadcastAck, BroadcastError> {
            self.release.notified().await;
            Ok(BroadcastAck {
                id: transaction.id(),
            })
        }
    }

    #[tokio::test]
    async fn nothing_staged_is_refused() {
        let gate = BroadcastGate::new();
        let sender = Account::generate(b'T');
        let broadcaster = Recording::default();
        assert_eq!(
            gate.broadcast(&broadcaster, &sender).await,
            Err(BroadcastError::NothingStaged)
        );
        assert_eq!(broadcaster.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_clears_the_gate() {
        let gate = BroadcastGate::new();
        let sender = Account::generate(b'T');
        let built = built(&sender);
        let id = built.transaction.id();
        gate.stage(built).unwrap();
        assert!(gate.staged().is_some());

        let broadcaster = Recording::default();
        let ack = gate.broadcast(&broadcaster, &sender).await.unwrap();
        assert_eq!(ack.id, id);
        assert!(gate.staged().is_none());
        assert!(!gate.is_pending());

        // A second call finds nothing to send.
        assert_eq!(
            gate.broadcast(&broadcaster, &sender).await,
            Err(BroadcastError::NothingStaged)
        );
        assert_eq!(broadcaster.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_clears_the_gate_without_retry() {
        let gate = BroadcastGate::new();
        let sender = Account::generate(b'T');
        gate.stage(built(&sender)).unwrap();

        let broadcaster = Recording {
            reject: true,
            ..Recording::default()
        };
        let err = gate.broadcast(&broadcaster, &sender).await.unwrap_err();
        assert_eq!(err.to_string(), "Error:112 - State check failed");
        assert!(gate.staged().is_none());
        assert!(!gate.is_pending());
        assert_eq!(broadcaster.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_broadcast_is_refused() {
        let gate = Arc::new(BroadcastGate::new());
        let sender = Account::generate(b'T');
        gate.stage(built(&sender)).unwrap();

        let held = Arc::new(Held {
            release: Notify::new(),
        });
        let task = {
            let gate = Arc::clone(&gate);
            let held = Arc::clone(&held);
            let sender = sender.clone();
            tokio::spawn(async move { gate.broadcast(held.as_ref(), &sender).await })
        };

        while !gate.is_pending() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            gate.broadcast(held.as_ref(), &sender).await,
            Err(BroadcastError::AlreadyPending)
        );
        assert_eq!(
            gate.stage(built(&sender)).unwrap_err(),
            BroadcastError::AlreadyPending
        );

        held.release.notify_one();
        assert!(task.await.unwrap().is_ok());
        assert!(!gate.is_pending());
        assert!(gate.staged().is_none());
    }

    #[tokio::test]
    async fn other_account_cannot_send_staged_transaction() {
        let gate = BroadcastGate::new();
        let owner = Account::generate(b'T');
        let other = Account::generate(b'T');
        gate.stage(built(&owner)).unwrap();

        let broadcaster = Recording::default();
        let err = gate.broadcast(&broadcaster, &other).await.unwrap_err();
        assert_eq!(
            err,
            BroadcastError::SenderMismatch {
                expected: owner.address().to_base58(),
                actual: other.address().to_base58(),
            }
        );
        assert_eq!(broadcaster.calls.load(Ordering::SeqCst), 0);
        assert!(!gate.is_pending());

        // Still staged for its owner.
        assert!(gate.staged().is_some());
        assert!(gate.broadcast(&broadcaster, &owner).await.is_ok());
        assert_eq!(broadcaster.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn discard_drops_staged_transaction() {
        let gate = BroadcastGate::new();
        let sender = Account::generate(b'T');
        gate.stage(built(&sender)).unwrap();
        gate.discard();
        assert!(gate.staged().is_none());
    }
}
