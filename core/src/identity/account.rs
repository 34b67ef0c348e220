//! The authenticated wallet holder: address plus key pair.

use std::fmt;

use super::address::Address;
use crate::crypto::{PrivateKey, PublicKey};

/// Sender descriptor attached to every outgoing transaction.
///
/// Not `Serialize`: the private key inside must only ever reach the
/// signing collaborator. `Debug` prints the address and nothing else.
#[derive(Clone)]
pub struct Account {
    address: Address,
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Account {
    /// Rebuild an account from its private key.
    pub fn from_private_key(private_key: PrivateKey, network_byte: u8) -> Self {
        let public_key = private_key.public_key();
        Self {
            address: Address::from_public_key(&public_key, network_byte),
            public_key,
            private_key,
        }
    }

    /// A fresh account with an OS-random key.
    pub fn generate(network_byte: u8) -> Self {
        Self::from_private_key(PrivateKey::generate(), network_byte)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
