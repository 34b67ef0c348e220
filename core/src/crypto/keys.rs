//! # Key Management
//!
//! Curve25519 account keys and their base-58 text form.
//!
//! Accounts on the network hold a 32-byte Curve25519 private key. The same
//! key signs transactions (done by the signing service, not here) and
//! performs X25519 key agreement with the payment gateway (done here).
//!
//! ## Security considerations
//!
//! - [`PrivateKey`] and [`SharedKey`] zeroize on drop.
//! - Neither implements `Serialize` or `Display`, and `Debug` is redacted.
//!   Getting the bytes out is an explicit call.
//! - Key bytes are never logged.

use rand::rngs::OsRng;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::KEY_LENGTH;

/// Errors that can occur while decoding keys or agreeing on a shared key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("malformed base58: {0}")]
    InvalidEncoding(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("key agreement rejected the peer key (low-order point)")]
    NonContributory,
}

/// Decode a base-58 string into raw bytes.
pub fn decode_base58(encoded: &str) -> Result<Vec<u8>, KeyError> {
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| KeyError::InvalidEncoding(e.to_string()))
}

/// Encode raw bytes as base-58.
pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a base-58 string that must hold exactly one 32-byte key.
pub fn decode_key(encoded: &str) -> Result<[u8; KEY_LENGTH], KeyError> {
    let bytes = decode_base58(encoded)?;
    <[u8; KEY_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| KeyError::InvalidLength {
        expected: KEY_LENGTH,
        actual: bytes.len(),
    })
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of an account key. Safe to share, log, and serialize.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; KEY_LENGTH]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_base58(encoded: &str) -> Result<Self, KeyError> {
        decode_key(encoded).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        encode_base58(&self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_base58();
        write!(f, "PublicKey({}...)", &encoded[..encoded.len().min(8)])
    }
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// The private half of an account key.
///
/// Only two things ever read it: [`PrivateKey::shared_key`] and the
/// signing collaborator, through [`PrivateKey::as_bytes`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; KEY_LENGTH]);

impl PrivateKey {
    /// Generate a fresh key from the OS cryptographic RNG.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        Self(secret.to_bytes())
    }

    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_base58(encoded: &str) -> Result<Self, KeyError> {
        decode_key(encoded).map(Self)
    }

    /// Raw key bytes, for the signing service.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Derive the matching public key (X25519 base-point multiplication).
    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(self.0);
        PublicKey(X25519PublicKey::from(&secret).to_bytes())
    }

    /// X25519 key agreement with `peer`.
    ///
    /// # Errors
    ///
    /// [`KeyError::NonContributory`] when the peer key is a low-order point
    /// and the result would be the all-zero secret.
    pub fn shared_key(&self, peer: &PublicKey) -> Result<SharedKey, KeyError> {
        let secret = StaticSecret::from(self.0);
        let shared = secret.diffie_hellman(&X25519PublicKey::from(peer.0));
        if !shared.was_contributory() {
            return Err(KeyError::NonContributory);
        }
        Ok(SharedKey(shared.to_bytes()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted>)")
    }
}

/// A 32-byte secret produced by key agreement. Never transmitted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; KEY_LENGTH]);

impl SharedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedKey(<redacted>)")
    }
}
