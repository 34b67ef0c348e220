//! # Addresses
//!
//! An address is 26 bytes, shown to users in base-58:
//!
//! ```text
//! [version: 1][network: 1][key hash: 20][checksum: 4]
//!
//! key hash = secure_hash(public_key)[..20]
//! checksum = secure_hash(version ‖ network ‖ key hash)[..4]
//! ```
//!
//! where `secure_hash` is Keccak-256 over BLAKE2b-256. The network byte
//! keeps a devnet address from ever validating on mainnet.
//!
//! Users sometimes paste addresses with a `1W` display prefix in front.
//! [`cleanup_optional_prefix`] strips it before anything else looks at the
//! text.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::config::{
    ADDRESS_BYTES, ADDRESS_CHECKSUM_LENGTH, ADDRESS_HASH_LENGTH, ADDRESS_PREFIX,
    ADDRESS_STRING_LENGTH, ADDRESS_VERSION,
};
use crate::crypto::{decode_base58, encode_base58, secure_hash, PublicKey};

const BODY_LENGTH: usize = ADDRESS_BYTES - ADDRESS_CHECKSUM_LENGTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address is not base58: {0}")]
    InvalidEncoding(String),

    #[error("address must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported address version {0}")]
    UnsupportedVersion(u8),

    #[error("address belongs to network {actual:?}, expected {expected:?}")]
    WrongNetwork { expected: char, actual: char },

    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// Strip the optional `1W` display prefix. Anything that is not a prefixed
/// address comes back unchanged.
pub fn cleanup_optional_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.strip_prefix(ADDRESS_PREFIX) {
        Some(rest) if trimmed.len() > ADDRESS_STRING_LENGTH => rest,
        _ => trimmed,
    }
}

fn checksum(body: &[u8]) -> [u8; ADDRESS_CHECKSUM_LENGTH] {
    let hash = secure_hash(body);
    let mut out = [0u8; ADDRESS_CHECKSUM_LENGTH];
    out.copy_from_slice(&hash[..ADDRESS_CHECKSUM_LENGTH]);
    out
}

/// A decoded, checksum-verified address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Derive the address of `public_key` on the network `network_byte`.
    pub fn from_public_key(public_key: &PublicKey, network_byte: u8) -> Self {
        let key_hash = secure_hash(public_key.as_bytes());

        let mut raw = [0u8; ADDRESS_BYTES];
        raw[0] = ADDRESS_VERSION;
        raw[1] = network_byte;
        raw[2..BODY_LENGTH].copy_from_slice(&key_hash[..ADDRESS_HASH_LENGTH]);
        let sum = checksum(&raw[..BODY_LENGTH]);
        raw[BODY_LENGTH..].copy_from_slice(&sum);
        Self(raw)
    }

    /// Parse a user-supplied address for the network `network_byte`.
    /// Accepts the `1W` display prefix.
    pub fn parse(input: &str, network_byte: u8) -> Result<Self, AddressError> {
        let bytes = decode_base58(cleanup_optional_prefix(input))
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        let raw = <[u8; ADDRESS_BYTES]>::try_from(bytes.as_slice()).map_err(|_| {
            AddressError::InvalidLength {
                expected: ADDRESS_BYTES,
                actual: bytes.len(),
            }
        })?;

        if raw[0] != ADDRESS_VERSION {
            return Err(AddressError::UnsupportedVersion(raw[0]));
        }
        if raw[1] != network_byte {
            return Err(AddressError::WrongNetwork {
                expected: network_byte as char,
                actual: raw[1] as char,
            });
        }
        if checksum(&raw[..BODY_LENGTH]) != raw[BODY_LENGTH..] {
            return Err(AddressError::ChecksumMismatch);
        }
        Ok(Self(raw))
    }

    pub fn network_byte(&self) -> u8 {
        self.0[1]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        encode_base58(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Decides whether a recipient string is a usable address.
///
/// Injected into the rule set and the transaction builder so neither needs
/// to know the network it runs on.
pub trait AddressValidator: Send + Sync {
    fn validate_address(&self, address: &str) -> bool;
}

/// Full structural check: base-58, length, version, network byte, checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumAddressValidator {
    pub network_byte: u8,
}

impl ChecksumAddressValidator {
    pub fn new(network_byte: u8) -> Self {
        Self { network_byte }
    }
}

impl AddressValidator for ChecksumAddressValidator {
    fn validate_address(&self, address: &str) -> bool {
        Address::parse(address, self.network_byte).is_ok()
    }
}
