//! # Hashing Utilities
//!
//! Two hash functions, both fixed at 256 bits of output:
//!
//! - **BLAKE2b-256**: unkeyed BLAKE2b truncated to 32 bytes. Used for the
//!   gateway auth hash and transaction ids.
//!
//! - **Keccak-256**: the pre-standard SHA-3 padding. Only ever used chained
//!   after BLAKE2b in [`secure_hash`], the address checksum construction.

use blake2b_simd::Params as Blake2bParams;
use sha3::{Digest, Keccak256};

/// Output length of every hash in this module.
pub const HASH_LENGTH: usize = 32;

/// Compute unkeyed BLAKE2b with a 32-byte digest.
///
/// ```
/// use waves_lite_core::crypto::blake2b_256;
///
/// let digest = blake2b_256(b"waves");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn blake2b_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let hash = Blake2bParams::new().hash_length(HASH_LENGTH).hash(data);
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(hash.as_bytes());
    output
}

/// BLAKE2b-256 over several slices fed in order, without a temporary
/// concatenation buffer. Equal to `blake2b_256(a ‖ b ‖ ...)`.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut state = Blake2bParams::new().hash_length(HASH_LENGTH).to_state();
    for part in parts {
        state.update(part);
    }
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(state.finalize().as_bytes());
    output
}

/// Compute Keccak-256 (not FIPS SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let digest = Keccak256::digest(data);
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&digest);
    output
}

/// `keccak256(blake2b_256(data))`, the hash addresses are built from.
pub fn secure_hash(data: &[u8]) -> [u8; HASH_LENGTH] {
    keccak256(&blake2b_256(data))
}
