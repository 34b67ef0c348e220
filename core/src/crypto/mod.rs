//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **X25519** (`x25519-dalek`) for the gateway key agreement.
//! - **BLAKE2b-256** (`blake2b_simd`) for auth hashes and transaction ids.
//! - **Keccak-256** (`sha3`) for address checksums.
//! - **Base-58** (`bs58`) for every key, id, and hash that leaves the crate
//!   as text.
//!
//! Signing is not here. The signing service owns it and receives the
//! private key bytes explicitly.

pub mod hash;
pub mod keys;

pub use hash::{blake2b_256, blake2b_256_multi, keccak256, secure_hash};
pub use keys::{decode_base58, decode_key, encode_base58, KeyError, PrivateKey, PublicKey, SharedKey};
