//! # Identity Module
//!
//! Who is sending, and where the money goes.
//!
//! 1. **Address**: 26-byte checksummed account identifier, base-58 on the
//!    wire. Carries a network byte so devnet and mainnet addresses never
//!    validate against each other.
//! 2. **Account**: the authenticated wallet holder. Address, public key,
//!    and the private key that only the signer and the gateway handshake
//!    ever read.
//!
//! Recipient validation goes through the [`AddressValidator`] trait so the
//! rule set and the transaction builder get the check injected rather than
//! reaching for a global.

pub mod account;
pub mod address;

pub use account::Account;
pub use address::{
    cleanup_optional_prefix, Address, AddressError, AddressValidator, ChecksumAddressValidator,
};

/// Address string derived from a public key, for callers that only need
/// the text form.
pub fn address_from_public_key(public_key: &crate::crypto::PublicKey, network_byte: u8) -> String {
    Address::from_public_key(public_key, network_byte).to_base58()
}
