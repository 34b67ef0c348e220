//! # Payment Gateway
//!
//! Deposits and withdrawals of the gateway-backed assets happen in a form
//! served by the gateway itself. Before the wallet opens that form it
//! authorises the request with a handshake the gateway can check:
//!
//! 1. **Key agreement**: X25519 between the account key and the gateway's
//!    static public key.
//! 2. **Auth hash**: BLAKE2b-256 over the shared key, a fresh nonce, the
//!    asset id, and the account public key.
//! 3. **Form URL**: nonce and hash travel base-58 encoded in the query
//!    string alongside the account's public key and address.
//!
//! The native currency is not gateway-backed; asking for its form fails.

pub mod error;
pub mod handshake;
pub mod request;

pub use error::HandshakeError;
pub use handshake::{auth_hash, GatewayHandshake, HandshakeMaterial};
pub use request::{Gateway, GatewayForm, GatewayRequest};
