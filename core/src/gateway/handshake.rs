//! # Gateway Authorisation Handshake
//!
//! The payment gateway form runs on a third-party origin and has to know
//! the wallet holder really asked for it. The wallet proves that with a
//! hash only it and the gateway can compute:
//!
//! ```text
//! shared    = X25519(account private key, gateway public key)
//! nonce     = 32 random bytes (OsRng)
//! auth_hash = BLAKE2b-256(shared ‖ nonce ‖ raw asset id ‖ raw account public key)
//! ```
//!
//! The gateway holds the matching private key, recomputes `shared` from the
//! account public key in the request, and checks the hash. The nonce makes
//! every authorisation distinct.
//!
//! ## Security Properties
//!
//! - The shared key never leaves this module and zeroizes on drop.
//! - The whole nonce comes from the OS CSPRNG.
//! - A low-order gateway key is refused instead of yielding a zero secret.

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use super::error::HandshakeError;
use crate::config::{AUTH_HASH_LENGTH, AUTH_NONCE_LENGTH};
use crate::crypto::{blake2b_256_multi, decode_base58, encode_base58, PublicKey, SharedKey};
use crate::identity::Account;

/// `BLAKE2b-256(shared ‖ nonce ‖ raw_asset_id ‖ raw_public_key)`.
pub fn auth_hash(
    shared_key: &SharedKey,
    nonce: &[u8; AUTH_NONCE_LENGTH],
    raw_asset_id: &[u8],
    raw_public_key: &[u8],
) -> [u8; AUTH_HASH_LENGTH] {
    blake2b_256_multi(&[&shared_key.as_bytes()[..], &nonce[..], raw_asset_id, raw_public_key])
}

/// Nonce and hash that go into the gateway URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeMaterial {
    pub nonce: [u8; AUTH_NONCE_LENGTH],
    pub auth_hash: [u8; AUTH_HASH_LENGTH],
}

impl HandshakeMaterial {
    pub fn nonce_base58(&self) -> String {
        encode_base58(&self.nonce)
    }

    pub fn auth_hash_base58(&self) -> String {
        encode_base58(&self.auth_hash)
    }
}

/// Authorises gateway requests against one gateway public key.
#[derive(Debug, Clone)]
pub struct GatewayHandshake {
    gateway_public_key: PublicKey,
}

impl GatewayHandshake {
    pub fn new(gateway_public_key: [u8; 32]) -> Self {
        Self {
            gateway_public_key: PublicKey::from_bytes(gateway_public_key),
        }
    }

    pub fn gateway_public_key(&self) -> &PublicKey {
        &self.gateway_public_key
    }

    /// Authorise `account` for `asset_id` (base-58) with a fresh nonce.
    pub fn authorize(
        &self,
        account: &Account,
        asset_id: &str,
    ) -> Result<HandshakeMaterial, HandshakeError> {
        let mut nonce = [0u8; AUTH_NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        self.authorize_with_nonce(account, asset_id, nonce)
    }

    /// Same as [`GatewayHandshake::authorize`] with a caller-chosen nonce.
    pub fn authorize_with_nonce(
        &self,
        account: &Account,
        asset_id: &str,
        nonce: [u8; AUTH_NONCE_LENGTH],
    ) -> Result<HandshakeMaterial, HandshakeError> {
        let raw_asset_id = decode_base58(asset_id)
            .map_err(|e| HandshakeError::from_key_error("asset id", e))?;
        if raw_asset_id.is_empty() {
            return Err(HandshakeError::MalformedBase58 {
                what: "asset id",
                reason: "empty".to_string(),
            });
        }

        let shared = account
            .private_key()
            .shared_key(&self.gateway_public_key)
            .map_err(|e| HandshakeError::from_key_error("gateway public key", e))?;

        let hash = auth_hash(
            &shared,
            &nonce,
            &raw_asset_id,
            account.public_key().as_bytes(),
        );

        debug!(address = %account.address(), asset_id, "gateway handshake authorised");

        Ok(HandshakeMaterial {
            nonce,
            auth_hash: hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEVNET_NETWORK_CODE, GATEWAY_PUBLIC_KEY};
    use crate::crypto::{blake2b_256, PrivateKey};
    use crate::money::Currency;

    fn account() -> Account {
        Account::from_private_key(PrivateKey::from_bytes([11u8; 32]), DEVNET_NETWORK_CODE)
    }

    fn usd_id() -> String {
        Currency::usd().id().unwrap().to_string()
    }

    #[test]
    fn same_inputs_same_hash() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        let a = hs.authorize_with_nonce(&account(), &usd_id(), [1u8; 32]).unwrap();
        let b = hs.authorize_with_nonce(&account(), &usd_id(), [1u8; 32]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_nonce_different_hash() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        let a = hs.authorize_with_nonce(&account(), &usd_id(), [1u8; 32]).unwrap();
        let b = hs.authorize_with_nonce(&account(), &usd_id(), [2u8; 32]).unwrap();
        assert_ne!(a.auth_hash, b.auth_hash);
    }

    #[test]
    fn different_asset_different_hash() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        let eur = Currency::eur().id().unwrap().to_string();
        let a = hs.authorize_with_nonce(&account(), &usd_id(), [1u8; 32]).unwrap();
        let b = hs.authorize_with_nonce(&account(), &eur, [1u8; 32]).unwrap();
        assert_ne!(a.auth_hash, b.auth_hash);
    }

    #[test]
    fn gateway_recomputes_the_same_hash() {
        // The gateway side: its private key, the account's public key.
        let gateway_secret = PrivateKey::from_bytes([42u8; 32]);
        let hs = GatewayHandshake::new(*gateway_secret.public_key().as_bytes());
        let acct = account();
        let nonce = [9u8; 32];
        let material = hs.authorize_with_nonce(&acct, &usd_id(), nonce).unwrap();

        let shared = gateway_secret.shared_key(acct.public_key()).unwrap();
        let raw_asset = decode_base58(&usd_id()).unwrap();
        let mut joined = Vec::new();
        joined.extend_from_slice(shared.as_bytes());
        joined.extend_from_slice(&nonce);
        joined.extend_from_slice(&raw_asset);
        joined.extend_from_slice(acct.public_key().as_bytes());
        assert_eq!(material.auth_hash, blake2b_256(&joined));
    }

    #[test]
    fn fresh_nonces_are_random() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        let a = hs.authorize(&account(), &usd_id()).unwrap();
        let b = hs.authorize(&account(), &usd_id()).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.auth_hash, b.auth_hash);
        // No constant fill: the tail of the nonce varies too.
        assert_ne!(a.nonce[3..], b.nonce[3..]);
    }

    #[test]
    fn malformed_asset_id_is_rejected() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        assert!(matches!(
            hs.authorize(&account(), "0OIl"),
            Err(HandshakeError::MalformedBase58 { .. })
        ));
        assert!(matches!(
            hs.authorize(&account(), ""),
            Err(HandshakeError::MalformedBase58 { .. })
        ));
    }

    #[test]
    fn low_order_gateway_key_is_rejected() {
        let hs = GatewayHandshake::new([0u8; 32]);
        assert_eq!(
            hs.authorize(&account(), &usd_id()).unwrap_err(),
            HandshakeError::NonContributory
        );
    }

    #[test]
    fn material_encodes_to_base58() {
        let hs = GatewayHandshake::new(GATEWAY_PUBLIC_KEY);
        let m = hs.authorize_with_nonce(&account(), &usd_id(), [7u8; 32]).unwrap();
        assert_eq!(decode_base58(&m.nonce_base58()).unwrap(), vec![7u8; 32]);
        assert_eq!(decode_base58(&m.auth_hash_base58()).unwrap().len(), 32);
    }
}
