//! # Wallet Configuration & Constants
//!
//! Every magic number the wallet core relies on lives here: currency
//! precision limits, network fee floors, the address layout, and the
//! gateway's static public key.
//!
//! The constants are compiled in. [`Settings`] lets an embedding
//! application override the handful of values that differ between
//! deployments (network, fee floor, gateway endpoint), and
//! [`Settings::resolve`] turns them into validated [`NetworkParams`].
//! A settings file that fails to resolve is fatal: no transaction or
//! handshake can proceed safely without these values.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::money::{Currency, Money};

// ---------------------------------------------------------------------------
// Currency Precision
// ---------------------------------------------------------------------------

/// Fractional digits of the native currency. One WAVES is 10^8 coins.
pub const NATIVE_PRECISION: u8 = 8;

/// Upper bound on the precision an issued asset may declare.
pub const MAX_ASSET_PRECISION: u8 = 8;

// ---------------------------------------------------------------------------
// Fee & Payment Floors
// ---------------------------------------------------------------------------

/// Minimum network fee, in native tokens.
pub const MINIMUM_TRANSACTION_FEE: &str = "0.001";

/// Minimum native payment, in tokens. One coin.
pub const MINIMUM_PAYMENT_AMOUNT: &str = "0.00000001";

/// Fee pre-filled into a fresh transfer form, in native tokens.
pub const DEFAULT_FEE_AMOUNT: &str = "0.001";

/// Attachments longer than this are rejected by the node.
pub const MAX_ATTACHMENT_BYTES: usize = 140;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Optional prefix users may paste in front of an address.
pub const ADDRESS_PREFIX: &str = "1W";

/// Length of a base-58 address string without the prefix.
pub const ADDRESS_STRING_LENGTH: usize = 35;

/// Address version byte.
pub const ADDRESS_VERSION: u8 = 1;

/// Raw address layout: version (1) + network (1) + key hash (20) + checksum (4).
pub const ADDRESS_BYTES: usize = 26;

/// Bytes of the public key hash carried in an address.
pub const ADDRESS_HASH_LENGTH: usize = 20;

/// Bytes of the trailing address checksum.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Network byte of mainnet addresses.
pub const MAINNET_NETWORK_CODE: u8 = b'W';

/// Network byte of the development network the lite client ships against.
pub const DEVNET_NETWORK_CODE: u8 = b'T';

// ---------------------------------------------------------------------------
// Keys & Gateway
// ---------------------------------------------------------------------------

/// Curve25519 key length, private and public.
pub const KEY_LENGTH: usize = 32;

/// Length of the gateway authentication nonce.
pub const AUTH_NONCE_LENGTH: usize = 32;

/// Length of the gateway authentication hash (BLAKE2b-256).
pub const AUTH_HASH_LENGTH: usize = 32;

/// Static Curve25519 public key of the payment gateway. The gateway holds
/// the private half and recomputes the shared key on its side.
pub const GATEWAY_PUBLIC_KEY: [u8; KEY_LENGTH] = [
    146, 242, 193, 113, 203, 96, 120, 230, 5, 80, 203, 153, 83, 252, 63, 17, 128, 49, 214, 49,
    76, 182, 64, 13, 253, 114, 17, 246, 1, 141, 29, 43,
];

/// Gateway endpoint used when no settings override it.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8089";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Errors raised while resolving [`Settings`]. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid network code {0:?}: expected a single ASCII character")]
    InvalidNetworkCode(String),

    #[error("invalid {name} amount {value:?}: {reason}")]
    InvalidAmount {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid gateway url {url:?}: {reason}")]
    InvalidGatewayUrl { url: String, reason: String },

    #[error("invalid gateway public key: {0}")]
    InvalidGatewayKey(String),

    #[error("no gateway can serve currency {0:?}")]
    InvalidGatewayCurrency(String),
}

/// Deployment-specific overrides. Every field has a default, so an empty
/// JSON object is a valid settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Network code character (`W`, `T`, ...).
    pub network_code: String,
    /// Minimum fee in native tokens.
    pub minimum_fee: String,
    /// Minimum native payment in tokens.
    pub minimum_payment: String,
    /// Base URL of the payment gateway.
    pub gateway_url: String,
    /// Base-58 gateway public key; the compiled-in key when absent.
    pub gateway_public_key: Option<String>,
    /// Per-currency gateway endpoints, keyed by symbol (`"BTC"`, ...).
    /// Currencies not listed use `gateway_url`.
    pub currency_gateway_urls: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            network_code: (DEVNET_NETWORK_CODE as char).to_string(),
            minimum_fee: MINIMUM_TRANSACTION_FEE.to_string(),
            minimum_payment: MINIMUM_PAYMENT_AMOUNT.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_public_key: None,
            currency_gateway_urls: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Validates every value and produces the parameters the rest of the
    /// crate runs on.
    pub fn resolve(&self) -> Result<NetworkParams, ConfigError> {
        let network_byte = match self.network_code.as_bytes() {
            [b] if b.is_ascii_graphic() => *b,
            _ => return Err(ConfigError::InvalidNetworkCode(self.network_code.clone())),
        };

        let native = Currency::wav();
        let minimum_fee = Money::from_tokens(&self.minimum_fee, &native).map_err(|e| {
            ConfigError::InvalidAmount {
                name: "minimum fee",
                value: self.minimum_fee.clone(),
                reason: e.to_string(),
            }
        })?;
        let minimum_payment = Money::from_tokens(&self.minimum_payment, &native).map_err(|e| {
            ConfigError::InvalidAmount {
                name: "minimum payment",
                value: self.minimum_payment.clone(),
                reason: e.to_string(),
            }
        })?;
        for (name, value, money) in [
            ("minimum fee", &self.minimum_fee, &minimum_fee),
            ("minimum payment", &self.minimum_payment, &minimum_payment),
        ] {
            if money.coins() <= 0 {
                return Err(ConfigError::InvalidAmount {
                    name,
                    value: value.clone(),
                    reason: "must be positive".to_string(),
                });
            }
        }

        let gateway_url = parse_gateway_url(&self.gateway_url)?;
        let mut currency_gateway_urls = HashMap::new();
        for (code, raw) in &self.currency_gateway_urls {
            let currency = Currency::from_code(code)
                .filter(|c| !c.is_native())
                .ok_or_else(|| ConfigError::InvalidGatewayCurrency(code.clone()))?;
            currency_gateway_urls.insert(currency, parse_gateway_url(raw)?);
        }

        let gateway_public_key = match &self.gateway_public_key {
            None => GATEWAY_PUBLIC_KEY,
            Some(encoded) => crate::crypto::keys::decode_key(encoded)
                .map_err(|e| ConfigError::InvalidGatewayKey(e.to_string()))?,
        };

        Ok(NetworkParams {
            network_byte,
            minimum_fee,
            minimum_payment,
            gateway_url,
            gateway_public_key,
            currency_gateway_urls,
        })
    }
}

fn parse_gateway_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidGatewayUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidGatewayUrl {
            url: raw.to_string(),
            reason: "not a base url".to_string(),
        });
    }
    Ok(url)
}

/// Validated, ready-to-use network parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    /// Network byte embedded in addresses.
    pub network_byte: u8,
    /// Minimum fee, in the native currency.
    pub minimum_fee: Money,
    /// Minimum native payment.
    pub minimum_payment: Money,
    /// Gateway base URL.
    pub gateway_url: Url,
    /// Gateway Curve25519 public key.
    pub gateway_public_key: [u8; KEY_LENGTH],
    /// Endpoints of currencies served by their own gateway.
    pub currency_gateway_urls: HashMap<Currency, Url>,
}

impl Default for NetworkParams {
    fn default() -> Self {
        let native = Currency::wav();
        Self {
            network_byte: DEVNET_NETWORK_CODE,
            // 0.001 and 0.00000001 WAVES.
            minimum_fee: Money::from_coins(100_000, &native),
            minimum_payment: Money::from_coins(1, &native),
            gateway_url: Url::parse(DEFAULT_GATEWAY_URL).expect("default gateway url is valid"),
            gateway_public_key: GATEWAY_PUBLIC_KEY,
            currency_gateway_urls: HashMap::new(),
        }
    }
}

/// Returns a friendly name for a network byte, mainly for logging.
pub fn network_name(network_byte: u8) -> String {
    match network_byte {
        MAINNET_NETWORK_CODE => "mainnet".to_string(),
        DEVNET_NETWORK_CODE => "devnet".to_string(),
        other => format!("custom({})", other as char),
    }
}
