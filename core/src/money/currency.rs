//! # Currencies
//!
//! A [`Currency`] is an immutable descriptor: an optional asset id, a
//! display name, a symbol, and the number of fractional digits the chain
//! stores for it. The native currency is the only one without an id.
//!
//! Currencies compare and hash by id alone. Two descriptors for the same
//! asset with different display names are the same currency.
//!
//! ## Built-in Currencies
//!
//! The wallet ships with the native currency plus the four gateway-backed
//! assets it shows on the wallet page: `BTC`, `USD`, `EUR`, `CNY`.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::MoneyError;
use crate::config::{MAX_ASSET_PRECISION, NATIVE_PRECISION};
use crate::crypto::decode_base58;

const BTC_ASSET_ID: &str = "8LQW8f7P5d5PZM7GtZEBgaqRPGSzS3DfPuiXrURJ4AJS";
const USD_ASSET_ID: &str = "Ft8X1v1LTa1ABafufpaCWyVj8KkaxUWE6xBhW6sNFJck";
const EUR_ASSET_ID: &str = "Gtb1WRznfchDnTh37ezoDTJ4wcoKaRsKqKjJjy7nm2zU";
const CNY_ASSET_ID: &str = "DEJbZipbKQjwEiRjx2AqQFucrj5CZ3rAc4ZvFM8nAsoA";

/// A currency the wallet can hold.
#[derive(Clone, Serialize)]
pub struct Currency {
    id: Option<String>,
    display_name: String,
    symbol: String,
    precision: u8,
}

impl Currency {
    /// Describes an issued asset.
    ///
    /// # Errors
    ///
    /// [`MoneyError::InvalidAssetId`] if `id` is empty or not base-58, and
    /// [`MoneyError::InvalidPrecision`] if `precision` exceeds
    /// [`MAX_ASSET_PRECISION`].
    pub fn asset(
        id: &str,
        display_name: &str,
        symbol: &str,
        precision: u8,
    ) -> Result<Self, MoneyError> {
        if precision > MAX_ASSET_PRECISION {
            return Err(MoneyError::InvalidPrecision {
                precision,
                max: MAX_ASSET_PRECISION,
            });
        }
        match decode_base58(id) {
            Ok(raw) if !raw.is_empty() => {}
            _ => return Err(MoneyError::InvalidAssetId(id.to_string())),
        }
        Ok(Self::known(Some(id), display_name, symbol, precision))
    }

    fn known(id: Option<&str>, display_name: &str, symbol: &str, precision: u8) -> Self {
        Self {
            id: id.map(str::to_string),
            display_name: display_name.to_string(),
            symbol: symbol.to_string(),
            precision,
        }
    }

    /// The native currency. Pays every network fee.
    pub fn wav() -> Self {
        Self::known(None, "Waves", "WAVES", NATIVE_PRECISION)
    }

    pub fn btc() -> Self {
        Self::known(Some(BTC_ASSET_ID), "Bitcoin", "BTC", 8)
    }

    pub fn usd() -> Self {
        Self::known(Some(USD_ASSET_ID), "US Dollar", "USD", 2)
    }

    pub fn eur() -> Self {
        Self::known(Some(EUR_ASSET_ID), "Euro", "EUR", 2)
    }

    pub fn cny() -> Self {
        Self::known(Some(CNY_ASSET_ID), "Chinese Yuan", "CNY", 2)
    }

    /// Every built-in currency, in wallet display order.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::usd(),
            Self::eur(),
            Self::btc(),
            Self::wav(),
            Self::cny(),
        ]
    }

    /// Looks up a built-in currency by its short code (`WAV`, `BTC`, ...).
    /// Case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "WAV" | "WAVES" => Some(Self::wav()),
            "BTC" => Some(Self::btc()),
            "USD" => Some(Self::usd()),
            "EUR" => Some(Self::eur()),
            "CNY" => Some(Self::cny()),
            _ => None,
        }
    }

    /// Looks up a built-in asset by id.
    pub fn find_by_id(id: &str) -> Option<Self> {
        Self::builtin()
            .into_iter()
            .find(|c| c.id.as_deref() == Some(id))
    }

    /// Base-58 asset id; `None` for the native currency.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Fractional decimal digits stored on-chain.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn is_native(&self) -> bool {
        self.id.is_none()
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "Currency({}, {}, p={})", self.symbol, id, self.precision),
            None => write!(f, "Currency({}, native, p={})", self.symbol, self.precision),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
