//! # Wallet Balances
//!
//! The wallet page keeps one balance per currency it knows about. Native
//! balances arrive from the node as a single coin count; asset balances
//! arrive as a list of `(asset id, coins)` pairs that may include assets
//! the wallet does not display. Those are skipped.
//!
//! [`WalletBook::balances_for`] packs what the transaction builder needs
//! for one transfer: the balance in the transfer currency and the native
//! balance that pays the fee.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::{Currency, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("wallet does not track currency {0}")]
    UnknownCurrency(String),
}

/// Balances relevant to a single outgoing transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalances {
    /// Spendable balance in the transfer currency.
    pub available: Money,
    /// Native balance, which pays the fee.
    pub native: Money,
}

impl AccountBalances {
    /// Balances for a native payment: both are the same amount.
    pub fn native_only(native: Money) -> Self {
        Self {
            available: native.clone(),
            native,
        }
    }
}

/// Per-currency balances for one account.
#[derive(Debug, Clone)]
pub struct WalletBook {
    currencies: Vec<Currency>,
    coins: HashMap<Currency, i64>,
    last_updated: Option<DateTime<Utc>>,
}

impl Default for WalletBook {
    fn default() -> Self {
        Self::with_currencies(Currency::builtin())
    }
}

impl WalletBook {
    /// A book over the built-in currencies, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A book over an explicit currency list. The native currency is added
    /// if missing, since every transfer needs it for the fee.
    /// Repeated currencies keep their first position.
    pub fn with_currencies(mut currencies: Vec<Currency>) -> Self {
        if !currencies.iter().any(Currency::is_native) {
            currencies.push(Currency::wav());
        }
        let mut seen = HashSet::new();
        currencies.retain(|c| seen.insert(c.clone()));
        let coins = currencies.iter().map(|c| (c.clone(), 0)).collect();
        Self {
            currencies,
            coins,
            last_updated: None,
        }
    }

    pub fn apply_native_balance(&mut self, coins: i64) {
        self.coins.insert(Currency::wav(), coins);
        self.last_updated = Some(Utc::now());
    }

    /// Apply asset balances reported by the node. Unknown asset ids are
    /// ignored. Returns how many entries were applied.
    pub fn apply_asset_balances<S: AsRef<str>>(&mut self, balances: &[(S, i64)]) -> usize {
        let mut applied = 0;
        for (asset_id, coins) in balances {
            let tracked = self
                .currencies
                .iter()
                .find(|c| c.id() == Some(asset_id.as_ref()));
            if let Some(currency) = tracked {
                self.coins.insert(currency.clone(), *coins);
                applied += 1;
            }
        }
        self.last_updated = Some(Utc::now());
        applied
    }

    /// Current balance in `currency`, or `None` if the book does not track it.
    pub fn balance(&self, currency: &Currency) -> Option<Money> {
        let tracked = self.currencies.iter().find(|c| *c == currency)?;
        let coins = self.coins.get(tracked).copied().unwrap_or_default();
        Some(Money::from_coins(coins, tracked))
    }

    pub fn balances_for(&self, currency: &Currency) -> Result<AccountBalances, WalletError> {
        let available = self
            .balance(currency)
            .ok_or_else(|| WalletError::UnknownCurrency(currency.display_name().to_string()))?;
        let native = self
            .balance(&Currency::wav())
            .ok_or_else(|| WalletError::UnknownCurrency(Currency::wav().display_name().to_string()))?;
        Ok(AccountBalances { available, native })
    }

    /// Tracked currencies, in display order.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Every balance, in display order.
    pub fn iter(&self) -> impl Iterator<Item = Money> + '_ {
        self.currencies
            .iter()
            .map(|c| Money::from_coins(self.coins.get(c).copied().unwrap_or_default(), c))
    }

    /// When a node update last touched the book.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}
