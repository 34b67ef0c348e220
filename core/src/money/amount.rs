//! # Money
//!
//! An amount is an integer count of the smallest unit ("coins") tagged with
//! its [`Currency`]. One token is `10^precision` coins. Everything that
//! reaches the network is an integer coin count, so arithmetic never goes
//! through floating point.
//!
//! Text input is parsed strictly: a plain decimal with at most `precision`
//! fractional digits. Excess digits are an error, not a rounding. The only
//! rounding path is [`Money::from_token_float`], which rounds half away from
//! zero.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::currency::Currency;
use super::error::MoneyError;

/// An amount of a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    coins: i64,
    currency: Currency,
}

fn coins_per_token(precision: u8) -> i64 {
    10i64.pow(u32::from(precision))
}

impl Money {
    /// Wrap an integer coin count.
    pub fn from_coins(coins: i64, currency: &Currency) -> Self {
        Self {
            coins,
            currency: currency.clone(),
        }
    }

    pub fn zero(currency: &Currency) -> Self {
        Self::from_coins(0, currency)
    }

    /// Parse a token amount typed by a user, e.g. `"12.5"`.
    ///
    /// Accepts an optional leading `-`, decimal digits, and at most one
    /// `.`. Surrounding whitespace is ignored. At least one digit is
    /// required. Trailing zeros past the currency precision are allowed
    /// (`"1.500"` for a two-digit currency) but any other excess digit is
    /// rejected.
    ///
    /// ```
    /// use waves_lite_core::money::{Currency, Money};
    ///
    /// let usd = Currency::usd();
    /// assert_eq!(Money::from_tokens("10.05", &usd).unwrap().coins(), 1005);
    /// assert!(Money::from_tokens("10.005", &usd).is_err());
    /// ```
    pub fn from_tokens(tokens: &str, currency: &Currency) -> Result<Self, MoneyError> {
        let trimmed = tokens.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (unsigned, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(MoneyError::invalid_amount(tokens, "not a decimal number"));
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(MoneyError::invalid_amount(tokens, "no digits"));
        }

        let precision = usize::from(currency.precision());
        let significant = fraction.trim_end_matches('0');
        if significant.len() > precision {
            return Err(MoneyError::invalid_amount(
                tokens,
                format!(
                    "more than {} fractional digits for {}",
                    precision,
                    currency.display_name()
                ),
            ));
        }

        // Magnitude in i128 so that i64::MIN, whose magnitude has no i64, still parses.
        let overflow = || MoneyError::invalid_amount(tokens, "amount out of range");
        let mut magnitude: i128 = 0;
        for digit in whole.bytes() {
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit - b'0')))
                .ok_or_else(overflow)?;
        }
        magnitude = magnitude
            .checked_mul(i128::from(coins_per_token(currency.precision())))
            .ok_or_else(overflow)?;

        let mut fractional: i128 = 0;
        for position in 0..precision {
            let digit = significant.as_bytes().get(position).map_or(0, |b| b - b'0');
            fractional = fractional * 10 + i128::from(digit);
        }
        magnitude = magnitude.checked_add(fractional).ok_or_else(overflow)?;

        let signed = if negative { -magnitude } else { magnitude };
        let coins = i64::try_from(signed).map_err(|_| overflow())?;
        Ok(Self::from_coins(coins, currency))
    }

    /// Convert an exact decimal token amount. Same strictness as
    /// [`Money::from_tokens`].
    pub fn from_decimal(tokens: Decimal, currency: &Currency) -> Result<Self, MoneyError> {
        let precision = u32::from(currency.precision());
        if tokens.normalize().scale() > precision {
            return Err(MoneyError::invalid_amount(
                tokens.to_string(),
                format!(
                    "more than {} fractional digits for {}",
                    precision,
                    currency.display_name()
                ),
            ));
        }
        tokens
            .checked_mul(Decimal::from(coins_per_token(currency.precision())))
            .and_then(|scaled| scaled.to_i64())
            .map(|coins| Self::from_coins(coins, currency))
            .ok_or_else(|| MoneyError::invalid_amount(tokens.to_string(), "amount out of range"))
    }

    /// Convert a floating-point token amount, rounding half away from zero
    /// at the currency precision.
    pub fn from_token_float(tokens: f64, currency: &Currency) -> Result<Self, MoneyError> {
        if !tokens.is_finite() {
            return Err(MoneyError::invalid_amount(tokens.to_string(), "not a finite number"));
        }
        Decimal::from_f64(tokens)
            .and_then(|d| d.checked_mul(Decimal::from(coins_per_token(currency.precision()))))
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|rounded| rounded.to_i64())
            .map(|coins| Self::from_coins(coins, currency))
            .ok_or_else(|| MoneyError::invalid_amount(tokens.to_string(), "amount out of range"))
    }

    pub fn coins(&self) -> i64 {
        self.coins
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The amount in tokens, exact, with `precision` fractional digits.
    pub fn to_tokens(&self) -> Decimal {
        Decimal::new(self.coins, u32::from(self.currency.precision()))
    }

    /// Render the token amount with exactly `precision` fractional digits,
    /// optionally followed by a space and the currency symbol.
    ///
    /// ```
    /// use waves_lite_core::money::{Currency, Money};
    ///
    /// let fee = Money::from_coins(100_000, &Currency::wav());
    /// assert_eq!(fee.format_amount(false), "0.00100000");
    /// assert_eq!(fee.format_amount(true), "0.00100000 WAVES");
    /// ```
    pub fn format_amount(&self, include_symbol: bool) -> String {
        let precision = self.currency.precision();
        let divisor = coins_per_token(precision).unsigned_abs();
        let magnitude = self.coins.unsigned_abs();
        let sign = if self.coins < 0 { "-" } else { "" };

        let mut out = if precision == 0 {
            format!("{}{}", sign, magnitude)
        } else {
            format!(
                "{}{}.{:0width$}",
                sign,
                magnitude / divisor,
                magnitude % divisor,
                width = usize::from(precision)
            )
        };
        if include_symbol {
            out.push(' ');
            out.push_str(self.currency.symbol());
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.coins == 0
    }

    pub fn is_positive(&self) -> bool {
        self.coins > 0
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(MoneyError::CurrencyMismatch {
                left: self.currency.display_name().to_string(),
                right: other.currency.display_name().to_string(),
            })
        }
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let coins = self.coins.checked_add(other.coins).ok_or_else(|| {
            MoneyError::invalid_amount(
                format!("{} + {}", self.coins, other.coins),
                "amount out of range",
            )
        })?;
        Ok(Self::from_coins(coins, &self.currency))
    }

    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let coins = self.coins.checked_sub(other.coins).ok_or_else(|| {
            MoneyError::invalid_amount(
                format!("{} - {}", self.coins, other.coins),
                "amount out of range",
            )
        })?;
        Ok(Self::from_coins(coins, &self.currency))
    }

    /// Order two amounts of the same currency.
    ///
    /// `Money` deliberately has no `PartialOrd`: comparing across
    /// currencies is an error, not `None`.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.coins.cmp(&other.coins))
    }

    pub fn greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    pub fn less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn greater_or_equal(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_amount(true))
    }
}
