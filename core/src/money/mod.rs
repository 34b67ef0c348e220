//! # Money Model
//!
//! Currencies and exact integer amounts. See [`currency`] for the
//! descriptor and built-in assets, [`amount`] for parsing, formatting, and
//! currency-checked arithmetic.

pub mod amount;
pub mod currency;
pub mod error;

pub use amount::Money;
pub use currency::Currency;
pub use error::MoneyError;
