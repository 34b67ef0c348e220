//! # Wallet Module
//!
//! Balance bookkeeping for the authenticated account.

pub mod balance;

pub use balance::{AccountBalances, WalletBook, WalletError};
