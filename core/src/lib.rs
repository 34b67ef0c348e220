// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Waves Lite: Wallet Core
//!
//! The parts of the lite wallet that have to be right: money that never
//! touches floating point, transfers that are checked before they are
//! signed, and the handshake that lets a payment gateway trust a request
//! coming from the wallet.
//!
//! ## Architecture
//!
//! - **config**: constants and network parameters. Every magic number lives here.
//! - **crypto**: BLAKE2b, Keccak, X25519 and base-58 wrappers.
//! - **money**: currencies and exact integer amounts.
//! - **identity**: addresses, address validation, accounts.
//! - **wallet**: per-currency balances of the account.
//! - **validation**: the transfer form and its currency-bound rule set.
//! - **transaction**: building unsigned transfers and broadcasting them once.
//! - **gateway**: authorising the payment gateway form.
//!
//! ## Ground Rules
//!
//! 1. Amounts are integer coins. Parsing is strict; excess precision is an error.
//! 2. Cross-currency comparison is an error, never a silent `false`.
//! 3. Private keys are never logged or serialised.
//! 4. If it touches money, it has tests.

pub mod config;
pub mod crypto;
pub mod gateway;
pub mod identity;
pub mod money;
pub mod transaction;
pub mod validation;
pub mod wallet;
