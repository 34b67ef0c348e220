//! # Validation Module
//!
//! Form-level checks that run before the transaction builder: the raw
//! [`TransferForm`] and the currency-bound [`RuleSet`] evaluated against it.
//! The builder repeats the checks that matter for correctness, so a form
//! that slips past here still cannot produce a bad transaction.

pub mod form;
pub mod rules;

pub use form::{Field, TransferForm};
pub use rules::{derive_rules, Constraint, FieldRules, RuleError, RuleSet, Violation, Violations};
