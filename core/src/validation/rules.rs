//! # Validation Rule Sets
//!
//! A [`RuleSet`] holds the per-field constraints the transfer form is
//! checked against before the builder ever runs. The bounds depend on the
//! transfer currency (decimal places, one-coin minimum) and on the
//! account's balance (maximum), so the set is derived whole from those
//! inputs by [`derive_rules`] and replaced whenever either changes.
//!
//! A rule set remembers the currency it was derived for. Evaluating it
//! against a form for any other currency is a [`RuleError::StaleRuleSet`]
//! rather than a silent pass with the wrong bounds.
//!
//! Per field, constraints are checked in a fixed order and only the first
//! failure is reported:
//!
//! ```text
//! required -> address -> decimal -> min -> max
//! ```

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::form::{Field, TransferForm};
use crate::config::NATIVE_PRECISION;
use crate::identity::{cleanup_optional_prefix, AddressValidator};
use crate::money::{Currency, Money, MoneyError};

/// One kind of check a field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    Required,
    Address,
    Decimal,
    Min,
    Max,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constraint::Required => "required",
            Constraint::Address => "address",
            Constraint::Decimal => "decimal",
            Constraint::Min => "min",
            Constraint::Max => "max",
        };
        f.write_str(name)
    }
}

/// Constraints for a single field, plus the message shown when each fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub required: bool,
    pub address: bool,
    /// Maximum fractional digits.
    pub decimal: Option<u8>,
    /// Inclusive lower bound, in tokens.
    pub min: Option<Decimal>,
    /// Inclusive upper bound, in tokens.
    pub max: Option<Decimal>,
    pub messages: BTreeMap<Constraint, String>,
}

impl FieldRules {
    /// The message for `constraint`, falling back to a generic one.
    pub fn message(&self, constraint: Constraint) -> String {
        if let Some(custom) = self.messages.get(&constraint) {
            return custom.clone();
        }
        match constraint {
            Constraint::Required => "This field is required.".to_string(),
            Constraint::Address => "Account number must be a sequence of 35 alphanumeric \
                characters with no spaces, optionally starting with '1W'"
                .to_string(),
            Constraint::Decimal => format!(
                "Amount is expected with a dot (.) as a decimal separator with no more than {} \
                 fraction digits",
                self.decimal.unwrap_or(NATIVE_PRECISION)
            ),
            Constraint::Min => format!(
                "Please enter a value greater than or equal to {}.",
                self.min.unwrap_or_default()
            ),
            Constraint::Max => format!(
                "Please enter a value less than or equal to {}.",
                self.max.unwrap_or_default()
            ),
        }
    }

    /// First failing constraint for `value`, if any.
    fn check(&self, value: &str, validator: &dyn AddressValidator) -> Option<Constraint> {
        let value = value.trim();
        if value.is_empty() {
            return self.required.then_some(Constraint::Required);
        }
        if self.address && !validator.validate_address(cleanup_optional_prefix(value)) {
            return Some(Constraint::Address);
        }
        if let Some(places) = self.decimal {
            if !matches_decimal_pattern(value, places) {
                return Some(Constraint::Decimal);
            }
        }
        if self.min.is_none() && self.max.is_none() {
            return None;
        }

        // Unparseable text fails whichever bound comes first.
        let Some(number) = parse_decimal(value) else {
            return Some(if self.min.is_some() {
                Constraint::Min
            } else {
                Constraint::Max
            });
        };
        if self.min.is_some_and(|min| number < min) {
            return Some(Constraint::Min);
        }
        if self.max.is_some_and(|max| number > max) {
            return Some(Constraint::Max);
        }
        None
    }
}

/// `^(?:-?\d+)?(?:\.\d{0,places})?$`
fn matches_decimal_pattern(value: &str, places: u8) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (value, None),
    };
    let digits = whole.strip_prefix('-').unwrap_or(whole);
    let whole_ok = if whole.starts_with('-') {
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    } else {
        digits.bytes().all(|b| b.is_ascii_digit())
    };
    let fraction_ok = fraction.map_or(true, |f| {
        f.len() <= usize::from(places) && f.bytes().all(|b| b.is_ascii_digit())
    });
    whole_ok && fraction_ok
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    let mut text = value.to_string();
    if text.ends_with('.') {
        text.push('0');
    }
    if text.starts_with('.') {
        text.insert(0, '0');
    } else if text.starts_with("-.") {
        text.insert(1, '0');
    }
    Decimal::from_str(&text).ok()
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// A single failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub constraint: Constraint,
    pub message: String,
}

/// Every failed field of one evaluation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn for_field(&self, field: Field) -> Option<&Violation> {
        self.0.iter().find(|v| v.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule set was derived for another currency and must be rebuilt.
    #[error("rule set was derived for {derived_for}, not {requested}")]
    StaleRuleSet {
        derived_for: String,
        requested: String,
    },

    #[error("invalid transfer form: {0}")]
    Invalid(Violations),
}

/// Constraints for the whole transfer form, bound to one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    currency: Currency,
    recipient: FieldRules,
    amount: FieldRules,
    fee: FieldRules,
}

impl RuleSet {
    /// Currency this set was derived for.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn rule(&self, field: Field) -> &FieldRules {
        match field {
            Field::Recipient => &self.recipient,
            Field::Amount => &self.amount,
            Field::Fee => &self.fee,
        }
    }

    /// Check `form` for a transfer in `currency`.
    pub fn evaluate(
        &self,
        form: &TransferForm,
        currency: &Currency,
        validator: &dyn AddressValidator,
    ) -> Result<(), RuleError> {
        if *currency != self.currency {
            return Err(RuleError::StaleRuleSet {
                derived_for: self.currency.display_name().to_string(),
                requested: currency.display_name().to_string(),
            });
        }

        let violations: Vec<Violation> = Field::ALL
            .iter()
            .filter_map(|&field| {
                let rules = self.rule(field);
                rules
                    .check(form.value(field), validator)
                    .map(|constraint| Violation {
                        field,
                        constraint,
                        message: rules.message(constraint),
                    })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RuleError::Invalid(Violations(violations)))
        }
    }
}

/// Derive the rule set for a transfer in `currency`.
///
/// `available` must be in `currency`; `minimum_fee` must be native. Pure:
/// the same inputs always yield an equal set.
pub fn derive_rules(
    currency: &Currency,
    available: &Money,
    minimum_fee: &Money,
) -> Result<RuleSet, MoneyError> {
    if available.currency() != currency {
        return Err(MoneyError::CurrencyMismatch {
            left: currency.display_name().to_string(),
            right: available.currency().display_name().to_string(),
        });
    }
    let native = Currency::wav();
    if *minimum_fee.currency() != native {
        return Err(MoneyError::CurrencyMismatch {
            left: native.display_name().to_string(),
            right: minimum_fee.currency().display_name().to_string(),
        });
    }

    let recipient = FieldRules {
        required: true,
        address: true,
        messages: BTreeMap::from([(
            Constraint::Required,
            "Recipient account number is required".to_string(),
        )]),
        ..FieldRules::default()
    };

    let minimum_payment = Money::from_coins(1, currency);
    let amount = FieldRules {
        required: true,
        decimal: Some(currency.precision()),
        min: Some(minimum_payment.to_tokens()),
        max: Some(available.to_tokens()),
        messages: BTreeMap::from([
            (Constraint::Required, "Amount to send is required".to_string()),
            (
                Constraint::Decimal,
                format!(
                    "The amount to send must be a number with no more than {} digits after \
                     the decimal point (.)",
                    currency.precision()
                ),
            ),
            (
                Constraint::Min,
                format!(
                    "Payment amount is too small. It should be greater or equal to {}",
                    minimum_payment.format_amount(false)
                ),
            ),
            (
                Constraint::Max,
                format!(
                    "Payment amount is too big. It should be less or equal to {}",
                    available.format_amount(false)
                ),
            ),
        ]),
        ..FieldRules::default()
    };

    let fee = FieldRules {
        required: true,
        decimal: Some(native.precision()),
        min: Some(minimum_fee.to_tokens()),
        messages: BTreeMap::from([
            (Constraint::Required, "Transaction fee is required".to_string()),
            (
                Constraint::Decimal,
                format!(
                    "Transaction fee must be with no more than {} digits after the decimal \
                     point (.)",
                    native.precision()
                ),
            ),
            (
                Constraint::Min,
                format!(
                    "Transaction fee is too small. It should be greater or equal to {}",
                    minimum_fee.format_amount(true)
                ),
            ),
        ]),
        ..FieldRules::default()
    };

    Ok(RuleSet {
        currency: currency.clone(),
        recipient,
        amount,
        fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEVNET_NETWORK_CODE;
    use crate::identity::{Account, ChecksumAddressValidator};

    fn min_fee() -> Money {
        Money::from_coins(100_000, &Currency::wav())
    }

    fn usd_rules(available_cents: i64) -> RuleSet {
        let usd = Currency::usd();
        derive_rules(&usd, &Money::from_coins(available_cents, &usd), &min_fee()).unwrap()
    }

    fn validator() -> ChecksumAddressValidator {
        ChecksumAddressValidator::new(DEVNET_NETWORK_CODE)
    }

    fn recipient() -> String {
        Account::generate(DEVNET_NETWORK_CODE).address().to_base58()
    }

    #[test]
    fn derived_bounds_follow_currency_and_balance() {
        let rules = usd_rules(12_345);
        let amount = rules.rule(Field::Amount);
        assert_eq!(amount.decimal, Some(2));
        assert_eq!(amount.min, Some(Decimal::from_str("0.01").unwrap()));
        assert_eq!(amount.max, Some(Decimal::from_str("123.45").unwrap()));

        let fee = rules.rule(Field::Fee);
        assert_eq!(fee.decimal, Some(8));
        assert_eq!(fee.min, Some(Decimal::from_str("0.001").unwrap()));
        assert!(rules.rule(Field::Recipient).address);
    }

    #[test]
    fn derivation_is_pure() {
        assert_eq!(usd_rules(500), usd_rules(500));
        assert_ne!(usd_rules(500), usd_rules(501));
    }

    #[test]
    fn derivation_rejects_mismatched_inputs() {
        let usd = Currency::usd();
        let eur_balance = Money::from_coins(100, &Currency::eur());
        assert!(matches!(
            derive_rules(&usd, &eur_balance, &min_fee()),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
        let usd_fee = Money::from_coins(1, &usd);
        assert!(derive_rules(&usd, &Money::from_coins(1, &usd), &usd_fee).is_err());
    }

    #[test]
    fn messages_use_formatted_bounds() {
        let rules = usd_rules(12_345);
        assert_eq!(
            rules.rule(Field::Amount).message(Constraint::Min),
            "Payment amount is too small. It should be greater or equal to 0.01"
        );
        assert_eq!(
            rules.rule(Field::Amount).message(Constraint::Max),
            "Payment amount is too big. It should be less or equal to 123.45"
        );
        assert_eq!(
            rules.rule(Field::Fee).message(Constraint::Min),
            "Transaction fee is too small. It should be greater or equal to 0.00100000 WAVES"
        );
    }

    #[test]
    fn valid_form_passes() {
        let rules = usd_rules(10_000);
        let form = TransferForm::new(recipient(), "12.50", "0.001");
        assert!(rules.evaluate(&form, &Currency::usd(), &validator()).is_ok());
    }

    #[test]
    fn empty_form_reports_required_for_every_field() {
        let rules = usd_rules(10_000);
        let err = rules
            .evaluate(&TransferForm::default(), &Currency::usd(), &validator())
            .unwrap_err();
        let RuleError::Invalid(violations) = err else {
            panic!("expected violations");
        };
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|v| v.constraint == Constraint::Required));
        assert_eq!(
            violations.for_field(Field::Recipient).unwrap().message,
            "Recipient account number is required"
        );
    }

    #[test]
    fn bad_recipient_is_an_address_violation() {
        let rules = usd_rules(10_000);
        let form = TransferForm::new("not-an-address", "1", "0.001");
        let Err(RuleError::Invalid(v)) = rules.evaluate(&form, &Currency::usd(), &validator())
        else {
            panic!("expected violations");
        };
        assert_eq!(v.len(), 1);
        assert_eq!(v.for_field(Field::Recipient).unwrap().constraint, Constraint::Address);
    }

    #[test]
    fn first_failure_wins_per_field() {
        let rules = usd_rules(10_000);
        // Too many digits and too large: decimal is reported, not max.
        let form = TransferForm::new(recipient(), "1000.005", "0.0001");
        let Err(RuleError::Invalid(v)) = rules.evaluate(&form, &Currency::usd(), &validator())
        else {
            panic!("expected violations");
        };
        assert_eq!(v.for_field(Field::Amount).unwrap().constraint, Constraint::Decimal);
        assert_eq!(v.for_field(Field::Fee).unwrap().constraint, Constraint::Min);
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let rules = usd_rules(10_000);
        let check = |amount: &str| {
            rules
                .rule(Field::Amount)
                .check(amount, &validator())
        };
        assert_eq!(check("0.01"), None);
        assert_eq!(check("100"), None);
        assert_eq!(check("100.01"), Some(Constraint::Max));
        assert_eq!(check("0"), Some(Constraint::Min));
        assert_eq!(check("0.00"), Some(Constraint::Min));
    }

    #[test]
    fn stale_rule_set_is_refused() {
        let rules = usd_rules(10_000);
        let form = TransferForm::new(recipient(), "1", "0.001");
        assert!(matches!(
            rules.evaluate(&form, &Currency::eur(), &validator()),
            Err(RuleError::StaleRuleSet { .. })
        ));
    }

    #[test]
    fn decimal_pattern_matches_original_grammar() {
        for ok in ["1", "-1", "1.", "1.25", ".5", ".", "0.00"] {
            assert!(matches_decimal_pattern(ok, 2), "{ok:?} should match");
        }
        for bad in ["1.255", "-", "-.5", "1,5", "1e3", "--1", "1.2.3", "+1"] {
            assert!(!matches_decimal_pattern(bad, 2), "{bad:?} should not match");
        }
    }
}
