//! Transaction construction from a filled-in transfer form.
//!
//! The [`TransactionBuilder`] turns the three raw form strings into an
//! unsigned [`Transaction`], re-checking everything that matters for
//! correctness even when the caller already ran the rule set. Checks run
//! in a fixed order and the first failure is returned:
//!
//! 1. recipient address (after stripping the optional prefix)
//! 2. amount parses and is positive
//! 3. fee parses as native currency
//! 4. fee is at least the network minimum
//! 5. balances are in the right currencies
//! 6. amount does not exceed the available balance
//! 7. the native balance covers the fee, plus the amount for native payments
//! 8. attachment fits
//!
//! The builder does not sign. Signing happens in the broadcast
//! collaborator, see [`super::broadcast`].

use chrono::Utc;
use tracing::debug;

use super::error::TransferError;
use super::types::{BuiltTransaction, Confirmation, Transaction, TransactionKind};
use crate::config::{NetworkParams, MAX_ATTACHMENT_BYTES};
use crate::crypto::decode_base58;
use crate::identity::{cleanup_optional_prefix, Account, Address, AddressValidator};
use crate::money::{Currency, Money, MoneyError};
use crate::validation::{Field, TransferForm};
use crate::wallet::AccountBalances;

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Builds validated, unsigned transactions.
///
/// # Usage
///
/// ```rust
/// use waves_lite_core::config::NetworkParams;
/// use waves_lite_core::identity::{Account, ChecksumAddressValidator};
/// use waves_lite_core::money::{Currency, Money};
/// use waves_lite_core::transaction::TransactionBuilder;
/// use waves_lite_core::validation::TransferForm;
/// use waves_lite_core::wallet::AccountBalances;
///
/// let params = NetworkParams::default();
/// let validator = ChecksumAddressValidator::new(params.network_byte);
/// let sender = Account::generate(params.network_byte);
/// let recipient = Account::generate(params.network_byte);
///
/// let form = TransferForm::new(recipient.address().to_base58(), "1", "0.001");
/// let balances = AccountBalances::native_only(Money::from_coins(200_000_000, &Currency::wav()));
///
/// let built = TransactionBuilder::new(&params, &validator)
///     .build_payment(&form, &Currency::wav(), &sender, &balances)
///     .unwrap();
/// assert_eq!(built.transaction.amount().coins(), 100_000_000);
/// ```
///
/// The timestamp defaults to the current UTC time at build and can be
/// pinned with [`TransactionBuilder::timestamp`].
pub struct TransactionBuilder<'a> {
    params: &'a NetworkParams,
    validator: &'a dyn AddressValidator,
    timestamp: Option<i64>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(params: &'a NetworkParams, validator: &'a dyn AddressValidator) -> Self {
        Self {
            params,
            validator,
            timestamp: None,
        }
    }

    /// Sets the timestamp explicitly (Unix milliseconds).
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build a payment in `currency`.
    ///
    /// A native payment is a type 2 transaction. The payment layout cannot
    /// name an asset, so a payment in any other currency is built as an
    /// asset transfer with an empty attachment.
    pub fn build_payment(
        &self,
        form: &TransferForm,
        currency: &Currency,
        sender: &Account,
        balances: &AccountBalances,
    ) -> Result<BuiltTransaction, TransferError> {
        let kind = if currency.is_native() {
            TransactionKind::Payment
        } else {
            TransactionKind::AssetTransfer
        };
        self.build(kind, form, currency, &[], sender, balances)
    }

    /// Build an asset transfer carrying `attachment`.
    pub fn build_asset_transfer(
        &self,
        form: &TransferForm,
        currency: &Currency,
        attachment: &[u8],
        sender: &Account,
        balances: &AccountBalances,
    ) -> Result<BuiltTransaction, TransferError> {
        self.build(
            TransactionKind::AssetTransfer,
            form,
            currency,
            attachment,
            sender,
            balances,
        )
    }

    fn build(
        &self,
        kind: TransactionKind,
        form: &TransferForm,
        currency: &Currency,
        attachment: &[u8],
        sender: &Account,
        balances: &AccountBalances,
    ) -> Result<BuiltTransaction, TransferError> {
        let recipient = self.recipient(&form.recipient)?;

        let amount = Money::from_tokens(&form.amount, currency).map_err(|source| {
            TransferError::InvalidAmount {
                field: Field::Amount,
                source,
            }
        })?;
        if !amount.is_positive() {
            return Err(TransferError::InvalidAmount {
                field: Field::Amount,
                source: MoneyError::invalid_amount(form.amount.as_str(), "must be positive"),
            });
        }
        if kind == TransactionKind::Payment
            && amount
                .less_than(&self.params.minimum_payment)
                .map_err(TransferError::CurrencyMismatch)?
        {
            return Err(TransferError::InvalidAmount {
                field: Field::Amount,
                source: MoneyError::invalid_amount(
                    form.amount.as_str(),
                    format!(
                        "below the minimum payment {}",
                        self.params.minimum_payment.format_amount(true)
                    ),
                ),
            });
        }

        let native = Currency::wav();
        let fee = Money::from_tokens(&form.fee, &native).map_err(|source| {
            TransferError::InvalidAmount {
                field: Field::Fee,
                source,
            }
        })?;
        if fee
            .less_than(&self.params.minimum_fee)
            .map_err(TransferError::CurrencyMismatch)?
        {
            return Err(TransferError::FeeBelowMinimum {
                fee: fee.format_amount(true),
                minimum: self.params.minimum_fee.format_amount(true),
            });
        }

        if balances.available.currency() != currency {
            return Err(TransferError::CurrencyMismatch(MoneyError::CurrencyMismatch {
                left: currency.display_name().to_string(),
                right: balances.available.currency().display_name().to_string(),
            }));
        }
        if !balances.native.currency().is_native() {
            return Err(TransferError::CurrencyMismatch(MoneyError::CurrencyMismatch {
                left: native.display_name().to_string(),
                right: balances.native.currency().display_name().to_string(),
            }));
        }

        if amount
            .greater_than(&balances.available)
            .map_err(TransferError::CurrencyMismatch)?
        {
            return Err(TransferError::AmountExceedsBalance {
                amount: amount.format_amount(true),
                available: balances.available.format_amount(true),
            });
        }

        // Native amounts share the fee's balance, so the two are checked together.
        let fee_draw = if currency.is_native() {
            amount.checked_add(&fee).map_err(|source| TransferError::InvalidAmount {
                field: Field::Amount,
                source,
            })?
        } else {
            fee.clone()
        };
        if fee_draw
            .greater_than(&balances.native)
            .map_err(TransferError::CurrencyMismatch)?
        {
            return Err(TransferError::InsufficientFeeFunds {
                fee: fee.format_amount(true),
                available: balances.native.format_amount(true),
            });
        }

        if attachment.len() > MAX_ATTACHMENT_BYTES {
            return Err(TransferError::AttachmentTooLong {
                length: attachment.len(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }

        let asset_id = match currency.id() {
            Some(id) => Some(decode_base58(id).map_err(|_| TransferError::InvalidAmount {
                field: Field::Amount,
                source: MoneyError::InvalidAssetId(id.to_string()),
            })?),
            None => None,
        };

        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let transaction = Transaction::new(
            kind,
            amount,
            fee,
            recipient,
            timestamp,
            *sender.address(),
            *sender.public_key(),
            attachment.to_vec(),
            asset_id,
        );
        let confirmation = Confirmation::for_transaction(&transaction);

        debug!(
            kind = %kind,
            id = %transaction.id(),
            amount = %confirmation.amount,
            fee = %confirmation.fee,
            "transaction built"
        );

        Ok(BuiltTransaction {
            transaction,
            confirmation,
        })
    }

    fn recipient(&self, raw: &str) -> Result<Address, TransferError> {
        let cleaned = cleanup_optional_prefix(raw);
        if !self.validator.validate_address(cleaned) {
            return Err(TransferError::InvalidRecipient(raw.to_string()));
        }
        Address::parse(cleaned, self.params.network_byte)
            .map_err(|_| TransferError::InvalidRecipient(raw.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ChecksumAddressValidator;

    const TS: i64 = 1_700_000_000_000;

    struct Fixture {
        params: NetworkParams,
        validator: ChecksumAddressValidator,
        sender: Account,
        recipient: String,
    }

    impl Fixture {
        fn new() -> Self {
            let params = NetworkParams::default();
            let validator = ChecksumAddressValidator::new(params.network_byte);
            let sender = Account::generate(params.network_byte);
            let recipient = Account::generate(params.network_byte).address().to_base58();
            Self {
                params,
                validator,
                sender,
                recipient,
            }
        }

        fn builder(&self) -> TransactionBuilder<'_> {
            TransactionBuilder::new(&self.params, &self.validator).timestamp(TS)
        }

        fn form(&self, amount: &str, fee: &str) -> TransferForm {
            TransferForm::new(self.recipient.clone(), amount, fee)
        }
    }

    fn wav(coins: i64) -> Money {
        Money::from_coins(coins, &Currency::wav())
    }

    fn usd_balances(cents: i64, native_coins: i64) -> AccountBalances {
        AccountBalances {
            available: Money::from_coins(cents, &Currency::usd()),
            native: wav(native_coins),
        }
    }

    #[test]
    fn native_payment_happy_path() {
        let fx = Fixture::new();
        let built = fx
            .builder()
            .build_payment(
                &fx.form("1", "0.001"),
                &Currency::wav(),
                &fx.sender,
                &AccountBalances::native_only(wav(200_000_000)),
            )
            .unwrap();

        let tx = &built.transaction;
        assert_eq!(tx.kind(), TransactionKind::Payment);
        assert_eq!(tx.amount().coins(), 100_000_000);
        assert_eq!(tx.fee().coins(), 100_000);
        assert_eq!(tx.timestamp(), TS);
        assert_eq!(tx.recipient().to_base58(), fx.recipient);
        assert_eq!(tx.sender_address(), fx.sender.address());
        assert_eq!(built.confirmation.amount, "1.00000000 WAVES");
    }

    #[test]
    fn prefixed_recipient_is_normalised() {
        let fx = Fixture::new();
        let form = TransferForm::new(format!("1W{}", fx.recipient), "1", "0.001");
        let built = fx
            .builder()
            .build_payment(
                &form,
                &Currency::wav(),
                &fx.sender,
                &AccountBalances::native_only(wav(200_000_000)),
            )
            .unwrap();
        assert_eq!(built.confirmation.recipient, fx.recipient);
    }

    #[test]
    fn invalid_recipient_is_first() {
        let fx = Fixture::new();
        let form = TransferForm::new("not-an-address", "garbage", "garbage");
        let err = fx
            .builder()
            .build_payment(&form, &Currency::wav(), &fx.sender, &AccountBalances::native_only(wav(0)))
            .unwrap_err();
        assert_eq!(err, TransferError::InvalidRecipient("not-an-address".into()));
        assert_eq!(err.field(), Some(Field::Recipient));
    }

    #[test]
    fn non_positive_amount_is_invalid() {
        let fx = Fixture::new();
        for amount in ["0", "-1", "abc"] {
            let err = fx
                .builder()
                .build_payment(
                    &fx.form(amount, "0.001"),
                    &Currency::wav(),
                    &fx.sender,
                    &AccountBalances::native_only(wav(1_000_000_000)),
                )
                .unwrap_err();
            assert_eq!(err.field(), Some(Field::Amount), "amount {amount:?}");
        }
    }

    #[test]
    fn fee_precision_is_native() {
        let fx = Fixture::new();
        // Nine fractional digits: one more than the native precision.
        let err = fx
            .builder()
            .build_asset_transfer(
                &fx.form("1", "0.001000001"),
                &Currency::usd(),
                b"",
                &fx.sender,
                &usd_balances(10_000, 1_000_000),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::InvalidAmount {
                field: Field::Fee,
                ..
            }
        ));
    }

    #[test]
    fn fee_minimum_boundary() {
        let fx = Fixture::new();
        let balances = AccountBalances::native_only(wav(1_000_000_000));
        let build = |fee: &str| {
            fx.builder()
                .build_payment(&fx.form("1", fee), &Currency::wav(), &fx.sender, &balances)
        };
        assert!(build("0.001").is_ok());
        assert!(build("0.00100001").is_ok());
        assert!(matches!(
            build("0.00099999"),
            Err(TransferError::FeeBelowMinimum { .. })
        ));
    }

    #[test]
    fn amount_balance_boundary() {
        let fx = Fixture::new();
        let build = |amount: &str| {
            fx.builder().build_asset_transfer(
                &fx.form(amount, "0.001"),
                &Currency::usd(),
                b"",
                &fx.sender,
                &usd_balances(10_000, 1_000_000),
            )
        };
        assert!(build("99.99").is_ok());
        assert!(build("100").is_ok());
        assert!(matches!(
            build("100.01"),
            Err(TransferError::AmountExceedsBalance { .. })
        ));
    }

    #[test]
    fn native_payment_covers_amount_plus_fee() {
        let fx = Fixture::new();
        // 2 WAVES plus the 0.001 fee is 200_100_000 coins.
        let build = |balance: i64| {
            fx.builder().build_payment(
                &fx.form("2", "0.001"),
                &Currency::wav(),
                &fx.sender,
                &AccountBalances::native_only(wav(balance)),
            )
        };
        assert!(build(200_100_001).is_ok());
        assert!(build(200_100_000).is_ok());
        let err = build(200_099_999).unwrap_err();
        assert!(matches!(err, TransferError::InsufficientFeeFunds { .. }));
        assert_eq!(err.field(), Some(Field::Fee));

        // The whole balance as amount leaves nothing for the fee.
        assert!(matches!(
            build(200_000_000),
            Err(TransferError::InsufficientFeeFunds { .. })
        ));
    }

    #[test]
    fn native_fee_larger_than_balance_is_refused() {
        let fx = Fixture::new();
        assert!(matches!(
            fx.builder().build_payment(
                &fx.form("0.00000001", "1"),
                &Currency::wav(),
                &fx.sender,
                &AccountBalances::native_only(wav(50_000_000)),
            ),
            Err(TransferError::InsufficientFeeFunds { .. })
        ));
    }

    #[test]
    fn asset_transfer_needs_native_fee_funds() {
        let fx = Fixture::new();
        let build = |native: i64| {
            fx.builder().build_asset_transfer(
                &fx.form("1", "0.001"),
                &Currency::usd(),
                b"",
                &fx.sender,
                &usd_balances(10_000, native),
            )
        };
        assert!(build(100_000).is_ok());
        assert!(matches!(
            build(99_999),
            Err(TransferError::InsufficientFeeFunds { .. })
        ));
    }

    #[test]
    fn non_native_payment_checks_fee_funds_and_carries_asset() {
        let fx = Fixture::new();
        let err = fx
            .builder()
            .build_payment(
                &fx.form("1", "0.001"),
                &Currency::eur(),
                &fx.sender,
                &AccountBalances {
                    available: Money::from_coins(500, &Currency::eur()),
                    native: wav(0),
                },
            )
            .unwrap_err();
        assert_eq!(err.field(), Some(Field::Fee));

        let built = fx
            .builder()
            .build_payment(
                &fx.form("1", "0.001"),
                &Currency::eur(),
                &fx.sender,
                &AccountBalances {
                    available: Money::from_coins(500, &Currency::eur()),
                    native: wav(100_000),
                },
            )
            .unwrap();
        assert_eq!(built.transaction.kind(), TransactionKind::AssetTransfer);
        assert_eq!(
            built.transaction.asset_id().as_deref(),
            Currency::eur().id()
        );
    }

    #[test]
    fn balances_in_wrong_currency_are_refused() {
        let fx = Fixture::new();
        let err = fx
            .builder()
            .build_asset_transfer(
                &fx.form("1", "0.001"),
                &Currency::usd(),
                b"",
                &fx.sender,
                &AccountBalances {
                    available: Money::from_coins(10_000, &Currency::eur()),
                    native: wav(1_000_000),
                },
            )
            .unwrap_err();
        assert!(matches!(err, TransferError::CurrencyMismatch(_)));
    }

    #[test]
    fn attachment_limit() {
        let fx = Fixture::new();
        let build = |len: usize| {
            fx.builder().build_asset_transfer(
                &fx.form("1", "0.001"),
                &Currency::usd(),
                &vec![b'x'; len],
                &fx.sender,
                &usd_balances(10_000, 1_000_000),
            )
        };
        assert!(build(MAX_ATTACHMENT_BYTES).is_ok());
        assert_eq!(
            build(MAX_ATTACHMENT_BYTES + 1).unwrap_err(),
            TransferError::AttachmentTooLong {
                length: 141,
                max: 140
            }
        );
    }

    #[test]
    fn default_timestamp_is_now() {
        let fx = Fixture::new();
        let before = Utc::now().timestamp_millis();
        let built = TransactionBuilder::new(&fx.params, &fx.validator)
            .build_payment(
                &fx.form("1", "0.001"),
                &Currency::wav(),
                &fx.sender,
                &AccountBalances::native_only(wav(200_000_000)),
            )
            .unwrap();
        let after = Utc::now().timestamp_millis();
        assert!(built.transaction.timestamp() >= before);
        assert!(built.transaction.timestamp() <= after);
    }
}
