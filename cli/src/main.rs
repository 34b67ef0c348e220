// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Waves Lite CLI
//!
//! Entry point for the `waves-lite` binary. Loads settings, initializes
//! logging, and runs one offline wallet operation:
//!
//! - `keygen`: new account
//! - `format`: normalise an amount
//! - `payment` / `transfer`: check the form, build the transaction
//! - `gateway`: authorised gateway form URL
//! - `version`: build version

mod cli;
mod logging;

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use waves_lite_core::config::{network_name, NetworkParams, Settings};
use waves_lite_core::crypto::PrivateKey;
use waves_lite_core::gateway::{Gateway, GatewayForm, GatewayRequest};
use waves_lite_core::identity::{Account, ChecksumAddressValidator};
use waves_lite_core::money::{Currency, Money};
use waves_lite_core::transaction::{BuiltTransaction, TransactionBuilder};
use waves_lite_core::validation::{derive_rules, RuleError, TransferForm};
use waves_lite_core::wallet::{AccountBalances, WalletBook};

use cli::{Commands, FormKind, TransferArgs, WavesLiteCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = WavesLiteCli::parse();
    logging::init_logging(&cli.log_level, LogFormat::from_str_lossy(&cli.log_format));

    let params = load_params(cli.config.as_deref())?;
    tracing::debug!(
        network = %network_name(params.network_byte),
        gateway = %params.gateway_url,
        "settings resolved"
    );

    match cli.command {
        Commands::Keygen => keygen(&params),
        Commands::Format(args) => {
            let currency = currency(&args.currency)?;
            let money = Money::from_tokens(&args.amount, &currency).with_context(|| {
                format!("cannot parse {:?} as {}", args.amount, currency.symbol())
            })?;
            println!("{}", money.format_amount(true));
            Ok(())
        }
        Commands::Payment(args) => {
            let built = build(&params, &args, None)?;
            print_built(&built)
        }
        Commands::Transfer(args) => {
            let built = build(&params, &args.transfer, Some(args.attachment.as_bytes()))?;
            print_built(&built)
        }
        Commands::Gateway(args) => {
            let account = account(&args.sender.private_key, &params)?;
            let currency = currency(&args.currency)?;
            let form = match args.form {
                FormKind::Withdraw => GatewayForm::Withdraw,
                FormKind::Details => GatewayForm::Details,
            };
            let url = Gateway::from_params(&params).form_url(GatewayRequest {
                form,
                currency: &currency,
                account: &account,
            })?;
            println!("{url}");
            Ok(())
        }
        Commands::Version => {
            println!(
                "waves-lite {} ({})",
                env!("CARGO_PKG_VERSION"),
                network_name(params.network_byte)
            );
            Ok(())
        }
    }
}

/// Reads and resolves the settings file, or the built-in defaults.
fn load_params(path: Option<&Path>) -> Result<NetworkParams> {
    let settings = match path {
        None => Settings::default(),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse settings file {}", path.display()))?
        }
    };
    settings.resolve().context("invalid settings")
}

fn currency(code: &str) -> Result<Currency> {
    Currency::from_code(code).ok_or_else(|| anyhow!("unknown currency {code:?}"))
}

fn account(private_key: &str, params: &NetworkParams) -> Result<Account> {
    let key = PrivateKey::from_base58(private_key).context("invalid private key")?;
    Ok(Account::from_private_key(key, params.network_byte))
}

fn keygen(params: &NetworkParams) -> Result<()> {
    let account = Account::generate(params.network_byte);
    tracing::info!(address = %account.address(), "account generated");
    // The private key goes to stdout only; it never reaches the log.
    println!("address:     {}", account.address());
    println!("public key:  {}", account.public_key().to_base58());
    println!(
        "private key: {}",
        waves_lite_core::crypto::encode_base58(account.private_key().as_bytes())
    );
    Ok(())
}

/// Loads the supplied balances into a wallet book for `currency`.
fn balances(args: &TransferArgs, currency: &Currency) -> Result<AccountBalances> {
    let native = Currency::wav();
    let mut book = WalletBook::new();

    let available = Money::from_tokens(&args.balance, currency)
        .with_context(|| format!("invalid balance {:?}", args.balance))?;
    if currency.is_native() {
        if args.fee_balance.is_some() {
            bail!("--fee-balance only applies to non-WAVES currencies");
        }
        book.apply_native_balance(available.coins());
    } else {
        let Some(fee_balance) = &args.fee_balance else {
            bail!("--fee-balance is required when sending {}", currency.symbol());
        };
        let fee_balance = Money::from_tokens(fee_balance, &native)
            .with_context(|| format!("invalid fee balance {fee_balance:?}"))?;
        book.apply_native_balance(fee_balance.coins());
        if let Some(id) = currency.id() {
            book.apply_asset_balances(&[(id, available.coins())]);
        }
    }
    Ok(book.balances_for(currency)?)
}

/// Runs the rule set over the form, then builds the transaction.
fn build(
    params: &NetworkParams,
    args: &TransferArgs,
    attachment: Option<&[u8]>,
) -> Result<BuiltTransaction> {
    let sender = account(&args.sender.private_key, params)?;
    let currency = currency(&args.currency)?;
    let balances = balances(args, &currency)?;
    let validator = ChecksumAddressValidator::new(params.network_byte);
    let form = TransferForm::new(args.recipient.clone(), args.amount.clone(), args.fee.clone());

    let rules = derive_rules(&currency, &balances.available, &params.minimum_fee)?;
    match rules.evaluate(&form, &currency, &validator) {
        Ok(()) => {}
        Err(RuleError::Invalid(violations)) => {
            for v in violations.iter() {
                eprintln!("{}: {}", v.field, v.message);
            }
            bail!("{} field(s) failed validation", violations.len());
        }
        Err(other) => return Err(other.into()),
    }

    let mut builder = TransactionBuilder::new(params, &validator);
    if let Some(timestamp) = args.timestamp {
        builder = builder.timestamp(timestamp);
    }
    let built = match attachment {
        None => builder.build_payment(&form, &currency, &sender, &balances)?,
        Some(attachment) => {
            builder.build_asset_transfer(&form, &currency, attachment, &sender, &balances)?
        }
    };
    tracing::info!(id = %built.transaction.id(), kind = %built.transaction.kind(), "transaction ready");
    Ok(built)
}

fn print_built(built: &BuiltTransaction) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(built).context("failed to serialise transaction")?
    );
    Ok(())
}
