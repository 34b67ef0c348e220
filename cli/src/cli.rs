//! # CLI Interface
//!
//! Command-line arguments for `waves-lite`, via `clap` derive. Every
//! subcommand works offline: balances are supplied on the command line and
//! transactions are printed, not sent.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use waves_lite_core::config::DEFAULT_FEE_AMOUNT;

/// Waves lite wallet.
///
/// Generates accounts, checks and builds payments and asset transfers, and
/// prints authorised payment gateway form links.
#[derive(Parser, Debug)]
#[command(
    name = "waves-lite",
    about = "Waves lite wallet core tools",
    version,
    propagate_version = true
)]
pub struct WavesLiteCli {
    /// Path to a JSON settings file. Built-in devnet settings when omitted.
    #[arg(long, short = 'c', global = true, env = "WAVES_LITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "WAVES_LITE_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "WAVES_LITE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh account and print its address and keys.
    Keygen,
    /// Parse an amount in a currency and print it normalised.
    Format(FormatArgs),
    /// Check and build a payment in any supported currency.
    Payment(TransferArgs),
    /// Check and build an asset transfer with an optional attachment.
    Transfer(AssetTransferArgs),
    /// Print an authorised payment gateway form URL.
    Gateway(GatewayArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Amount in tokens, e.g. `10.05`.
    pub amount: String,

    /// Currency symbol (WAVES, BTC, USD, EUR, CNY).
    #[arg(long, default_value = "WAVES")]
    pub currency: String,
}

/// Sender key shared by every subcommand that acts for an account.
#[derive(Args, Debug)]
pub struct SenderArgs {
    /// Base-58 private key of the sending account.
    ///
    /// Prefer the environment variable over the flag; shell history keeps flags.
    #[arg(long, env = "WAVES_LITE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    #[command(flatten)]
    pub sender: SenderArgs,

    /// Recipient address, with or without the `1W` prefix.
    #[arg(long)]
    pub recipient: String,

    /// Amount in tokens of `--currency`.
    #[arg(long)]
    pub amount: String,

    /// Fee in WAVES.
    #[arg(long, default_value = DEFAULT_FEE_AMOUNT)]
    pub fee: String,

    /// Currency symbol of the amount.
    #[arg(long, default_value = "WAVES")]
    pub currency: String,

    /// Available balance of `--currency`, in tokens.
    #[arg(long)]
    pub balance: String,

    /// Available WAVES balance for the fee. Required for non-WAVES currencies.
    #[arg(long)]
    pub fee_balance: Option<String>,

    /// Transaction timestamp in milliseconds; the current time when omitted.
    #[arg(long)]
    pub timestamp: Option<i64>,
}

#[derive(Args, Debug)]
pub struct AssetTransferArgs {
    #[command(flatten)]
    pub transfer: TransferArgs,

    /// UTF-8 attachment, at most 140 bytes.
    #[arg(long, default_value = "")]
    pub attachment: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Withdraw,
    Details,
}

#[derive(Args, Debug)]
pub struct GatewayArgs {
    #[command(flatten)]
    pub sender: SenderArgs,

    /// Currency symbol of the gateway-backed asset.
    #[arg(long)]
    pub currency: String,

    /// Which gateway form to open.
    #[arg(long, value_enum, default_value_t = FormKind::Withdraw)]
    pub form: FormKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        WavesLiteCli::command().debug_assert();
    }

    #[test]
    fn payment_defaults_to_native_fee() {
        let cli = WavesLiteCli::parse_from([
            "waves-lite",
            "payment",
            "--private-key",
            "abc",
            "--recipient",
            "r",
            "--amount",
            "1",
            "--balance",
            "2",
        ]);
        let Commands::Payment(args) = cli.command else {
            panic!("expected payment");
        };
        assert_eq!(args.fee, DEFAULT_FEE_AMOUNT);
        assert_eq!(args.currency, "WAVES");
        assert!(args.fee_balance.is_none());
    }

    #[test]
    fn gateway_form_parses() {
        let cli = WavesLiteCli::parse_from([
            "waves-lite",
            "gateway",
            "--private-key",
            "abc",
            "--currency",
            "USD",
            "--form",
            "details",
        ]);
        let Commands::Gateway(args) = cli.command else {
            panic!("expected gateway");
        };
        assert_eq!(args.form, FormKind::Details);
    }
}
