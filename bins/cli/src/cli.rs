//! Command-line arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use fairshare_shared::{Currency, ExpenseId, MemberId};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "fairshare")]
#[command(about = "Split shared expenses and work out who pays whom")]
#[command(version)]
pub struct Cli {
    /// Group snapshot file (JSON).
    #[arg(long, short = 's', env = "FAIRSHARE_SNAPSHOT", default_value = "group.json")]
    pub snapshot: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record an expense and split it equally across the group.
    Allocate(AllocateArgs),
    /// Show balances, settle-up transfers and an optional converted view.
    Report(ReportArgs),
    /// List the transfers that would settle the group.
    Settle(SettleArgs),
    /// Mark one member's share of an expense as paid.
    Pay(PayArgs),
    /// Delete an expense together with its shares.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Member who paid.
    #[arg(long)]
    pub payer: MemberId,
    /// Amount in major units, e.g. `10.00`.
    #[arg(long)]
    pub amount: Decimal,
    /// Currency code; defaults to the group's currency.
    #[arg(long, value_parser = parse_currency)]
    pub currency: Option<Currency>,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Expense id; defaults to the next free id.
    #[arg(long)]
    pub id: Option<ExpenseId>,
    /// When the money was spent (RFC 3339); defaults to now.
    #[arg(long)]
    pub spent_on: Option<DateTime<Utc>>,
    /// Print the shares without writing the snapshot.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Also show balances in this currency.
    #[arg(long, short = 't', value_parser = parse_currency)]
    pub target: Option<Currency>,
    #[command(flatten)]
    pub rates: RateSourceArgs,
}

#[derive(Args, Debug)]
pub struct RateSourceArgs {
    /// Never contact the rate provider.
    #[arg(long)]
    pub offline: bool,
    /// Fixed rates instead of the provider, e.g. `USD/EUR=0.92,GBP/USD=1.27`.
    #[arg(long, env = "FAIRSHARE_FIXED_RATES")]
    pub rates: Option<String>,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    /// Print JSON instead of one transfer per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PayArgs {
    #[arg(long)]
    pub expense: ExpenseId,
    #[arg(long)]
    pub member: MemberId,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[arg(long)]
    pub expense: ExpenseId,
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::new(raw).map_err(|e| e.to_string())
}
