//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use fairshare_core::{CurrencyConverter, Expense, Ledger, NoRates, SettlementOptions, SettlementService};
use fairshare_rates::{CachedConverter, FixedRates, HttpRateClient};
use fairshare_shared::{AppConfig, Currency, Money};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{AllocateArgs, PayArgs, RateSourceArgs, RemoveArgs, ReportArgs, SettleArgs};
use crate::snapshot::GroupSnapshot;

/// Picks the rate source for a report.
pub fn build_converter(args: &RateSourceArgs, config: &AppConfig) -> anyhow::Result<Arc<dyn CurrencyConverter>> {
    if let Some(table) = &args.rates {
        let rates: FixedRates = table.parse().context("parsing --rates")?;
        info!(pairs = rates.len(), "Using fixed exchange rates");
        return Ok(Arc::new(rates));
    }
    if args.offline {
        info!("Offline: reports stay in base currency");
        return Ok(Arc::new(NoRates));
    }

    let client = HttpRateClient::new(&config.rates)?;
    info!(endpoint = %client.endpoint(), "Using live exchange rates");
    Ok(Arc::new(CachedConverter::from_config(client, &config.rates)))
}

fn service(converter: Arc<dyn CurrencyConverter>, config: &AppConfig) -> SettlementService {
    SettlementService::new(converter, SettlementOptions::from(&config.settlement))
}

pub fn allocate(path: &Path, args: AllocateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut snapshot = GroupSnapshot::load(path)?;

    let currency = match args.currency.or(snapshot.currency) {
        Some(currency) => currency,
        None => Currency::new(&config.settlement.default_currency)
            .context("settlement.default_currency")?,
    };
    let expense = Expense::new(
        args.id.unwrap_or_else(|| snapshot.next_expense_id()),
        snapshot.group_id,
        args.payer,
        Money::from_major(args.amount, currency)?,
        args.description,
        args.spent_on.unwrap_or_else(Utc::now),
    )?;
    snapshot.admit(&expense)?;

    let shares = service(Arc::new(NoRates), config).record_expense(&expense, &snapshot.sorted_members())?;
    println!("{}", serde_json::to_string_pretty(&shares)?);

    if args.dry_run {
        return Ok(());
    }
    snapshot.push_expense(expense, shares)?;
    snapshot.save(path)
}

pub async fn report(path: &Path, args: &ReportArgs, config: &AppConfig) -> anyhow::Result<()> {
    let snapshot = GroupSnapshot::load(path)?;
    let service = service(build_converter(&args.rates, config)?, config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; finishing report without conversion");
            on_interrupt.cancel();
        }
    });

    let report = service
        .get_group_report_with_cancel(&snapshot.shares, &snapshot.expense_map(), args.target, &cancel)
        .await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn settle(path: &Path, args: &SettleArgs, config: &AppConfig) -> anyhow::Result<()> {
    let snapshot = GroupSnapshot::load(path)?;
    let service = service(Arc::new(NoRates), config);

    let balances = service.compute_balances(&snapshot.shares, &snapshot.expense_map())?;
    let transfers = service.suggest_settlements(&balances)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&transfers)?);
        return Ok(());
    }
    println!("Balances:");
    for (member, balance) in &balances {
        println!("  {member}: {balance}");
    }
    if transfers.is_empty() {
        println!("All settled up.");
        return Ok(());
    }
    println!("Transfers:");
    for transfer in &transfers {
        println!("  {transfer}");
    }

    let open = Ledger::apply_transfers(&balances, &transfers)?
        .into_values()
        .filter(|balance| !balance.is_zero())
        .count();
    if open > 0 {
        warn!(open, "Suggested transfers leave balances open");
    }
    Ok(())
}

pub fn pay(path: &Path, args: &PayArgs) -> anyhow::Result<()> {
    let mut snapshot = GroupSnapshot::load(path)?;
    let share = snapshot.mark_paid(args.expense, args.member)?;
    info!(expense_id = %args.expense, member_id = %args.member, amount = %share.amount(), "Marked share paid");
    snapshot.save(path)
}

pub fn remove(path: &Path, args: &RemoveArgs) -> anyhow::Result<()> {
    let mut snapshot = GroupSnapshot::load(path)?;
    let (expense, shares) = snapshot.remove_expense(args.expense)?;
    info!(expense_id = %expense.id, amount = %expense.amount, shares = shares.len(), "Removed expense");
    snapshot.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const GROUP: &str = r#"{
        "group_id": 1,
        "currency": "USD",
        "members": [1, 2],
        "expenses": [{
            "id": 1,
            "group_id": 1,
            "payer_id": 1,
            "amount": { "minor_units": 1000, "currency": "USD" },
            "description": "Dinner",
            "spent_on": "2026-03-14T19:30:00Z"
        }],
        "shares": [
            { "expense_id": 1, "member_id": 1, "amount": { "minor_units": 500, "currency": "USD" }, "settled": true },
            { "expense_id": 1, "member_id": 2, "amount": { "minor_units": 500, "currency": "USD" }, "settled": false }
        ]
    }"#;

    fn group_file(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("fairshare-{}-{name}.json", std::process::id()));
        std::fs::write(&path, GROUP).unwrap();
        path
    }

    fn allocate_args(currency: Currency) -> AllocateArgs {
        AllocateArgs {
            payer: fairshare_shared::MemberId(2),
            amount: Decimal::new(500, 2),
            currency: Some(currency),
            description: "Museum".to_string(),
            id: None,
            spent_on: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_allocate_rejects_other_currency() {
        let path = group_file("foreign");

        let result = allocate(&path, allocate_args(Currency::EUR), &AppConfig::default());

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), GROUP);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_allocate_then_remove() {
        let path = group_file("round-trip");

        allocate(&path, allocate_args(Currency::USD), &AppConfig::default()).unwrap();
        let snapshot = GroupSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.expenses.len(), 2);
        assert_eq!(snapshot.shares.len(), 4);

        remove(&path, &RemoveArgs { expense: fairshare_shared::ExpenseId(2) }).unwrap();
        let snapshot = GroupSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.shares.len(), 2);
        std::fs::remove_file(path).unwrap();
    }
}
