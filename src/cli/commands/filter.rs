use super::{build_demo_wallet, resolve_workers};
use crate::cli::DemoOptions;
use crate::core::{AccountId, Money, Payment};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FilterReport {
    account_id: AccountId,
    workers: usize,
    matched: usize,
    total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    payments: Option<Vec<Payment>>,
}

/// List the payments of one account in the synthetic ledger
pub async fn execute_filter(options: &DemoOptions, account_id: AccountId, list: bool) -> Result<()> {
    let wallet = build_demo_wallet(options)?;
    let workers = resolve_workers(options, &wallet);

    let payments = wallet.filter_payments(account_id, workers).await?;

    let report = FilterReport {
        account_id,
        workers,
        matched: payments.len(),
        total: payments.iter().map(|payment| payment.amount).sum(),
        payments: list.then_some(payments),
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "🔍 口座 {} の支払い: {} 件 (合計 {})",
        report.account_id, report.matched, report.total
    );
    if let Some(payments) = &report.payments {
        for payment in payments {
            println!(
                "   - {} {} {} {}",
                payment.id, payment.amount, payment.category, payment.status
            );
        }
    }

    Ok(())
}
