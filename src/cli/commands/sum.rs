use super::{build_demo_wallet, resolve_workers};
use crate::cli::DemoOptions;
use crate::core::{AggregationConfig, MergeMode, Money};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SumReport {
    payments: usize,
    workers: usize,
    merge_mode: MergeMode,
    total: Money,
    elapsed_ms: u64,
}

/// Sum every payment in the synthetic ledger
pub async fn execute_sum(options: &DemoOptions) -> Result<()> {
    let wallet = build_demo_wallet(options)?;
    let workers = resolve_workers(options, &wallet);

    let start_time = std::time::Instant::now();
    let total = wallet.sum_payments(workers).await?;

    let report = SumReport {
        payments: options.payments,
        workers,
        merge_mode: wallet.engine().config().merge_mode(),
        total,
        elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("💰 合計: {}", report.total);
        println!(
            "📊 支払い件数: {} / ワーカー数: {} / 合流方式: {}",
            report.payments, report.workers, report.merge_mode
        );
        println!("⏱️  処理時間: {} ms", report.elapsed_ms);
    }

    Ok(())
}
