use super::build_demo_wallet;
use crate::cli::DemoOptions;
use crate::core::{Money, ProgressEvent};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ProgressReport {
    blocks: usize,
    total: Money,
    events: Vec<ProgressEvent>,
}

/// Stream per-block partial sums of the synthetic ledger
pub async fn execute_progress(options: &DemoOptions, block_size: usize) -> Result<()> {
    let wallet = build_demo_wallet(options)?;

    let mut stream = wallet.stream_payments_progress(block_size).await?;
    let blocks = stream.expected_events();
    let mut events = Vec::with_capacity(blocks);
    let mut total = Money::ZERO;

    while let Some(event) = stream.recv().await {
        if !options.json && !options.quiet {
            println!("📦 ブロック {}: {}", event.part, event.result);
        }
        total += event.result;
        events.push(event);
    }

    if options.json {
        events.sort_by_key(|event| event.part);
        let report = ProgressReport {
            blocks,
            total,
            events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("✅ {blocks} ブロック受信 / 合計: {total}");
    }

    Ok(())
}
