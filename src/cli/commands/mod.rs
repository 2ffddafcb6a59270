// デモ用コマンドの共通処理
// 合成台帳の生成とウォレットの組み立て

pub mod filter;
pub mod progress;
pub mod sum;

pub use filter::*;
pub use progress::*;
pub use sum::*;

use super::DemoOptions;
use crate::core::{AggregationConfig, LedgerResult, Money, PaymentCategory, ProgressReporter};
use crate::ledger::Ledger;
use crate::services::{ConsoleProgressReporter, DefaultAggregationConfig, NoOpProgressReporter};
use crate::Wallet;
use anyhow::Result;

pub type DemoWallet = Wallet<DefaultAggregationConfig, Box<dyn ProgressReporter>>;

/// 決定的な合成台帳を生成
///
/// 支払いは口座へラウンドロビンで割り当て、金額は1..=997を循環する。
pub fn build_demo_ledger(accounts: usize, payments: usize) -> LedgerResult<Ledger> {
    let mut ledger = Ledger::new();
    let per_account = payments / accounts.max(1) + 1;
    let balance = Money(1_000 * per_account as i64);

    let mut account_ids = Vec::with_capacity(accounts);
    for i in 0..accounts {
        let account = ledger.add_account_with_balance(format!("+992{i:09}").as_str(), balance)?;
        account_ids.push(account.id);
    }

    let categories = [
        PaymentCategory::food(),
        PaymentCategory::it(),
        PaymentCategory::shop(),
    ];
    for (i, account_id) in account_ids.iter().cycle().take(payments).enumerate() {
        let amount = Money((i % 997) as i64 + 1);
        ledger.pay(*account_id, amount, categories[i % categories.len()].clone())?;
    }

    Ok(ledger)
}

/// オプションからウォレットを組み立てる
pub fn build_demo_wallet(options: &DemoOptions) -> Result<DemoWallet> {
    if options.accounts == 0 && options.payments > 0 {
        anyhow::bail!("Payments require at least one account");
    }

    let mut config = DefaultAggregationConfig::from_env();
    if let Some(mode) = options.merge_mode {
        config = config.with_merge_mode(mode.into());
    }

    let reporter: Box<dyn ProgressReporter> = if options.quiet || options.json {
        Box::new(NoOpProgressReporter::new())
    } else {
        Box::new(ConsoleProgressReporter::new())
    };

    let ledger = build_demo_ledger(options.accounts, options.payments)?;
    tracing::info!(
        accounts = options.accounts,
        payments = options.payments,
        merge_mode = %config.merge_mode(),
        "合成台帳を生成"
    );

    Ok(Wallet::new(ledger, config, reporter))
}

/// 指定がなければ設定の既定ワーカー数
pub fn resolve_workers(options: &DemoOptions, wallet: &DemoWallet) -> usize {
    options
        .workers
        .unwrap_or_else(|| wallet.engine().config().default_workers())
}
