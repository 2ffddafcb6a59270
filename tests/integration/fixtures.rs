// テスト用ヘルパー
// 入力データとエンジンの生成

use std::sync::{Arc, OnceLock};
use tokio::runtime::Runtime;
use wallet_aggregate::core::{MergeMode, Money, Payment, PaymentCategory, PaymentStatus};
use wallet_aggregate::engine::AggregationEngine;
use wallet_aggregate::services::{DefaultAggregationConfig, NoOpProgressReporter};

pub type QuietEngine = AggregationEngine<DefaultAggregationConfig, NoOpProgressReporter>;

/// proptestのケース間で共有するマルチスレッドランタイム
pub fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap()
    })
}

pub fn quiet_engine(mode: MergeMode) -> QuietEngine {
    AggregationEngine::new(
        DefaultAggregationConfig::default().with_merge_mode(mode),
        NoOpProgressReporter::new(),
    )
}

pub fn money(values: &[i64]) -> Arc<[Money]> {
    values.iter().copied().map(Money).collect::<Vec<_>>().into()
}

pub fn synthetic_payments(n: usize) -> Arc<[Payment]> {
    let categories = [
        PaymentCategory::food(),
        PaymentCategory::it(),
        PaymentCategory::shop(),
    ];

    (0..n)
        .map(|i| Payment {
            id: format!("payment-{i:06}"),
            account_id: (i % 5) as i64 + 1,
            amount: Money((i % 997) as i64 + 1),
            category: categories[i % categories.len()].clone(),
            status: if i % 11 == 0 {
                PaymentStatus::Fail
            } else {
                PaymentStatus::InProgress
            },
        })
        .collect::<Vec<_>>()
        .into()
}
