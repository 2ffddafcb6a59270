// 進捗監視の具象実装

use crate::core::{AggregationKind, ProgressReporter};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, kind: AggregationKind, total_partitions: usize) {
        if !self.quiet {
            println!("🚀 Starting {kind} aggregation over {total_partitions} partitions...");
        }
    }

    async fn report_partition_merged(&self, completed: usize, total: usize) {
        if !self.quiet && total > 0 && (completed % 10 == 0 || completed == total) {
            let percentage = (completed as f64 / total as f64) * 100.0;
            println!("📊 Merged: {completed}/{total} ({percentage:.1}%)");
        }
    }

    async fn report_completed(&self, kind: AggregationKind, total_partitions: usize) {
        if !self.quiet {
            println!("✅ Completed {kind} aggregation! Partitions: {total_partitions}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _kind: AggregationKind, _total_partitions: usize) {
        // 何もしない
    }

    async fn report_partition_merged(&self, _completed: usize, _total: usize) {
        // 何もしない
    }

    async fn report_completed(&self, _kind: AggregationKind, _total_partitions: usize) {
        // 何もしない
    }
}
