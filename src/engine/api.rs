// 高レベル公開API
// AggregationEngineを簡単に作成するためのヘルパー関数

use super::AggregationEngine;
use crate::services::{ConsoleProgressReporter, DefaultAggregationConfig, NoOpProgressReporter};

/// デフォルト設定のエンジンを作成（コンソールに進捗を出力）
pub fn create_default_aggregation_engine(
) -> AggregationEngine<DefaultAggregationConfig, ConsoleProgressReporter> {
    AggregationEngine::new(
        DefaultAggregationConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// 静音版のエンジンを作成（テスト・バックグラウンド処理用）
pub fn create_quiet_aggregation_engine(
) -> AggregationEngine<DefaultAggregationConfig, NoOpProgressReporter> {
    AggregationEngine::new(
        DefaultAggregationConfig::default(),
        NoOpProgressReporter::new(),
    )
}

/// 環境変数から読み込んだ設定でエンジンを作成
pub fn create_env_aggregation_engine(
) -> AggregationEngine<DefaultAggregationConfig, ConsoleProgressReporter> {
    AggregationEngine::new(
        DefaultAggregationConfig::from_env(),
        ConsoleProgressReporter::new(),
    )
}
