// サービス層 - 機能別の具象実装
// 設定・進捗報告・ログ初期化をそれぞれ独立して提供

pub mod config;
pub mod monitoring;
pub mod observability;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultAggregationConfig;
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use observability::{init_logging, LogFormat};
