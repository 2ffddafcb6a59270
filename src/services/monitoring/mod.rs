// 進捗監視機能
// 集計開始・パーティション合流・完了の報告

pub mod implementations;

// 公開API
pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
