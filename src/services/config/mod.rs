// 設定管理機能
// ワーカー数・バッファ・合流方式などの集計設定

pub mod implementations;

// 公開API
pub use implementations::{
    DefaultAggregationConfig, DEFAULT_MAX_WORKERS, DEFAULT_PROGRESS_BLOCK_SIZE,
};
