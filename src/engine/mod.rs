// エンジン層 - 分割・並列集計・合流のオーケストレーション
// コア層の抽象化を組み合わせて高レベルな集計を提供

pub mod aggregation_engine;
pub mod api;
pub mod barrier;
pub mod fan_in;
pub mod fan_out;
pub mod partitioner;
pub mod predicates;
pub mod progress;

// 公開API - 主要エンジンクラス
pub use aggregation_engine::{sequential_filter, sequential_sum, AggregationEngine};
pub use api::{
    create_default_aggregation_engine, create_env_aggregation_engine,
    create_quiet_aggregation_engine,
};
pub use barrier::{BarrierGuard, CompletionBarrier};
pub use fan_out::{scatter_gather, scatter_merge, SharedAccumulator};
pub use partitioner::{effective_workers, partition, partition_blocks};
pub use progress::ProgressStream;
