// 集計システムのトレイト定義
// エンジンが依存する抽象化インターフェースを定義

use super::types::{AggregationKind, MergeMode, Money, Payment};
use async_trait::async_trait;
use mockall::automock;

/// 集計対象レコード
///
/// ワーカーは `Arc<[T]>` の読み取り専用ビューを受け取り、結果として返す際は
/// 参照ではなくクローンを返す。
pub trait Record: Clone + Send + Sync + 'static {
    fn amount(&self) -> Money;
}

impl Record for Payment {
    fn amount(&self) -> Money {
        self.amount
    }
}

impl Record for Money {
    fn amount(&self) -> Money {
        *self
    }
}

/// 集計エンジンの設定を抽象化するトレイト
#[automock]
pub trait AggregationConfig: Send + Sync {
    /// 呼び出し側がワーカー数を指定しない場合の既定値
    fn default_workers(&self) -> usize;

    /// ワーカー数の上限（これを超える要求は切り詰める）
    fn max_workers(&self) -> usize;

    /// チャンネルバッファサイズを取得
    fn channel_buffer_size(&self) -> usize;

    /// ストリーミング集計の既定ブロックサイズ
    fn progress_block_size(&self) -> usize;

    /// 部分結果の合流方式
    fn merge_mode(&self) -> MergeMode;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}

// AggregationConfig for Box<dyn AggregationConfig>
impl AggregationConfig for Box<dyn AggregationConfig> {
    fn default_workers(&self) -> usize {
        self.as_ref().default_workers()
    }

    fn max_workers(&self) -> usize {
        self.as_ref().max_workers()
    }

    fn channel_buffer_size(&self) -> usize {
        self.as_ref().channel_buffer_size()
    }

    fn progress_block_size(&self) -> usize {
        self.as_ref().progress_block_size()
    }

    fn merge_mode(&self) -> MergeMode {
        self.as_ref().merge_mode()
    }

    fn enable_progress_reporting(&self) -> bool {
        self.as_ref().enable_progress_reporting()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 集計開始時の報告
    async fn report_started(&self, kind: AggregationKind, total_partitions: usize);

    /// 部分結果1つの合流完了を報告
    async fn report_partition_merged(&self, completed: usize, total: usize);

    /// 集計完了時の報告
    async fn report_completed(&self, kind: AggregationKind, total_partitions: usize);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, kind: AggregationKind, total_partitions: usize) {
        self.as_ref().report_started(kind, total_partitions).await
    }

    async fn report_partition_merged(&self, completed: usize, total: usize) {
        self.as_ref().report_partition_merged(completed, total).await
    }

    async fn report_completed(&self, kind: AggregationKind, total_partitions: usize) {
        self.as_ref().report_completed(kind, total_partitions).await
    }
}
