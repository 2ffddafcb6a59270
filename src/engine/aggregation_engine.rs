// AggregationEngine - 依存性注入による並列集計エンジン
// 設定とレポーターをコンストラクタで受け取り、合計・フィルタ・進捗ストリームを提供

use super::fan_in;
use super::fan_out::{scatter_gather, scatter_merge, SharedAccumulator};
use super::partitioner::{effective_workers, partition, partition_blocks};
use super::progress::{spawn_block_workers, ProgressStream};
use crate::core::{
    AggregationConfig, AggregationError, AggregationKind, AggregationResult, MergeMode, Money,
    Partition, ProgressReporter, Record,
};
use std::sync::Arc;
use std::time::Instant;

/// 並列集計エンジン
///
/// 入力レコードは `Arc<[T]>` の読み取り専用スナップショットとして受け取る。
/// 集計中にエンジンが入力を変更することはない。
///
/// 並列処理で共有される依存関係はArcで管理する。
pub struct AggregationEngine<C, R> {
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<C, R> AggregationEngine<C, R>
where
    C: AggregationConfig,
    R: ProgressReporter + 'static,
{
    /// 新しい集計エンジンを作成（Constructor Injection）
    pub fn new(config: C, reporter: R) -> Self {
        Self {
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// 全レコードの金額合計
    ///
    /// `workers == 0` は単一パーティション。空の入力は `Money::ZERO`。
    /// 結果はワーカーのスケジューリング順に依存しない。
    pub async fn sum_all<T>(&self, records: Arc<[T]>, workers: usize) -> AggregationResult<Money>
    where
        T: Record,
    {
        self.run_sum(records, workers)
            .await
            .inspect_err(|error| log_failure(AggregationKind::Sum, error))
    }

    async fn run_sum<T>(&self, records: Arc<[T]>, workers: usize) -> AggregationResult<Money>
    where
        T: Record,
    {
        self.validate_config()?;
        let start_time = Instant::now();
        let partitions = self.plan(records.len(), workers);
        let active = active_partitions(&partitions);

        self.report_started(AggregationKind::Sum, active).await;

        let total: Money = match self.config.merge_mode() {
            MergeMode::Channel => scatter_gather(
                records,
                &partitions,
                self.config.channel_buffer_size(),
                sum_slice::<T>,
                self.active_reporter(),
            )
            .await?
            .into_iter()
            .map(|partial| partial.value)
            .sum(),
            MergeMode::SharedLock => {
                scatter_merge(
                    records,
                    &partitions,
                    SharedAccumulator::new(Money::ZERO),
                    sum_slice::<T>,
                    |total: &mut Money, partial: Money| *total += partial,
                    self.active_reporter(),
                )
                .await?
            }
        };

        self.report_completed(AggregationKind::Sum, active).await;
        tracing::debug!(
            partitions = partitions.len(),
            active,
            %total,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "合計集計が完了"
        );

        Ok(total)
    }

    /// 述語に一致するレコードのクローンを返す
    ///
    /// 一致なし・空入力は空のVec（エラーではない）。各レコードは全体でちょうど
    /// 1回だけ述語で評価される。`MergeMode::Channel` では元の並び順を保ち、
    /// `MergeMode::SharedLock` ではパーティション間の順序はワーカー完了順になる。
    pub async fn filter<T, F>(
        &self,
        records: Arc<[T]>,
        predicate: F,
        workers: usize,
    ) -> AggregationResult<Vec<T>>
    where
        T: Record,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.run_filter(records, predicate, workers)
            .await
            .inspect_err(|error| log_failure(AggregationKind::Filter, error))
    }

    async fn run_filter<T, F>(
        &self,
        records: Arc<[T]>,
        predicate: F,
        workers: usize,
    ) -> AggregationResult<Vec<T>>
    where
        T: Record,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validate_config()?;
        let start_time = Instant::now();
        let partitions = self.plan(records.len(), workers);
        let active = active_partitions(&partitions);

        self.report_started(AggregationKind::Filter, active).await;

        let work = move |slice: &[T]| -> Vec<T> {
            slice
                .iter()
                .filter(|record| predicate(*record))
                .cloned()
                .collect()
        };

        let matched: Vec<T> = match self.config.merge_mode() {
            MergeMode::Channel => scatter_gather(
                records,
                &partitions,
                self.config.channel_buffer_size(),
                work,
                self.active_reporter(),
            )
            .await?
            .into_iter()
            .flat_map(|partial| partial.value)
            .collect(),
            MergeMode::SharedLock => {
                scatter_merge(
                    records,
                    &partitions,
                    SharedAccumulator::new(Vec::new()),
                    work,
                    |matched: &mut Vec<T>, mut local: Vec<T>| matched.append(&mut local),
                    self.active_reporter(),
                )
                .await?
            }
        };

        self.report_completed(AggregationKind::Filter, active).await;
        tracing::debug!(
            partitions = partitions.len(),
            active,
            matched = matched.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "フィルタ集計が完了"
        );

        Ok(matched)
    }

    /// ブロック単位の部分合計を逐次流すストリームを開始
    ///
    /// `block_size == 0` は設定の既定ブロックサイズを使う。イベント数は
    /// `ceil(N / block_size)`（空入力なら0）で、全イベント送信後に一度だけ閉じる。
    pub async fn stream_progress<T>(
        &self,
        records: Arc<[T]>,
        block_size: usize,
    ) -> AggregationResult<ProgressStream>
    where
        T: Record,
    {
        self.run_stream(records, block_size)
            .await
            .inspect_err(|error| log_failure(AggregationKind::Progress, error))
    }

    async fn run_stream<T>(
        &self,
        records: Arc<[T]>,
        block_size: usize,
    ) -> AggregationResult<ProgressStream>
    where
        T: Record,
    {
        self.validate_config()?;
        let block_size = match block_size {
            0 => self.config.progress_block_size(),
            size => size,
        };
        if block_size == 0 {
            return Err(AggregationError::configuration(
                "進捗ブロックサイズは1以上である必要があります",
            ));
        }
        let blocks = partition_blocks(records.len(), block_size);
        let total_blocks = blocks.len();

        tracing::debug!(
            records = records.len(),
            block_size,
            blocks = total_blocks,
            "進捗ストリーミング集計を開始"
        );
        self.report_started(AggregationKind::Progress, total_blocks).await;

        let (receivers, handles) =
            spawn_block_workers(records, &blocks, self.config.max_workers());
        let stream = fan_in::merge(receivers, self.config.channel_buffer_size());

        // 全ブロックワーカーのjoin後に完了を報告
        let reporter = self.enable_reporting().then(|| Arc::clone(&self.reporter));
        tokio::spawn(async move {
            for handle in handles {
                if let Err(error) = handle.await {
                    tracing::error!(%error, "進捗ワーカーが異常終了しました");
                }
            }
            if let Some(reporter) = reporter {
                reporter
                    .report_completed(AggregationKind::Progress, total_blocks)
                    .await;
            }
        });

        Ok(ProgressStream::new(stream, total_blocks))
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// レポーターへの参照を取得
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// 設定検証
    fn validate_config(&self) -> AggregationResult<()> {
        if self.config.max_workers() == 0 {
            return Err(AggregationError::configuration(
                "ワーカー上限は1以上である必要があります",
            ));
        }

        if self.config.channel_buffer_size() == 0 {
            return Err(AggregationError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }

        Ok(())
    }

    fn plan(&self, len: usize, workers: usize) -> Vec<Partition> {
        partition(len, effective_workers(workers, self.config.max_workers()))
    }

    fn enable_reporting(&self) -> bool {
        self.config.enable_progress_reporting()
    }

    fn active_reporter(&self) -> Option<&R> {
        self.enable_reporting().then_some(self.reporter.as_ref())
    }

    async fn report_started(&self, kind: AggregationKind, partitions: usize) {
        if let Some(reporter) = self.active_reporter() {
            reporter.report_started(kind, partitions).await;
        }
    }

    async fn report_completed(&self, kind: AggregationKind, partitions: usize) {
        if let Some(reporter) = self.active_reporter() {
            reporter.report_completed(kind, partitions).await;
        }
    }
}

/// 逐次合計（並列版と比較するための基準実装）
pub fn sequential_sum<T: Record>(records: &[T]) -> Money {
    sum_slice(records)
}

/// 逐次フィルタ（並列版と比較するための基準実装）
pub fn sequential_filter<T, F>(records: &[T], predicate: F) -> Vec<T>
where
    T: Record,
    F: Fn(&T) -> bool,
{
    records
        .iter()
        .filter(|record| predicate(*record))
        .cloned()
        .collect()
}

fn log_failure(kind: AggregationKind, error: &AggregationError) {
    tracing::error!(
        %kind,
        severity = error.severity().as_str(),
        recoverable = error.is_recoverable(),
        %error,
        "集計に失敗しました"
    );
}

fn sum_slice<T: Record>(records: &[T]) -> Money {
    records.iter().map(Record::amount).sum()
}

fn active_partitions(partitions: &[Partition]) -> usize {
    partitions
        .iter()
        .filter(|partition| !partition.is_empty())
        .count()
}
