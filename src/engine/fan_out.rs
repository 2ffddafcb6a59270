// Fan-out - パーティションごとにワーカーを起動し、部分結果を合流させる汎用プリミティブ
//
// 合計・フィルタはここに「ワーカーで何を計算するか」と「どう畳み込むか」を
// 渡すだけの薄い特殊化になる。

use crate::core::{AggregationError, AggregationResult, PartialResult, Partition, ProgressReporter};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Mutexで保護された共有アキュムレータ
///
/// ロックは1回の合流操作の間だけ保持する。ワーカーの計算中には保持しない。
#[derive(Debug)]
pub struct SharedAccumulator<A> {
    inner: Arc<Mutex<A>>,
}

impl<A> Clone for SharedAccumulator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> SharedAccumulator<A> {
    pub fn new(initial: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// 部分結果を1件合流
    pub fn merge<F>(&self, f: F) -> AggregationResult<()>
    where
        F: FnOnce(&mut A),
    {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| AggregationError::accumulator("アキュムレータのロックが汚染されています"))?;
        f(&mut guard);
        Ok(())
    }

    /// 全ワーカー合流後に最終値を取り出す
    ///
    /// 他に参照が残っている（= まだ合流中のワーカーがいる）場合はエラー。
    pub fn into_inner(self) -> AggregationResult<A> {
        let mutex = Arc::try_unwrap(self.inner).map_err(|_| {
            AggregationError::accumulator("合流中のワーカーが残っているため確定できません")
        })?;
        mutex
            .into_inner()
            .map_err(|_| AggregationError::accumulator("アキュムレータのロックが汚染されています"))
    }
}

/// チャンネル方式の scatter/gather
///
/// 空でないパーティションごとにワーカーを1つ起動し、各ワーカーは部分結果を
/// チャンネルで手渡す（所有権移動、共有可変状態なし）。全ワーカーの完了を
/// 待った後、パーティション番号順に並べた部分結果を返す。
pub async fn scatter_gather<T, P, F, R>(
    records: Arc<[T]>,
    partitions: &[Partition],
    buffer: usize,
    work: F,
    reporter: Option<&R>,
) -> AggregationResult<Vec<PartialResult<P>>>
where
    T: Send + Sync + 'static,
    P: Send + 'static,
    F: Fn(&[T]) -> P + Send + Sync + 'static,
    R: ProgressReporter,
{
    let work = Arc::new(work);
    let (result_tx, mut result_rx) = mpsc::channel(buffer.max(1));

    let handles: Vec<_> = partitions
        .iter()
        .filter(|partition| !partition.is_empty())
        .map(|partition| {
            spawn_gather_worker(
                Arc::clone(&records),
                *partition,
                Arc::clone(&work),
                result_tx.clone(),
            )
        })
        .collect();

    // 全ワーカーの送信ハンドルが消えた時点で受信ループが終わる
    drop(result_tx);

    let total = handles.len();
    let mut partials = Vec::with_capacity(total);
    while let Some(partial) = result_rx.recv().await {
        partials.push(partial);
        if let Some(reporter) = reporter {
            reporter.report_partition_merged(partials.len(), total).await;
        }
    }

    // 完了バリア: panicしたワーカーはここでTaskErrorになる
    for handle in handles {
        handle.await?;
    }

    partials.sort_by_key(|partial: &PartialResult<P>| partial.partition_index);
    Ok(partials)
}

fn spawn_gather_worker<T, P, F>(
    records: Arc<[T]>,
    partition: Partition,
    work: Arc<F>,
    result_tx: mpsc::Sender<PartialResult<P>>,
) -> tokio::task::JoinHandle<()>
where
    T: Send + Sync + 'static,
    P: Send + 'static,
    F: Fn(&[T]) -> P + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let value = work(&records[partition.range()]);
        let partial = PartialResult {
            partition_index: partition.index,
            value,
        };

        if result_tx.send(partial).await.is_err() {
            tracing::debug!(partition = partition.index, "受信側が閉じられたため部分結果を破棄");
        }
    })
}

/// 共有ロック方式の scatter/merge
///
/// 各ワーカーはローカルに部分結果を計算し、最後に一度だけアキュムレータの
/// ロックを取って `merge` で畳み込む。全ワーカーのjoin後に最終値を返す。
/// 合流順序はワーカーの完了順に依存する。
pub async fn scatter_merge<T, P, A, F, M, R>(
    records: Arc<[T]>,
    partitions: &[Partition],
    accumulator: SharedAccumulator<A>,
    work: F,
    merge: M,
    reporter: Option<&R>,
) -> AggregationResult<A>
where
    T: Send + Sync + 'static,
    P: Send + 'static,
    A: Send + 'static,
    F: Fn(&[T]) -> P + Send + Sync + 'static,
    M: Fn(&mut A, P) + Send + Sync + 'static,
    R: ProgressReporter,
{
    let work = Arc::new(work);
    let merge = Arc::new(merge);

    let handles: Vec<_> = partitions
        .iter()
        .filter(|partition| !partition.is_empty())
        .map(|partition| {
            let records = Arc::clone(&records);
            let partition = *partition;
            let work = Arc::clone(&work);
            let merge = Arc::clone(&merge);
            let accumulator = accumulator.clone();

            tokio::spawn(async move {
                let local = work(&records[partition.range()]);
                accumulator.merge(|total| merge(total, local))
            })
        })
        .collect();

    let total = handles.len();
    for (completed, handle) in handles.into_iter().enumerate() {
        handle.await??;
        if let Some(reporter) = reporter {
            reporter.report_partition_merged(completed + 1, total).await;
        }
    }

    accumulator.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockProgressReporter;
    use crate::engine::partitioner::partition;
    use crate::services::NoOpProgressReporter;

    fn numbers(n: i64) -> Arc<[i64]> {
        (1..=n).collect::<Vec<_>>().into()
    }

    #[tokio::test]
    async fn test_scatter_gather_orders_by_partition() {
        let records = numbers(10);
        let partitions = partition(records.len(), 3);

        let partials = scatter_gather(
            records,
            &partitions,
            1,
            |slice: &[i64]| slice.to_vec(),
            None::<&NoOpProgressReporter>,
        )
        .await
        .unwrap();

        let indices: Vec<usize> = partials.iter().map(|p| p.partition_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let flattened: Vec<i64> = partials.into_iter().flat_map(|p| p.value).collect();
        assert_eq!(flattened, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_scatter_gather_skips_empty_partitions() {
        let records = numbers(2);
        let partitions = partition(records.len(), 5);

        let partials = scatter_gather(
            records,
            &partitions,
            4,
            |slice: &[i64]| slice.len(),
            None::<&NoOpProgressReporter>,
        )
        .await
        .unwrap();

        assert_eq!(partials.len(), 1);
        assert_eq!(partials[0].partition_index, 4);
        assert_eq!(partials[0].value, 2);
    }

    #[tokio::test]
    async fn test_scatter_gather_reports_each_partial() {
        let mut reporter = MockProgressReporter::new();
        reporter
            .expect_report_partition_merged()
            .withf(|_, total| *total == 4)
            .times(4)
            .returning(|_, _| ());

        let records = numbers(8);
        let partitions = partition(records.len(), 4);
        scatter_gather(
            records,
            &partitions,
            2,
            |slice: &[i64]| slice.iter().sum::<i64>(),
            Some(&reporter),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_scatter_gather_worker_panic_is_task_error() {
        let records = numbers(4);
        let partitions = partition(records.len(), 2);

        let result = scatter_gather(
            records,
            &partitions,
            2,
            |slice: &[i64]| {
                if slice.contains(&4) {
                    panic!("bad partition");
                }
                slice.len()
            },
            None::<&NoOpProgressReporter>,
        )
        .await;

        assert!(matches!(result, Err(AggregationError::TaskError { .. })));
    }

    #[tokio::test]
    async fn test_scatter_merge_sums_under_lock() {
        let records = numbers(100);
        let partitions = partition(records.len(), 8);

        let total = scatter_merge(
            records,
            &partitions,
            SharedAccumulator::new(0i64),
            |slice: &[i64]| slice.iter().sum::<i64>(),
            |total: &mut i64, partial: i64| *total += partial,
            None::<&NoOpProgressReporter>,
        )
        .await
        .unwrap();

        assert_eq!(total, 5050);
    }

    #[tokio::test]
    async fn test_scatter_merge_empty_partitions_yield_identity() {
        let records: Arc<[i64]> = Vec::new().into();
        let partitions = partition(records.len(), 4);

        let collected = scatter_merge(
            records,
            &partitions,
            SharedAccumulator::new(Vec::<i64>::new()),
            |slice: &[i64]| slice.to_vec(),
            |acc: &mut Vec<i64>, mut local: Vec<i64>| acc.append(&mut local),
            None::<&NoOpProgressReporter>,
        )
        .await
        .unwrap();

        assert!(collected.is_empty());
    }

    #[test]
    fn test_shared_accumulator_into_inner_with_live_clone() {
        let accumulator = SharedAccumulator::new(1u32);
        let _other = accumulator.clone();

        let result = accumulator.into_inner();
        assert!(matches!(
            result,
            Err(AggregationError::AccumulatorError { .. })
        ));
    }

    #[test]
    fn test_shared_accumulator_merge() {
        let accumulator = SharedAccumulator::new(Vec::new());
        accumulator.merge(|values| values.push(1)).unwrap();
        accumulator.merge(|values| values.push(2)).unwrap();

        assert_eq!(accumulator.into_inner().unwrap(), vec![1, 2]);
    }
}
