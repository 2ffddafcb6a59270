// 並行実行の決定性

use crate::fixtures::{quiet_engine, synthetic_payments};
use std::sync::Arc;
use wallet_aggregate::core::{MergeMode, Money, Payment};
use wallet_aggregate::engine::{sequential_filter, sequential_sum, CompletionBarrier};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sum_is_identical_across_thousand_runs() {
    let records = synthetic_payments(5_003);
    let expected = sequential_sum(&records);

    for mode in [MergeMode::Channel, MergeMode::SharedLock] {
        let engine = quiet_engine(mode);
        for _ in 0..1_000 {
            let total = engine.sum_all(Arc::clone(&records), 8).await.unwrap();
            assert_eq!(total, expected);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_channel_filter_order_is_stable() {
    let records = synthetic_payments(2_000);
    let expected = sequential_filter(&records, |p: &Payment| p.amount > Money(500));
    let engine = quiet_engine(MergeMode::Channel);

    for workers in [1, 3, 8, 64] {
        for _ in 0..20 {
            let matched = engine
                .filter(
                    Arc::clone(&records),
                    |p: &Payment| p.amount > Money(500),
                    workers,
                )
                .await
                .unwrap();
            assert_eq!(matched, expected);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_aggregations_share_engine() {
    let engine = Arc::new(quiet_engine(MergeMode::Channel));
    let records = synthetic_payments(10_000);
    let expected = sequential_sum(&records);

    let mut handles = Vec::new();
    for workers in 1..=16 {
        let engine = Arc::clone(&engine);
        let records = Arc::clone(&records);
        handles.push(tokio::spawn(async move {
            engine.sum_all(records, workers).await
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_barrier_releases_after_all_arrivals() {
    let barrier = CompletionBarrier::new(32);

    for _ in 0..32 {
        let guard = barrier.guard();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            drop(guard);
        });
    }

    barrier.wait().await;
    assert_eq!(barrier.remaining(), 0);
}
