// プロパティテスト - 任意の入力・ワーカー数で不変条件が成り立つこと

use crate::fixtures::{quiet_engine, runtime};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use wallet_aggregate::core::{MergeMode, Money};
use wallet_aggregate::engine::{partition, partition_blocks, sequential_filter, sequential_sum};

fn arb_merge_mode() -> impl Strategy<Value = MergeMode> {
    prop_oneof![Just(MergeMode::Channel), Just(MergeMode::SharedLock)]
}

fn arb_amounts() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-10_000i64..10_000, 0..400)
}

/// 入力とワーカー数 0..=N+5 の組
fn arb_amounts_with_workers() -> impl Strategy<Value = (Vec<i64>, usize)> {
    arb_amounts().prop_flat_map(|values| {
        let max_workers = values.len() + 5;
        (Just(values), 0usize..=max_workers)
    })
}

fn to_records(values: &[i64]) -> Arc<[Money]> {
    values.iter().copied().map(Money).collect::<Vec<_>>().into()
}

fn multiset(values: &[Money]) -> HashMap<Money, usize> {
    let mut counts = HashMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_partitions_are_disjoint_and_cover(n in 0usize..5_000, workers in 0usize..80) {
        let partitions = partition(n, workers);

        if n == 0 {
            prop_assert!(partitions.is_empty());
        } else {
            prop_assert_eq!(partitions.len(), workers.max(1));
            prop_assert_eq!(partitions[0].start, 0);
            prop_assert_eq!(partitions[partitions.len() - 1].end, n);
            for pair in partitions.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert_eq!(partitions.iter().map(|p| p.len()).sum::<usize>(), n);
        }
    }

    #[test]
    fn prop_sum_matches_sequential(
        values in arb_amounts(),
        workers in 0usize..64,
        mode in arb_merge_mode(),
    ) {
        let records = to_records(&values);
        let expected = sequential_sum(&records);

        let total = runtime()
            .block_on(quiet_engine(mode).sum_all(records, workers))
            .unwrap();
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn prop_filter_matches_sequential_set(
        (values, workers) in arb_amounts_with_workers(),
        threshold in -10_000i64..10_000,
        mode in arb_merge_mode(),
    ) {
        let records = to_records(&values);
        let predicate = move |amount: &Money| amount.value() >= threshold;
        let expected = sequential_filter(&records, predicate);

        let matched = runtime()
            .block_on(quiet_engine(mode).filter(records, predicate, workers))
            .unwrap();

        prop_assert_eq!(multiset(&matched), multiset(&expected));
        if mode == MergeMode::Channel {
            prop_assert_eq!(matched, expected);
        }
    }

    #[test]
    fn prop_stream_emits_ceil_events(values in arb_amounts(), block_size in 1usize..120) {
        let records = to_records(&values);
        let expected_total = sequential_sum(&records);
        let expected_events = values.len().div_ceil(block_size);
        prop_assert_eq!(partition_blocks(values.len(), block_size).len(), expected_events);

        let events = runtime().block_on(async {
            quiet_engine(MergeMode::Channel)
                .stream_progress(records, block_size)
                .await
                .unwrap()
                .collect_events()
                .await
        });

        prop_assert_eq!(events.len(), expected_events);
        prop_assert_eq!(events.iter().map(|event| event.result).sum::<Money>(), expected_total);
    }
}
