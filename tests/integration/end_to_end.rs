// エンドツーエンド: 台帳からウォレット経由で集計する

use crate::fixtures::{money, quiet_engine};
use std::collections::HashSet;
use wallet_aggregate::cli::build_demo_ledger;
use wallet_aggregate::core::traits::MockProgressReporter;
use wallet_aggregate::core::{
    AggregationKind, LedgerError, MergeMode, Money, PaymentCategory, PaymentStatus, WalletError,
};
use wallet_aggregate::engine::{fan_in, partition, predicates, sequential_sum};
use wallet_aggregate::ledger::Ledger;
use wallet_aggregate::services::{DefaultAggregationConfig, NoOpProgressReporter};
use wallet_aggregate::Wallet;

#[tokio::test]
async fn test_five_records_two_workers() {
    let partitions = partition(5, 2);
    assert_eq!(
        partitions.iter().map(|p| p.range()).collect::<Vec<_>>(),
        vec![0..2, 2..5]
    );

    let engine = quiet_engine(MergeMode::Channel);
    let total = engine.sum_all(money(&[1, 2, 3, 4, 5]), 2).await.unwrap();
    assert_eq!(total, Money(15));
}

#[tokio::test]
async fn test_empty_input_is_not_an_error() {
    for mode in [MergeMode::Channel, MergeMode::SharedLock] {
        let engine = quiet_engine(mode);

        assert_eq!(engine.sum_all(money(&[]), 4).await.unwrap(), Money::ZERO);
        assert!(engine
            .filter(money(&[]), |_: &Money| true, 4)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            engine.stream_progress(money(&[]), 10).await.unwrap().total().await,
            Money::ZERO
        );
    }
}

#[tokio::test]
async fn test_wallet_over_demo_ledger() {
    let ledger = build_demo_ledger(4, 1_000).unwrap();
    let expected_total = sequential_sum(ledger.payments());
    let expected_account: Vec<_> = ledger.account_history(2).unwrap();

    let wallet = Wallet::new(
        ledger,
        DefaultAggregationConfig::default(),
        NoOpProgressReporter::new(),
    );

    assert_eq!(wallet.sum_payments(7).await.unwrap(), expected_total);
    assert_eq!(wallet.filter_payments(2, 7).await.unwrap(), expected_account);

    let stream = wallet.stream_payments_progress(300).await.unwrap();
    assert_eq!(stream.expected_events(), 4);
    assert_eq!(stream.total().await, expected_total);
}

#[tokio::test]
async fn test_wallet_after_reject_and_repeat() {
    let mut ledger = Ledger::new();
    let account = ledger
        .add_account_with_balance("+992900000001", Money(1_000))
        .unwrap();
    let payment = ledger.pay(account.id, Money(400), "shop").unwrap();
    ledger.repeat(&payment.id).unwrap();
    ledger.reject(&payment.id).unwrap();

    let wallet = Wallet::new(
        ledger,
        DefaultAggregationConfig::default().with_merge_mode(MergeMode::SharedLock),
        NoOpProgressReporter::new(),
    );

    // 取り消し済みの支払いも台帳には残る
    assert_eq!(wallet.sum_payments(2).await.unwrap(), Money(800));

    let failed = wallet
        .filter_payments_by_fn(predicates::by_status(PaymentStatus::Fail), 2)
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, payment.id);

    let shop = wallet
        .filter_payments_by_fn(predicates::by_category(PaymentCategory::shop()), 0)
        .await
        .unwrap();
    assert_eq!(shop.len(), 2);

    assert_eq!(
        wallet.ledger().await.find_account_by_id(account.id).unwrap().balance,
        Money(600)
    );
}

#[tokio::test]
async fn test_wallet_unknown_account() {
    let wallet = Wallet::new(
        Ledger::new(),
        DefaultAggregationConfig::default(),
        NoOpProgressReporter::new(),
    );

    let error = wallet.filter_payments(1, 2).await.unwrap_err();
    assert!(matches!(
        error,
        WalletError::Ledger(LedgerError::AccountNotFound { account_id: 1 })
    ));
}

#[tokio::test]
async fn test_boxed_reporter_receives_progress_lifecycle() {
    let mut reporter = MockProgressReporter::new();
    reporter
        .expect_report_started()
        .withf(|kind, total| *kind == AggregationKind::Progress && *total == 3)
        .times(1)
        .returning(|_, _| ());
    reporter
        .expect_report_completed()
        .withf(|kind, total| *kind == AggregationKind::Progress && *total == 3)
        .times(1)
        .returning(|_, _| ());

    let boxed: Box<dyn wallet_aggregate::core::ProgressReporter> = Box::new(reporter);
    let wallet = Wallet::new(
        build_demo_ledger(2, 25).unwrap(),
        DefaultAggregationConfig::default(),
        boxed,
    );

    let stream = wallet.stream_payments_progress(10).await.unwrap();
    assert_eq!(stream.collect_events().await.len(), 3);

    // 完了報告はストリームが閉じた後に非同期で届く
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_fan_in_delivers_each_value_once() {
    let mut senders = Vec::new();
    let mut receivers = Vec::new();
    for _ in 0..6 {
        let (tx, rx) = tokio::sync::mpsc::channel(2);
        senders.push(tx);
        receivers.push(rx);
    }

    let mut merged = fan_in::merge(receivers, 4);

    for (source, tx) in senders.into_iter().enumerate() {
        tokio::spawn(async move {
            for i in 0..50 {
                tx.send(source * 1_000 + i).await.unwrap();
            }
        });
    }

    let mut seen = HashSet::new();
    while let Some(value) = merged.recv().await {
        assert!(seen.insert(value), "duplicate value {value}");
    }
    assert_eq!(seen.len(), 300);
}
