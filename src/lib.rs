// wallet_aggregate - ウォレット台帳の並列分割集計
// 台帳スナップショットをパーティションに分割し、合計・フィルタ・進捗ストリームを並列計算する

pub mod cli;
pub mod core;
pub mod engine;
pub mod ledger;
pub mod services;

use crate::core::{AccountId, AggregationConfig, Money, Payment, ProgressReporter, WalletResult};
use crate::engine::{predicates, AggregationEngine, ProgressStream};
use crate::ledger::Ledger;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 台帳と集計エンジンを束ねるファサード
///
/// 集計は読み取りロック下で支払いのスナップショットを取り、ロックを解放してから
/// ワーカーを起動する。集計中の台帳更新は実行中の集計に影響しない。
pub struct Wallet<C, R> {
    ledger: RwLock<Ledger>,
    engine: AggregationEngine<C, R>,
}

impl<C, R> Wallet<C, R>
where
    C: AggregationConfig,
    R: ProgressReporter + 'static,
{
    pub fn new(ledger: Ledger, config: C, reporter: R) -> Self {
        Self::with_engine(ledger, AggregationEngine::new(config, reporter))
    }

    pub fn with_engine(ledger: Ledger, engine: AggregationEngine<C, R>) -> Self {
        Self {
            ledger: RwLock::new(ledger),
            engine,
        }
    }

    /// 全支払いの合計
    pub async fn sum_payments(&self, workers: usize) -> WalletResult<Money> {
        let payments = self.ledger.read().await.payments_snapshot();
        Ok(self.engine.sum_all(payments, workers).await?)
    }

    /// 指定口座の支払い一覧（口座が存在しなければ `AccountNotFound`）
    pub async fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> WalletResult<Vec<Payment>> {
        let payments = {
            let ledger = self.ledger.read().await;
            ledger.find_account_by_id(account_id)?;
            ledger.payments_snapshot()
        };

        Ok(self
            .engine
            .filter(payments, predicates::by_account(account_id), workers)
            .await?)
    }

    /// 任意の述語に一致する支払い一覧
    pub async fn filter_payments_by_fn<F>(
        &self,
        predicate: F,
        workers: usize,
    ) -> WalletResult<Vec<Payment>>
    where
        F: Fn(&Payment) -> bool + Send + Sync + 'static,
    {
        let payments = self.ledger.read().await.payments_snapshot();
        Ok(self.engine.filter(payments, predicate, workers).await?)
    }

    /// 既定ブロックサイズでの進捗ストリーム
    pub async fn sum_payments_with_progress(&self) -> WalletResult<ProgressStream> {
        self.stream_payments_progress(0).await
    }

    /// 指定ブロックサイズでの進捗ストリーム（0は既定値）
    pub async fn stream_payments_progress(
        &self,
        block_size: usize,
    ) -> WalletResult<ProgressStream> {
        let payments = self.ledger.read().await.payments_snapshot();
        Ok(self.engine.stream_progress(payments, block_size).await?)
    }

    /// 口座の支払い履歴
    pub async fn account_history(&self, account_id: AccountId) -> WalletResult<Vec<Payment>> {
        Ok(self.ledger.read().await.account_history(account_id)?)
    }

    pub async fn ledger(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().await
    }

    pub async fn ledger_mut(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().await
    }

    pub fn engine(&self) -> &AggregationEngine<C, R> {
        &self.engine
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger.into_inner()
    }
}
