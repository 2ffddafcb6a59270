// CompletionBarrier - 全ワーカーの完了を待つ同期ポイント

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// 期待数の到着がそろったときにだけ `wait` を解放するバリア
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: AtomicUsize,
    notify: Notify,
}

impl CompletionBarrier {
    pub fn new(expected: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(expected),
            notify: Notify::new(),
        })
    }

    /// 到着を1件記録
    ///
    /// 期待数を超えた到着は無視する。
    pub fn arrive(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| {
                remaining.checked_sub(1)
            });

        if previous == Ok(1) {
            self.notify.notify_waiters();
        }
    }

    /// ドロップ時に到着を記録するガードを取得
    ///
    /// ワーカーがpanicで巻き戻ってもバリアは必ず解放される。
    pub fn guard(self: &Arc<Self>) -> BarrierGuard {
        BarrierGuard {
            barrier: Arc::clone(self),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// 全到着まで待機
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // 通知の取りこぼしを防ぐため、残数確認の前に待機登録する
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// ドロップで `arrive` するガード
#[derive(Debug)]
pub struct BarrierGuard {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        self.barrier.arrive();
    }
}
