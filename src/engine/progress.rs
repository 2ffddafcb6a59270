// Progress - ブロック単位の部分集計をストリームとして逐次返す

use crate::core::{Money, Partition, ProgressEvent, Record};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// 進捗イベントの読み取り専用ストリーム
///
/// 有限で再開不可。全ブロックのイベントが送られた後に一度だけ閉じる。
/// 途中で破棄すると、残りのワーカーは送信に失敗して終了する。
#[derive(Debug)]
pub struct ProgressStream {
    rx: mpsc::Receiver<ProgressEvent>,
    expected_events: usize,
}

impl ProgressStream {
    pub fn new(rx: mpsc::Receiver<ProgressEvent>, expected_events: usize) -> Self {
        Self {
            rx,
            expected_events,
        }
    }

    /// このストリームが閉じるまでに流れるイベント数
    pub fn expected_events(&self) -> usize {
        self.expected_events
    }

    /// 次のイベントを受信（閉じていれば `None`）
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    /// 閉じるまで読み切ってイベントを返す（到着順）
    pub async fn collect_events(mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::with_capacity(self.expected_events);
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }

    /// 閉じるまで読み切って部分値を合計
    pub async fn total(mut self) -> Money {
        let mut total = Money::ZERO;
        while let Some(event) = self.rx.recv().await {
            total += event.result;
        }
        total
    }

    pub fn into_inner(self) -> mpsc::Receiver<ProgressEvent> {
        self.rx
    }
}

/// ブロックごとにワーカーを起動
///
/// 各ワーカーは自分専用のチャンネルにイベントを1件だけ送る。戻り値の受信側を
/// fan-inで合流させると1本の進捗ストリームになる。同時に計算するワーカー数は
/// `permits` で上限を設ける。
pub fn spawn_block_workers<T>(
    records: Arc<[T]>,
    blocks: &[Partition],
    permits: usize,
) -> (
    Vec<mpsc::Receiver<ProgressEvent>>,
    Vec<tokio::task::JoinHandle<()>>,
)
where
    T: Record,
{
    let semaphore = Arc::new(Semaphore::new(permits.max(1)));
    let mut receivers = Vec::with_capacity(blocks.len());
    let mut handles = Vec::with_capacity(blocks.len());

    for block in blocks.iter().copied() {
        let (event_tx, event_rx) = mpsc::channel(1);
        let records = Arc::clone(&records);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            // セマフォで同時実行数制御
            let Ok(_permit) = semaphore.acquire().await else {
                return;
            };

            let result: Money = records[block.range()].iter().map(Record::amount).sum();
            let event = ProgressEvent {
                part: block.index,
                result,
            };

            if event_tx.send(event).await.is_err() {
                tracing::debug!(part = block.index, "進捗ストリームが破棄されたため送信を中止");
            }
        }));
        receivers.push(event_rx);
    }

    (receivers, handles)
}
