// Fan-in - 複数の入力ストリームを1本の出力ストリームへ合流

use super::barrier::CompletionBarrier;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 複数の受信チャンネルを1本に合流
///
/// 各入力の値は出力にちょうど1回ずつ現れる（入力間の順序は保証しない）。
/// 出力は全入力が閉じられ、読み切られた後にのみ閉じる。
/// 出力側が先に破棄された場合、転送タスクは送信失敗で終了する。
pub fn merge<T>(inputs: Vec<mpsc::Receiver<T>>, buffer: usize) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (output_tx, output_rx) = mpsc::channel(buffer.max(1));
    let barrier = CompletionBarrier::new(inputs.len());

    for input in inputs {
        spawn_forwarder(input, output_tx.clone(), &barrier);
    }

    spawn_closer(output_tx, barrier);
    output_rx
}

/// 入力1本を読み切って出力へ転送するタスク
fn spawn_forwarder<T>(
    mut input: mpsc::Receiver<T>,
    output_tx: mpsc::Sender<T>,
    barrier: &Arc<CompletionBarrier>,
) -> tokio::task::JoinHandle<()>
where
    T: Send + 'static,
{
    let guard = barrier.guard();
    tokio::spawn(async move {
        let _guard = guard;
        while let Some(value) = input.recv().await {
            if output_tx.send(value).await.is_err() {
                // 出力が閉じられた場合は終了
                break;
            }
        }
    })
}

/// バリア解放後に出力側の送信ハンドルを手放すタスク
fn spawn_closer<T>(
    output_tx: mpsc::Sender<T>,
    barrier: Arc<CompletionBarrier>,
) -> tokio::task::JoinHandle<()>
where
    T: Send + 'static,
{
    tokio::spawn(async move {
        barrier.wait().await;
        drop(output_tx);
    })
}
