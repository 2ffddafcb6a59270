// Partitioner - レコード列を連続した半開区間に分割する純関数群

use crate::core::Partition;

/// `n` 件を `workers` 個の連続区間に分割
///
/// - `workers == 0` は1として扱う
/// - 先頭 `workers - 1` 個は `n / workers` 件ずつ、最後の区間が端数を吸収する
/// - `workers > n` の場合は空区間が混じるが、エラーにはしない
/// - `n == 0` なら空列を返す
pub fn partition(n: usize, workers: usize) -> Vec<Partition> {
    if n == 0 {
        return Vec::new();
    }

    let workers = workers.max(1);
    let chunk = n / workers;

    let mut partitions = Vec::with_capacity(workers);
    for index in 0..workers - 1 {
        partitions.push(Partition {
            index,
            start: index * chunk,
            end: (index + 1) * chunk,
        });
    }
    partitions.push(Partition {
        index: workers - 1,
        start: (workers - 1) * chunk,
        end: n,
    });

    partitions
}

/// `n` 件を `block_size` 件ずつのブロックに分割（ストリーミング集計用）
///
/// ブロック数は `ceil(n / block_size)`。最後のブロックだけ短くなりうる。
/// `block_size == 0` は1として扱う。
pub fn partition_blocks(n: usize, block_size: usize) -> Vec<Partition> {
    let block_size = block_size.max(1);

    (0..n.div_ceil(block_size))
        .map(|index| Partition {
            index,
            start: index * block_size,
            end: ((index + 1) * block_size).min(n),
        })
        .collect()
}

/// 要求されたワーカー数を実効値に正規化
///
/// 0 は単一パーティション要求として1、上限を超える要求は上限に切り詰める。
pub fn effective_workers(requested: usize, ceiling: usize) -> usize {
    let ceiling = ceiling.max(1);
    let requested = requested.max(1);

    if requested > ceiling {
        tracing::warn!(requested, ceiling, "ワーカー数が上限を超えたため切り詰めます");
        return ceiling;
    }
    requested
}
