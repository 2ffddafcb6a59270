// 設定管理の具象実装

use crate::core::{AggregationConfig, MergeMode};
use std::str::FromStr;

/// ワーカー数の既定上限（タスク生成の暴走を防ぐ）
pub const DEFAULT_MAX_WORKERS: usize = 1024;

/// 進捗ストリーミングの既定ブロックサイズ
pub const DEFAULT_PROGRESS_BLOCK_SIZE: usize = 1_000_000;

pub const ENV_DEFAULT_WORKERS: &str = "WALLET_DEFAULT_WORKERS";
pub const ENV_MAX_WORKERS: &str = "WALLET_MAX_WORKERS";
pub const ENV_CHANNEL_BUFFER: &str = "WALLET_CHANNEL_BUFFER";
pub const ENV_PROGRESS_BLOCK: &str = "WALLET_PROGRESS_BLOCK";
pub const ENV_MERGE_MODE: &str = "WALLET_MERGE_MODE";

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultAggregationConfig {
    default_workers: usize,
    max_workers: usize,
    buffer_size: usize,
    progress_block_size: usize,
    merge_mode: MergeMode,
    enable_progress: bool,
}

impl DefaultAggregationConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            default_workers: cpu_count.max(1),
            ..Self::default()
        }
    }

    /// 環境変数から設定を読み込む（未設定・不正値は既定値）
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            default_workers: parse_or(&lookup, ENV_DEFAULT_WORKERS, defaults.default_workers),
            max_workers: parse_or(&lookup, ENV_MAX_WORKERS, defaults.max_workers),
            buffer_size: parse_or(&lookup, ENV_CHANNEL_BUFFER, defaults.buffer_size),
            progress_block_size: parse_or(
                &lookup,
                ENV_PROGRESS_BLOCK,
                defaults.progress_block_size,
            ),
            merge_mode: parse_or(&lookup, ENV_MERGE_MODE, defaults.merge_mode),
            enable_progress: defaults.enable_progress,
        }
    }

    pub fn with_default_workers(mut self, default_workers: usize) -> Self {
        self.default_workers = default_workers;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_progress_block_size(mut self, progress_block_size: usize) -> Self {
        self.progress_block_size = progress_block_size;
        self
    }

    pub fn with_merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = merge_mode;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultAggregationConfig {
    fn default() -> Self {
        Self {
            default_workers: num_cpus::get().max(1),
            max_workers: DEFAULT_MAX_WORKERS,
            buffer_size: 100,
            progress_block_size: DEFAULT_PROGRESS_BLOCK_SIZE,
            merge_mode: MergeMode::default(),
            enable_progress: true,
        }
    }
}

impl AggregationConfig for DefaultAggregationConfig {
    fn default_workers(&self) -> usize {
        self.default_workers
    }

    fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn channel_buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn progress_block_size(&self) -> usize {
        self.progress_block_size
    }

    fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "設定値を解釈できないため既定値を使用します");
            default
        }),
        None => default,
    }
}
