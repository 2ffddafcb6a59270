use crate::core::{AccountId, MergeMode};
use crate::services::LogFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wallet_aggregate")]
#[command(about = "Partitioned parallel aggregation over a synthetic wallet ledger")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: DemoOptions,
}

#[derive(Args, Clone, Debug)]
pub struct DemoOptions {
    /// Number of accounts in the synthetic ledger
    #[arg(long, global = true, default_value = "10")]
    pub accounts: usize,

    /// Number of payments in the synthetic ledger
    #[arg(long, global = true, default_value = "100000")]
    pub payments: usize,

    /// Number of partitions (0 = single partition, default = CPU count)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// How partial results are merged
    #[arg(short, long, global = true, value_enum)]
    pub merge_mode: Option<MergeModeArg>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sum all payment amounts in parallel
    Sum,

    /// List payments belonging to one account
    Filter {
        /// Account ID to filter by
        #[arg(short, long)]
        account: AccountId,

        /// Print matched payments, not only the count
        #[arg(long)]
        list: bool,
    },

    /// Stream per-block partial sums
    Progress {
        /// Records per block (0 = configured default)
        #[arg(short, long, default_value = "0")]
        block_size: usize,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum MergeModeArg {
    Channel,
    SharedLock,
}

impl From<MergeModeArg> for MergeMode {
    fn from(arg: MergeModeArg) -> Self {
        match arg {
            MergeModeArg::Channel => MergeMode::Channel,
            MergeModeArg::SharedLock => MergeMode::SharedLock,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
