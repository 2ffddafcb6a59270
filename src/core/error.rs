// 集計エンジンとレジャーのカスタムエラー型定義

use super::types::AccountId;
use thiserror::Error;

/// 集計エンジン固有のエラー型
///
/// 正しい入力に対する集計そのものは失敗しない。ここに現れるのは設定不備と
/// ワーカータスクの異常終了（述語のpanic等）のみ。
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("アキュムレータエラー: {message}")]
    AccumulatorError { message: String },
}

impl AggregationError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// アキュムレータエラーの作成
    pub fn accumulator(message: impl Into<String>) -> Self {
        Self::AccumulatorError {
            message: message.into(),
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::High,
            Self::TaskError { .. } => ErrorSeverity::Critical,
            Self::AccumulatorError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 同じ入力で再実行して回復しうるかどうか
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigurationError { .. } => false,
            Self::TaskError { source } => source.is_cancelled(),
            Self::AccumulatorError { .. } => false,
        }
    }
}

impl From<tokio::task::JoinError> for AggregationError {
    fn from(error: tokio::task::JoinError) -> Self {
        AggregationError::TaskError { source: error }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - ログ出力程度
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// レジャー操作のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("電話番号は既に登録されています")]
    PhoneRegistered,

    #[error("金額は0より大きい必要があります")]
    AmountMustBePositive,

    #[error("アカウントが見つかりません: {account_id}")]
    AccountNotFound { account_id: AccountId },

    #[error("残高が不足しています")]
    NotEnoughBalance,

    #[error("支払いが見つかりません: {payment_id}")]
    PaymentNotFound { payment_id: String },

    #[error("アカウントを登録できません")]
    CannotRegisterAccount,

    #[error("アカウントに入金できません")]
    CannotDepositAccount,

    #[error("お気に入り支払いが見つかりません: {favorite_id}")]
    FavoriteNotFound { favorite_id: String },

    #[error("残高が上限を超えます: {account_id}")]
    BalanceOverflow { account_id: AccountId },
}

/// ウォレット全体のエラー型（レジャー + 集計）
#[derive(Error, Debug)]
pub enum WalletError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// 集計の結果型
pub type AggregationResult<T> = std::result::Result<T, AggregationError>;

/// レジャー操作の結果型
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// ウォレット操作の結果型
pub type WalletResult<T> = std::result::Result<T, WalletError>;
