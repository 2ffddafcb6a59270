// 集計エンジンとレジャーで共有するデータ型定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Range, Sub, SubAssign};
use std::str::FromStr;

/// 金額（最小通貨単位の符号付き整数）
///
/// 四則演算と `Sum` は2の補数で折り返す（panicしない）。
/// 残高のように範囲外を拒否したい箇所は `checked_add` を使う。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type AccountId = i64;

/// 電話番号（アカウントの一意キー）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub fn new(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Phone {
    fn from(phone: &str) -> Self {
        Self::new(phone)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 支払いカテゴリ
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentCategory(String);

impl PaymentCategory {
    pub fn new(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    pub fn food() -> Self {
        Self::new("food")
    }

    pub fn it() -> Self {
        Self::new("it")
    }

    pub fn shop() -> Self {
        Self::new("shop")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PaymentCategory {
    fn from(category: &str) -> Self {
        Self::new(category)
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 支払いステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::InProgress => "INPROGRESS",
        };
        f.write_str(label)
    }
}

/// 支払いレコード（集計対象）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub account_id: AccountId,
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: Phone,
    pub balance: Money,
}

/// お気に入り支払いテンプレート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}

/// レコード列上の半開区間 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Partition {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// ワーカー1つ分の部分結果（パーティション番号付き）
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult<P> {
    pub partition_index: usize,
    pub value: P,
}

/// ストリーミング集計で1ブロック完了ごとに送られるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub part: usize,
    pub result: Money,
}

/// 集計の種類（進捗報告で使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Sum,
    Filter,
    Progress,
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sum => "sum",
            Self::Filter => "filter",
            Self::Progress => "progress",
        };
        f.write_str(label)
    }
}

/// 部分結果の合流方式
///
/// - `Channel`: ワーカーは部分結果をチャンネルで手渡しし、単一所有者が
///   パーティション順に畳み込む（決定的）
/// - `SharedLock`: ワーカーがMutexで保護された共有アキュムレータへ直接合流する
///   （フィルタ結果の順序はワーカー完了順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    Channel,
    SharedLock,
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "channel" => Ok(Self::Channel),
            "shared_lock" | "shared-lock" | "lock" => Ok(Self::SharedLock),
            other => Err(format!("不明な合流方式: {other}")),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel => f.write_str("channel"),
            Self::SharedLock => f.write_str("shared_lock"),
        }
    }
}
