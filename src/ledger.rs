// Ledger - 口座・支払い・お気に入りのインメモリ台帳
// グローバル状態を持たず、呼び出し側が所有する明示的なコンテキスト

use crate::core::{
    Account, AccountId, Favorite, LedgerError, LedgerResult, Money, Payment, PaymentCategory,
    PaymentStatus, Phone,
};
use std::sync::Arc;
use uuid::Uuid;

/// インメモリ台帳
///
/// 口座IDは1から連番で採番し、支払い・お気に入りIDはUUID v4。
/// 支払いは作成順に保持され、集計はこの順序のスナップショットに対して行う。
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    next_account_id: AccountId,
    accounts: Vec<Account>,
    payments: Vec<Payment>,
    favorites: Vec<Favorite>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 口座を登録（残高0）
    pub fn register_account(&mut self, phone: impl Into<Phone>) -> LedgerResult<Account> {
        let phone = phone.into();
        if self.accounts.iter().any(|account| account.phone == phone) {
            return Err(LedgerError::PhoneRegistered);
        }

        self.next_account_id += 1;
        let account = Account {
            id: self.next_account_id,
            phone,
            balance: Money::ZERO,
        };
        self.accounts.push(account.clone());
        tracing::debug!(account_id = account.id, "口座を登録");

        Ok(account)
    }

    /// 口座へ入金
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::AmountMustBePositive);
        }

        let account = self.account_mut(account_id)?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account_id })?;
        Ok(())
    }

    /// 支払いを作成（状態はInProgress）
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> LedgerResult<Payment> {
        if !amount.is_positive() {
            return Err(LedgerError::AmountMustBePositive);
        }

        let account = self.account_mut(account_id)?;
        if account.balance < amount {
            return Err(LedgerError::NotEnoughBalance);
        }
        account.balance -= amount;

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        };
        self.payments.push(payment.clone());

        Ok(payment)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> LedgerResult<&Account> {
        self.accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or(LedgerError::AccountNotFound { account_id })
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> LedgerResult<&Payment> {
        self.payments
            .iter()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| LedgerError::PaymentNotFound {
                payment_id: payment_id.to_string(),
            })
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> LedgerResult<&Favorite> {
        self.favorites
            .iter()
            .find(|favorite| favorite.id == favorite_id)
            .ok_or_else(|| LedgerError::FavoriteNotFound {
                favorite_id: favorite_id.to_string(),
            })
    }

    /// 支払いを取り消し、金額を口座へ戻す
    pub fn reject(&mut self, payment_id: &str) -> LedgerResult<()> {
        let (account_id, amount) = {
            let payment = self.find_payment_by_id(payment_id)?;
            (payment.account_id, payment.amount)
        };
        // 口座の存在を先に確認してから状態を変更する
        self.find_account_by_id(account_id)?;

        if let Some(payment) = self.payments.iter_mut().find(|p| p.id == payment_id) {
            payment.status = PaymentStatus::Fail;
        }
        self.account_mut(account_id)?.balance += amount;

        Ok(())
    }

    /// 口座を登録して初期残高を入金
    pub fn add_account_with_balance(
        &mut self,
        phone: impl Into<Phone>,
        balance: Money,
    ) -> LedgerResult<Account> {
        let account = self
            .register_account(phone)
            .map_err(|_| LedgerError::CannotRegisterAccount)?;

        self.deposit(account.id, balance)
            .map_err(|_| LedgerError::CannotDepositAccount)?;

        Ok(self.find_account_by_id(account.id)?.clone())
    }

    /// 既存の支払いと同じ口座・金額・カテゴリで新しい支払いを作成
    pub fn repeat(&mut self, payment_id: &str) -> LedgerResult<Payment> {
        let payment = self.find_payment_by_id(payment_id)?.clone();
        self.pay(payment.account_id, payment.amount, payment.category)
    }

    /// 支払いをお気に入りとして保存
    pub fn favorite_payment(&mut self, payment_id: &str, name: &str) -> LedgerResult<Favorite> {
        let payment = self.find_payment_by_id(payment_id)?;
        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            account_id: payment.account_id,
            name: name.to_string(),
            amount: payment.amount,
            category: payment.category.clone(),
        };
        self.favorites.push(favorite.clone());

        Ok(favorite)
    }

    /// お気に入りから支払いを作成
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> LedgerResult<Payment> {
        let favorite = self.find_favorite_by_id(favorite_id)?.clone();
        self.pay(favorite.account_id, favorite.amount, favorite.category)
    }

    /// 口座の支払い履歴（作成順）
    pub fn account_history(&self, account_id: AccountId) -> LedgerResult<Vec<Payment>> {
        self.find_account_by_id(account_id)?;
        Ok(self
            .payments
            .iter()
            .filter(|payment| payment.account_id == account_id)
            .cloned()
            .collect())
    }

    /// 集計用の読み取り専用スナップショット
    pub fn payments_snapshot(&self) -> Arc<[Payment]> {
        Arc::from(self.payments.as_slice())
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    fn account_mut(&mut self, account_id: AccountId) -> LedgerResult<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or(LedgerError::AccountNotFound { account_id })
    }
}
