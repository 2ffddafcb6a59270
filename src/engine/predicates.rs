// 支払いフィルタ用の述語ビルダー
// エンジン自体は述語の意味に関知しない

use crate::core::{AccountId, Payment, PaymentCategory, PaymentStatus};

pub fn by_account(account_id: AccountId) -> impl Fn(&Payment) -> bool + Send + Sync + 'static {
    move |payment: &Payment| payment.account_id == account_id
}

pub fn by_category(category: PaymentCategory) -> impl Fn(&Payment) -> bool + Send + Sync + 'static {
    move |payment: &Payment| payment.category == category
}

pub fn by_status(status: PaymentStatus) -> impl Fn(&Payment) -> bool + Send + Sync + 'static {
    move |payment: &Payment| payment.status == status
}
