use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookCheckedOut, BookId, BookReturned, BorrowerId, TransactionId};

/// 貸出期間（日数）の既定値
pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;

/// 1日あたりの延滞料金の既定値（0.50）
pub const DEFAULT_PER_DAY_FINE_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

// ============================================================================
// 延滞料金ポリシー
// ============================================================================

/// 延滞料金の計算ルール
///
/// 返却期限 = 貸出日時 + 貸出期間。期限を過ぎた日数に1日あたりの料金を
/// 掛けたものが延滞料金となる。
///
/// 超過日数は切り捨てではなく切り上げで数える。期限を少しでも過ぎた返却には
/// 必ず延滞料金が発生する。日単位ちょうどの超過では切り捨てと同じ結果になる。
/// 金額が`Decimal`の範囲を超える場合は`Decimal::MAX`で飽和する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinePolicy {
    pub loan_period_days: i64,
    pub per_day_rate: Decimal,
}

impl FinePolicy {
    pub fn new(loan_period_days: i64, per_day_rate: Decimal) -> Self {
        Self {
            loan_period_days,
            per_day_rate,
        }
    }

    pub fn loan_period(&self) -> Duration {
        Duration::days(self.loan_period_days)
    }

    /// 貸出日時から返却期限を求める
    pub fn due_date(&self, checked_out_at: DateTime<Utc>) -> DateTime<Utc> {
        checked_out_at + self.loan_period()
    }
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOAN_PERIOD_DAYS, DEFAULT_PER_DAY_FINE_RATE)
    }
}

/// 延滞料金の査定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineAssessment {
    pub days_overdue: i64,
    pub amount: Decimal,
}

impl FineAssessment {
    pub fn none() -> Self {
        Self {
            days_overdue: 0,
            amount: Decimal::ZERO,
        }
    }
}

/// 純粋関数：延滞日数
///
/// 期限ちょうど、または期限前の返却は0日。
/// 期限を1秒でも過ぎれば1日と数える（端数切り上げ）。
pub fn days_overdue(due_date: DateTime<Utc>, returned_at: DateTime<Utc>) -> i64 {
    let overdue = returned_at - due_date;
    if overdue <= Duration::zero() {
        return 0;
    }

    let whole_days = overdue.num_days();
    if overdue > Duration::days(whole_days) {
        whole_days + 1
    } else {
        whole_days
    }
}

/// 純粋関数：延滞料金を査定する
pub fn assess_fine(
    due_date: DateTime<Utc>,
    returned_at: DateTime<Utc>,
    per_day_rate: Decimal,
) -> FineAssessment {
    let days = days_overdue(due_date, returned_at);
    if days == 0 {
        return FineAssessment::none();
    }

    let amount = Decimal::from(days)
        .checked_mul(per_day_rate)
        .unwrap_or(Decimal::MAX);

    FineAssessment {
        days_overdue: days,
        amount,
    }
}

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// 貸出取引の共通フィールド
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCore {
    pub transaction_id: TransactionId,

    // 他の集約への参照（IDのみ）
    pub book_id: BookId,
    pub borrower_id: BorrowerId,

    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// 貸出中の取引
///
/// 返却日時・延滞料金を持たない（型で保証）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTransaction {
    #[serde(flatten)]
    pub core: TransactionCore,
}

impl std::ops::Deref for OpenTransaction {
    type Target = TransactionCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 返却済みの取引
///
/// 返却日時と延滞料金が必須（型で保証）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedTransaction {
    #[serde(flatten)]
    pub core: TransactionCore,
    pub returned_at: DateTime<Utc>,
    pub days_overdue: i64,
    pub fine: Decimal,
}

impl std::ops::Deref for ClosedTransaction {
    type Target = TransactionCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 純粋関数：貸出取引を開始する
///
/// 参照先の存在確認は呼び出し側（台帳）の責務。
/// 副作用なし。新しいOpenTransactionとイベントを返す。
pub fn open_transaction(
    book_id: BookId,
    borrower_id: BorrowerId,
    checked_out_at: DateTime<Utc>,
    policy: &FinePolicy,
) -> (OpenTransaction, BookCheckedOut) {
    let transaction_id = TransactionId::new();
    let due_date = policy.due_date(checked_out_at);

    let transaction = OpenTransaction {
        core: TransactionCore {
            transaction_id,
            book_id,
            borrower_id,
            checked_out_at,
            due_date,
        },
    };

    let event = BookCheckedOut {
        transaction_id,
        book_id,
        borrower_id,
        checked_out_at,
        due_date,
    };

    (transaction, event)
}

/// 純粋関数：貸出取引を終了する
///
/// OpenTransactionを消費するため、同じ取引を二度終了することはできない。
/// 副作用なし。ClosedTransactionとイベントを返す。
pub fn close_transaction(
    transaction: OpenTransaction,
    returned_at: DateTime<Utc>,
    policy: &FinePolicy,
) -> (ClosedTransaction, BookReturned) {
    let assessment = assess_fine(transaction.due_date, returned_at, policy.per_day_rate);

    let event = BookReturned {
        transaction_id: transaction.transaction_id,
        book_id: transaction.book_id,
        borrower_id: transaction.borrower_id,
        returned_at,
        days_overdue: assessment.days_overdue,
        fine: assessment.amount,
    };

    let closed = ClosedTransaction {
        core: transaction.core,
        returned_at,
        days_overdue: assessment.days_overdue,
        fine: assessment.amount,
    };

    (closed, event)
}
