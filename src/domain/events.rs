use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookId, BorrowerId, TransactionId};

/// イベント：書籍がカタログに登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAdded {
    pub book_id: BookId,
    pub isbn: String,
}

/// イベント：利用者が登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerRegistered {
    pub borrower_id: BorrowerId,
}

/// イベント：書籍が貸し出された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCheckedOut {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub borrower_id: BorrowerId,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// イベント：書籍が返却された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReturned {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub borrower_id: BorrowerId,
    pub returned_at: DateTime<Utc>,
    pub days_overdue: i64,
    pub fine: Decimal,
}

/// ドメインイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEvent {
    BookAdded(BookAdded),
    BorrowerRegistered(BorrowerRegistered),
    BookCheckedOut(BookCheckedOut),
    BookReturned(BookReturned),
}
