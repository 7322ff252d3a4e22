use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::library::{CheckoutReceipt, ReturnReceipt};
use crate::domain::{
    Book, BookId, Borrower, BorrowerId, ClosedTransaction, OpenTransaction,
    commands::{AddBook, AddBorrower, CheckoutBook},
};

// ============================================================================
// Requests
// ============================================================================

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl AddBookRequest {
    pub fn to_command(self) -> AddBook {
        AddBook {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        }
    }
}

/// 利用者登録リクエスト（POST /borrowers）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBorrowerRequest {
    pub name: String,
    pub contact: String,
}

impl AddBorrowerRequest {
    pub fn to_command(self) -> AddBorrower {
        AddBorrower {
            name: self.name,
            contact: self.contact,
        }
    }
}

/// 貸出リクエスト（POST /checkouts）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub book_id: u64,
    pub borrower_id: u64,
}

impl CheckoutRequest {
    pub fn to_command(&self) -> CheckoutBook {
        CheckoutBook {
            book_id: BookId::new(self.book_id),
            borrower_id: BorrowerId::new(self.borrower_id),
        }
    }
}

/// 書籍検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: u64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available: bool,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.id.value(),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            available: book.available,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowerResponse {
    pub borrower_id: u64,
    pub name: String,
    pub contact: String,
}

impl From<Borrower> for BorrowerResponse {
    fn from(borrower: Borrower) -> Self {
        Self {
            borrower_id: borrower.id.value(),
            name: borrower.name,
            contact: borrower.contact,
        }
    }
}

/// 貸出レスポンス（POST /checkouts）
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub transaction_id: Uuid,
    pub book_id: u64,
    pub borrower_id: u64,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl From<CheckoutReceipt> for CheckoutResponse {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_id.value(),
            book_id: receipt.book_id.value(),
            borrower_id: receipt.borrower_id.value(),
            checked_out_at: receipt.checked_out_at,
            due_date: receipt.due_date,
        }
    }
}

/// 返却レスポンス（POST /checkouts/:id/return）
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnResponse {
    pub transaction_id: Uuid,
    pub book_id: u64,
    pub borrower_id: u64,
    pub returned_at: DateTime<Utc>,
    pub days_overdue: i64,
    pub fine: Decimal,
}

impl From<ReturnReceipt> for ReturnResponse {
    fn from(receipt: ReturnReceipt) -> Self {
        Self {
            transaction_id: receipt.transaction_id.value(),
            book_id: receipt.book_id.value(),
            borrower_id: receipt.borrower_id.value(),
            returned_at: receipt.returned_at,
            days_overdue: receipt.days_overdue,
            fine: receipt.fine.round_dp(2),
        }
    }
}

/// 取引レスポンス（GET /checkouts と GET /checkouts/history）
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: Uuid,
    pub book_id: u64,
    pub borrower_id: u64,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub fine: Option<Decimal>,
    /// "open" または "returned"
    pub status: String,
}

impl From<OpenTransaction> for TransactionResponse {
    fn from(tx: OpenTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.value(),
            book_id: tx.book_id.value(),
            borrower_id: tx.borrower_id.value(),
            checked_out_at: tx.checked_out_at,
            due_date: tx.due_date,
            returned_at: None,
            fine: None,
            status: "open".to_string(),
        }
    }
}

impl From<ClosedTransaction> for TransactionResponse {
    fn from(tx: ClosedTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id.value(),
            book_id: tx.book_id.value(),
            borrower_id: tx.borrower_id.value(),
            checked_out_at: tx.checked_out_at,
            due_date: tx.due_date,
            returned_at: Some(tx.returned_at),
            fine: Some(tx.fine.round_dp(2)),
            status: "returned".to_string(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
