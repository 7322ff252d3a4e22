use std::fmt;

use thiserror::Error;

use crate::domain::{BookId, BorrowerId, TransactionId};

/// エラーが指し示す参照先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Book(BookId),
    Borrower(BorrowerId),
    Transaction(TransactionId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Book(id) => write!(f, "book {}", id),
            Reference::Borrower(id) => write!(f, "borrower {}", id),
            Reference::Transaction(id) => write!(f, "transaction {}", id),
        }
    }
}

/// 図書館サービスのエラー
///
/// いずれも致命的ではなく、入力を直せば再試行できる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// 指定されたIDが存在しない（返却済みの取引を含む）
    #[error("{0} not found")]
    NotFound(Reference),

    /// 貸出が存在しない書籍・利用者を参照している
    #[error("invalid reference: {0} does not exist")]
    InvalidReference(Reference),

    /// 書籍が既に貸出中
    #[error("book {0} is not available for checkout")]
    BookUnavailable(BookId),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryError>;
