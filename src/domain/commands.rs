use serde::{Deserialize, Serialize};

use super::{BookId, BorrowerId, TransactionId};

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// コマンド：利用者を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBorrower {
    pub name: String,
    pub contact: String,
}

/// コマンド：書籍を貸し出す
///
/// 貸出日時はコマンドに含めず、実行時に時計から取得する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutBook {
    pub book_id: BookId,
    pub borrower_id: BorrowerId,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBook {
    pub transaction_id: TransactionId,
}
