use serde::{Deserialize, Serialize};

use super::BorrowerId;

/// 利用者エンティティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
    /// 連絡先（メールアドレスや電話番号など、形式は問わない）
    pub contact: String,
}

impl Borrower {
    pub fn new(id: BorrowerId, name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            contact: contact.into(),
        }
    }
}
