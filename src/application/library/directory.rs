use tracing::debug;

use crate::domain::{Borrower, BorrowerId, BorrowerRegistered, Sequence};

use super::errors::{LibraryError, Reference, Result};

/// 利用者ディレクトリ
#[derive(Debug, Default)]
pub struct Directory {
    borrowers: Vec<Borrower>,
    ids: Sequence,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_borrower(
        &mut self,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> (BorrowerId, BorrowerRegistered) {
        let id = BorrowerId::new(self.ids.next_value());
        self.borrowers.push(Borrower::new(id, name, contact));
        debug!(borrower_id = %id, "borrower registered");

        (id, BorrowerRegistered { borrower_id: id })
    }

    /// IDで利用者を取得する
    ///
    /// # エラー
    /// 存在しない場合は`LibraryError::NotFound`
    pub fn get(&self, id: BorrowerId) -> Result<&Borrower> {
        self.borrowers
            .binary_search_by_key(&id, |borrower| borrower.id)
            .map(|idx| &self.borrowers[idx])
            .map_err(|_| LibraryError::NotFound(Reference::Borrower(id)))
    }

    pub fn contains(&self, id: BorrowerId) -> bool {
        self.get(id).is_ok()
    }

    pub fn list(&self) -> &[Borrower] {
        &self.borrowers
    }
}
