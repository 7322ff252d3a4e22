use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    BookCheckedOut, BookId, BookReturned, BorrowerId, ClosedTransaction, FinePolicy,
    OpenTransaction, TransactionId,
    transaction::{close_transaction, open_transaction},
};

use super::catalog::Catalog;
use super::directory::Directory;
use super::errors::{LibraryError, Reference, Result};

/// 貸出台帳
///
/// 貸出中の取引と、返却済み取引の履歴を保持する。
/// 返却済み取引は削除せず履歴へ移す。
#[derive(Debug, Default)]
pub struct Ledger {
    policy: FinePolicy,
    open: Vec<OpenTransaction>,
    history: Vec<ClosedTransaction>,
}

impl Ledger {
    pub fn new(policy: FinePolicy) -> Self {
        Self {
            policy,
            open: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn policy(&self) -> &FinePolicy {
        &self.policy
    }

    /// 貸出取引を開始する
    ///
    /// # エラー
    /// 書籍または利用者が存在しない場合は`LibraryError::InvalidReference`。
    /// 失敗時は台帳を変更しない。
    pub fn open(
        &mut self,
        catalog: &Catalog,
        directory: &Directory,
        book_id: BookId,
        borrower_id: BorrowerId,
        now: DateTime<Utc>,
    ) -> Result<(TransactionId, BookCheckedOut)> {
        if catalog.get(book_id).is_none() {
            return Err(LibraryError::InvalidReference(Reference::Book(book_id)));
        }
        if !directory.contains(borrower_id) {
            let reference = Reference::Borrower(borrower_id);
            return Err(LibraryError::InvalidReference(reference));
        }

        let (transaction, event) = open_transaction(book_id, borrower_id, now, &self.policy);
        let transaction_id = transaction.transaction_id;
        debug!(
            transaction_id = %transaction_id,
            book_id = %book_id,
            borrower_id = %borrower_id,
            due_date = %transaction.due_date,
            "transaction opened"
        );

        self.open.push(transaction);
        Ok((transaction_id, event))
    }

    /// 貸出取引を終了し、延滞料金を確定する
    ///
    /// 延滞料金を確定してから貸出中の一覧から取り除く。
    ///
    /// # エラー
    /// 貸出中の取引に存在しない場合（返却済みを含む）は`LibraryError::NotFound`
    pub fn close(
        &mut self,
        transaction_id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<(ClosedTransaction, BookReturned)> {
        let Some(idx) = self.position(transaction_id) else {
            let reference = Reference::Transaction(transaction_id);
            return Err(LibraryError::NotFound(reference));
        };

        let transaction = self.open[idx].clone();
        let (closed, event) = close_transaction(transaction, now, &self.policy);
        self.open.remove(idx);
        debug!(
            transaction_id = %transaction_id,
            days_overdue = closed.days_overdue,
            fine = %closed.fine,
            "transaction closed"
        );

        self.history.push(closed.clone());
        Ok((closed, event))
    }

    pub fn get_open(&self, transaction_id: TransactionId) -> Option<&OpenTransaction> {
        self.position(transaction_id).map(|idx| &self.open[idx])
    }

    /// 指定した書籍を参照している貸出中の取引
    pub fn open_for_book(&self, book_id: BookId) -> Vec<&OpenTransaction> {
        self.open
            .iter()
            .filter(|tx| tx.book_id == book_id)
            .collect()
    }

    pub fn open_transactions(&self) -> &[OpenTransaction] {
        &self.open
    }

    pub fn history(&self) -> &[ClosedTransaction] {
        &self.history
    }

    fn position(&self, transaction_id: TransactionId) -> Option<usize> {
        self.open
            .iter()
            .position(|tx| tx.transaction_id == transaction_id)
    }
}
