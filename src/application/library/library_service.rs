use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LibraryConfig;
use crate::domain::{
    Book, BookId, Borrower, BorrowerId, ClosedTransaction, DomainEvent, OpenTransaction,
    TransactionId,
};

use super::catalog::Catalog;
use super::directory::Directory;
use super::errors::{LibraryError, Reference, Result};
use super::ledger::Ledger;

/// 返却結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub borrower_id: BorrowerId,
    pub returned_at: DateTime<Utc>,
    pub days_overdue: i64,
    pub fine: Decimal,
}

impl From<&ClosedTransaction> for ReturnReceipt {
    fn from(closed: &ClosedTransaction) -> Self {
        Self {
            transaction_id: closed.transaction_id,
            book_id: closed.book_id,
            borrower_id: closed.borrower_id,
            returned_at: closed.returned_at,
            days_overdue: closed.days_overdue,
            fine: closed.fine,
        }
    }
}

/// 図書館サービス
///
/// カタログ・ディレクトリ・貸出台帳を束ね、エンティティ間の不変条件を守る：
/// - 書籍が貸出不可 ⇔ その書籍を参照する貸出中の取引がちょうど1件ある
/// - 失敗した操作は状態を一切変更しない
///
/// 同期・単一スレッド前提。並行利用する場合は`SharedLibrary`を経由する。
#[derive(Debug)]
pub struct LibraryService {
    config: LibraryConfig,
    catalog: Catalog,
    directory: Directory,
    ledger: Ledger,
    events: Vec<DomainEvent>,
}

impl LibraryService {
    pub fn new(config: LibraryConfig) -> Self {
        Self {
            ledger: Ledger::new(config.fine_policy()),
            config,
            catalog: Catalog::new(),
            directory: Directory::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // 登録
    // ------------------------------------------------------------------------

    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> BookId {
        let (book_id, event) = self.catalog.add_book(title, author, isbn);
        info!(book_id = %book_id, "book added");
        self.events.push(DomainEvent::BookAdded(event));
        book_id
    }

    pub fn add_borrower(
        &mut self,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> BorrowerId {
        let (borrower_id, event) = self.directory.add_borrower(name, contact);
        info!(borrower_id = %borrower_id, "borrower added");
        self.events.push(DomainEvent::BorrowerRegistered(event));
        borrower_id
    }

    // ------------------------------------------------------------------------
    // 貸出・返却
    // ------------------------------------------------------------------------

    /// 書籍を貸し出す
    ///
    /// 処理順序：書籍の解決 → 貸出可否の確認 → 台帳への記録 → 貸出可否の反転。
    /// 台帳への記録が失敗した場合、貸出可否は変更されない。
    ///
    /// # エラー
    /// - InvalidReference: 書籍または利用者が存在しない
    /// - BookUnavailable: 書籍が貸出中
    pub fn checkout(
        &mut self,
        book_id: BookId,
        borrower_id: BorrowerId,
        now: DateTime<Utc>,
    ) -> Result<TransactionId> {
        let Self {
            catalog,
            directory,
            ledger,
            events,
            ..
        } = self;

        // 1. 書籍の解決と貸出可否の確認
        let Some(book) = catalog.get(book_id) else {
            return Err(LibraryError::InvalidReference(Reference::Book(book_id)));
        };
        if !book.available {
            return Err(LibraryError::BookUnavailable(book_id));
        }

        // 2. 台帳に記録（利用者の存在確認を含む）
        let (transaction_id, event) = ledger.open(catalog, directory, book_id, borrower_id, now)?;

        // 3. 貸出可否を反転
        catalog.set_availability(book_id, false)?;

        info!(
            transaction_id = %transaction_id,
            book_id = %book_id,
            borrower_id = %borrower_id,
            "book checked out"
        );
        events.push(DomainEvent::BookCheckedOut(event));
        Ok(transaction_id)
    }

    /// 書籍を返却する
    ///
    /// 台帳の取引を終了し、参照先の書籍をIDで貸出可能に戻す。
    /// 書籍レコードを再登録することはない。
    ///
    /// # エラー
    /// - NotFound: 貸出中の取引が存在しない（返却済みを含む）
    pub fn return_book(
        &mut self,
        transaction_id: TransactionId,
        now: DateTime<Utc>,
    ) -> Result<ReturnReceipt> {
        let (closed, event) = self.ledger.close(transaction_id, now)?;
        self.catalog.set_availability(closed.book_id, true)?;

        let receipt = ReturnReceipt::from(&closed);
        info!(
            transaction_id = %transaction_id,
            book_id = %receipt.book_id,
            days_overdue = receipt.days_overdue,
            fine = %receipt.fine,
            "book returned"
        );
        self.events.push(DomainEvent::BookReturned(event));
        Ok(receipt)
    }

    // ------------------------------------------------------------------------
    // 参照（副作用なし）
    // ------------------------------------------------------------------------

    pub fn search(&self, keyword: &str) -> Vec<Book> {
        self.catalog.find_by_keyword(keyword)
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.catalog.list().to_vec()
    }

    pub fn list_borrowers(&self) -> Vec<Borrower> {
        self.directory.list().to_vec()
    }

    pub fn get_book(&self, book_id: BookId) -> Result<&Book> {
        self.catalog
            .get(book_id)
            .ok_or(LibraryError::NotFound(Reference::Book(book_id)))
    }

    pub fn get_borrower(&self, borrower_id: BorrowerId) -> Result<&Borrower> {
        self.directory.get(borrower_id)
    }

    pub fn get_open_transaction(&self, transaction_id: TransactionId) -> Result<&OpenTransaction> {
        let reference = Reference::Transaction(transaction_id);
        self.ledger
            .get_open(transaction_id)
            .ok_or(LibraryError::NotFound(reference))
    }

    pub fn open_transactions(&self) -> Vec<OpenTransaction> {
        self.ledger.open_transactions().to_vec()
    }

    /// 返却済み取引の履歴（返却順）
    pub fn history(&self) -> Vec<ClosedTransaction> {
        self.ledger.history().to_vec()
    }

    /// 発生したドメインイベント（発生順）
    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }
}

impl Default for LibraryService {
    fn default() -> Self {
        Self::new(LibraryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    /// 書籍ごとに「貸出不可 ⇔ 貸出中の取引がちょうど1件」を検証する
    fn assert_availability_invariant(library: &LibraryService) {
        for book in library.list_books() {
            let open = library
                .open_transactions()
                .iter()
                .filter(|tx| tx.book_id == book.id)
                .count();
            assert_eq!(!book.available, open == 1, "book {}", book.id);
            assert!(open <= 1, "book {} has {} open transactions", book.id, open);
        }
    }

    fn library_with_dune() -> (LibraryService, BookId, BorrowerId) {
        let mut library = LibraryService::default();
        let book = library.add_book("Dune", "Herbert", "ISBN1");
        let borrower = library.add_borrower("Alice", "alice@x");
        (library, book, borrower)
    }

    #[test]
    fn test_checkout_marks_book_unavailable() {
        let (mut library, book, borrower) = library_with_dune();

        let tx = library.checkout(book, borrower, t0()).unwrap();

        assert!(!library.get_book(book).unwrap().available);
        let open = library.get_open_transaction(tx).unwrap();
        assert_eq!(open.book_id, book);
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_checkout_unavailable_book_leaves_state_unchanged() {
        let (mut library, book, borrower) = library_with_dune();
        let other = library.add_borrower("Bob", "bob@x");
        library.checkout(book, borrower, t0()).unwrap();
        let events_before = library.events().len();

        let result = library.checkout(book, other, t0());

        assert_eq!(result.unwrap_err(), LibraryError::BookUnavailable(book));
        assert_eq!(library.open_transactions().len(), 1);
        assert_eq!(library.events().len(), events_before);
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_checkout_unknown_book_is_invalid_reference() {
        let (mut library, _, borrower) = library_with_dune();

        let result = library.checkout(BookId::new(42), borrower, t0());

        assert_eq!(
            result.unwrap_err(),
            LibraryError::InvalidReference(Reference::Book(BookId::new(42)))
        );
    }

    #[test]
    fn test_checkout_unknown_borrower_does_not_mutate() {
        let (mut library, book, _) = library_with_dune();

        let result = library.checkout(book, BorrowerId::new(7), t0());

        assert_eq!(
            result.unwrap_err(),
            LibraryError::InvalidReference(Reference::Borrower(BorrowerId::new(7)))
        );
        assert!(library.get_book(book).unwrap().available);
        assert!(library.open_transactions().is_empty());
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_return_restores_availability_without_duplicating_book() {
        let (mut library, book, borrower) = library_with_dune();
        let tx = library.checkout(book, borrower, t0()).unwrap();

        let receipt = library.return_book(tx, t0() + Duration::days(3)).unwrap();

        assert_eq!(receipt.fine, Decimal::ZERO);
        assert_eq!(receipt.book_id, book);
        assert!(library.get_book(book).unwrap().available);
        assert_eq!(library.list_books().len(), 1);
        assert_eq!(library.history().len(), 1);
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_return_twice_fails() {
        let (mut library, book, borrower) = library_with_dune();
        let tx = library.checkout(book, borrower, t0()).unwrap();
        library.return_book(tx, t0() + Duration::days(1)).unwrap();

        let result = library.return_book(tx, t0() + Duration::days(2));

        assert_eq!(
            result.unwrap_err(),
            LibraryError::NotFound(Reference::Transaction(tx))
        );
        assert!(library.get_book(book).unwrap().available);
    }

    #[test]
    fn test_book_can_be_checked_out_again_after_return() {
        let (mut library, book, borrower) = library_with_dune();
        let first = library.checkout(book, borrower, t0()).unwrap();
        let returned_at = t0() + Duration::days(2);
        library.return_book(first, returned_at).unwrap();

        let later = t0() + Duration::days(3);
        let second = library.checkout(book, borrower, later).unwrap();

        assert_ne!(first, second);
        assert!(!library.get_book(book).unwrap().available);
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_overdue_return_with_custom_config() {
        let config = LibraryConfig::new(7, dec!(1.00));
        let mut library = LibraryService::new(config);
        let book = library.add_book("Emma", "Austen", "ISBN2");
        let borrower = library.add_borrower("Bob", "bob@x");
        let tx = library.checkout(book, borrower, t0()).unwrap();

        let receipt = library.return_book(tx, t0() + Duration::days(10)).unwrap();

        assert_eq!(receipt.days_overdue, 3);
        assert_eq!(receipt.fine, dec!(3.00));
    }

    #[test]
    fn test_return_with_huge_rate_keeps_state_consistent() {
        let config = LibraryConfig::new(14, Decimal::MAX);
        let mut library = LibraryService::new(config);
        let book = library.add_book("Dune", "Herbert", "ISBN1");
        let borrower = library.add_borrower("Alice", "alice@x");
        let tx = library.checkout(book, borrower, t0()).unwrap();

        let receipt = library.return_book(tx, t0() + Duration::days(20)).unwrap();

        assert_eq!(receipt.days_overdue, 6);
        assert_eq!(receipt.fine, Decimal::MAX);
        assert!(library.get_book(book).unwrap().available);
        assert!(library.open_transactions().is_empty());
        assert_eq!(library.history().len(), 1);
        assert_availability_invariant(&library);
    }

    #[test]
    fn test_events_are_journaled_in_order() {
        let (mut library, book, borrower) = library_with_dune();
        let tx = library.checkout(book, borrower, t0()).unwrap();
        library.return_book(tx, t0() + Duration::days(20)).unwrap();

        let events = library.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], DomainEvent::BookAdded(_)));
        assert!(matches!(events[1], DomainEvent::BorrowerRegistered(_)));
        assert!(matches!(events[2], DomainEvent::BookCheckedOut(_)));
        match &events[3] {
            DomainEvent::BookReturned(e) => {
                assert_eq!(e.transaction_id, tx);
                assert_eq!(e.fine, dec!(3.00));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_read_operations_have_no_side_effects() {
        let (library, _, _) = library_with_dune();
        let events_before = library.events().len();

        let _ = library.search("Dune");
        let _ = library.list_books();
        let _ = library.list_borrowers();

        assert_eq!(library.events().len(), events_before);
    }
}
