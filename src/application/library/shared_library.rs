use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    Book, BookId, Borrower, BorrowerId, ClosedTransaction, OpenTransaction, TransactionId,
    commands::{AddBook, AddBorrower, CheckoutBook, ReturnBook},
};
use crate::ports::{Clock, NotificationService};

use super::errors::Result;
use super::library_service::{LibraryService, ReturnReceipt};

/// 貸出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub transaction_id: TransactionId,
    pub book_id: BookId,
    pub borrower_id: BorrowerId,
    pub checked_out_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl From<&OpenTransaction> for CheckoutReceipt {
    fn from(tx: &OpenTransaction) -> Self {
        Self {
            transaction_id: tx.transaction_id,
            book_id: tx.book_id,
            borrower_id: tx.borrower_id,
            checked_out_at: tx.checked_out_at,
            due_date: tx.due_date,
        }
    }
}

/// 複数の呼び出し元から共有される図書館
///
/// 図書館サービスを1つの`RwLock`で保護する：
/// - 更新系（登録・貸出・返却）は書き込みロックを取得し、
///   「確認してから更新する」一連の処理を不可分にする
/// - 参照系は読み取りロックで並行実行できる
///
/// 日時は書き込みロック取得後に`Clock`から取得し、控えの通知はロック解放後に送信する。
#[derive(Clone)]
pub struct SharedLibrary {
    library: Arc<RwLock<LibraryService>>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn NotificationService>,
}

impl SharedLibrary {
    pub fn new(
        library: LibraryService,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            library: Arc::new(RwLock::new(library)),
            clock,
            notifier,
        }
    }

    /// 書籍を登録し、登録されたレコードを返す
    pub async fn add_book(&self, cmd: AddBook) -> Result<Book> {
        let mut library = self.library.write().await;
        let book_id = library.add_book(cmd.title, cmd.author, cmd.isbn);
        library.get_book(book_id).cloned()
    }

    pub async fn add_borrower(&self, cmd: AddBorrower) -> Result<Borrower> {
        let mut library = self.library.write().await;
        let borrower_id = library.add_borrower(cmd.name, cmd.contact);
        library.get_borrower(borrower_id).cloned()
    }

    /// 書籍を貸し出し、利用者に貸出控えを送る
    ///
    /// # エラー
    /// `LibraryService::checkout`を参照
    pub async fn checkout(&self, cmd: CheckoutBook) -> Result<CheckoutReceipt> {
        let (receipt, contact, title) = {
            let mut library = self.library.write().await;
            let now = self.clock.now();
            let transaction_id = library.checkout(cmd.book_id, cmd.borrower_id, now)?;
            let receipt = CheckoutReceipt::from(library.get_open_transaction(transaction_id)?);
            let contact = library.get_borrower(cmd.borrower_id)?.contact.clone();
            let title = library.get_book(cmd.book_id)?.title.clone();
            (receipt, contact, title)
        };

        if let Err(e) = self
            .notifier
            .send_checkout_receipt(&contact, &title, receipt.due_date)
            .await
        {
            tracing::warn!(
                transaction_id = %receipt.transaction_id,
                "failed to send checkout receipt: {}",
                e
            );
        }

        Ok(receipt)
    }

    /// 書籍を返却し、利用者に返却控えを送る
    ///
    /// # エラー
    /// `LibraryService::return_book`を参照
    pub async fn return_book(&self, cmd: ReturnBook) -> Result<ReturnReceipt> {
        let (receipt, contact, title) = {
            let mut library = self.library.write().await;
            let now = self.clock.now();
            let receipt = library.return_book(cmd.transaction_id, now)?;
            let contact = library.get_borrower(receipt.borrower_id)?.contact.clone();
            let title = library.get_book(receipt.book_id)?.title.clone();
            (receipt, contact, title)
        };

        if let Err(e) = self
            .notifier
            .send_return_receipt(&contact, &title, receipt.fine)
            .await
        {
            tracing::warn!(
                transaction_id = %receipt.transaction_id,
                "failed to send return receipt: {}",
                e
            );
        }

        Ok(receipt)
    }

    pub async fn search(&self, keyword: &str) -> Vec<Book> {
        self.library.read().await.search(keyword)
    }

    pub async fn list_books(&self) -> Vec<Book> {
        self.library.read().await.list_books()
    }

    pub async fn list_borrowers(&self) -> Vec<Borrower> {
        self.library.read().await.list_borrowers()
    }

    pub async fn open_transactions(&self) -> Vec<OpenTransaction> {
        self.library.read().await.open_transactions()
    }

    pub async fn history(&self) -> Vec<ClosedTransaction> {
        self.library.read().await.history()
    }
}
