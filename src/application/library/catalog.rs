use tracing::debug;

use crate::domain::{Book, BookAdded, BookId, Sequence};

use super::errors::{LibraryError, Reference, Result};

/// 書籍カタログ
///
/// 書籍レコードの唯一の所有者。登録順を保持する。
#[derive(Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
    ids: Sequence,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書籍を登録する（常に成功、貸出可能な状態で追加）
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> (BookId, BookAdded) {
        let id = BookId::new(self.ids.next_value());
        let book = Book::new(id, title, author, isbn);
        debug!(book_id = %id, isbn = %book.isbn, "book added to catalog");

        let event = BookAdded {
            book_id: id,
            isbn: book.isbn.clone(),
        };
        self.books.push(book);
        (id, event)
    }

    /// タイトル・著者・ISBNの完全一致で検索する
    pub fn find_by_keyword(&self, keyword: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| book.matches_keyword(keyword))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.position(id).map(|idx| &self.books[idx])
    }

    /// 貸出可否を切り替える（図書館サービスからのみ使用）
    pub(crate) fn set_availability(&mut self, id: BookId, available: bool) -> Result<()> {
        let idx = self
            .position(id)
            .ok_or(LibraryError::NotFound(Reference::Book(id)))?;
        self.books[idx].available = available;
        Ok(())
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    // IDは登録順に単調増加するため二分探索できる
    fn position(&self, id: BookId) -> Option<usize> {
        self.books.binary_search_by_key(&id, |book| book.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_book_assigns_sequential_ids() {
        let mut catalog = Catalog::new();
        let (first, event) = catalog.add_book("Dune", "Herbert", "ISBN1");
        let (second, _) = catalog.add_book("Emma", "Austen", "ISBN2");

        assert_eq!(first, BookId::new(0));
        assert_eq!(second, BookId::new(1));
        assert_eq!(event.book_id, first);
        assert_eq!(event.isbn, "ISBN1");
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(first).unwrap().available);
    }

    #[test]
    fn test_find_by_keyword_returns_all_matches() {
        let mut catalog = Catalog::new();
        catalog.add_book("Dune", "Herbert", "ISBN1");
        catalog.add_book("Dune Messiah", "Herbert", "ISBN2");
        catalog.add_book("Emma", "Austen", "ISBN3");

        let by_author = catalog.find_by_keyword("Herbert");
        assert_eq!(by_author.len(), 2);

        let by_title = catalog.find_by_keyword("Dune");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].isbn, "ISBN1");

        assert!(catalog.find_by_keyword("herbert").is_empty());
    }

    #[test]
    fn test_set_availability() {
        let mut catalog = Catalog::new();
        let (id, _) = catalog.add_book("Dune", "Herbert", "ISBN1");

        catalog.set_availability(id, false).unwrap();
        assert!(!catalog.get(id).unwrap().available);

        catalog.set_availability(id, true).unwrap();
        assert!(catalog.get(id).unwrap().available);
    }

    #[test]
    fn test_set_availability_unknown_id() {
        let mut catalog = Catalog::new();
        let result = catalog.set_availability(BookId::new(3), false);
        assert_eq!(
            result,
            Err(LibraryError::NotFound(Reference::Book(BookId::new(3))))
        );
    }
}
