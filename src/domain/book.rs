use serde::{Deserialize, Serialize};

use super::BookId;

/// 書籍エンティティ
///
/// カタログが唯一の所有者。貸出取引はBookIdのみを保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub available: bool,
}

impl Book {
    /// 新規登録時は貸出可能
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            available: true,
        }
    }

    /// キーワードがタイトル・著者・ISBNのいずれかと完全一致するか
    ///
    /// 部分一致ではなく、大文字小文字も区別する。
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.title == keyword || self.author == keyword || self.isbn == keyword
    }
}
