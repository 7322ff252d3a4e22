use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::application::library::{LibraryError, SharedLibrary};
use crate::domain::{
    Book, BookId, BorrowerId, TransactionId,
    commands::{AddBook, AddBorrower, CheckoutBook, ReturnBook},
};

/// コンソールコマンドのエラー
///
/// どれも致命的ではなく、メッセージを表示して次の入力を待つ。
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (type `help` for a list)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 出力を表示して入力待ちに戻る
    Continue(String),
    /// ループを終了する
    Exit,
}

pub type CommandResult = Result<Outcome, CommandError>;
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;
pub type Handler = for<'a> fn(&'a SharedLibrary, &'a [String]) -> HandlerFuture<'a>;

/// コマンド定義
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

/// コマンド名からハンドラーへの対応表
pub struct CommandTable {
    commands: BTreeMap<&'static str, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// 図書館の全コマンドを登録した表
    pub fn library() -> Self {
        let mut table = Self::new();
        table.register(Command {
            name: "add-book",
            usage: "add-book <title> <author> <isbn>",
            summary: "add a book to the catalog",
            handler: add_book,
        });
        table.register(Command {
            name: "search",
            usage: "search <keyword>",
            summary: "find books whose title, author or ISBN equals the keyword",
            handler: search,
        });
        table.register(Command {
            name: "checkout",
            usage: "checkout <book-id> <borrower-id>",
            summary: "check out a book to a borrower",
            handler: checkout,
        });
        table.register(Command {
            name: "return",
            usage: "return <transaction-id>",
            summary: "return a checked out book and report the fine",
            handler: return_book,
        });
        table.register(Command {
            name: "books",
            usage: "books",
            summary: "list all books",
            handler: list_books,
        });
        table.register(Command {
            name: "add-borrower",
            usage: "add-borrower <name> <contact>",
            summary: "register a borrower",
            handler: add_borrower,
        });
        table.register(Command {
            name: "borrowers",
            usage: "borrowers",
            summary: "list all borrowers",
            handler: list_borrowers,
        });
        table.register(Command {
            name: "loans",
            usage: "loans",
            summary: "list open transactions",
            handler: list_loans,
        });
        table.register(Command {
            name: "history",
            usage: "history",
            summary: "list returned transactions",
            handler: history,
        });
        table.register(Command {
            name: "exit",
            usage: "exit",
            summary: "leave the program",
            handler: exit,
        });
        table.register(Command {
            name: "quit",
            usage: "quit",
            summary: "leave the program",
            handler: exit,
        });
        table
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name, command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn help(&self) -> String {
        let mut out = String::from("Commands:\n");
        let _ = writeln!(out, "  {:<36} {}", "help", "show this list");
        for command in self.commands.values() {
            let _ = writeln!(out, "  {:<36} {}", command.usage, command.summary);
        }
        out
    }

    /// 引数列の先頭をコマンド名として実行する
    pub async fn dispatch(&self, library: &SharedLibrary, tokens: &[String]) -> CommandResult {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Outcome::Continue(String::new()));
        };

        if name == "help" {
            return Ok(Outcome::Continue(self.help()));
        }

        let Some(command) = self.get(name) else {
            return Err(CommandError::UnknownCommand(name.clone()));
        };
        tracing::debug!(command = command.name, "dispatching console command");
        (command.handler)(library, args).await
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::library()
    }
}

// ============================================================================
// 引数ヘルパー
// ============================================================================

fn expect_args<'a, const N: usize>(
    args: &'a [String],
    usage: &'static str,
) -> Result<[&'a str; N], CommandError> {
    if args.len() != N {
        return Err(CommandError::Usage(usage));
    }
    let mut out = [""; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.as_str();
    }
    Ok(out)
}

fn parse_arg<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, CommandError> {
    value.parse::<T>().map_err(|_| CommandError::InvalidArgument {
        name,
        value: value.to_string(),
    })
}

fn format_book(book: &Book) -> String {
    format!(
        "{}. Title: {}, Author: {}, ISBN: {}, Available: {}",
        book.id,
        book.title,
        book.author,
        book.isbn,
        if book.available { "Yes" } else { "No" }
    )
}

fn format_books(header: &str, books: &[Book]) -> String {
    if books.is_empty() {
        return format!("{}\n  (none)", header);
    }
    let mut out = String::from(header);
    for book in books {
        out.push('\n');
        out.push_str(&format_book(book));
    }
    out
}

// ============================================================================
// ハンドラー
// ============================================================================

fn add_book<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let [title, author, isbn] = expect_args::<3>(args, "add-book <title> <author> <isbn>")?;
        let book = library
            .add_book(AddBook {
                title: title.to_string(),
                author: author.to_string(),
                isbn: isbn.to_string(),
            })
            .await?;
        Ok(Outcome::Continue(format!("Book added with id {}.", book.id)))
    })
}

fn search<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let [keyword] = expect_args::<1>(args, "search <keyword>")?;
        let books = library.search(keyword).await;
        Ok(Outcome::Continue(format_books("Search results:", &books)))
    })
}

fn checkout<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let [book, borrower] = expect_args::<2>(args, "checkout <book-id> <borrower-id>")?;
        let cmd = CheckoutBook {
            book_id: parse_arg::<BookId>("book id", book)?,
            borrower_id: parse_arg::<BorrowerId>("borrower id", borrower)?,
        };
        let receipt = library.checkout(cmd).await?;
        Ok(Outcome::Continue(format!(
            "Book checked out successfully.\nTransaction: {}\nDue: {}",
            receipt.transaction_id,
            receipt.due_date.format("%Y-%m-%d %H:%M UTC")
        )))
    })
}

fn return_book<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let [transaction] = expect_args::<1>(args, "return <transaction-id>")?;
        let cmd = ReturnBook {
            transaction_id: parse_arg::<TransactionId>("transaction id", transaction)?,
        };
        let receipt = library.return_book(cmd).await?;
        let message = if receipt.days_overdue == 0 {
            "Book returned successfully. No fine.".to_string()
        } else {
            format!(
                "Book returned successfully. {} day(s) overdue, fine: {:.2}",
                receipt.days_overdue, receipt.fine
            )
        };
        Ok(Outcome::Continue(message))
    })
}

fn list_books<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        expect_args::<0>(args, "books")?;
        let books = library.list_books().await;
        Ok(Outcome::Continue(format_books("Books in the library:", &books)))
    })
}

fn add_borrower<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let [name, contact] = expect_args::<2>(args, "add-borrower <name> <contact>")?;
        let borrower = library
            .add_borrower(AddBorrower {
                name: name.to_string(),
                contact: contact.to_string(),
            })
            .await?;
        Ok(Outcome::Continue(format!("Borrower added with id {}.", borrower.id)))
    })
}

fn list_borrowers<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        expect_args::<0>(args, "borrowers")?;
        let borrowers = library.list_borrowers().await;
        let mut out = String::from("Borrowers in the library:");
        if borrowers.is_empty() {
            out.push_str("\n  (none)");
        }
        for borrower in borrowers {
            let _ = write!(
                out,
                "\n{}. Name: {}, Contact: {}",
                borrower.id, borrower.name, borrower.contact
            );
        }
        Ok(Outcome::Continue(out))
    })
}

fn list_loans<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        expect_args::<0>(args, "loans")?;
        let open = library.open_transactions().await;
        let mut out = String::from("Open transactions:");
        if open.is_empty() {
            out.push_str("\n  (none)");
        }
        for tx in open {
            let _ = write!(
                out,
                "\n{} book {} -> borrower {}, due {}",
                tx.transaction_id,
                tx.book_id,
                tx.borrower_id,
                tx.due_date.format("%Y-%m-%d")
            );
        }
        Ok(Outcome::Continue(out))
    })
}

fn history<'a>(library: &'a SharedLibrary, args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        expect_args::<0>(args, "history")?;
        let closed = library.history().await;
        let mut out = String::from("Returned transactions:");
        if closed.is_empty() {
            out.push_str("\n  (none)");
        }
        for tx in closed {
            let _ = write!(
                out,
                "\n{} book {} <- borrower {}, returned {}, fine {:.2}",
                tx.transaction_id,
                tx.book_id,
                tx.borrower_id,
                tx.returned_at.format("%Y-%m-%d"),
                tx.fine
            );
        }
        Ok(Outcome::Continue(out))
    })
}

fn exit<'a>(_library: &'a SharedLibrary, _args: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { Ok(Outcome::Exit) })
}
