mod catalog;
mod directory;
mod errors;
mod ledger;
mod library_service;
mod shared_library;

pub use catalog::Catalog;
pub use directory::Directory;
pub use errors::{LibraryError, Reference, Result};
pub use ledger::Ledger;
pub use library_service::{LibraryService, ReturnReceipt};
pub use shared_library::{CheckoutReceipt, SharedLibrary};
