pub mod book;
pub mod borrower;
pub mod commands;
pub mod events;
pub mod transaction;
pub mod value_objects;

pub use book::Book;
pub use borrower::Borrower;
pub use events::*;
pub use transaction::{ClosedTransaction, FineAssessment, FinePolicy, OpenTransaction};
pub use value_objects::*;
