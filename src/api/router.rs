use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, add_borrower, checkout, list_books, list_borrowers, list_history,
    list_open_checkouts, return_book, search_books,
};

/// Creates the API router with all library endpoints
///
/// Command endpoints (Write operations):
/// - POST /books - Add a book
/// - POST /borrowers - Add a borrower
/// - POST /checkouts - Check out a book
/// - POST /checkouts/:id/return - Return a book
///
/// Query endpoints (Read operations):
/// - GET /books, GET /books/search?keyword=
/// - GET /borrowers
/// - GET /checkouts, GET /checkouts/history
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", post(add_book).get(list_books))
        .route("/books/search", get(search_books))
        .route("/borrowers", post(add_borrower).get(list_borrowers))
        .route("/checkouts", post(checkout).get(list_open_checkouts))
        .route("/checkouts/history", get(list_history))
        .route("/checkouts/:id/return", post(return_book))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
