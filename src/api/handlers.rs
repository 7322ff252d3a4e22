use crate::application::library::SharedLibrary;
use crate::domain::{TransactionId, commands::ReturnBook};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        AddBookRequest, AddBorrowerRequest, BookResponse, BorrowerResponse, CheckoutRequest,
        CheckoutResponse, ReturnResponse, SearchQuery, TransactionResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub library: SharedLibrary,
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /books - 書籍を登録
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = state.library.add_book(req.to_command()).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// POST /borrowers - 利用者を登録
pub async fn add_borrower(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBorrowerRequest>,
) -> Result<(StatusCode, Json<BorrowerResponse>), ApiError> {
    let borrower = state.library.add_borrower(req.to_command()).await?;
    Ok((StatusCode::CREATED, Json(BorrowerResponse::from(borrower))))
}

/// POST /checkouts - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 書籍と利用者が存在すること
/// - 書籍が貸出中でないこと
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let receipt = state.library.checkout(req.to_command()).await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse::from(receipt))))
}

/// POST /checkouts/:id/return - 書籍を返却
///
/// 返却済みの取引を再度返却すると404。
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let cmd = ReturnBook {
        transaction_id: TransactionId::from_uuid(transaction_id),
    };

    let receipt = state.library.return_book(cmd).await?;
    Ok(Json(ReturnResponse::from(receipt)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - 全書籍（登録順）
pub async fn list_books(State(state): State<Arc<AppState>>) -> Json<Vec<BookResponse>> {
    let books = state.library.list_books().await;
    Json(books.into_iter().map(BookResponse::from).collect())
}

/// GET /books/search?keyword= - タイトル・著者・ISBNの完全一致検索
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<BookResponse>> {
    let books = state.library.search(&query.keyword).await;
    Json(books.into_iter().map(BookResponse::from).collect())
}

/// GET /borrowers - 全利用者（登録順）
pub async fn list_borrowers(State(state): State<Arc<AppState>>) -> Json<Vec<BorrowerResponse>> {
    let borrowers = state.library.list_borrowers().await;
    Json(borrowers.into_iter().map(BorrowerResponse::from).collect())
}

/// GET /checkouts - 貸出中の取引
pub async fn list_open_checkouts(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<TransactionResponse>> {
    let open = state.library.open_transactions().await;
    Json(open.into_iter().map(TransactionResponse::from).collect())
}

/// GET /checkouts/history - 返却済みの取引
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<TransactionResponse>> {
    let history = state.library.history().await;
    Json(history.into_iter().map(TransactionResponse::from).collect())
}
