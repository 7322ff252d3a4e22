use crate::application::library::LibraryError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(LibraryError);

impl From<LibraryError> for ApiError {
    fn from(err: LibraryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self.0 {
            // 404 Not Found - リクエストされたリソースが存在しない
            LibraryError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),

            // 422 Unprocessable Entity - 存在しない書籍・利用者を参照している
            LibraryError::InvalidReference(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REFERENCE")
            }

            // 409 Conflict - 書籍が貸出中
            LibraryError::BookUnavailable(_) => (StatusCode::CONFLICT, "BOOK_UNAVAILABLE"),
        };

        tracing::debug!(status = %status, "request rejected: {}", self.0);
        let body = Json(ErrorResponse::new(error_type, self.0.to_string()));
        (status, body).into_response()
    }
}
