//! JSON routers for the three stores.

mod content;
mod interactions;
mod users;

pub use content::router as content_router;
pub use interactions::router as interactions_router;
pub use users::router as users_router;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::stores::StoreError;

type ApiResult<T> = Result<Json<T>, StoreError>;

impl StoreError {
    fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StoreError::Database(_) | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            StoreError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Error de base de datos".to_string()
            },
            StoreError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                "Error interno".to_string()
            },
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
