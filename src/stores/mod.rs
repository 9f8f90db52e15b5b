mod content;
mod interactions;
mod users;

pub use content::{ContentStore, DeleteTarget, LanguageSetKind, PersonKind};
pub use interactions::InteractionStore;
pub use users::UserStore;

use crate::patch::NullFieldError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::Invalid(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}

impl From<NullFieldError> for StoreError {
    fn from(err: NullFieldError) -> Self {
        StoreError::Invalid(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Caller supplied id, or a fresh UUID.
fn new_id(requested: Option<String>) -> String {
    requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

fn require_non_empty(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid(format!("`{field}` no puede estar vacío")));
    }
    Ok(())
}
