use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Store {operation} failed for sku '{sku}': {message}")]
    Storage {
        operation: &'static str,
        sku: String,
        message: String,
    },

    #[error("Transaction {operation} failed{}: {message}", sku_suffix(.sku))]
    Transaction {
        operation: &'static str,
        sku: Option<String>,
        message: String,
    },

    #[error("Failed to publish product '{sku}': {message}")]
    Notification { sku: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn sku_suffix(sku: &Option<String>) -> String {
    match sku {
        Some(sku) => format!(" for sku '{}'", sku),
        None => String::new(),
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Coarse classification used by callers to decide how to react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RequestInvalid,
    NotFound,
    Infrastructure,
}

impl CatalogError {
    pub fn storage(operation: &'static str, sku: &str, err: impl Display) -> Self {
        Self::Storage {
            operation,
            sku: sku.to_string(),
            message: err.to_string(),
        }
    }

    pub fn transaction(operation: &'static str, err: impl Display) -> Self {
        Self::Transaction {
            operation,
            sku: None,
            message: err.to_string(),
        }
    }

    /// Attach the sku being written to a transaction error raised by the store.
    pub fn with_sku(mut self, sku: &str) -> Self {
        if let Self::Transaction { sku: slot, .. } = &mut self {
            if slot.is_none() {
                *slot = Some(sku.to_string());
            }
        }
        self
    }

    pub fn notification(sku: &str, err: impl Display) -> Self {
        Self::Notification {
            sku: sku.to_string(),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::RequestInvalid,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Storage { .. }
            | CatalogError::Transaction { .. }
            | CatalogError::Notification { .. }
            | CatalogError::Internal(_) => ErrorKind::Infrastructure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Convert CatalogError to AppError for standardized error responses.
///
/// Infrastructure failures keep their detail for the log only; clients get
/// the generic internal error body.
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::NotFound(sku) => {
                AppError::NotFound(format!("Product {} not found", sku))
            }
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CatalogError::Validation("sku is required".into()).kind(),
            ErrorKind::RequestInvalid
        );
        assert_eq!(
            CatalogError::NotFound("sku1".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CatalogError::storage("get", "sku1", "connection reset").kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(
            CatalogError::transaction("commit", "serialization failure").kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_storage_error_carries_operation_and_sku() {
        let err = CatalogError::storage("upsert", "sku9", "disk full");
        let msg = err.to_string();

        assert!(msg.contains("upsert"));
        assert!(msg.contains("sku9"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_transaction_error_carries_sku_once_attached() {
        let err = CatalogError::transaction("commit", "serialization failure");
        assert_eq!(err.to_string(), "Transaction commit failed: serialization failure");

        let err = err.with_sku("sku9").with_sku("other");
        assert_eq!(
            err.to_string(),
            "Transaction commit failed for sku 'sku9': serialization failure"
        );
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_with_sku_leaves_other_errors_alone() {
        let err = CatalogError::NotFound("sku1".into()).with_sku("sku2");
        assert!(matches!(err, CatalogError::NotFound(ref sku) if sku == "sku1"));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CatalogError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CatalogError::NotFound("sku1".into()), StatusCode::NOT_FOUND),
            (
                CatalogError::storage("get", "sku1", "timeout"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
