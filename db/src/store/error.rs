use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: i64 },

    #[error("{collection}.{field} '{value}' already exists")]
    Duplicate {
        collection: &'static str,
        field: &'static str,
        value: String,
    },

    /// The backend cannot be reached. Retrying later may succeed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(DbErr),

    #[error("invalid store request: {0}")]
    Invalid(String),

    #[error("collection file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error comes from reaching the backend rather than from the
    /// request itself. Only these errors are ever treated as retryable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }

    /// Recognises unique-index violations raised by the primary store.
    pub(crate) fn from_write(err: DbErr, collection: &'static str, key: Option<(&'static str, String)>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                let (field, value) = key.unwrap_or(("unique", detail));
                StoreError::Duplicate {
                    collection,
                    field,
                    value,
                }
            }
            _ => StoreError::from(err),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(e) => StoreError::Unavailable(e.to_string()),
            DbErr::ConnectionAcquire(e) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn connection_errors_are_connectivity() {
        let err = StoreError::from(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(err.is_connectivity());
    }

    #[test]
    fn query_errors_are_not_connectivity() {
        let err = StoreError::from(DbErr::Custom("no such column".into()));
        assert!(!err.is_connectivity());
        assert!(matches!(err, StoreError::Query(_)));
    }
}
