use db::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure of a domain operation.
///
/// A cooldown block is not an error: it is an outcome of `AccessGate::start`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    /// The selected backend stopped answering mid-operation. Safe to retry.
    #[error("{0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn label(collection: &str) -> &str {
    match collection {
        "teachers" => "Teacher",
        "groups" => "Group",
        "questions" => "Question",
        "tests" => "Test",
        "students" => "Student",
        "tasks" => "Task",
        "subjects" => "Subject",
        other => other,
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                ServiceError::NotFound(format!("{} {} not found", label(collection), id))
            }
            StoreError::Duplicate {
                collection,
                field,
                value,
            } => ServiceError::Conflict(format!(
                "{} with {} '{}' already exists",
                label(collection),
                field,
                value
            )),
            e if e.is_connectivity() => ServiceError::Unavailable(e.to_string()),
            e => ServiceError::Store(e),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages.join("; "))
    }
}

pub(crate) fn not_found(what: &str, id: i64) -> ServiceError {
    ServiceError::NotFound(format!("{} {} not found", what, id))
}
