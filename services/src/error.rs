use sea_orm::DbErr;
use validator::ValidationErrors;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced to whatever initiated a portal operation.
///
/// Variants carry display text only so errors can be cloned into UI state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Bad credentials or duplicate registration.
    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// The acting user lacks the capability for this operation.
    #[error("{0}")]
    Forbidden(String),

    /// Storage or network failure. The text is opaque.
    #[error("{0}")]
    Transport(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Transport(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages.join("; "))
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("cannot be empty".into());
        return Err(err);
    }
    Ok(())
}
