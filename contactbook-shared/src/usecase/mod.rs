/// Business operations
///
/// Each use case validates its request, enforces ownership, calls the
/// repositories and converts entities into response shapes. Handlers stay
/// thin: parse input, call one use-case method, wrap the result.
///
/// # Error mapping
///
/// | Source | [`UseCaseError`] |
/// |--------|------------------|
/// | `validator::ValidationErrors` | `Validation` |
/// | `RepositoryError::Conflict` | `Conflict` |
/// | `RepositoryError::Database` | `Internal` |
/// | `AuthError` (token problems) | `Unauthorized` |
/// | `PasswordError` | `Internal` |

pub mod address;
pub mod contact;
pub mod user;

pub use address::AddressUseCase;
pub use contact::ContactUseCase;
pub use user::UserUseCase;

use validator::{ValidationError, ValidationErrors};

use crate::auth::authenticator::AuthError;
use crate::auth::password::PasswordError;
use crate::repository::RepositoryError;

/// Error type for use-case operations
#[derive(Debug, thiserror::Error)]
pub enum UseCaseError {
    /// Request failed validation
    #[error("{0}")]
    Validation(String),

    /// Credentials or token rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Resource absent or not owned by the caller
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure; the message is for logs, not for clients
    #[error("{0}")]
    Internal(String),
}

/// Use-case result type alias
pub type UseCaseResult<T> = Result<T, UseCaseError>;

impl From<ValidationErrors> for UseCaseError {
    fn from(errors: ValidationErrors) -> Self {
        UseCaseError::Validation(validation_message(&errors))
    }
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(constraint) => {
                UseCaseError::Conflict(format!("Resource already exists ({})", constraint))
            }
            RepositoryError::Database(e) => UseCaseError::Internal(e.to_string()),
        }
    }
}

impl From<PasswordError> for UseCaseError {
    fn from(err: PasswordError) -> Self {
        UseCaseError::Internal(err.to_string())
    }
}

impl From<AuthError> for UseCaseError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(e) => e.into(),
            other => UseCaseError::Unauthorized(other.to_string()),
        }
    }
}

/// Flattens validator output into one line: `"<field> <problem>"` entries
/// sorted by field name and joined by `"; "`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(move |e| (field.clone(), format!("{} {}", field, describe(e))))
        })
        .collect();

    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |key: &str| error.params.get(key).and_then(|v| v.as_u64());

    match &*error.code {
        "email" => "must be a valid email".to_string(),
        "length" => {
            let actual = error
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|v| v.chars().count());

            match (param("min"), param("max")) {
                (Some(_), _) if actual == Some(0) => "is required".to_string(),
                (Some(min), Some(max)) if actual.map_or(false, |n| (n as u64) < min) => {
                    format!("must be between {} and {} characters", min, max)
                }
                (Some(min), None) => format!("must be at least {} characters", min),
                (_, Some(max)) => format!("must be at most {} characters", max),
                _ => "has an invalid length".to_string(),
            }
        }
        code => format!("is invalid ({})", code),
    }
}
