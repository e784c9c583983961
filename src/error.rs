use thiserror::Error;

use crate::domain::schedule_model::AssignmentStatus;

#[derive(Debug, Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("coordinator role required")]
    Forbidden,

    // Intentionally covers both "not yours" and "does not exist" so callers
    // cannot probe for assignment ids they do not own.
    #[error("access denied or assignment not found")]
    AccessDenied,

    #[error("assignment cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid reference: {0}")]
    ForeignKey(String),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("store error: {0}")]
    Store(sqlx::Error),
}

/// Classifies store-native failures into the domain taxonomy so the rest of
/// the crate never matches on SQLite's error vocabulary.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Error::Conflict(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return Error::ForeignKey(db.message().to_string());
            }
        }
        Error::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
