//! Mapping of sqlx failures onto the store's error taxonomy.

use gameforge_core::error::{AppError, ErrorKind};

/// SQLSTATE raised when a serializable transaction cannot be ordered.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE raised when PostgreSQL breaks a lock cycle.
const DEADLOCK_DETECTED: &str = "40P01";

/// Unique constraint guarding per-file version numbers.
pub const VERSION_NUMBER_CONSTRAINT: &str = "file_versions_file_id_version_key";
/// Unique constraint guarding paths within a game.
pub const FILE_PATH_CONSTRAINT: &str = "files_game_id_path_key";

/// Shape of a database-reported failure, independent of the driver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Check,
    Other,
}

/// Convert a sqlx error into an [`AppError`] with the right kind.
pub fn classify(err: sqlx::Error, context: &str) -> AppError {
    let kind = match &err {
        sqlx::Error::Database(db_err) => {
            let violation = if db_err.is_unique_violation() {
                Violation::Unique
            } else if db_err.is_foreign_key_violation() {
                Violation::ForeignKey
            } else if db_err.is_check_violation() {
                Violation::Check
            } else {
                Violation::Other
            };
            kind_for(db_err.code().as_deref(), db_err.constraint(), violation)
        }
        _ => ErrorKind::Storage,
    };

    let message = match (kind, &err) {
        (ErrorKind::Validation, sqlx::Error::Database(db_err))
            if db_err.constraint() == Some(FILE_PATH_CONSTRAINT) =>
        {
            format!("{context}: a file with this path already exists in the game")
        }
        _ => format!("{context}: {err}"),
    };

    AppError::with_source(kind, message, err)
}

/// Decide the error kind from SQLSTATE, constraint name, and violation class.
pub(crate) fn kind_for(
    code: Option<&str>,
    constraint: Option<&str>,
    violation: Violation,
) -> ErrorKind {
    if matches!(code, Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)) {
        return ErrorKind::Conflict;
    }
    match (violation, constraint) {
        (Violation::Unique, Some(VERSION_NUMBER_CONSTRAINT)) => ErrorKind::Conflict,
        (Violation::Unique, Some(FILE_PATH_CONSTRAINT)) => ErrorKind::Validation,
        (Violation::ForeignKey, _) => ErrorKind::NotFound,
        (Violation::Check, _) => ErrorKind::Validation,
        _ => ErrorKind::Storage,
    }
}
