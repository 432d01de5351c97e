#![forbid(unsafe_code)]

use rusqlite::ErrorCode;
use sg_core::model::{GoalId, TaskId};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Unavailable(rusqlite::Error),
    Validation(&'static str),
    GoalNotFound(GoalId),
    TaskNotFound(TaskId),
    ImportFormat(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Unavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Validation(message) => write!(f, "validation: {message}"),
            Self::GoalNotFound(id) => write!(f, "goal not found (id={id})"),
            Self::TaskNotFound(id) => write!(f, "task not found (id={id})"),
            Self::ImportFormat(message) => write!(f, "import format: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_unavailable(&value) {
            Self::Unavailable(value)
        } else {
            Self::Sql(value)
        }
    }
}

// Engine-level failures where the database itself is unusable, as opposed
// to a statement-level error in our own SQL.
fn is_unavailable(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => matches!(
            code.code,
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::DiskFull
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
                | ErrorCode::ReadOnly
                | ErrorCode::SystemIoFailure
        ),
        _ => false,
    }
}
