use thiserror::Error;

use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("stored schedule under '{key}' is corrupt: {reason}")]
    CorruptState { key: String, reason: String },
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("unknown workout category '{0}'")]
    UnknownCategory(String),
    #[error("invalid workout entry: {0}")]
    InvalidEntry(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;
