use thiserror::Error;

use crate::models::entry::EntryKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },
    #[error("name {name:?} is already taken, try {suggestion:?}")]
    NameTaken { name: String, suggestion: String },
    #[error("no free variant of {candidate:?} after {attempts} attempts")]
    NamesExhausted { candidate: String, attempts: usize },
    #[error("entry {0:?} is read-only")]
    ReadOnly(String),
    #[error("entry is not attached to a parent")]
    Detached,
    #[error("operation is not supported on the root entry")]
    RootEntry,
    #[error("{0} entries cannot hold children")]
    NotAParent(EntryKind),
    #[error("cannot move {path:?} into itself or one of its descendants")]
    Cycle { path: String },
    #[error("malformed serialized tree: {0}")]
    Serialized(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by user input (names, read-only targets) rather
    /// than misuse of the tree API.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidName { .. }
                | Error::NameTaken { .. }
                | Error::NamesExhausted { .. }
                | Error::ReadOnly(_)
        )
    }

    /// Alternative name offered alongside a failed rename or insert.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Error::NameTaken { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}
