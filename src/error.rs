// Typed errors for the todo core
// The CLI layer wraps these with anyhow context; main maps them to exit codes.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Which side of a time block a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEndpoint {
    Start,
    End,
}

impl fmt::Display for TimeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeEndpoint::Start => write!(f, "Start"),
            TimeEndpoint::End => write!(f, "End"),
        }
    }
}

/// Rejected user input. Each variant names the check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{endpoint} time '{value}' is invalid. Use HH:MM (e.g. 14:30).")]
    InvalidTimeFormat { endpoint: TimeEndpoint, value: String },

    #[error("Start time must be before end time")]
    StartNotBeforeEnd,

    #[error("Time block must be at least {minimum} minutes long (got {minutes})")]
    BlockTooShort { minutes: i64, minimum: i64 },

    #[error("Invalid time block '{0}'. Use START-END (e.g. 14:00-15:30).")]
    MissingSeparator(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD, MM-DD, optionally followed by HH:MM.")]
    InvalidDate(String),

    #[error("Invalid priority '{0}'. Priority must be a number from 1 to 5.")]
    InvalidPriority(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid position '{0}'. Position must be a positive number.")]
    InvalidIndex(String),
}

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Time conflict with '{title}'")]
    Conflict { title: String },

    #[error("A todo with id {id} already exists")]
    DuplicateId { id: Uuid },

    #[error("No todo at index {index}: list has {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to save todos to {}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TodoError {
    /// User errors are recoverable by re-entering input; everything else is internal.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, TodoError::StorageWrite { .. })
    }
}
