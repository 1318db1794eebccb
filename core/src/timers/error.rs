//! Error types for timer operations

use thiserror::Error;

use super::TimerMode;

/// Errors raised on registry misuse.
///
/// All of these signal a programming error at the call site, never an
/// environmental failure; none are retried, and the registry never
/// swallows them on its own.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("unrecognized timer mode `{0}`")]
    InvalidMode(String),

    #[error("key `{key}` was first used in {existing} mode, cannot reuse it in {requested} mode")]
    ModeConflict {
        key: String,
        existing: TimerMode,
        requested: TimerMode,
    },

    #[error("timer `{0}` was already started")]
    DuplicateKey(String),

    #[error("no timer registered under key `{0}`")]
    TimerNotFound(String),

    #[error("no running timer to stop")]
    NoActiveTimer,

    #[error("timer `{0}` was already stopped")]
    AlreadyStopped(String),
}
