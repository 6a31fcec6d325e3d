//! Error types for the shell.

use thiserror::Error;

/// Result type for shell commands.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors a shell command can produce.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The input matched no command and is not dice notation.
    #[error("unknown command: {0} (type 'help' for help)")]
    UnknownCommand(String),

    /// A command was given the wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// An argument that should be a whole number was not.
    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    /// Dice notation or rolling failed.
    #[error(transparent)]
    Dice(#[from] tv_dice::DiceError),

    /// A tracker operation failed.
    #[error(transparent)]
    Track(#[from] tv_track::TrackError),
}

impl From<tv_dice::NotationError> for ShellError {
    fn from(err: tv_dice::NotationError) -> Self {
        Self::Dice(err.into())
    }
}
