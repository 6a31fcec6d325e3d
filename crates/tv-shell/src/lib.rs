//! Line-oriented game-table shell.
//!
//! Wraps the dice engine and the table trackers behind a small command
//! language: rolls, countdown alarms, initiative and number trackers.
//! Input is processed one line at a time by [`Shell::process`], so the
//! same session drives an interactive prompt or a scripted test.

pub mod config;
pub mod error;
pub mod session;

pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};
pub use session::Shell;
