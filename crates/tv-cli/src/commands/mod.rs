pub mod roll;
pub mod shell;
