pub mod commands;
pub mod error;
pub mod output;
pub mod shell;

pub use commands::*;
pub use error::*;
pub use output::*;
pub use shell::Shell;
