//! External process execution.

pub mod command;
pub mod platform;

pub use command::{execute, run_program, CommandOptions, CommandResult};
pub use platform::{detect_shell, is_ci};
