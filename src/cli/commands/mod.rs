//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`], which also loads the shared [`Settings`].
//!
//! [`Settings`]: crate::config::Settings

pub mod cache;
pub mod completions;
pub mod create;
pub mod dispatcher;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
