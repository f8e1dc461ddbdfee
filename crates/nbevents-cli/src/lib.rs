//! nbevents CLI library.
//!
//! Operator commands for a repository database: seeding collections, entity
//! types, relationship types and items, and applying broker corrections.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
