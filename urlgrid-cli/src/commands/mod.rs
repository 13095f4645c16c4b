//! CLI subcommands.

pub mod fetch;
pub mod generate;

use std::error::Error;

/// Shared result type for subcommands.
pub type CommandResult = Result<(), Box<dyn Error>>;
