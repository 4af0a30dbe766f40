//! This module defines the command-line interface structure and handlers.

pub mod commands;
pub mod formatters;

// Command handlers
pub mod create;
pub mod delete;
pub mod list;
pub mod peek;
pub mod search;
pub mod stats;

// Re-export the main handler and the command enum
pub use commands::{handle_command, CliArgs, CommandOutcome, Commands};

// Re-export the Args structs for use in the main binary
pub use create::CreateArgs;
pub use delete::DeleteArgs;
pub use list::ListArgs;
pub use peek::PeekArgs;
pub use search::SearchArgs;
pub use stats::StatsArgs;
