use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::error::Result;

use super::create::{handle_create, CreateArgs, CreatedCollection};
use super::delete::{handle_delete, DeleteArgs, DeletedCollection};
use super::list::{handle_list, CollectionList, ListArgs};
use super::peek::{handle_peek, PeekArgs, PeekResult};
use super::search::{handle_search, SearchArgs, SearchResult};
use super::stats::{handle_stats, CollectionStats, StatsArgs};

/// Chroma test bench - debug and manage collections
#[derive(Parser, Debug)]
#[command(name = "chroma-bench", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Enable verbose output (prints the resolved connection settings)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Emit results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new collection with the specified distance metric and embedding tags
    Create(CreateArgs),
    /// Delete a collection
    Delete(DeleteArgs),
    /// List all collections with their item counts
    List(ListArgs),
    /// Peek into a collection's contents
    Peek(PeekArgs),
    /// Search a collection with a text query
    Search(SearchArgs),
    /// Show collection statistics
    Stats(StatsArgs),
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Created(CreatedCollection),
    Deleted(DeletedCollection),
    Collections(CollectionList),
    Peek(PeekResult),
    Search(SearchResult),
    Stats(CollectionStats),
}

/// Routes a parsed command to its handler. Handlers never print; rendering is left to
/// [`crate::cli::formatters`].
pub async fn handle_command(
    command: &Commands,
    client: &dyn ChromaClientTrait,
) -> Result<CommandOutcome> {
    log::debug!("Executing command: {:?}", command);
    match command {
        Commands::Create(args) => handle_create(args, client).await.map(CommandOutcome::Created),
        Commands::Delete(args) => handle_delete(args, client).await.map(CommandOutcome::Deleted),
        Commands::List(args) => handle_list(args, client).await.map(CommandOutcome::Collections),
        Commands::Peek(args) => handle_peek(args, client).await.map(CommandOutcome::Peek),
        Commands::Search(args) => handle_search(args, client).await.map(CommandOutcome::Search),
        Commands::Stats(args) => handle_stats(args, client).await.map(CommandOutcome::Stats),
    }
}
