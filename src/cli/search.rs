use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::{ChromaClientTrait, QueryHit};
use crate::error::Result;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Name of the collection to search
    pub name: String,

    /// The search query text
    pub query: String,

    /// Number of results to return
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub n_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub name: String,
    pub query: String,
    pub hits: Vec<QueryHit>,
}

/// Handles the `search` command.
pub async fn handle_search(
    args: &SearchArgs,
    client: &dyn ChromaClientTrait,
) -> Result<SearchResult> {
    log::info!(
        "Searching collection '{}' for {:?} (n_results {})",
        args.name,
        args.query,
        args.n_results
    );

    let collection = client.get_collection(&args.name).await?;
    let hits = client
        .query(&collection, &args.query, args.n_results)
        .await?;
    log::debug!("Search returned {} hits", hits.len());

    Ok(SearchResult {
        name: collection.name,
        query: args.query.clone(),
        hits,
    })
}
