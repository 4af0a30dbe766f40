use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::error::Result;
use crate::settings::DistanceMetric;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Name of the collection to describe
    pub name: String,
}

/// Summary statistics for one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub name: String,
    pub total_items: u64,
    /// Length of the first stored embedding; `None` when the collection is empty.
    pub embedding_dimensions: Option<usize>,
    pub distance_metric: String,
}

/// Handles the `stats` command, sampling one record to learn the embedding dimension.
pub async fn handle_stats(
    args: &StatsArgs,
    client: &dyn ChromaClientTrait,
) -> Result<CollectionStats> {
    log::info!("Fetching stats for collection '{}'", args.name);

    let collection = client.get_collection(&args.name).await?;
    let sample = client.get(&collection, 1).await?;
    let embedding_dimensions = sample
        .first()
        .and_then(|record| record.embedding.as_ref())
        .map(Vec::len);
    let total_items = client.count(&collection).await?;

    let distance_metric = collection
        .distance()
        .map(str::to_string)
        .unwrap_or_else(|| DistanceMetric::default().to_string());

    Ok(CollectionStats {
        name: collection.name,
        total_items,
        embedding_dimensions,
        distance_metric,
    })
}
