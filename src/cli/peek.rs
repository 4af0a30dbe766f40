use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::{ChromaClientTrait, Record};
use crate::error::Result;

#[derive(Args, Debug, Clone)]
pub struct PeekArgs {
    /// Name of the collection to peek into
    pub name: String,

    /// Number of items to show
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
}

/// The first records of a collection, plus its total size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeekResult {
    pub name: String,
    pub records: Vec<Record>,
    pub total: u64,
}

impl PeekResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handles the `peek` command.
pub async fn handle_peek(args: &PeekArgs, client: &dyn ChromaClientTrait) -> Result<PeekResult> {
    log::info!("Peeking into collection '{}' (limit {})", args.name, args.limit);

    let collection = client.get_collection(&args.name).await?;
    let records = client.get(&collection, args.limit).await?;
    let total = if records.is_empty() {
        0
    } else {
        client.count(&collection).await?
    };

    Ok(PeekResult {
        name: collection.name,
        records,
        total,
    })
}
