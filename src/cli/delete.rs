use clap::Args;
use serde::Serialize;

use crate::chroma_client_trait::ChromaClientTrait;
use crate::error::Result;

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Name of the collection to delete
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedCollection {
    pub name: String,
}

/// Handles the `delete` command.
pub async fn handle_delete(
    args: &DeleteArgs,
    client: &dyn ChromaClientTrait,
) -> Result<DeletedCollection> {
    log::info!("Deleting collection '{}'", args.name);
    client.delete_collection(&args.name).await?;
    Ok(DeletedCollection {
        name: args.name.clone(),
    })
}
