//! Index every parseable file under a folder.

use std::path::PathBuf;

use clap::Parser;
use raglet::{Indexer, RagConfig, Settings, VectorStore};

#[derive(Parser)]
#[command(name = "raglet-index", version, about = "Load, chunk, and index a document folder")]
struct Args {
    /// Folder to index, recursively.
    folder: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    raglet_cli::init_tracing();
    let args = Args::parse();

    let settings = Settings::from_env();
    let config = RagConfig::default();
    let store = raglet_cli::build_store(&settings)?;

    store.create_collection(&settings.collection).await?;
    Indexer::new(store, &settings.collection, &config).index_folder(&args.folder).await?;

    Ok(())
}
