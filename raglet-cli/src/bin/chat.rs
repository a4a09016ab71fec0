//! Baseline mode: send a question straight to the chat model, no
//! retrieval.

use clap::Parser;
use raglet::{QueryService, RagConfig, Settings};

#[derive(Parser)]
#[command(name = "raglet-chat", version, about = "Answer a question without retrieval")]
struct Args {
    /// The question to answer.
    question: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    raglet_cli::init_tracing();
    let args = Args::parse();

    let settings = Settings::from_env();
    let config = RagConfig::default();
    let store = raglet_cli::build_store(&settings)?;
    let chat = raglet_cli::build_chat(&settings);
    let service = QueryService::new(store, chat, &settings.collection, &config);

    let response = service.query_direct(&args.question).await?;
    println!("{response}");

    Ok(())
}
