//! Ask a question against the indexed collection.

use clap::Parser;
use raglet::{QueryService, RagConfig, Settings};

#[derive(Parser)]
#[command(name = "raglet-ask", version, about = "Answer a question with retrieved context")]
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

    match service.query(&args.question).await? {
        Some(answer) => {
            println!("{}", answer.response);
            println!("Sources: {}", serde_json::to_string(&answer.sources)?);
        }
        None => eprintln!("Unable to find matching results."),
    }

    Ok(())
}
