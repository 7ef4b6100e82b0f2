use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use faqbot_backend::core::config::{api_key_from_env, AppPaths, Settings};
use faqbot_backend::core::logging;
use faqbot_backend::llm::OpenAiProvider;
use faqbot_backend::rag::builder;
use faqbot_backend::rag::metadata::load_faqs;

/// Embed the FAQ file and write the search index and metadata.
#[derive(Debug, Parser)]
#[command(name = "build-index", version)]
struct Args {
    /// FAQ source file (JSON array of {question, answer})
    #[arg(long)]
    faqs: Option<PathBuf>,

    /// Directory receiving the index and metadata files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut paths = match args.data_dir {
        Some(dir) => AppPaths::with_data_dir(dir),
        None => AppPaths::new(),
    };
    if let Some(faqs) = args.faqs {
        paths.faqs_path = faqs;
    }
    logging::init(&paths, "build-index.log");

    let settings = Settings::load(&paths).context("Failed to load settings")?;
    let api_key = api_key_from_env()?;
    let provider = OpenAiProvider::new(&settings.provider, api_key);

    let faqs = load_faqs(&paths.faqs_path)?;
    tracing::info!("Embedding {} FAQ records from {}", faqs.len(), paths.faqs_path.display());

    let artifacts = builder::build(&faqs, &provider)
        .await
        .context("Failed to build FAQ index")?;
    builder::persist(&artifacts, &paths).context("Failed to write FAQ index")?;

    Ok(())
}
