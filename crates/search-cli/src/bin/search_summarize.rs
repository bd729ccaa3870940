//! Interactive search agent with result summaries

use std::io;

use search_cli::{logging, repl, Config, SearchSummarizer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let mut pipeline = SearchSummarizer::from_config(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run_interactive(&mut pipeline, &mut stdin.lock(), &mut stdout).await?;
    Ok(())
}
