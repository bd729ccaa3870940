//! One-shot web search agent

use std::io;

use search_cli::{logging, repl, Config, QueryPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let pipeline = QueryPipeline::from_config(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run_once(&pipeline, &mut stdin.lock(), &mut stdout).await?;
    Ok(())
}
