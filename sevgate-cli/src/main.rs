use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod runner;

use args::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.load_config()?;

    match &args.command {
        Command::Serve { transport } => {
            let transport = runner::resolve_transport(transport.as_deref(), &config)?;
            runner::serve(&config, transport).await
        }
        Command::Run { input, url, score } => {
            runner::run_batch(&config, input.as_deref(), url, *score).await
        }
    }
}
