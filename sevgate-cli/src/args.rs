//! CLI argument parsing

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use sevgate_core::config::GatewayConfig;

#[derive(Debug, Parser)]
#[command(name = "sevgate")]
#[command(author, version, about = "URL severity assessment gateway")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Assessment service host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Assessment service port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Verbose output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the assessment service
    Serve {
        /// Transport to serve on (stdio, http)
        #[arg(long)]
        transport: Option<String>,
    },
    /// Assess a batch of URLs and print the summary
    Run {
        /// JSON-lines file of analysis records: {"url": ..., "confidence_score": ...}
        #[arg(long)]
        input: Option<PathBuf>,

        /// URL to assess (can be repeated)
        #[arg(long, action = ArgAction::Append)]
        url: Vec<String>,

        /// Confidence score applied to --url entries
        #[arg(long)]
        score: Option<f64>,
    },
}

impl Args {
    /// Load config from --config or the default cascade, then apply
    /// host/port overrides from the command line.
    pub fn load_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)?,
            None => GatewayConfig::load_default(),
        };
        if let Some(host) = &self.host {
            config.endpoint.host = host.clone();
        }
        if let Some(port) = self.port {
            config.endpoint.port = port;
        }
        Ok(config)
    }
}
