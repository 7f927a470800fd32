use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mealwrap_core::{OrderStats, aggregate_receipts};
use mealwrap_ingest::load_uploads;
use mealwrap_vibe::{GeminiClient, request_vibe};

mod config;
mod server;

#[derive(Parser, Debug)]
#[command(name = "mealwrap", version, about = "Dining receipt analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse receipt emails (.eml, or .zip archives of them) and print batch statistics
    Analyze {
        /// Files to ingest
        paths: Vec<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Analyze a batch and ask the LLM for a one-sentence vibe
    Vibe {
        /// Files to ingest
        paths: Vec<PathBuf>,

        /// Override the configured Gemini model id
        #[arg(long)]
        model: Option<String>,
    },

    /// Serve the upload + vibe HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;

    match cli.command {
        Command::Analyze { paths, pretty } => {
            let stats = analyze(&paths)?;
            let json = if pretty {
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string(&stats)?
            };
            println!("{json}");
        }

        Command::Vibe { paths, model } => {
            let stats = analyze(&paths)?;
            let api_key = std::env::var("GOOGLE_API_KEY")
                .context("GOOGLE_API_KEY is not set")?;
            let client = GeminiClient::new(api_key)
                .with_model(model.unwrap_or(config.llm.model))
                .with_temperature(config.llm.temperature);

            let reply = request_vibe(&client, &stats).await?;
            match reply.sentence {
                Some(sentence) => println!("{sentence}"),
                None => bail!("generation returned no sentence"),
            }
            if let Some(colors) = reply.colors {
                println!("{}", serde_json::to_string(&colors)?);
            }
        }

        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            server::run_server(&bind, &config).await?;
        }
    }

    Ok(())
}

fn analyze(paths: &[PathBuf]) -> Result<OrderStats> {
    if paths.is_empty() {
        bail!("no files given; pass .eml files or .zip archives of them");
    }
    let entries = load_uploads(paths)?;
    if entries.is_empty() {
        bail!("no valid receipt emails found");
    }
    Ok(aggregate_receipts(&entries))
}
