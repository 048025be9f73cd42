//! Gridpilot - Entry Point
//!
//! CLI around the action pipeline. `compile` runs the deterministic half
//! offline (a saved model response plus a snapshot file), `query` runs
//! the full round-trip against a configured model.

use clap::{Parser, Subcommand};
use gridpilot::action::extract::extract;
use gridpilot::action::normalize::normalize;
use gridpilot::action::script::generate;
use gridpilot::core::error::Result;
use gridpilot::llm::{service, LlmClient};
use gridpilot::sheet::SheetSnapshot;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridpilot", about = "Compile spreadsheet requests into Office scripts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a saved model response into a generated action (no model call)
    Compile {
        /// File containing the raw model response text
        #[arg(long)]
        response: PathBuf,
        /// JSON file with the sheet snapshot; empty snapshot if omitted
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Run a query end to end against the configured model
    Query {
        /// The natural-language request
        query: String,
        /// JSON file with the sheet snapshot; empty snapshot if omitted
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

fn load_snapshot(path: Option<&PathBuf>) -> Result<SheetSnapshot> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(SheetSnapshot::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("gridpilot=info")
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compile { response, context } => {
            let snapshot = load_snapshot(context.as_ref())?;
            let raw = std::fs::read_to_string(&response)?;

            let doc = extract(&raw)?;
            let action = normalize(&doc, &snapshot);
            let generated = generate(&action);

            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
        Command::Query { query, context } => {
            let snapshot = load_snapshot(context.as_ref())?;
            let client = LlmClient::from_env()?;

            tracing::info!(%query, "interpreting query");
            let generated = service::interpret_query(&client, &query, &snapshot).await?;

            println!("{}", serde_json::to_string_pretty(&generated)?);
        }
    }

    Ok(())
}
