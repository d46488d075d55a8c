//! gnotes-embeddings: embedding maintenance for GenAI Notes.
//!
//! Backfills missing embeddings, regenerates all of them, or seeds the
//! demo notes. Needs `DATABASE_URL` and `OPENAI_API_KEY`.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use gnotes_api::config::require_var;
use gnotes_api::telemetry::init_tracing;
use gnotes_api::{EmbeddingMaintenance, RunSummary};
use gnotes_db::{Database, PoolConfig};
use gnotes_inference::OpenAIBackend;

#[derive(Parser)]
#[command(name = "gnotes-embeddings")]
#[command(author, version, about = "Embedding maintenance for GenAI Notes")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed notes that have no embedding yet
    Backfill,

    /// Re-embed every note, oldest first
    Regenerate,

    /// Insert the demo notes
    Seed {
        /// Delete every existing note first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _file_guard = init_tracing("gnotes_api=info,gnotes_db=info", "gnotes-embeddings.log");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(subsystem = "cli", error = %format!("{:#}", e), "Fatal error");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_url = require_var("DATABASE_URL")?;
    let backend = OpenAIBackend::from_env()?;
    // one note at a time; a small pool is enough
    let pool_config = PoolConfig::from_env().max_connections(2);
    let db = Database::connect_with_config(&database_url, pool_config)
        .await
        .context("failed to connect to database")?;
    let maintenance = EmbeddingMaintenance::new(db.note_store(), Arc::new(backend));

    match cli.command {
        Commands::Backfill => {
            let summary = maintenance
                .backfill()
                .await
                .context("failed to list notes without embeddings")?;
            print_summary("Backfill", summary);
        }
        Commands::Regenerate => {
            let summary = maintenance
                .regenerate()
                .await
                .context("failed to list notes")?;
            print_summary("Regeneration", summary);
        }
        Commands::Seed { clear } => {
            let notes = maintenance.seed(clear).await.context("failed to seed notes")?;
            println!("Successfully seeded database with {} notes", notes.len());
            for note in notes {
                println!("  {}  {}", note.id, note.title);
            }
        }
    }
    Ok(())
}

fn print_summary(label: &str, summary: RunSummary) {
    println!();
    println!("=== {} Complete ===", label);
    println!("Successfully processed: {} notes", summary.processed);
    println!("Errors: {} notes", summary.failed);
    println!("Total: {} notes", summary.total);
}
