use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use catalog_scraper::config::Config;
use catalog_scraper::error::Result;
use catalog_scraper::export::export_all;
use catalog_scraper::ingestion::{read_entries_jsonl, write_entries_jsonl, UicCatalogSource};
use catalog_scraper::logging;
use catalog_scraper::pipeline::{process_entries, PipelineOutput};
use catalog_scraper::types::{CatalogSource, RawEntry};

#[derive(Parser)]
#[command(name = "catalog_scraper")]
#[command(about = "Course catalog scraper and RAG document exporter")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file (defaults apply when absent)
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw course entries from the catalog into a JSONL file
    Fetch {
        /// Where to write the raw entries
        #[arg(long, default_value = "output/raw_entries.jsonl")]
        output: PathBuf,
    },
    /// Process previously fetched raw entries into RAG documents and chunks
    Process {
        /// Raw entries JSONL to process
        #[arg(long, default_value = "output/raw_entries.jsonl")]
        input: PathBuf,
    },
    /// Fetch and process in one run
    Run {
        /// Where to keep the intermediate raw entries
        #[arg(long, default_value = "output/raw_entries.jsonl")]
        raw_output: PathBuf,
    },
}

async fn fetch_entries(config: &Config, output: &Path) -> Result<Vec<RawEntry>> {
    let source = UicCatalogSource::new(&config.catalog)?;
    info!("fetching entries from source {}", source.source_name());
    let entries = source.fetch_entries().await?;
    write_entries_jsonl(output, &entries)?;
    println!("📥 Fetched {} raw entries -> {}", entries.len(), output.display());
    Ok(entries)
}

fn process_and_export(config: &Config, entries: &[RawEntry]) -> Result<PipelineOutput> {
    let output = process_entries(entries, config.chunking);
    let paths = export_all(
        Path::new(&config.export.output_dir),
        &output.documents,
        &output.chunks,
    )?;

    println!("\n📊 Processing results:");
    println!("   Raw entries: {}", output.total_entries);
    println!("   Unique courses: {}", output.unique_records);
    println!("   Documents: {}", output.documents.len());
    println!("   Chunks: {}", output.chunks.len());
    println!("   Parse failures: {}", output.failures.len());
    println!("   Documents file: {}", paths.docs_jsonl.display());
    println!("   Chunks file: {}", paths.chunks_jsonl.display());

    if !output.failures.is_empty() {
        println!("\n⚠️  Parse failures:");
        for failure in &output.failures {
            println!(
                "   - {} | block {}: {}",
                failure.source_url, failure.block_index, failure.message
            );
        }
    }
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Fetch { output } => {
            println!("🔄 Running catalog fetch...");
            fetch_entries(&config, &output).await?;
        }
        Commands::Process { input } => {
            println!("🔨 Processing raw entries...");
            let entries = read_entries_jsonl(&input)?;
            process_and_export(&config, &entries)?;
        }
        Commands::Run { raw_output } => {
            println!("🔄 Running catalog fetch...");
            let entries = fetch_entries(&config, &raw_output).await?;
            println!("🔨 Processing raw entries...");
            let output = process_and_export(&config, &entries)?;
            if output.documents.is_empty() {
                // Zero documents out of a non-empty fetch is a caller-level
                // signal, not a pipeline error
                error!("run produced no documents");
            }
        }
    }

    Ok(())
}
