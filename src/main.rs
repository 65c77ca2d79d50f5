use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citeharvest::config::{get_config, load_config};
use citeharvest::models::CollectRequest;
use citeharvest::sources::{SourceAdapter, SourceRegistry};
use citeharvest::{export, ui, RecordStream};

/// citeharvest - collect scholarly metadata with formatted citations
#[derive(Parser, Debug)]
#[command(name = "citeharvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collect scholarly metadata with formatted citations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search papers by free-text query (Semantic Scholar)
    Papers {
        /// Search query
        query: String,

        /// Inclusive lower bound of the publication-year filter
        #[arg(long)]
        year_from: Option<i32>,

        /// Inclusive upper bound of the publication-year filter
        #[arg(long)]
        year_to: Option<i32>,

        /// Field-of-study filter (repeatable)
        #[arg(long = "field-of-study")]
        fields_of_study: Vec<String>,

        /// Only papers with an open-access PDF
        #[arg(long)]
        open_access_pdf: bool,

        /// Stop after this many records
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Write the collection to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Collect the articles of a Google Scholar author profile
    Author {
        /// Google Scholar author identifier
        author_id: String,

        /// Stop after this many records
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Write the collection to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List configured sources and their capabilities
    Sources,
}

/// Consume the record stream incrementally, stopping once `limit` records
/// have been appended. The limit is enforced here, on the consuming side;
/// the driver itself never sees it, so stopping early costs no extra page
/// fetches. A failed page still leaves the partial collection rendered and
/// exported.
async fn run_collection(
    adapter: &Arc<dyn SourceAdapter>,
    request: CollectRequest,
    limit: usize,
    csv: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let mut stream = RecordStream::new(adapter.as_ref(), request);
    let mut collection = Vec::new();

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .expect("valid progress template"),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    };
    progress.set_message(format!("collecting from {}...", adapter.name()));

    let outcome = loop {
        if collection.len() >= limit {
            break Ok(());
        }
        match stream.next().await {
            Ok(Some(record)) => {
                progress.println(ui::record_line(collection.len() + 1, &record));
                progress.set_message(format!("{} records", collection.len() + 1));
                collection.push(record);
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };
    progress.finish_and_clear();

    if !quiet && !collection.is_empty() {
        println!("{}", ui::record_table(&collection));
    }
    println!(
        "Collected {} records from {}",
        collection.len(),
        adapter.name()
    );

    if let Some(path) = csv {
        export::write_csv_path(&collection, &path)?;
        println!("Saved {} records to {}", collection.len(), path.display());
    }

    if let Err(e) = outcome {
        eprintln!("{} {}", "error:".red().bold(), e);
        eprintln!("collection stopped early; records above were kept");
        std::process::exit(1);
    }

    Ok(())
}

fn print_sources(registry: &SourceRegistry) {
    if registry.is_empty() {
        println!("No sources configured. Set SEMANTIC_SCHOLAR_API_KEY and/or SERPAPI_API_KEY.");
        return;
    }
    for source in registry.all() {
        println!(
            "{:<10} {:<18} {:?}",
            source.id(),
            source.name(),
            source.capabilities()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citeharvest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => get_config(),
    };

    let registry = SourceRegistry::from_config(&config);

    match cli.command {
        Commands::Papers {
            query,
            year_from,
            year_to,
            fields_of_study,
            open_access_pdf,
            limit,
            csv,
        } => {
            let adapter = registry.get_required("semantic")?;

            let mut request = CollectRequest::new(query).limit(limit);
            request.year_from = year_from;
            request.year_to = year_to;
            request.fields_of_study = fields_of_study;
            request.open_access_pdf = open_access_pdf;

            run_collection(adapter, request, limit, csv, cli.quiet).await
        }
        Commands::Author {
            author_id,
            limit,
            csv,
        } => {
            let adapter = registry.get_required("scholar")?;
            let request = CollectRequest::for_author(author_id).limit(limit);

            run_collection(adapter, request, limit, csv, cli.quiet).await
        }
        Commands::Sources => {
            print_sources(&registry);
            Ok(())
        }
    }
}
