//! Quote CLI
//!
//! Prices a quote request read from a JSON file, folds extracted documents
//! into feature flags, or prints the tariff tables.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use core_config::tracing::{init_stderr_tracing, install_color_eyre};
use core_config::FromEnv;
use domain_pricing::{
    CalculatorOptions, ExtractedDocument, MarginConvention, QuoteReport,
    QuoteRequest, QuoteService,
};
use eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Parser)]
#[command(name = "quote-cli")]
#[command(about = "Compute minimum prices for supplier screening projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a quote request
    Quote {
        /// JSON file with the quote request
        #[arg(short, long)]
        input: PathBuf,

        /// JSON file with extracted documents whose feature flags are merged
        /// into the request
        #[arg(short, long)]
        documents: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Margin convention (on_price or markup). Overrides QUOTE_MARGIN_CONVENTION.
        #[arg(short, long)]
        convention: Option<MarginConvention>,

        /// Require region percentages to add up to exactly 100
        #[arg(long)]
        strict_regions: bool,
    },

    /// Summarize extracted documents into feature flags per tier
    Documents {
        /// JSON file with a list of extracted documents
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the tariff tables
    Tariffs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    install_color_eyre();
    init_stderr_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Quote {
            input,
            documents,
            format,
            convention,
            strict_regions,
        } => {
            let mut options = CalculatorOptions::from_env()?;
            if let Some(convention) = convention {
                options = options.with_margin_convention(convention);
            }
            if strict_regions {
                options = options.with_strict_regions(true);
            }
            let service = QuoteService::new(options);

            let mut request: QuoteRequest = read_json(&input)?;
            if let Some(path) = documents {
                let extracted: Vec<ExtractedDocument> = read_json(&path)?;
                let summary = service.summarize_documents(&extracted)?;
                for name in &summary.failed_documents {
                    eprintln!("warning: document '{name}' was skipped");
                }
                summary.merge_into(&mut request);
            }

            let breakdown = service.quote(&request)?;
            info!(total_cost = breakdown.total_cost, "Quote computed");

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
                OutputFormat::Table => print!("{}", QuoteReport::from_breakdown(&breakdown)),
            }
        }

        Commands::Documents { input } => {
            let extracted: Vec<ExtractedDocument> = read_json(&input)?;
            let summary = QuoteService::default().summarize_documents(&extracted)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Tariffs => {
            let sheet = QuoteService::default().tariffs();
            println!("{}", serde_json::to_string_pretty(&sheet)?);
        }
    }

    Ok(())
}
