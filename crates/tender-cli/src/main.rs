mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tender_core::config::{load_settings, Settings};
use tender_core::error::TenderError;

#[derive(Parser)]
#[command(
    name = "tender",
    version,
    about = "Extract EMD amount, due date and a summary from tender documents"
)]
struct Cli {
    /// JSON file holding the tender records
    #[arg(long, global = true, env = "TENDER_STORE", value_name = "FILE")]
    store: Option<PathBuf>,

    /// JSON settings file
    #[arg(long, global = true, env = "TENDER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory where ingested uploads are kept
    #[arg(long, global = true, env = "TENDER_UPLOADS", value_name = "DIR")]
    uploads: Option<PathBuf>,

    /// pdftotext binary to run for PDFs
    #[arg(long, global = true, value_name = "BIN")]
    pdftotext: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log more (repeat for trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from tender documents and store the records
    Ingest {
        /// PDF, DOCX or XLSX files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Record the upload under this file name instead of the path's
        /// (single file only)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
    },
    /// List stored tenders, most recent first
    List,
    /// Show one stored tender
    Show {
        /// Record id
        id: String,

        /// Include the full extracted text
        #[arg(long)]
        full_text: bool,
    },
    /// Copy the original upload of a stored tender out of the uploads directory
    Download {
        /// Record id
        id: String,

        /// Directory or file path to write to
        #[arg(long, value_name = "PATH", default_value = ".")]
        to: PathBuf,
    },
    /// Extract and detect fields without storing anything
    Detect {
        /// PDF, DOCX or XLSX file
        file: PathBuf,
    },
}

fn resolve_settings(cli: &Cli) -> Result<Settings, TenderError> {
    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(store) = &cli.store {
        settings.store_path = store.clone();
    }
    if let Some(dir) = &cli.uploads {
        settings.uploads_dir = Some(dir.clone());
    }
    if let Some(bin) = &cli.pdftotext {
        settings.pdftotext_bin = bin.clone();
    }
    Ok(settings)
}

fn run(cli: Cli) -> Result<bool, TenderError> {
    let settings = resolve_settings(&cli)?;
    tracing::debug!(store = %settings.store_path.display(), "settings resolved");

    match cli.command {
        Commands::Ingest { files, name } => {
            commands::ingest::run(&settings, files, name, cli.output)
        }
        Commands::List => commands::list::run(&settings, cli.output).map(|_| true),
        Commands::Show { id, full_text } => {
            commands::show::run(&settings, &id, full_text, cli.output).map(|_| true)
        }
        Commands::Download { id, to } => {
            commands::download::run(&settings, &id, &to, cli.output).map(|_| true)
        }
        Commands::Detect { file } => {
            commands::detect::run(&settings, file, cli.output).map(|_| true)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
