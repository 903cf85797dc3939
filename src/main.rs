use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use redmark::aggregate::{BatchOutcome, process_file, process_folder};
use redmark::config::Settings;
use redmark::export::export_to_json;
use redmark::extract::Extractor;
use redmark::report::write_report;
use redmark::{ExportFormat, logging};

#[derive(Parser)]
#[command(name = "redmark")]
#[command(about = "Extract red change annotations from Word change logs into an Excel report")]
#[command(version)]
struct Cli {
    /// Input .doc/.docx file or a folder to scan recursively
    #[arg(required_unless_present = "init_config")]
    input: Option<PathBuf>,

    /// Output workbook path
    #[arg(short, long, default_value = "redmark-report.xlsx")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
    export: ExportFormat,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the default settings and exit
    #[arg(long)]
    init_config: bool,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.init_config {
        let path = Settings::init_default(cli.config.as_deref())
            .context("Failed to write default settings")?;
        eprintln!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let extractor = Extractor::new(&settings)?;

    let Some(input) = cli.input else {
        bail!("No input file or folder given");
    };
    if !input.exists() {
        bail!("Input not found: {}", input.display());
    }

    let outcome = if input.is_dir() {
        process_folder(&input, &extractor)
    } else {
        // A single unreadable input file is fatal
        let records = process_file(&input, &extractor)
            .with_context(|| format!("Failed to process {}", input.display()))?;
        BatchOutcome {
            records,
            documents_processed: 1,
            ..BatchOutcome::default()
        }
    };

    if outcome.records.is_empty() {
        warn!("no change records found");
    }

    match cli.export {
        ExportFormat::Json => {
            println!("{}", export_to_json(&outcome)?);
        }
        ExportFormat::Xlsx => {
            let summary = write_report(&outcome.records, &cli.output, &settings.report)?;
            eprintln!(
                "Wrote {} ({} data model, {} logic changes from {} documents)",
                cli.output.display(),
                summary.data_model_rows,
                summary.logic_rows,
                outcome.documents_processed
            );
        }
    }

    for failure in &outcome.failures {
        eprintln!("Skipped {}: {}", failure.path.display(), failure.error);
    }

    Ok(())
}
