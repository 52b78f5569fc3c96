mod batch;
mod config;
mod data;
mod error;
mod report;
mod spectral;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use batch::{BatchRunner, BatchSummary, LogSink};
use config::AnalysisConfig;
use data::loader::CsvTableLoader;
use report::{JsonReport, ReportWriter, XlsxReport};

#[derive(Parser)]
#[command(name = "period-scan")]
#[command(about = "Estimate the dominant period of every CSV file in a directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing the CSV files (a folder picker opens if omitted)
    #[arg(value_name = "DIR")]
    directory: Option<PathBuf>,

    /// JSON file with analysis settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Zero-based x column position, counted after empty columns are dropped
    #[arg(short = 'x', long)]
    x_column: Option<usize>,

    /// Zero-based y column position, counted after empty columns are dropped
    #[arg(short = 'y', long)]
    y_column: Option<usize>,

    /// Primary text encoding of the input files (default: shift_jis)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Also write the results as JSON next to the workbook
    #[arg(long)]
    json: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(x) = cli.x_column {
        config.x_column = x;
    }
    if let Some(y) = cli.y_column {
        config.y_column = y;
    }
    if let Some(encoding) = cli.encoding.clone() {
        config.encoding = encoding;
    }

    let Some(directory) = cli.directory.clone().or_else(pick_directory) else {
        println!("No directory selected.");
        return Ok(());
    };

    let runner = BatchRunner::new(&config, CsvTableLoader::new(), LogSink);
    let rows = runner.run_dir(&directory)?;

    let output = directory.join(&config.report_name);
    XlsxReport::new(config.error_marker.as_str()).write(&rows, &output)?;
    log::info!("Results saved to {}", output.display());

    if cli.json {
        let json_path = output.with_extension("json");
        JsonReport.write(&rows, &json_path)?;
        log::info!("JSON results saved to {}", json_path.display());
    }

    let summary = BatchSummary::from_rows(&rows);
    println!("Results saved to {}", output.display());
    println!(
        "{} file(s): {} succeeded, {} failed",
        rows.len(),
        summary.succeeded,
        summary.failed
    );
    Ok(())
}

fn pick_directory() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select Directory with CSV Files")
        .pick_folder()
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
