use crate::commands::{run_catalog, run_classify, run_delta, run_summary};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hecvat_assess::config::AppConfig;
use hecvat_assess::error::AppError;
use hecvat_assess::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hecvat",
    about = "Import, score and compare HECVAT vendor security assessments",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CSV export of the Questions sheet into a JSON question catalog
    Catalog(CatalogArgs),
    /// Validate question ids and report whether a repository scan can answer them
    Classify(ClassifyArgs),
    /// Score an assessment, optionally against an earlier one
    Summary(SummaryArgs),
    /// Show what changed between two assessments
    Delta(DeltaArgs),
    /// Start the HTTP scoring service
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// CSV export of the HECVAT Questions sheet
    pub(crate) questions_csv: PathBuf,
    /// Where to write the catalog JSON
    pub(crate) output_json: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Question ids such as AAAI-01
    #[arg(required = true)]
    pub(crate) ids: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Assessment JSON to summarize
    pub(crate) assessment_json: PathBuf,
    /// Category weight table (defaults to HECVAT_WEIGHTS_PATH)
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Earlier assessment JSON to compare scores against
    #[arg(long)]
    pub(crate) compare: Option<PathBuf>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Write the JSON summary to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DeltaArgs {
    /// Earlier assessment JSON
    pub(crate) before_json: PathBuf,
    /// Later assessment JSON
    pub(crate) after_json: PathBuf,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Write the JSON report to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Catalog(args) => run_catalog(args),
        Command::Classify(args) => run_classify(args),
        Command::Summary(args) => run_summary(&config, args),
        Command::Delta(args) => run_delta(args),
        Command::Serve(args) => server::run(config, args).await,
    }
}
