use crate::render::render_text;
use crate::server;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use salary_health::config::{AppConfig, DiagnosisConfig};
use salary_health::error::AppError;
use salary_health::roster::RosterImporter;
use salary_health::{compose, telemetry};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "salary-health-api",
    about = "Diagnose compensation health from an employee roster",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Diagnose a CSV roster export and print the findings
    Diagnose(DiagnoseArgs),
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

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// CSV roster export to diagnose
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// JSON policy file; falls back to APP_POLICY_PATH, then built-in defaults
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Reference date for tenure derived from hire dates (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the full diagnosis as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Diagnose(args) => run_diagnose(args),
    }
}

fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let DiagnoseArgs {
        roster,
        policy,
        as_of,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let policy = match policy {
        Some(path) => DiagnosisConfig {
            policy_path: Some(path),
        }
        .load_policy()?,
        None => config.diagnosis.load_policy()?,
    };
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let records = RosterImporter::from_path(&roster, Some(as_of))?;
    let result = compose(&records, &policy);

    if json {
        let body = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{body}");
    } else {
        println!("{}", render_text(&result, &roster.display().to_string()));
    }

    Ok(())
}
