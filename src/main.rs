use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use line_artifacts::config::AppConfig;
use line_artifacts::logging::{init_logging, OperationTimer};
use line_artifacts::{CaseDatabase, DirectoryLocator, LineAnalyzer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file read after the standard locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract LINE contacts, messages and calls into a case database
    Analyze {
        /// Root of the extracted device image
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Case database to write into
        #[arg(long)]
        case: Option<PathBuf>,

        /// Account id of the device owner
        #[arg(long)]
        owner_id: Option<String>,

        /// Display name of the device owner
        #[arg(long, requires = "owner_id")]
        owner_name: Option<String>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Also write JSON logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Show how many records a case database holds
    Summary {
        /// Case database to inspect
        #[arg(long)]
        case: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Analyze {
            source,
            case,
            owner_id,
            owner_name,
            log_level,
            log_file,
        } => {
            if let Some(source) = source {
                config.source.root = Some(source.to_string_lossy().into_owned());
            }
            if let Some(case) = case {
                config.case.database_path = case.to_string_lossy().into_owned();
            }
            if owner_id.is_some() {
                config.owner.id = owner_id;
                config.owner.name = owner_name;
            }
            if let Some(level) = log_level {
                config.logging.level = level;
            }
            if let Some(file) = log_file {
                config.logging.file_path = Some(file.to_string_lossy().into_owned());
            }
            config.validate()?;

            let _guard = init_logging(
                Some(&config.get_log_level()),
                config.logging.file_path.as_deref().map(std::path::Path::new),
                config.logging.format == "json",
            )?;

            run_analyze(&config)
        }
        Commands::Summary { case } => {
            let _guard = init_logging(Some(&config.get_log_level()), None, config.logging.format == "json")?;
            let path = case.unwrap_or_else(|| PathBuf::from(&config.case.database_path));
            run_summary(&path)
        }
    }
}

fn run_analyze(config: &AppConfig) -> Result<()> {
    let timer = OperationTimer::new("analyze");
    let root = config
        .source
        .root
        .as_deref()
        .context("No source directory given; pass --source or set source.root")?;

    info!(source = root, case = %config.case.database_path, "Starting LINE analysis");

    let locator = DirectoryLocator::new(root);
    let mut case = CaseDatabase::open(std::path::Path::new(&config.case.database_path))
        .context("Failed to open case database")?;
    let analyzer = LineAnalyzer::new(config.owner_defaults()).with_package(config.source.package_name.clone());

    let report = analyzer.analyze(&locator, &mut case).inspect_err(|e| {
        error!(error = %e, "LINE analysis aborted");
    })?;
    timer.finish();

    println!("{report}");
    if report.failed_passes > 0 {
        println!("\nSome extraction passes failed; see the log for details.");
    }
    Ok(())
}

fn run_summary(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Case database not found: {}", path.display());
    }
    let case = CaseDatabase::open(path).context("Failed to open case database")?;
    let summary = case.summary()?;

    println!("Case database: {}", path.display());
    println!("Contacts:  {}", summary.contacts);
    println!("Messages:  {}", summary.messages);
    println!("Call logs: {}", summary.call_logs);
    Ok(())
}
