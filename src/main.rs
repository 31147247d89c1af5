use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use review_tally::config::Config;
use review_tally::extractors::paper_locations::load_lookup;
use review_tally::extractors::review_declines::parse_cutoff;
use review_tally::extractors::{
    PaperLocations, PaperRecommendations, PaperScores, PrimaryWorkload, ReviewDeclines, ReviewerBalance,
    ReviewerWorkload,
};
use review_tally::{logging, OutputFormat, Pipeline, Table};

#[derive(Parser)]
#[command(name = "review-tally")]
#[command(about = "Extract and tally reviewer data from conference review CSV exports")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $REVIEW_TALLY_CONFIG, then ./review_tally.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output rendering
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Net reviewer assignments: Reviewer 1-3 mentions minus external reviewer mentions
    ReviewerBalance {
        /// Submissions CSV
        submissions: PathBuf,
    },
    /// Paper ID, primary score and completed reviewer scores
    PaperScores {
        /// Submissions CSV
        submissions: PathBuf,
    },
    /// Submissions and names of reviewers who declined since a date
    ReviewDeclines {
        /// Email log CSV
        email_log: PathBuf,
        /// Oldest date to include (YYYY-MM-DD)
        #[arg(value_parser = cutoff_date)]
        oldest_date: NaiveDate,
    },
    /// Reviewer coverage of the papers led by each primary
    PrimaryWorkload {
        /// Submissions CSV
        submissions: PathBuf,
    },
    /// Completed and assigned reviews per PC member and external reviewer
    ReviewerWorkload {
        /// Submissions CSV
        submissions: PathBuf,
    },
    /// Scheduling slots shared by everyone on each paper
    PaperLocations {
        /// Submissions CSV
        submissions: PathBuf,
        /// Participant CSV with `Name` and `Slots available` columns
        locations: PathBuf,
    },
    /// Reviewer recommendation codes as numeric scores
    PaperRecommendations {
        /// Submissions CSV
        submissions: PathBuf,
    },
    /// Reviewers who declined but still have a positive reviewer balance
    AvailableDeclines {
        /// Oldest decline date to include (YYYY-MM-DD)
        #[arg(value_parser = cutoff_date)]
        date_to_filter: NaiveDate,
        /// Submissions CSV
        submissions: PathBuf,
        /// Email log CSV
        email_log: PathBuf,
    },
}

fn cutoff_date(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_cutoff(value).map_err(|e| e.to_string())
}

fn read_table(path: &Path) -> Result<Table> {
    Table::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let filter = config.decision_filter();

    let extraction = match cli.command {
        Commands::ReviewerBalance { submissions } => {
            Pipeline::run(&ReviewerBalance::new(filter), &read_table(&submissions)?)?
        }
        Commands::PaperScores { submissions } => {
            Pipeline::run(&PaperScores::new(filter), &read_table(&submissions)?)?
        }
        Commands::ReviewDeclines { email_log, oldest_date } => {
            Pipeline::run(&ReviewDeclines::in_current_year(oldest_date), &read_table(&email_log)?)?
        }
        Commands::PrimaryWorkload { submissions } => {
            Pipeline::run(&PrimaryWorkload::new(filter), &read_table(&submissions)?)?
        }
        Commands::ReviewerWorkload { submissions } => {
            Pipeline::run(&ReviewerWorkload::new(filter), &read_table(&submissions)?)?
        }
        Commands::PaperLocations { submissions, locations } => {
            let lookup = load_lookup(&read_table(&locations)?)
                .with_context(|| format!("Invalid location table {}", locations.display()))?;
            Pipeline::run(&PaperLocations::new(filter, lookup), &read_table(&submissions)?)?
        }
        Commands::PaperRecommendations { submissions } => {
            let extractor = PaperRecommendations::new(
                filter,
                config.recommendations.on_unknown,
                config.recommendations.blank_decision.clone(),
            );
            Pipeline::run(&extractor, &read_table(&submissions)?)?
        }
        Commands::AvailableDeclines {
            date_to_filter,
            submissions,
            email_log,
        } => {
            let submissions = read_table(&submissions)?;
            let email_log = read_table(&email_log)?;
            Pipeline::available_declines(
                &ReviewerBalance::new(filter),
                &ReviewDeclines::in_current_year(date_to_filter),
                &submissions,
                &email_log,
            )?
        }
    };

    let stdout = io::stdout();
    extraction.output.write(cli.format, stdout.lock())?;
    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Dates are validated by clap before any file is opened.
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = logging::init_logging(&config.logging);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
