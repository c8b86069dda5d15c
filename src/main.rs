use anyhow::Result;
use clap::{Parser, Subcommand};
use job_tracker::analysis::scorer;
use job_tracker::core::ConfigManager;
use job_tracker::scraper::{is_valid_job_url, JobScraper};
use job_tracker::start_web_server;
use job_tracker::utils::read_file_content;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "job-tracker")]
#[command(about = "Job posting extraction and résumé compatibility analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API (default)
    Serve,
    /// Extract job information from a posting URL and print it as JSON
    Extract { url: String },
    /// Check whether a URL belongs to a supported job board
    Validate { url: String },
    /// Score a plain-text résumé against a plain-text job description
    Score {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        job: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_tracker=info,rocket=warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so command output on stdout stays parseable.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = ConfigManager::load()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(
                "Environment: {}",
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
            );
            start_web_server(config).await?;
        }
        Command::Extract { url } => {
            let scraper = JobScraper::new(&config.scraper)?;
            let extraction = scraper.extract(&url).await;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Command::Validate { url } => {
            let valid = is_valid_job_url(&url);
            println!("{}", valid);
            if !valid {
                std::process::exit(1);
            }
        }
        Command::Score { resume, job } => {
            let resume_text = read_file_content(&resume).await?;
            let job_text = read_file_content(&job).await?;
            let breakdown = scorer::score(&resume_text, &job_text);
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
    }

    Ok(())
}
