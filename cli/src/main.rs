//! CLI for the GitHub migrator.
//!
//! Copies labels, projects, milestones, issues, pull requests and hooks from
//! one repository into another.

use clap::Parser;
use github_migrator::{
    ApiConfig, MigrationSummary, Runner, RunnerConfig, RunnerError, Settings, UserMapping,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GitHub Migrator - Migrate issues, pull requests and project boards between repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source repository, `owner/name`.
    source: String,

    /// Target repository, `owner/name`.
    target: String,

    /// API token for the source repository.
    #[arg(long, env = "GITHUB_MIGRATOR_SOURCE_API_TOKEN", hide_env_values = true)]
    source_token: String,

    /// API endpoint for the source repository.
    #[arg(
        long,
        env = "GITHUB_MIGRATOR_SOURCE_API_ENDPOINT",
        default_value = "https://api.github.com"
    )]
    source_endpoint: String,

    /// API token for the target repository.
    #[arg(long, env = "GITHUB_MIGRATOR_TARGET_API_TOKEN", hide_env_values = true)]
    target_token: String,

    /// API endpoint for the target repository.
    #[arg(
        long,
        env = "GITHUB_MIGRATOR_TARGET_API_ENDPOINT",
        default_value = "https://api.github.com"
    )]
    target_endpoint: String,

    /// Login renames, e.g. `alice:alice-corp,bob:robert`.
    #[arg(long, env = "GITHUB_MIGRATOR_USER_MAPPING", default_value = "")]
    user_mapping: String,

    /// Path to a TOML settings file.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let RunnerError::Migrate(migrate) = &e {
                if let Some(url) = migrate.issue_url() {
                    error!(issue = url, "Migration stopped at issue");
                }
            }
            error!(error = %e, "Migration failed");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Output is compact and single-line; `RUST_LOG` selects the level and
/// defaults to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn exit_code(error: &RunnerError) -> u8 {
    if error.is_setup() {
        2
    } else {
        1
    }
}

fn build_config(args: Args) -> Result<RunnerConfig, RunnerError> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    Ok(RunnerConfig::new(
        args.source,
        args.target,
        ApiConfig::new(args.source_token).with_endpoint(args.source_endpoint),
        ApiConfig::new(args.target_token).with_endpoint(args.target_endpoint),
    )
    .with_user_mapping(UserMapping::parse(&args.user_mapping))
    .with_settings(settings))
}

async fn run(args: Args) -> Result<MigrationSummary, RunnerError> {
    let runner = Runner::new(build_config(args)?)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &MigrationSummary) {
    println!("\nSummary:");
    if summary.is_noop() {
        println!("  Target already up to date");
    }
    if summary.repo_updated {
        println!("  Repository description updated");
    }
    println!(
        "  Labels: {} created, {} updated",
        summary.labels_created, summary.labels_updated
    );
    println!(
        "  Projects: {} created, {} updated, {} columns created",
        summary.projects_created, summary.projects_updated, summary.columns_created
    );
    println!(
        "  Milestones: {} created, {} updated, {} placeholders",
        summary.milestones_created, summary.milestones_updated, summary.milestone_placeholders
    );
    println!(
        "  Issues: {} imported, {} skipped, {} placeholders",
        summary.issues_imported, summary.issues_skipped, summary.issue_placeholders
    );
    println!(
        "  Project cards: {} created, {} skipped",
        summary.cards_created, summary.cards_skipped
    );
    println!(
        "  Hooks: {} created, {} updated",
        summary.hooks_created, summary.hooks_updated
    );
}
