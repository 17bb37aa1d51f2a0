//! ezcommit - CLI entry point.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ezcommit::commit::CommitOutcome;
use ezcommit::config::{CREDENTIAL_ENV_VAR, GenerationConfig};
use ezcommit::logging::{LOG_DIR_ENV_VAR, init_tracing};
use ezcommit::{GenerationMode, RunOutcome, run};

/// Generate commit messages for staged files using an LLM.
#[derive(Parser, Debug)]
#[command(name = "ezcommit")]
#[command(about = "Generate commit messages for staged files using an LLM")]
#[command(version)]
struct Cli {
    /// Commit all staged files with generated messages
    #[arg(short = 'r', long = "run")]
    run: bool,

    /// Path to the git repository
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Commit all staged files together with a single unified message
    #[arg(long)]
    unified: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_dir = env::var_os(LOG_DIR_ENV_VAR).map(PathBuf::from);
    let _log_guard = init_tracing(log_dir.as_deref());

    let cli = Cli::parse();

    if !cli.run {
        println!("Use the --run option to commit all staged files with generated messages.");
        println!("Add --unified to commit all files together with a single message.");
        return Ok(());
    }

    let config = GenerationConfig::from_env().context("Invalid generation configuration")?;

    let repo_path = std::path::absolute(&cli.path)
        .with_context(|| format!("Could not resolve path {}", cli.path.display()))?;

    let mode = if cli.unified {
        GenerationMode::Unified
    } else {
        GenerationMode::PerFile
    };

    if config.has_credential() {
        println!("Generating {} commit messages with {}...", mode, config.model_id);
    }

    let outcome = run(&repo_path, mode, &config)
        .await
        .context("Failed to generate commits")?;

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NothingStaged => println!("No staged files. Nothing to commit."),
        RunOutcome::MissingCredential => println!(
            "No API key found. Set {} (environment or .env) to generate commit messages.",
            CREDENTIAL_ENV_VAR
        ),
        RunOutcome::NoMessages(mode) => println!(
            "The model did not return a usable {} commit message. Nothing was committed.",
            mode
        ),
        RunOutcome::Committed(commits) => print_commits(commits),
    }
}

fn print_commits(outcome: &CommitOutcome) {
    for commit in &outcome.applied {
        let short_id = commit.id.to_string();
        println!(
            "✓ [{}] {} ({})",
            &short_id[..7.min(short_id.len())],
            commit.message.lines().next().unwrap_or_default(),
            commit.paths.join(", ")
        );
    }

    for failure in &outcome.failures {
        eprintln!("✗ {}: {}", failure.paths.join(", "), failure.error);
    }

    println!(
        "{} of {} commits applied.",
        outcome.applied.len(),
        outcome.attempted
    );
}
