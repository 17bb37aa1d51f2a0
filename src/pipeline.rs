//! End-to-end run: staged files → diffs → prompt → generation → commits.

use std::path::Path;

use tracing::{info, warn};

use crate::commit::{CommitOutcome, apply, build_diffs, build_per_file_prompt, build_unified_prompt};
use crate::config::GenerationConfig;
use crate::error::{GenerationError, RunError};
use crate::git::{GitRepository, list_staged};
use crate::llm::{ChatCompletionsClient, GenerationMode, Generator, parse_response};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// No staged changes; nothing was generated or committed.
    NothingStaged,
    /// No credential configured; the run stopped before any request.
    MissingCredential,
    /// The backend reply held no usable message; nothing was committed.
    NoMessages(GenerationMode),
    /// Commits were attempted.
    Committed(CommitOutcome),
}

/// Run against the repository at `path` using the configured backend.
pub async fn run(
    path: &Path,
    mode: GenerationMode,
    config: &GenerationConfig,
) -> Result<RunOutcome, RunError> {
    run_with(path, mode, || ChatCompletionsClient::new(config)).await
}

/// Run with a custom generator factory.
///
/// `connect` is only called once there is something to generate for; a
/// [`GenerationError::MissingCredential`] from it ends the run cleanly.
pub async fn run_with<G, F>(
    path: &Path,
    mode: GenerationMode,
    connect: F,
) -> Result<RunOutcome, RunError>
where
    G: Generator,
    F: FnOnce() -> Result<G, GenerationError>,
{
    let repo = GitRepository::open(path)?;

    let files = list_staged(&repo)?;
    if files.is_empty() {
        info!("No staged files in {}", repo.path().display());
        return Ok(RunOutcome::NothingStaged);
    }
    info!("Found {} staged files in {}", files.len(), repo.path().display());

    let diffs = build_diffs(&repo, &files)?;
    let prompt = match mode {
        GenerationMode::PerFile => build_per_file_prompt(&diffs),
        GenerationMode::Unified => build_unified_prompt(&diffs),
    };

    let generator = match connect() {
        Ok(generator) => generator,
        Err(GenerationError::MissingCredential) => {
            warn!("{}", GenerationError::MissingCredential);
            return Ok(RunOutcome::MissingCredential);
        }
        Err(e) => return Err(e.into()),
    };

    let raw = match generator.generate(&prompt).await {
        Ok(raw) => raw,
        Err(e) if e.is_unavailable() => return Err(e.into()),
        Err(_) => return Ok(RunOutcome::MissingCredential),
    };

    let result = parse_response(&raw, mode);
    if result.is_empty() {
        warn!("No usable {} commit message in the response", mode);
        return Ok(RunOutcome::NoMessages(mode));
    }

    Ok(RunOutcome::Committed(apply(&repo, &result, &files)))
}
