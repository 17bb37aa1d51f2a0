//! Applying generated messages as commits.

use git2::Oid;
use tracing::{error, info, warn};

use crate::error::CommitError;
use crate::git::{CommitTarget, StagedFiles};
use crate::llm::{FileMessage, GenerationMode, GenerationResult};

/// A commit that was created.
#[derive(Debug, Clone)]
pub struct AppliedCommit {
    pub paths: Vec<String>,
    pub message: String,
    pub id: Oid,
}

/// A commit that could not be created.
#[derive(Debug)]
pub struct CommitFailure {
    pub paths: Vec<String>,
    pub error: CommitError,
}

/// What happened when applying messages.
#[derive(Debug)]
pub struct CommitOutcome {
    pub mode: GenerationMode,
    pub attempted: usize,
    pub applied: Vec<AppliedCommit>,
    pub failures: Vec<CommitFailure>,
}

impl CommitOutcome {
    fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            attempted: 0,
            applied: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, paths: Vec<String>, message: &str, result: Result<Oid, CommitError>) {
        self.attempted += 1;
        match result {
            Ok(id) => {
                info!("Committed {} as {}: {}", paths.join(", "), id, message);
                self.applied.push(AppliedCommit {
                    paths,
                    message: message.to_string(),
                    id,
                });
            }
            Err(e) => {
                error!("Failed to commit {}: {}", paths.join(", "), e);
                self.failures.push(CommitFailure { paths, error: e });
            }
        }
    }
}

/// Create one commit per file, in the given order.
///
/// A failed commit is recorded and does not stop the remaining ones.
pub fn commit_per_file<T: CommitTarget + ?Sized>(
    target: &T,
    messages: &[FileMessage],
    files: &StagedFiles,
) -> CommitOutcome {
    let mut outcome = CommitOutcome::new(GenerationMode::PerFile);

    for FileMessage { path, message } in messages {
        if !files.contains(path) {
            warn!("Message returned for {} which is not staged", path);
        }
        let paths = files.commit_paths_for(path);
        let result = target.commit_paths(&paths, message);
        outcome.record(paths, message, result);
    }

    let uncovered: Vec<&String> = files
        .all_paths()
        .filter(|p| !messages.iter().any(|m| &m.path == *p))
        .filter(|p| !files.rename_sources.values().any(|source| source == *p))
        .collect();
    if !uncovered.is_empty() {
        warn!("No message generated for {:?}; left staged", uncovered);
    }

    outcome
}

/// Create a single commit of everything staged.
///
/// A blank message creates nothing.
pub fn commit_unified<T: CommitTarget + ?Sized>(
    target: &T,
    message: &str,
    files: &StagedFiles,
) -> CommitOutcome {
    let mut outcome = CommitOutcome::new(GenerationMode::Unified);

    let message = message.trim();
    if message.is_empty() {
        warn!("No unified message available; nothing committed");
        return outcome;
    }

    let paths: Vec<String> = files.all_paths().cloned().collect();
    let result = target.commit_staged(message);
    outcome.record(paths, message, result);
    outcome
}

/// Apply a generation result in the mode it was produced for.
pub fn apply<T: CommitTarget + ?Sized>(
    target: &T,
    result: &GenerationResult,
    files: &StagedFiles,
) -> CommitOutcome {
    match result {
        GenerationResult::PerFile(messages) => commit_per_file(target, messages, files),
        GenerationResult::Unified(message) => commit_unified(target, message, files),
    }
}
