//! Error types for ezcommit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading repository state.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{} is not a valid git repository: {reason}", path.display())]
    InvalidRepository { path: PathBuf, reason: String },

    #[error("Failed to collect diff for '{path}': {source}")]
    Diff {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to list staged files: {0}")]
    ListStaged(#[source] git2::Error),
}

/// Errors from applying a single commit.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to build commit tree: {0}")]
    Index(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    Commit(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    Signature(#[source] git2::Error),

    #[error("No staged changes for {0}")]
    NothingToCommit(String),
}

/// Errors from the text-generation backend.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No API credential configured. Set GROQ_API_KEY to enable commit message generation")]
    MissingCredential,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Generation request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Generation request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Generation backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation backend returned no completion")]
    EmptyResponse,
}

impl GenerationError {
    /// Whether the backend itself could not produce a completion.
    ///
    /// Everything except a missing credential counts as unavailable and
    /// aborts the run.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, GenerationError::MissingCredential)
    }
}

/// Errors from interpreting a backend reply. Never fatal.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Expected a JSON object mapping paths to messages, found {0}")]
    NotAnObject(&'static str),
}

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("Model identifier must not be empty")]
    EmptyModel,
}

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
