//! ezcommit - drafts commit messages for staged changes with an LLM and commits them.
//!
//! # Overview
//!
//! ezcommit reads the staged diff of every file in a git repository, asks a
//! chat-completions backend for either one conventional commit message per
//! file or a single message for all of them, and applies the result as
//! commits.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod logging;
pub mod pipeline;

// Re-export commonly used types
pub use commit::{CommitOutcome, DiffMap};
pub use config::GenerationConfig;
pub use error::{CommitError, ConfigError, GenerationError, RepositoryError, ResponseError, RunError};
pub use git::{GitRepository, StagedFiles};
pub use llm::{FileMessage, GenerationMode, GenerationResult, Generator};
pub use pipeline::{RunOutcome, run, run_with};
