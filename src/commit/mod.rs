//! AI-generated commit messages: diff collection, prompts, and commit application.

pub mod apply;
pub mod diff;
pub mod prompt;

pub use apply::{AppliedCommit, CommitFailure, CommitOutcome, apply, commit_per_file, commit_unified};
pub use diff::{DiffMap, build_diffs};
pub use prompt::{build_per_file_prompt, build_unified_prompt, serialize_diffs};
