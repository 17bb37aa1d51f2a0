//! Git repository access: staged file discovery, per-path diffs, commits.

pub mod repository;
pub mod staged;

pub use repository::{CommitTarget, DiffSource, GitRepository};
pub use staged::{StagedFiles, list_staged};
