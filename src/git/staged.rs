//! Staged file discovery.

use std::collections::HashMap;

use git2::{Delta, DiffFindOptions};
use tracing::{debug, warn};

use crate::error::RepositoryError;
use crate::git::repository::GitRepository;

/// Paths staged for the next commit, split by kind of change.
///
/// A path appears in at most one of the three sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedFiles {
    /// Added, modified, or type-changed paths.
    pub staged: Vec<String>,
    /// New paths of renamed files.
    pub renamed: Vec<String>,
    /// Deleted paths.
    pub removed: Vec<String>,
    /// Source path for each renamed path.
    pub rename_sources: HashMap<String, String>,
}

impl StagedFiles {
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.renamed.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.staged.len() + self.renamed.len() + self.removed.len()
    }

    /// All paths: staged, then renamed, then removed.
    pub fn all_paths(&self) -> impl Iterator<Item = &String> {
        self.staged
            .iter()
            .chain(self.renamed.iter())
            .chain(self.removed.iter())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.all_paths().any(|p| p == path)
    }

    /// Paths a commit for `path` must cover. A rename also drops its source.
    pub fn commit_paths_for(&self, path: &str) -> Vec<String> {
        let mut paths = vec![path.to_string()];
        if let Some(source) = self.rename_sources.get(path) {
            paths.push(source.clone());
        }
        paths
    }

    fn push_staged(&mut self, path: String) {
        if !path.is_empty() && !self.contains(&path) {
            self.staged.push(path);
        }
    }

    fn push_renamed(&mut self, path: String, source: Option<String>) {
        if path.is_empty() || self.contains(&path) {
            return;
        }
        if let Some(source) = source.filter(|s| !s.is_empty()) {
            self.rename_sources.insert(path.clone(), source);
        }
        self.renamed.push(path);
    }

    fn push_removed(&mut self, path: String) {
        if !path.is_empty() && !self.contains(&path) {
            self.removed.push(path);
        }
    }
}

/// List staged, renamed, and removed paths (HEAD against the index).
///
/// On an unborn branch every indexed path counts as staged. Fails with
/// [`RepositoryError::InvalidRepository`] for a bare repository before any
/// diff is taken.
pub fn list_staged(repo: &GitRepository) -> Result<StagedFiles, RepositoryError> {
    repo.ensure_worktree()?;

    let head_tree = repo.head_tree().map_err(RepositoryError::ListStaged)?;
    let mut diff = repo
        .inner()
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(RepositoryError::ListStaged)?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(RepositoryError::ListStaged)?;

    let mut files = StagedFiles::default();
    for delta in diff.deltas() {
        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());

        match delta.status() {
            Delta::Renamed => files.push_renamed(new_path.unwrap_or_default(), old_path),
            Delta::Deleted => files.push_removed(old_path.or(new_path).unwrap_or_default()),
            Delta::Added | Delta::Modified | Delta::Typechange | Delta::Copied => {
                files.push_staged(new_path.or(old_path).unwrap_or_default())
            }
            other => warn!("Skipping {:?} entry {:?}", other, new_path.or(old_path)),
        }
    }

    debug!(
        "Staged: {:?}, renamed: {:?}, removed: {:?}",
        files.staged, files.renamed, files.removed
    );

    Ok(files)
}
