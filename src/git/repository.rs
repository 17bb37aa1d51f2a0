//! Repository handle over git2: validation, per-path diffs, and commits.

use std::path::{Path, PathBuf};

use git2::{Commit, DiffFormat, DiffOptions, ErrorCode, Index, Oid, Repository, Tree};
use tracing::debug;

use crate::error::{CommitError, RepositoryError};

/// Source of per-path diff text.
#[cfg_attr(test, mockall::automock)]
pub trait DiffSource {
    /// Textual patch for one path between HEAD and the index.
    fn diff_for(&self, path: &str) -> Result<String, RepositoryError>;
}

/// Something commits can be applied to.
///
/// This abstraction allows exercising commit sequencing without a real
/// repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait CommitTarget {
    /// Commit only the staged state of `paths`, leaving the rest of the
    /// index staged.
    fn commit_paths(&self, paths: &[String], message: &str) -> Result<Oid, CommitError>;

    /// Commit everything currently staged.
    fn commit_staged(&self, message: &str) -> Result<Oid, CommitError>;
}

/// An opened, non-bare git repository.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Open the repository at `path`.
    ///
    /// Fails with [`RepositoryError::InvalidRepository`] if the path is not a
    /// git working directory or the repository has no working tree.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| RepositoryError::InvalidRepository {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;

        let handle = Self::from_repository(repo);
        handle.ensure_worktree()?;
        Ok(handle)
    }

    /// Wrap an already opened repository without validating it.
    pub fn from_repository(repo: Repository) -> Self {
        let path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Self { repo, path }
    }

    /// Fail unless the repository has a working tree.
    pub fn ensure_worktree(&self) -> Result<(), RepositoryError> {
        if self.repo.is_bare() {
            return Err(RepositoryError::InvalidRepository {
                path: self.path.clone(),
                reason: "repository is bare (no working tree)".to_string(),
            });
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    /// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
    ///
    /// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
    pub(crate) fn head_tree(&self) -> Result<Option<Tree<'_>>, git2::Error> {
        Ok(match self.head_commit()? {
            Some(commit) => Some(commit.tree()?),
            None => None,
        })
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>, git2::Error> {
        let head_ref = match self.repo.head() {
            Ok(r) => r,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        head_ref.peel_to_commit().map(Some)
    }

    /// Load the on-disk index, picking up changes made by other processes.
    fn staged_index(&self) -> Result<Index, git2::Error> {
        let mut index = self.repo.index()?;
        index.read(false)?;
        Ok(index)
    }

    /// Write `tree_id` as a new commit on HEAD.
    fn commit_tree(&self, tree_id: Oid, message: &str, what: String) -> Result<Oid, CommitError> {
        let sig = self.repo.signature().map_err(CommitError::Signature)?;
        let parent = self.head_commit().map_err(CommitError::Commit)?;

        let unchanged = match &parent {
            Some(parent) => parent.tree_id() == tree_id,
            None => self
                .repo
                .find_tree(tree_id)
                .map_err(CommitError::Commit)?
                .is_empty(),
        };
        if unchanged {
            return Err(CommitError::NothingToCommit(what));
        }

        let tree = self.repo.find_tree(tree_id).map_err(CommitError::Commit)?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(CommitError::Commit)?;

        debug!("Created commit {} for {}", oid, what);
        Ok(oid)
    }
}

impl DiffSource for GitRepository {
    fn diff_for(&self, path: &str) -> Result<String, RepositoryError> {
        let to_err = |source| RepositoryError::Diff {
            path: path.to_string(),
            source,
        };

        let head_tree = self.head_tree().map_err(to_err)?;

        let mut opts = DiffOptions::new();
        opts.pathspec(path).disable_pathspec_match(true);
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
            .map_err(to_err)?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let origin = line.origin();
            if origin == '+' || origin == '-' || origin == ' ' {
                text.push(origin);
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .map_err(to_err)?;

        Ok(text)
    }
}

impl CommitTarget for GitRepository {
    fn commit_paths(&self, paths: &[String], message: &str) -> Result<Oid, CommitError> {
        let staged = self.staged_index().map_err(CommitError::Index)?;

        // Start from HEAD and apply only the staged entries for `paths`.
        let mut index = Index::new().map_err(CommitError::Index)?;
        if let Some(tree) = self.head_tree().map_err(CommitError::Index)? {
            index.read_tree(&tree).map_err(CommitError::Index)?;
        }

        for path in paths {
            let p = Path::new(path);
            match staged.get_path(p, 0) {
                Some(entry) => index.add(&entry).map_err(CommitError::Index)?,
                None if index.get_path(p, 0).is_some() => {
                    index.remove_path(p).map_err(CommitError::Index)?
                }
                None => {}
            }
        }

        let tree_id = index.write_tree_to(&self.repo).map_err(CommitError::Index)?;
        self.commit_tree(tree_id, message, paths.join(", "))
    }

    fn commit_staged(&self, message: &str) -> Result<Oid, CommitError> {
        let mut index = self.staged_index().map_err(CommitError::Index)?;
        let tree_id = index.write_tree().map_err(CommitError::Index)?;
        self.commit_tree(tree_id, message, "staged changes".to_string())
    }
}
