//! Per-path diff collection for staged files.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::RepositoryError;
use crate::git::{DiffSource, StagedFiles};

/// Path → diff text, ordered by path.
pub type DiffMap = BTreeMap<String, String>;

/// Fetch the diff of every staged, renamed, and removed path.
///
/// Renamed paths are diffed on their own. A removed path whose diff cannot
/// be read gets an empty entry; any other failure is returned.
pub fn build_diffs<S: DiffSource + ?Sized>(
    source: &S,
    files: &StagedFiles,
) -> Result<DiffMap, RepositoryError> {
    let mut diffs = DiffMap::new();

    for path in files.staged.iter().chain(files.renamed.iter()) {
        let diff = source.diff_for(path)?;
        diffs.insert(path.clone(), diff);
    }

    for path in &files.removed {
        let diff = match source.diff_for(path) {
            Ok(diff) => diff,
            Err(e) => {
                warn!("No diff available for removed file {}: {}", path, e);
                String::new()
            }
        };
        diffs.insert(path.clone(), diff);
    }

    debug!("Collected diffs for {} files", diffs.len());
    Ok(diffs)
}
