//! Atomic publishing of rendered artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WeekboardError, WeekboardResult};

/// Write `contents` to `path + ".part"`, then rename it onto `path`.
///
/// Readers of `path` never observe a partially written file: either the old
/// artifact is still in place or the new one has fully replaced it. Each
/// artifact publishes independently; there is no cross-artifact transaction.
pub fn publish(path: &Path, contents: &str) -> WeekboardResult<()> {
    let part = part_path(path);

    fs::write(&part, contents).map_err(|source| WeekboardError::Publish {
        path: part.clone(),
        source,
    })?;

    fs::rename(&part, path).map_err(|source| WeekboardError::Publish {
        path: path.to_path_buf(),
        source,
    })
}

fn part_path(path: &Path) -> PathBuf {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}
