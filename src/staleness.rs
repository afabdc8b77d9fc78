//! Staleness decisions: does a target artifact need regenerating?
//!
//! The target tree is the cache. There is no manifest: every run re-derives
//! freshness from modification times, so a crashed or interrupted build is
//! completed by simply running it again.
//!
//! A target is stale when it is missing or older than its source. For a
//! directory source the "source time" is derived by [`DirectoryPolicy`]:
//!
//! - **Shallow** (default): newest mtime among the directory's *immediate*
//!   children. A change two levels down does not reach an ancestor's index
//!   page. This is a known gap, kept because fixing it silently would change
//!   which pages a run rewrites.
//! - **Recursive**: newest mtime anywhere in the subtree.
//!
//! The source is always examined, even when the target is missing, so an
//! empty source directory fails the same way on every run.
//!
//! Timestamps are trusted as-is. Clock skew, or a file touched without being
//! changed, can cause a needless rebuild or a missed one.
//!
//! Callers treat "not stale" as "already byte-identical to what a rebuild
//! would produce". The [`StalenessOracle`] trait keeps that decision in one
//! place so a content-hash oracle could replace the mtime one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StalenessError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot derive a modification time for empty directory: {0}")]
    EmptyDirectory(PathBuf),
}

impl From<walkdir::Error> for StalenessError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop"));
        StalenessError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, StalenessError>;

/// How the modification time of a directory source is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryPolicy {
    /// Newest immediate child.
    #[default]
    Shallow,
    /// Newest entry anywhere below the directory.
    Recursive,
}

/// Decides whether `target` must be regenerated from `source`.
pub trait StalenessOracle {
    fn is_stale(&self, source: &Path, target: &Path) -> Result<bool>;
}

/// Timestamp comparison against the existing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtimeOracle {
    policy: DirectoryPolicy,
}

impl MtimeOracle {
    pub fn new(policy: DirectoryPolicy) -> Self {
        Self { policy }
    }

    /// Effective modification time of a source under this oracle's policy.
    pub fn source_mtime(&self, source: &Path) -> Result<SystemTime> {
        let meta = fs::metadata(source).map_err(|e| io_err(source, e))?;
        if !meta.is_dir() {
            return meta.modified().map_err(|e| io_err(source, e));
        }
        match self.policy {
            DirectoryPolicy::Shallow => newest_child(source),
            DirectoryPolicy::Recursive => newest_descendant(source),
        }
    }
}

impl StalenessOracle for MtimeOracle {
    fn is_stale(&self, source: &Path, target: &Path) -> Result<bool> {
        let source_mtime = self.source_mtime(source)?;
        match fs::metadata(target) {
            Ok(meta) => Ok(meta.modified().map_err(|e| io_err(target, e))? < source_mtime),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(io_err(target, e)),
        }
    }
}

/// Treats every target as stale. Used to force a full rebuild.
///
/// The source time is still derived and then discarded, so a missing source
/// or an empty directory fails a forced run exactly as it fails a normal one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysStale {
    sources: MtimeOracle,
}

impl AlwaysStale {
    pub fn new(policy: DirectoryPolicy) -> Self {
        Self {
            sources: MtimeOracle::new(policy),
        }
    }
}

impl StalenessOracle for AlwaysStale {
    fn is_stale(&self, source: &Path, _target: &Path) -> Result<bool> {
        self.sources.source_mtime(source)?;
        Ok(true)
    }
}

fn io_err(path: &Path, source: io::Error) -> StalenessError {
    StalenessError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn newest_child(dir: &Path) -> Result<SystemTime> {
    let mut newest: Option<SystemTime> = None;
    for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| io_err(&entry.path(), e))?;
        newest = Some(newest.map_or(modified, |n| n.max(modified)));
    }
    newest.ok_or_else(|| StalenessError::EmptyDirectory(dir.to_path_buf()))
}

fn newest_descendant(dir: &Path) -> Result<SystemTime> {
    let mut newest: Option<SystemTime> = None;
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry?;
        let modified = entry
            .metadata()?
            .modified()
            .map_err(|e| io_err(entry.path(), e))?;
        newest = Some(newest.map_or(modified, |n| n.max(modified)));
    }
    newest.ok_or_else(|| StalenessError::EmptyDirectory(dir.to_path_buf()))
}
