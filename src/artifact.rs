//! Staleness-guarded artifact production.
//!
//! Every file the builder writes goes through an [`ArtifactProducer`]
//! operation that first asks the [`StalenessOracle`] whether the target is
//! current:
//!
//! | Operation | Stale | Fresh |
//! |-----------|-------|-------|
//! | [`resize_or_skip`](ArtifactProducer::resize_or_skip) | backend resize | read dimensions back from the target |
//! | [`copy_or_skip`](ArtifactProducer::copy_or_skip) | byte copy | nothing |
//! | [`write_or_skip`](ArtifactProducer::write_or_skip) | render and write | nothing, renderer never runs |
//!
//! `resize_or_skip` returns [`Dimensions`] on both branches. Pages that embed
//! an image therefore always have its size, whether the image was rebuilt in
//! this run or left alone from a previous one.
//!
//! Dimensions read from disk are memoized for the rest of the run. The memo
//! never outlives the producer.
//!
//! Each decision is reported as a [`BuildEvent`] when a sender is attached,
//! and counted in [`BuildStats`].

use crate::imaging::{BackendError, Dimensions, ImageBackend, Quality, ResizeParams};
use crate::render::RenderError;
use crate::staleness::{StalenessError, StalenessOracle};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error(transparent)]
    Staleness(#[from] StalenessError),
    #[error("Image processing failed for {path}: {source}")]
    Backend {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// What kind of file an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Full-size copy of a photo.
    Photo,
    /// Listing thumbnail of a photo.
    Preview,
    /// Photo-page image.
    View,
    /// Thumbnail of a directory's reserved preview image.
    DirectoryPreview,
    /// Rendered index page.
    Page,
    Stylesheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Target was missing or out of date and has been (re)written.
    Rebuilt,
    /// Target was current and left untouched.
    Skipped,
}

/// Progress events emitted while building.
///
/// Paths are target paths.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    DirectoryStarted {
        path: PathBuf,
    },
    Artifact {
        path: PathBuf,
        kind: ArtifactKind,
        status: ArtifactStatus,
    },
}

/// Rebuild/skip counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub rebuilt: u32,
    pub skipped: u32,
}

impl BuildStats {
    pub fn record(&mut self, status: ArtifactStatus) {
        match status {
            ArtifactStatus::Rebuilt => self.rebuilt += 1,
            ArtifactStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.rebuilt + self.skipped
    }
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.skipped > 0 {
            write!(
                f,
                "{} rebuilt, {} skipped ({} total)",
                self.rebuilt,
                self.skipped,
                self.total()
            )
        } else {
            write!(f, "{} rebuilt", self.rebuilt)
        }
    }
}

/// Produces artifacts under a staleness oracle's guard.
pub struct ArtifactProducer<'a> {
    backend: &'a dyn ImageBackend,
    oracle: &'a dyn StalenessOracle,
    quality: Quality,
    dimensions: HashMap<PathBuf, Dimensions>,
    events: Option<Sender<BuildEvent>>,
    stats: BuildStats,
}

impl<'a> ArtifactProducer<'a> {
    pub fn new(
        backend: &'a dyn ImageBackend,
        oracle: &'a dyn StalenessOracle,
        quality: Quality,
        events: Option<Sender<BuildEvent>>,
    ) -> Self {
        Self {
            backend,
            oracle,
            quality,
            dimensions: HashMap::new(),
            events,
            stats: BuildStats::default(),
        }
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Forward an event to the attached sender, if any. A dropped receiver
    /// is not an error.
    pub fn emit(&self, event: BuildEvent) {
        if let Some(tx) = &self.events {
            tx.send(event).ok();
        }
    }

    /// Create `dir` and its parents. Existing directories are fine.
    pub fn ensure_dir(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Scale `source` into `bounds` at `target` unless the target is current.
    ///
    /// Returns the target's dimensions either way.
    pub fn resize_or_skip(
        &mut self,
        source: &Path,
        target: &Path,
        bounds: Dimensions,
        kind: ArtifactKind,
    ) -> Result<Dimensions, ArtifactError> {
        if self.oracle.is_stale(source, target)? {
            let params = ResizeParams {
                source: source.to_path_buf(),
                output: target.to_path_buf(),
                bounds,
                quality: self.quality,
            };
            let written = self
                .backend
                .resize(&params)
                .map_err(|source| ArtifactError::Backend {
                    path: target.to_path_buf(),
                    source,
                })?;
            self.dimensions.insert(target.to_path_buf(), written);
            self.report(target, kind, ArtifactStatus::Rebuilt);
            Ok(written)
        } else {
            let existing = self.dimensions_of(target)?;
            self.report(target, kind, ArtifactStatus::Skipped);
            Ok(existing)
        }
    }

    /// Byte-copy `source` to `target` unless the target is current.
    pub fn copy_or_skip(
        &mut self,
        source: &Path,
        target: &Path,
        kind: ArtifactKind,
    ) -> Result<ArtifactStatus, ArtifactError> {
        let status = if self.oracle.is_stale(source, target)? {
            fs::copy(source, target).map_err(|e| self.io_error(target, e))?;
            self.dimensions.remove(target);
            ArtifactStatus::Rebuilt
        } else {
            ArtifactStatus::Skipped
        };
        self.report(target, kind, status);
        Ok(status)
    }

    /// Write the output of `contents` to `target` unless the target is
    /// current relative to `source`. `contents` only runs when writing.
    pub fn write_or_skip<F>(
        &mut self,
        source: &Path,
        target: &Path,
        kind: ArtifactKind,
        contents: F,
    ) -> Result<ArtifactStatus, ArtifactError>
    where
        F: FnOnce() -> Result<String, RenderError>,
    {
        let status = if self.oracle.is_stale(source, target)? {
            fs::write(target, contents()?).map_err(|e| self.io_error(target, e))?;
            ArtifactStatus::Rebuilt
        } else {
            ArtifactStatus::Skipped
        };
        self.report(target, kind, status);
        Ok(status)
    }

    /// Dimensions of an existing image, read once per run.
    fn dimensions_of(&mut self, path: &Path) -> Result<Dimensions, ArtifactError> {
        if let Some(dims) = self.dimensions.get(path) {
            return Ok(*dims);
        }
        let dims = self
            .backend
            .identify(path)
            .map_err(|source| ArtifactError::Backend {
                path: path.to_path_buf(),
                source,
            })?;
        self.dimensions.insert(path.to_path_buf(), dims);
        Ok(dims)
    }

    fn report(&mut self, path: &Path, kind: ArtifactKind, status: ArtifactStatus) {
        self.stats.record(status);
        self.emit(BuildEvent::Artifact {
            path: path.to_path_buf(),
            kind,
            status,
        });
    }

    fn io_error(&self, path: &Path, source: io::Error) -> ArtifactError {
        ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
