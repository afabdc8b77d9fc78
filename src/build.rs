//! Incremental gallery build.
//!
//! Walks the source tree depth-first and mirrors it into the target tree.
//! Each directory is handled in two phases:
//!
//! ```text
//! collect  ensure target dir
//!          photos (sorted): bundle dir, preview, view, full copy, photo page
//!          reserved .preview image, if any
//!          subdirectories (sorted), each a full visit
//!          ──→ CollectedDir { photos, subdirs, preview }
//! render   index page from the CollectedDir
//! ```
//!
//! The index page needs the dimensions of every child thumbnail, so it can
//! only be assembled from a finished [`CollectedDir`]. A visit returns the
//! directory's own preview dimensions, which is all the parent needs to
//! list it.
//!
//! Directories whose names start with `.` are skipped. Hidden directories
//! (leading `_`) are built in full but left out of their parent's listing.
//!
//! Nothing is cached between runs except the target tree itself. A run that
//! fails partway leaves finished artifacts in place, and the next run picks
//! up where it stopped.

use crate::artifact::{
    ArtifactError, ArtifactKind, ArtifactProducer, BuildEvent, BuildStats,
};
use crate::config::GalleryConfig;
use crate::imaging::{Dimensions, ImageBackend, Quality};
use crate::naming::{NamingPolicy, is_hidden};
use crate::paths::{MapError, PathMapper, Variant};
use crate::render::{
    Breadcrumb, DEFAULT_STYLESHEET, DirectoryPage, PageContext, PageRenderer, PhotoEntry,
    PhotoPage, PreviewImage, SubdirEntry,
};
use crate::staleness::{StalenessError, StalenessOracle};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Staleness(#[from] StalenessError),
    #[error("Failed to produce artifacts for {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
    #[error("Failed to build index page for {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    /// Attribute an artifact failure to the source it was produced from.
    /// Staleness failures keep their own variant.
    fn artifact(path: &Path, err: ArtifactError) -> Self {
        match err {
            ArtifactError::Staleness(e) => BuildError::Staleness(e),
            source => BuildError::Artifact {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    fn directory(path: &Path, err: ArtifactError) -> Self {
        match err {
            ArtifactError::Staleness(e) => BuildError::Staleness(e),
            source => BuildError::Directory {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub stats: BuildStats,
    /// Dimensions of the root directory's own preview thumbnail, if it has one.
    pub root_preview: Option<Dimensions>,
}

/// Build the gallery for `source_root` into `target_root`.
///
/// Progress events are sent on `events` when given.
pub fn build(
    source_root: &Path,
    target_root: &Path,
    config: &GalleryConfig,
    backend: &dyn ImageBackend,
    renderer: &dyn PageRenderer,
    oracle: &dyn StalenessOracle,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let naming = config.naming();
    let mut walk = Walk {
        config,
        mapper: PathMapper::new(source_root, target_root, &config.extension, naming.clone()),
        naming,
        producer: ArtifactProducer::new(backend, oracle, Quality::new(config.quality), events),
        renderer,
    };

    walk.publish_stylesheet()?;
    let root_preview = walk.visit(source_root)?;

    Ok(BuildReport {
        stats: walk.producer.stats(),
        root_preview,
    })
}

/// Everything a directory's index page needs, gathered bottom-up.
#[derive(Debug)]
struct CollectedDir {
    source: PathBuf,
    target: PathBuf,
    photos: Vec<PhotoEntry>,
    subdirs: Vec<SubdirEntry>,
    preview: Option<Dimensions>,
}

struct Walk<'a> {
    config: &'a GalleryConfig,
    mapper: PathMapper,
    naming: NamingPolicy,
    producer: ArtifactProducer<'a>,
    renderer: &'a dyn PageRenderer,
}

impl Walk<'_> {
    fn publish_stylesheet(&mut self) -> Result<(), BuildError> {
        let target_root = self.mapper.target_root().to_path_buf();
        self.producer
            .ensure_dir(&target_root)
            .map_err(|e| BuildError::artifact(&target_root, e))?;

        let target = self.mapper.stylesheet_path();
        match &self.config.stylesheet {
            Some(custom) => {
                let source = self.mapper.source_root().join(custom);
                self.producer
                    .copy_or_skip(&source, &target, ArtifactKind::Stylesheet)
                    .map_err(|e| BuildError::artifact(&source, e))?;
            }
            None => {
                // The built-in stylesheet is current only if newer than the
                // binary embedding it.
                let binary = std::env::current_exe().map_err(|source| BuildError::Io {
                    path: PathBuf::from("<current executable>"),
                    source,
                })?;
                self.producer
                    .write_or_skip(&binary, &target, ArtifactKind::Stylesheet, || {
                        Ok(DEFAULT_STYLESHEET.to_string())
                    })
                    .map_err(|e| BuildError::artifact(&target, e))?;
            }
        }
        Ok(())
    }

    fn visit(&mut self, source_dir: &Path) -> Result<Option<Dimensions>, BuildError> {
        let collected = self.collect(source_dir)?;
        let preview = collected.preview;
        self.render_index(collected)?;
        Ok(preview)
    }

    fn collect(&mut self, source_dir: &Path) -> Result<CollectedDir, BuildError> {
        let target = self.mapper.target_of(source_dir)?;
        self.producer.emit(BuildEvent::DirectoryStarted {
            path: target.clone(),
        });
        self.producer
            .ensure_dir(&target)
            .map_err(|e| BuildError::artifact(source_dir, e))?;

        let (photo_paths, subdir_paths) = self.list(source_dir)?;

        let mut photos = Vec::with_capacity(photo_paths.len());
        for (i, photo) in photo_paths.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| photo_paths[p].as_path());
            let next = photo_paths.get(i + 1).map(PathBuf::as_path);
            photos.push(self.photo(photo, prev, next)?);
        }

        let source_preview = self.mapper.source_preview_path(source_dir);
        let preview = if source_preview.is_file() {
            let bounds = Dimensions::from(self.config.bounds.directory);
            let dims = self
                .producer
                .resize_or_skip(
                    &source_preview,
                    &self.mapper.directory_preview_path(&target),
                    bounds,
                    ArtifactKind::DirectoryPreview,
                )
                .map_err(|e| BuildError::artifact(&source_preview, e))?;
            Some(dims)
        } else {
            None
        };

        let mut subdirs = Vec::new();
        for subdir in &subdir_paths {
            let dims = self.visit(subdir)?;
            let name = file_name(subdir);
            if is_hidden(&name) {
                continue;
            }
            let sub_target = self.mapper.target_of(subdir)?;
            let segment = file_name(&sub_target);
            subdirs.push(SubdirEntry {
                link: format!("{segment}/"),
                title: self.naming.title(&segment),
                preview: dims.map(|d| PreviewImage {
                    preview: format!(
                        "{segment}/{}",
                        file_name(&self.mapper.directory_preview_path(&sub_target))
                    ),
                    width: d.width,
                    height: d.height,
                }),
            });
        }

        Ok(CollectedDir {
            source: source_dir.to_path_buf(),
            target,
            photos,
            subdirs,
            preview,
        })
    }

    fn render_index(&mut self, dir: CollectedDir) -> Result<(), BuildError> {
        let segments = self.mapper.relative_segments(&dir.target);
        let own = segments.last().map(String::as_str).unwrap_or("");
        let page = PageContext::Directory(DirectoryPage {
            title: self.naming.title(own),
            site: self.naming.gallery_name().to_string(),
            css_dir: "../".repeat(segments.len()),
            breadcrumbs: self.breadcrumbs(&segments),
            subdirs: dir.subdirs,
            photos: dir.photos,
        });

        let renderer = self.renderer;
        self.producer
            .write_or_skip(
                &dir.source,
                &self.mapper.index_page_path(&dir.target),
                ArtifactKind::Page,
                || renderer.render(&page),
            )
            .map_err(|e| BuildError::directory(&dir.source, e))?;
        Ok(())
    }

    /// Produce one photo's bundle and return its listing entry.
    fn photo(
        &mut self,
        photo: &Path,
        prev: Option<&Path>,
        next: Option<&Path>,
    ) -> Result<PhotoEntry, BuildError> {
        let bundle = self.mapper.photo_bundle_dir(photo)?;
        let preview_path = self.mapper.image_variant_path(photo, Variant::Preview)?;
        let view_path = self.mapper.image_variant_path(photo, Variant::View)?;
        let full_path = self.mapper.image_variant_path(photo, Variant::Full)?;
        let bounds = self.config.bounds;

        let wrap = |e: ArtifactError| BuildError::artifact(photo, e);
        self.producer.ensure_dir(&bundle).map_err(wrap)?;
        let preview = self
            .producer
            .resize_or_skip(photo, &preview_path, bounds.preview.into(), ArtifactKind::Preview)
            .map_err(wrap)?;
        let view = self
            .producer
            .resize_or_skip(photo, &view_path, bounds.view.into(), ArtifactKind::View)
            .map_err(wrap)?;
        self.producer
            .copy_or_skip(photo, &full_path, ArtifactKind::Photo)
            .map_err(wrap)?;

        let segments = self.mapper.relative_segments(&bundle);
        let name = file_name(&bundle);
        let caption = self.naming.caption(&name);
        let page = PageContext::Photo(PhotoPage {
            title: self.naming.title(&name),
            site: self.naming.gallery_name().to_string(),
            css_dir: "../".repeat(segments.len()),
            breadcrumbs: self.breadcrumbs(&segments),
            prev: prev.map(|p| self.neighbour_link(p)).transpose()?,
            next: next.map(|p| self.neighbour_link(p)).transpose()?,
            photo: file_name(&full_path),
            view: file_name(&view_path),
            caption: caption.clone(),
            width: view.width,
            height: view.height,
        });

        let renderer = self.renderer;
        self.producer
            .write_or_skip(
                photo,
                &self.mapper.index_page_path(&bundle),
                ArtifactKind::Page,
                || renderer.render(&page),
            )
            .map_err(wrap)?;

        Ok(PhotoEntry {
            link: format!("{name}/"),
            preview: format!("{name}/{}", file_name(&preview_path)),
            caption,
            width: preview.width,
            height: preview.height,
        })
    }

    /// Link from one photo page to a sibling's bundle.
    fn neighbour_link(&self, photo: &Path) -> Result<String, BuildError> {
        let bundle = self.mapper.photo_bundle_dir(photo)?;
        Ok(format!("../{}/", file_name(&bundle)))
    }

    /// Trail from the gallery root down to the parent of the page whose
    /// directory has the given target segments.
    fn breadcrumbs(&self, segments: &[String]) -> Vec<Breadcrumb> {
        let depth = segments.len();
        (0..depth)
            .map(|k| {
                let name = if k == 0 { "" } else { segments[k - 1].as_str() };
                Breadcrumb {
                    title: self.naming.title(name),
                    link: "../".repeat(depth - k),
                }
            })
            .collect()
    }

    /// Photos and subdirectories of `dir`, each sorted by name. Dot-prefixed
    /// entries are ignored.
    fn list(&self, dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), BuildError> {
        let io_err = |source: io::Error| BuildError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut photos = Vec::new();
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if file_name(&path).starts_with('.') {
                continue;
            }
            if path.is_dir() {
                subdirs.push(path);
            } else if path
                .extension()
                .is_some_and(|ext| ext == self.config.extension.as_str())
            {
                photos.push(path);
            }
        }
        photos.sort();
        subdirs.sort();
        Ok((photos, subdirs))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
