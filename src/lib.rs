//! # Carousel
//!
//! An incremental photo-gallery builder. A source tree of photo directories
//! is mirrored into a published tree of resized images and static HTML
//! pages. Only what changed since the last run is rebuilt.
//!
//! # Architecture: Two-Phase Walk
//!
//! The source tree is walked depth-first. Each directory first produces
//! everything beneath it, collecting the dimensions of every thumbnail, and
//! only then renders its own index page from what was collected:
//!
//! ```text
//! src/2020/01_Paris/a.jpeg          out/2020/Paris/a/a.jpeg
//!                          ──────→  out/2020/Paris/a/a_preview.jpeg
//!                                   out/2020/Paris/a/a_view.jpeg
//!                                   out/2020/Paris/a/index.html
//!                                   out/2020/Paris/index.html   (after a, b, …)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`build`] | Traversal and orchestration: the two-phase walk, sibling links, page contexts |
//! | [`artifact`] | Resize-, copy- and write-or-skip under the staleness oracle; progress events |
//! | [`staleness`] | Is a target out of date? Timestamp oracle and directory policies |
//! | [`paths`] | Pure source → target path mapping |
//! | [`naming`] | Segment classification, titles, captions, disambiguated filenames |
//! | [`render`] | Serializable page contexts, renderer trait, maud HTML renderer |
//! | [`imaging`] | Image backend trait and the pure-Rust JPEG implementation |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI formatting of build progress |
//!
//! # Design Decisions
//!
//! ## The Target Tree Is the Cache
//!
//! There is no manifest or database. Every run compares modification times
//! of sources and targets, so an interrupted build is finished by running it
//! again, and deleting any output file forces just that file to be rebuilt.
//! The comparison sits behind [`staleness::StalenessOracle`], so `--force`
//! is just a different oracle.
//!
//! ## Dimensions Survive Cache Hits
//!
//! Pages embed `width`/`height` for every image. When an image is current it
//! is not regenerated, but its size is read back from the existing file, so a
//! page rendered in any run always has complete dimensions.
//!
//! ## Collaborators Behind Traits
//!
//! Pixel work ([`imaging::ImageBackend`]) and page rendering
//! ([`render::PageRenderer`]) are traits with one production implementation
//! each. Tests substitute recording doubles and never decode an image.
//!
//! ## Names From the Filesystem
//!
//! Directory and file names carry all metadata. Ordering prefixes (`01_`)
//! are stripped from published paths, a leading `_` hides a directory from
//! its parent's listing, and numbered frames (`07.jpeg`) are renamed after
//! their provenance (`Paris_2020_07.jpeg`). See [`naming`].

pub mod artifact;
pub mod build;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod paths;
pub mod render;
pub mod staleness;

#[cfg(test)]
pub(crate) mod test_helpers;
