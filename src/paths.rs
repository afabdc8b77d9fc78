//! Source → target path mapping.
//!
//! Every published path is derived from a source path by pure string work;
//! nothing here touches the filesystem. Each relative segment is transformed
//! independently by [`target_segment`] and the results are rejoined under the
//! target root:
//!
//! ```text
//! /src/2020/01_Paris/a.jpeg
//!          ↓ target_of(parent / stem)
//! /out/2020/Paris/a/                 ← photo bundle
//!     ├── a.jpeg                     ← Variant::Full
//!     ├── a_preview.jpeg             ← Variant::Preview
//!     ├── a_view.jpeg                ← Variant::View
//!     └── index.html
//! ```
//!
//! Two source segments that transform to the same string (`01_Paris` and
//! `02_Paris`) map to the same target. The mapper does not detect this.

use crate::naming::{NamingPolicy, target_segment};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Filename of every rendered page.
pub const INDEX_PAGE: &str = "index.html";

/// Stem of the reserved directory preview image, in source and target alike.
pub const PREVIEW_STEM: &str = ".preview";

/// Filename of the published stylesheet at the target root.
pub const STYLESHEET: &str = "carousel.css";

#[derive(Error, Debug, PartialEq)]
pub enum MapError {
    #[error("{path} is not under the source root {root}")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },
}

/// One of the three images produced per photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Byte copy of the source.
    Full,
    /// Thumbnail shown in directory listings.
    Preview,
    /// Bounded image shown on the photo page.
    View,
}

impl Variant {
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Full => "",
            Variant::Preview => "_preview",
            Variant::View => "_view",
        }
    }
}

/// Maps source paths to target paths for one build.
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: PathBuf,
    target_root: PathBuf,
    extension: String,
    naming: NamingPolicy,
}

impl PathMapper {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        extension: impl Into<String>,
        naming: NamingPolicy,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            extension: extension.into(),
            naming,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Target location of a source file or directory.
    pub fn target_of(&self, source: &Path) -> Result<PathBuf, MapError> {
        let relative = source
            .strip_prefix(&self.source_root)
            .map_err(|_| self.outside(source))?;

        let mut target = self.target_root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    target.push(target_segment(&segment.to_string_lossy()))
                }
                Component::CurDir => {}
                _ => return Err(self.outside(source)),
            }
        }
        Ok(target)
    }

    /// Bundle directory of a photo: the photo's parent plus its stem, mapped.
    pub fn photo_bundle_dir(&self, photo: &Path) -> Result<PathBuf, MapError> {
        let stem = photo.file_stem().ok_or_else(|| self.outside(photo))?;
        let parent = photo.parent().ok_or_else(|| self.outside(photo))?;
        self.target_of(&parent.join(stem))
    }

    /// Published filename stem of a photo, disambiguated by provenance.
    pub fn photo_name(&self, photo: &Path) -> Result<String, MapError> {
        let bundle = self.photo_bundle_dir(photo)?;
        Ok(self.naming.disambiguated_name(&self.relative_segments(&bundle)))
    }

    /// Location of one image variant inside a photo's bundle.
    pub fn image_variant_path(&self, photo: &Path, variant: Variant) -> Result<PathBuf, MapError> {
        let bundle = self.photo_bundle_dir(photo)?;
        let name = self.photo_name(photo)?;
        Ok(bundle.join(format!("{name}{}.{}", variant.suffix(), self.extension)))
    }

    pub fn index_page_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(INDEX_PAGE)
    }

    pub fn directory_preview_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(self.preview_filename())
    }

    /// Reserved preview image inside a source directory. It may not exist.
    pub fn source_preview_path(&self, source_dir: &Path) -> PathBuf {
        source_dir.join(self.preview_filename())
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.target_root.join(STYLESHEET)
    }

    /// Segments of a target path below the target root. Paths outside the
    /// target root have no segments.
    pub fn relative_segments(&self, target: &Path) -> Vec<String> {
        target
            .strip_prefix(&self.target_root)
            .map(|rel| {
                rel.components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn preview_filename(&self) -> String {
        format!("{PREVIEW_STEM}.{}", self.extension)
    }

    fn outside(&self, path: &Path) -> MapError {
        MapError::OutsideSourceRoot {
            path: path.to_path_buf(),
            root: self.source_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new("/src", "/out", "jpeg", NamingPolicy::new("Hall of Light"))
    }

    // =========================================================================
    // target_of
    // =========================================================================

    #[test]
    fn root_maps_to_root() {
        assert_eq!(mapper().target_of(Path::new("/src")).unwrap(), PathBuf::from("/out"));
    }

    #[test]
    fn segments_are_transformed_independently() {
        let m = mapper();
        assert_eq!(
            m.target_of(Path::new("/src/2020/01_Paris/_night")).unwrap(),
            PathBuf::from("/out/2020/Paris/night")
        );
    }

    #[test]
    fn target_of_is_deterministic() {
        let m = mapper();
        let source = Path::new("/src/03_Rome/12");
        assert_eq!(m.target_of(source).unwrap(), m.target_of(source).unwrap());
    }

    #[test]
    fn distinct_segments_map_to_distinct_targets() {
        let m = mapper();
        let a = m.target_of(Path::new("/src/2020/01_Paris")).unwrap();
        let b = m.target_of(Path::new("/src/2020/02_Rome")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn colliding_segments_are_not_guarded() {
        let m = mapper();
        assert_eq!(
            m.target_of(Path::new("/src/01_Paris")).unwrap(),
            m.target_of(Path::new("/src/02_Paris")).unwrap()
        );
    }

    #[test]
    fn mapping_is_a_fixed_point_on_its_output() {
        let m = mapper();
        let once = m.target_of(Path::new("/src/_01_x/02_03_y/z")).unwrap();
        let rel = once.strip_prefix("/out").unwrap();
        let twice = m.target_of(&Path::new("/src").join(rel)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn outside_source_root_is_an_error() {
        let err = mapper().target_of(Path::new("/elsewhere/a.jpeg")).unwrap_err();
        assert_eq!(
            err,
            MapError::OutsideSourceRoot {
                path: PathBuf::from("/elsewhere/a.jpeg"),
                root: PathBuf::from("/src"),
            }
        );
    }

    #[test]
    fn parent_components_escape_the_root() {
        assert!(mapper().target_of(Path::new("/src/../etc")).is_err());
    }

    // =========================================================================
    // Photo bundles and variants
    // =========================================================================

    #[test]
    fn photo_bundle_is_named_after_stem() {
        assert_eq!(
            mapper().photo_bundle_dir(Path::new("/src/2020/01_Paris/a.jpeg")).unwrap(),
            PathBuf::from("/out/2020/Paris/a")
        );
    }

    #[test]
    fn variants_of_a_named_photo() {
        let m = mapper();
        let photo = Path::new("/src/2020/01_Paris/a.jpeg");
        assert_eq!(
            m.image_variant_path(photo, Variant::Full).unwrap(),
            PathBuf::from("/out/2020/Paris/a/a.jpeg")
        );
        assert_eq!(
            m.image_variant_path(photo, Variant::Preview).unwrap(),
            PathBuf::from("/out/2020/Paris/a/a_preview.jpeg")
        );
        assert_eq!(
            m.image_variant_path(photo, Variant::View).unwrap(),
            PathBuf::from("/out/2020/Paris/a/a_view.jpeg")
        );
    }

    #[test]
    fn variants_of_a_numbered_photo_are_disambiguated() {
        let m = mapper();
        let photo = Path::new("/src/2020/03_Paris/01.jpeg");
        assert_eq!(m.photo_name(photo).unwrap(), "Paris_2020_01");
        assert_eq!(
            m.image_variant_path(photo, Variant::View).unwrap(),
            PathBuf::from("/out/2020/Paris/01/Paris_2020_01_view.jpeg")
        );
    }

    // =========================================================================
    // Pages, previews, and segments
    // =========================================================================

    #[test]
    fn page_and_preview_locations() {
        let m = mapper();
        let dir = Path::new("/out/2020/Paris");
        assert_eq!(m.index_page_path(dir), PathBuf::from("/out/2020/Paris/index.html"));
        assert_eq!(
            m.directory_preview_path(dir),
            PathBuf::from("/out/2020/Paris/.preview.jpeg")
        );
        assert_eq!(
            m.source_preview_path(Path::new("/src/2020")),
            PathBuf::from("/src/2020/.preview.jpeg")
        );
        assert_eq!(m.stylesheet_path(), PathBuf::from("/out/carousel.css"));
    }

    #[test]
    fn segments_below_target_root() {
        let m = mapper();
        assert!(m.relative_segments(Path::new("/out")).is_empty());
        assert!(m.relative_segments(Path::new("/elsewhere/a")).is_empty());
        assert_eq!(
            m.relative_segments(Path::new("/out/2020/Paris")),
            vec!["2020".to_string(), "Paris".to_string()]
        );
    }
}
