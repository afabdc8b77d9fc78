//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the builder needs:
//! identify (read dimensions) and resize (scale into a bounding box, write the
//! result, report what was written).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<[u32; 2]> for Dimensions {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Scale `params.source` to fit `params.bounds`, write it to
    /// `params.output`, and return the dimensions actually written.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::fit_within;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels.
    ///
    /// Images are plain text files holding `"<width>x<height>"`. `identify`
    /// parses that text; `resize` reads the source's size the same way, fits
    /// it into the bounds, and writes the fitted size to the output, so
    /// skipped outputs can be identified later exactly like real ones.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            bounds: Dimensions,
            quality: u8,
        },
    }

    /// Write a fake image of the given size for [`MockBackend`].
    pub fn write_fake_image(path: &Path, width: u32, height: u32) {
        std::fs::write(path, format!("{width}x{height}")).unwrap();
    }

    fn read_fake_image(path: &Path) -> Result<Dimensions, BackendError> {
        let text = std::fs::read_to_string(path)?;
        let (w, h) = text
            .trim()
            .split_once('x')
            .ok_or_else(|| BackendError::ProcessingFailed(format!("not a fake image: {text}")))?;
        let parse = |s: &str| {
            s.parse::<u32>()
                .map_err(|e| BackendError::ProcessingFailed(e.to_string()))
        };
        Ok(Dimensions::new(parse(w)?, parse(h)?))
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn resize_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Resize { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            read_fake_image(path)
        }

        fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                bounds: params.bounds,
                quality: params.quality.value(),
            });
            let fitted = fit_within(read_fake_image(&params.source)?, params.bounds);
            write_fake_image(&params.output, fitted.width, fitted.height);
            Ok(fitted)
        }
    }

    #[test]
    fn mock_records_identify() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("image.jpeg");
        write_fake_image(&path, 800, 600);

        let backend = MockBackend::new();
        let result = backend.identify(&path).unwrap();
        assert_eq!(result, Dimensions::new(800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p.ends_with("image.jpeg")));
    }

    #[test]
    fn mock_resize_writes_fitted_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpeg");
        let output = tmp.path().join("output.jpeg");
        write_fake_image(&source, 4000, 3000);

        let backend = MockBackend::new();
        let written = backend
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                bounds: Dimensions::new(700, 500),
                quality: crate::imaging::Quality::new(85),
            })
            .unwrap();

        assert_eq!(written, Dimensions::new(666, 500));
        assert_eq!(read_fake_image(&output).unwrap(), written);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Resize { quality: 85, .. }
        ));
    }

    #[test]
    fn dimensions_from_bounds_array() {
        assert_eq!(Dimensions::from([200, 100]), Dimensions::new(200, 100));
    }
}
