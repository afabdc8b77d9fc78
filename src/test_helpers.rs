//! Shared test utilities for the carousel test suite.
//!
//! Builds source trees on disk and pins modification times so staleness
//! decisions are deterministic regardless of filesystem timestamp
//! granularity.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let source = tmp.path().join("src");
//! fake_tree(&source, &["2020/01_Paris/a.jpeg", "2020/01_Paris/b.jpeg"]);
//! set_mtime(&source.join("2020/01_Paris/a.jpeg"), at(10));
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::imaging::backend::tests::write_fake_image;

// =========================================================================
// Timestamps
// =========================================================================

/// A fixed point in time, `secs` seconds after an arbitrary epoch.
pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs)
}

/// Set the modification time of a file or directory.
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::open(path)
        .and_then(|f| f.set_modified(time))
        .unwrap_or_else(|e| panic!("set mtime of {}: {e}", path.display()));
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Create fake 4000x3000 images (see `MockBackend`) at each relative path
/// under `root`, creating parent directories as needed.
pub fn fake_tree(root: &Path, files: &[&str]) {
    for rel in files {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        write_fake_image(&path, 4000, 3000);
    }
}

/// Write a small solid-colour JPEG for the real backend.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = File::create(path).unwrap();
    let encoder = JpegEncoder::new_with_quality(file, 90);
    img.write_with_encoder(encoder).unwrap();
}
