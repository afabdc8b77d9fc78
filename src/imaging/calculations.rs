//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Fit `source` inside `bounds`, preserving aspect ratio.
///
/// The constrained edge is set to the bound exactly and only the other edge
/// is computed, so float rounding never leaves the result a pixel short of
/// the box. Height wins ties. Images already inside the box are returned
/// unchanged: nothing is upscaled.
///
/// # Examples
/// ```
/// # use carousel::imaging::{Dimensions, fit_within};
/// // 4000x3000 landscape into the 700x500 view box → height-limited
/// let fitted = fit_within(Dimensions::new(4000, 3000), Dimensions::new(700, 500));
/// assert_eq!(fitted, Dimensions::new(666, 500));
/// ```
pub fn fit_within(source: Dimensions, bounds: Dimensions) -> Dimensions {
    if source.width <= bounds.width && source.height <= bounds.height {
        return source;
    }

    let width_ratio = source.width as f64 / bounds.width as f64;
    let height_ratio = source.height as f64 / bounds.height as f64;

    if height_ratio >= width_ratio {
        let width = (source.width as f64 / height_ratio) as u32;
        Dimensions::new(width.max(1), bounds.height)
    } else {
        let height = (source.height as f64 / width_ratio) as u32;
        Dimensions::new(bounds.width, height.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height)
    }

    #[test]
    fn landscape_limited_by_height() {
        // 4000/700 = 5.71, 3000/500 = 6.0 → height dominates
        assert_eq!(fit_within(dims(4000, 3000), dims(700, 500)), dims(666, 500));
    }

    #[test]
    fn wide_panorama_limited_by_width() {
        // 6000/700 = 8.57, 1000/500 = 2.0 → width dominates
        assert_eq!(fit_within(dims(6000, 1000), dims(700, 500)), dims(700, 116));
    }

    #[test]
    fn portrait_into_square_box() {
        assert_eq!(fit_within(dims(3000, 4000), dims(200, 200)), dims(150, 200));
    }

    #[test]
    fn square_into_square_box() {
        assert_eq!(fit_within(dims(1000, 1000), dims(100, 100)), dims(100, 100));
    }

    #[test]
    fn small_image_not_upscaled() {
        assert_eq!(fit_within(dims(120, 80), dims(200, 200)), dims(120, 80));
    }

    #[test]
    fn one_edge_over_bound() {
        assert_eq!(fit_within(dims(150, 300), dims(200, 200)), dims(100, 200));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        let fitted = fit_within(dims(10_000, 1), dims(100, 100));
        assert_eq!(fitted.width, 100);
        assert_eq!(fitted.height, 1);
    }
}
