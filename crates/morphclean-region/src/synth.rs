//! Synthetic binary test images
//!
//! Disks, annuli, and seeded random blob fields for exercising the cleanup
//! pipeline. Random output depends only on [`SyntheticOptions::seed`].

use crate::error::{RegionError, RegionResult};
use morphclean_core::{FOREGROUND, Image, ImageMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters for [`generate_random_blobs`]
#[derive(Debug, Clone)]
pub struct SyntheticOptions {
    /// Number of large blobs
    pub num_blobs: u32,
    /// Smallest blob radius
    pub min_radius: u32,
    /// Largest blob radius
    pub max_radius: u32,
    /// Number of small specks scattered as noise
    pub num_specks: u32,
    /// Largest speck radius
    pub speck_max_radius: u32,
    /// RNG seed
    pub seed: u64,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            num_blobs: 6,
            min_radius: 12,
            max_radius: 30,
            num_specks: 40,
            speck_max_radius: 3,
            seed: 42,
        }
    }
}

impl SyntheticOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of blobs
    pub fn with_num_blobs(mut self, n: u32) -> Self {
        self.num_blobs = n;
        self
    }

    /// Set the blob radius range
    pub fn with_radius_range(mut self, min: u32, max: u32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Set the number of noise specks
    pub fn with_num_specks(mut self, n: u32) -> Self {
        self.num_specks = n;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Set every pixel within `radius` of `(cx, cy)` to `value`.
///
/// The disk is `dx^2 + dy^2 <= radius^2`, clipped to the image.
pub fn draw_disk(image: &mut ImageMut, cx: i64, cy: i64, radius: u32, value: u8) {
    draw_ring(image, cx, cy, None, radius, value);
}

/// Set every pixel with `inner < d <= outer` from `(cx, cy)` to `value`.
pub fn draw_annulus(image: &mut ImageMut, cx: i64, cy: i64, inner: u32, outer: u32, value: u8) {
    draw_ring(image, cx, cy, Some(inner), outer, value);
}

fn draw_ring(image: &mut ImageMut, cx: i64, cy: i64, inner: Option<u32>, outer: u32, value: u8) {
    let (w, h) = image.dimensions();
    let r = outer as i64;
    let outer2 = r * r;
    let inner2 = inner.map(|i| (i as i64) * (i as i64));

    let y0 = (cy - r).max(0);
    let y1 = (cy + r).min(h as i64 - 1);
    let x0 = (cx - r).max(0);
    let x1 = (cx + r).min(w as i64 - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
            if d2 <= outer2 && inner2.is_none_or(|i2| d2 > i2) {
                image.set_pixel_unchecked(x as u32, y as u32, value);
            }
        }
    }
}

/// A `width x height` binary image holding one foreground disk.
pub fn disk_image(width: u32, height: u32, cx: i64, cy: i64, radius: u32) -> RegionResult<Image> {
    let mut im = Image::new(width, height)?.into_mut();
    draw_disk(&mut im, cx, cy, radius, FOREGROUND);
    Ok(im.into())
}

/// A `width x height` binary image holding one foreground annulus.
pub fn annulus_image(
    width: u32,
    height: u32,
    cx: i64,
    cy: i64,
    inner: u32,
    outer: u32,
) -> RegionResult<Image> {
    if inner >= outer {
        return Err(RegionError::InvalidParameters(format!(
            "annulus inner radius {} must be below outer radius {}",
            inner, outer
        )));
    }
    let mut im = Image::new(width, height)?.into_mut();
    draw_annulus(&mut im, cx, cy, inner, outer, FOREGROUND);
    Ok(im.into())
}

/// Scatter random disks of both sizes over a black field
///
/// Large blobs may overlap and touch, which makes the result a workout
/// for separation; specks give the small-object filter something to
/// remove. Every third blob is drawn as an annulus so hole filling has
/// work to do too.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] when a radius range is empty.
pub fn generate_random_blobs(
    width: u32,
    height: u32,
    options: &SyntheticOptions,
) -> RegionResult<Image> {
    if options.min_radius == 0 || options.min_radius > options.max_radius {
        return Err(RegionError::InvalidParameters(format!(
            "invalid blob radius range {}..={}",
            options.min_radius, options.max_radius
        )));
    }
    if options.num_specks > 0 && options.speck_max_radius == 0 {
        return Err(RegionError::InvalidParameters(
            "speck_max_radius must be positive".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut im = Image::new(width, height)?.into_mut();
    let (wi, hi) = (width as i64, height as i64);

    for i in 0..options.num_blobs {
        let r = rng.random_range(options.min_radius..=options.max_radius);
        let cx = rng.random_range(0..wi);
        let cy = rng.random_range(0..hi);
        if i % 3 == 2 && r >= 6 {
            draw_annulus(&mut im, cx, cy, r / 3, r, FOREGROUND);
        } else {
            draw_disk(&mut im, cx, cy, r, FOREGROUND);
        }
    }

    for _ in 0..options.num_specks {
        let r = rng.random_range(0..=options.speck_max_radius);
        let cx = rng.random_range(0..wi);
        let cy = rng.random_range(0..hi);
        draw_disk(&mut im, cx, cy, r, FOREGROUND);
    }

    tracing::debug!(
        width,
        height,
        blobs = options.num_blobs,
        specks = options.num_specks,
        seed = options.seed,
        "generated synthetic blobs"
    );
    Ok(im.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_area() {
        let image = disk_image(21, 21, 10, 10, 2).unwrap();
        assert_eq!(image.count_foreground(), 13);
        assert!(image.is_binary());
    }

    #[test]
    fn test_disk_clipped() {
        let image = disk_image(5, 5, 0, 0, 2).unwrap();
        assert_eq!(image.get_pixel(0, 0), Some(255));
        assert_eq!(image.get_pixel(2, 0), Some(255));
        assert_eq!(image.get_pixel(2, 2), Some(0));
    }

    #[test]
    fn test_annulus_has_hole() {
        let image = annulus_image(41, 41, 20, 20, 5, 10).unwrap();
        assert_eq!(image.get_pixel(20, 20), Some(0));
        assert_eq!(image.get_pixel(28, 20), Some(255));
        assert!(annulus_image(41, 41, 20, 20, 10, 10).is_err());
    }

    #[test]
    fn test_random_blobs_reproducible() {
        let options = SyntheticOptions::new().with_seed(7);
        let a = generate_random_blobs(64, 48, &options).unwrap();
        let b = generate_random_blobs(64, 48, &options).unwrap();
        assert_eq!(a, b);
        assert!(a.is_binary());
        assert!(a.count_foreground() > 0);
    }

    #[test]
    fn test_random_blobs_bad_range() {
        let options = SyntheticOptions::new().with_radius_range(10, 5);
        assert!(generate_random_blobs(32, 32, &options).is_err());
    }
}
