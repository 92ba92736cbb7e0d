//! Touching object separation
//!
//! Splits merged blobs along their narrow necks:
//!
//! 1. Distance transform of the binary image.
//! 2. Sure foreground: pixels at least `fraction * max` from the background.
//!    Each connected piece of it becomes one seed.
//! 3. Sure background: the image dilated `dilation_iterations` times. The
//!    unknown band is sure background minus sure foreground, and carries no
//!    seed.
//! 4. Watershed over the negated distance map, masked by the image.
//!
//! Objects become labels `1..=N`; the lines between them carry
//! [`BOUNDARY_LABEL`](morphclean_core::BOUNDARY_LABEL).

use crate::error::{FilterError, FilterResult};
use morphclean_core::{BACKGROUND, DistanceMap, Image, LabelMap};
use morphclean_morph::{Sel, dilate_iterated};
use morphclean_region::{ConnectivityType, distance_transform, label_components, watershed};

/// Options for [`separate_touching_objects_with_options`]
#[derive(Debug, Clone)]
pub struct SeparationOptions {
    /// Share of the maximum distance a pixel needs to be sure foreground,
    /// in `(0, 1]`
    pub sure_foreground_fraction: f32,
    /// Number of dilations that build the sure background; this is the
    /// width of the unknown margin around each object
    pub dilation_iterations: u32,
    /// Structuring element of those dilations
    pub sel: Sel,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            sure_foreground_fraction: 0.5,
            dilation_iterations: 3,
            sel: Sel::default(),
        }
    }
}

impl SeparationOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sure-foreground fraction
    pub fn with_sure_foreground_fraction(mut self, fraction: f32) -> Self {
        self.sure_foreground_fraction = fraction;
        self
    }

    /// Set the number of sure-background dilations
    pub fn with_dilation_iterations(mut self, iterations: u32) -> Self {
        self.dilation_iterations = iterations;
        self
    }

    /// Set the dilation structuring element
    pub fn with_sel(mut self, sel: Sel) -> Self {
        self.sel = sel;
        self
    }

    fn validate(&self) -> FilterResult<()> {
        let f = self.sure_foreground_fraction;
        if !(f > 0.0 && f <= 1.0) {
            return Err(FilterError::InvalidParameters(format!(
                "sure_foreground_fraction must be in (0, 1], got {}",
                f
            )));
        }
        Ok(())
    }
}

/// Every intermediate of a separation run
#[derive(Debug, Clone)]
pub struct SeparationResult {
    /// Euclidean distance of each pixel to the background
    pub distance: DistanceMap,
    /// Pixels far enough inside an object to be certain of it
    pub sure_foreground: Image,
    /// Band between the sure background and the sure foreground
    pub unknown: Image,
    /// Seed labels handed to the watershed
    pub seeds: LabelMap,
    /// Final labels
    pub labels: LabelMap,
}

/// Separate touching objects in a binary image
///
/// # Arguments
///
/// * `image` - Binary image (samples 0 or 255)
/// * `sure_foreground_fraction` - Seed threshold relative to the maximum
///   distance, in `(0, 1]`
/// * `dilation_iterations` - Width of the unknown margin, in 3x3 dilations
///
/// # Errors
///
/// - validation error when `image` is not binary
/// - [`FilterError::InvalidParameters`] when the fraction is out of range
pub fn separate_touching_objects(
    image: &Image,
    sure_foreground_fraction: f32,
    dilation_iterations: u32,
) -> FilterResult<LabelMap> {
    let options = SeparationOptions::default()
        .with_sure_foreground_fraction(sure_foreground_fraction)
        .with_dilation_iterations(dilation_iterations);
    separate_touching_objects_with_options(image, &options)
}

/// Separate touching objects with explicit options
pub fn separate_touching_objects_with_options(
    image: &Image,
    options: &SeparationOptions,
) -> FilterResult<LabelMap> {
    Ok(separate_touching_objects_detailed(image, options)?.labels)
}

/// Separate touching objects and keep every intermediate
pub fn separate_touching_objects_detailed(
    image: &Image,
    options: &SeparationOptions,
) -> FilterResult<SeparationResult> {
    options.validate()?;
    image.ensure_binary()?;

    let distance = distance_transform(image)?;
    let (w, h) = image.dimensions();

    let max = distance.max_value().unwrap_or(0.0);
    if max <= 0.0 {
        // No foreground at all: nothing to seed, nothing to label.
        let empty = LabelMap::new(w, h)?;
        return Ok(SeparationResult {
            distance,
            sure_foreground: image.create_template(),
            unknown: image.create_template(),
            seeds: empty.clone(),
            labels: empty,
        });
    }

    // max > 0, so background (distance 0) never passes.
    let sure_foreground = distance.threshold_ge(options.sure_foreground_fraction * max);
    let (mut seeds, seed_areas) = label_components(&sure_foreground, ConnectivityType::EightWay)?;

    let sure_background = dilate_iterated(image, &options.sel, options.dilation_iterations);
    let unknown = sure_background.arith_subtract(&sure_foreground)?;
    for (label, &u) in seeds.labels_mut().iter_mut().zip(unknown.data()) {
        if u != BACKGROUND {
            *label = 0;
        }
    }

    let labels = watershed(&distance.negate(), &seeds, image)?;

    tracing::debug!(
        max_distance = max,
        seeds = seed_areas.len(),
        labels = labels.max_label(),
        "separated touching objects"
    );
    Ok(SeparationResult {
        distance,
        sure_foreground,
        unknown,
        seeds,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphclean_core::{BOUNDARY_LABEL, ErrorKind};
    use morphclean_region::{disk_image, draw_disk};

    #[test]
    fn test_single_disk_single_label() {
        let image = disk_image(40, 40, 20, 20, 10).unwrap();
        let labels = separate_touching_objects(&image, 0.5, 3).unwrap();
        assert_eq!(labels.max_label(), 1);
        // One seed, so no pixel is ever contested.
        assert_eq!(labels.to_mask(), image);
    }

    #[test]
    fn test_two_disks_split() {
        let mut im = Image::new(80, 40).unwrap().into_mut();
        draw_disk(&mut im, 24, 20, 14, 255);
        draw_disk(&mut im, 50, 20, 14, 255);
        let image: Image = im.into();

        let result = separate_touching_objects_detailed(&image, &SeparationOptions::new()).unwrap();
        assert_eq!(result.labels.max_label(), 2);
        assert_eq!(result.seeds.max_label(), 2);
        assert_eq!(result.labels.get_label(24, 20), Some(1));
        assert_eq!(result.labels.get_label(50, 20), Some(2));
        assert!(result.labels.labels().contains(&BOUNDARY_LABEL));
        assert_eq!(result.labels.get_label(0, 0), Some(0));
    }

    #[test]
    fn test_intermediates_consistent() {
        let image = disk_image(30, 30, 15, 15, 8).unwrap();
        let r = separate_touching_objects_detailed(&image, &SeparationOptions::new()).unwrap();
        // Sure foreground lies inside the object; unknown never overlaps it.
        assert!(r.sure_foreground.all_le(&image).unwrap());
        for (&s, &u) in r.sure_foreground.data().iter().zip(r.unknown.data()) {
            assert!(!(s == 255 && u == 255));
        }
        assert_eq!(r.distance.get_pixel(0, 0), Some(0.0));
        assert_eq!(r.distance.get_pixel(15, 15), Some(65f64.sqrt() as f32));
    }

    #[test]
    fn test_empty_image() {
        let image = Image::new(10, 10).unwrap();
        let labels = separate_touching_objects(&image, 0.5, 3).unwrap();
        assert_eq!(labels.max_label(), 0);
    }

    #[test]
    fn test_full_image_is_one_object() {
        let image = Image::new_with_value(6, 6, 255).unwrap();
        let labels = separate_touching_objects(&image, 0.5, 3).unwrap();
        assert!(labels.labels().iter().all(|&l| l == 1));
    }

    #[test]
    fn test_invalid_fraction() {
        let image = disk_image(20, 20, 10, 10, 5).unwrap();
        for f in [0.0, -0.5, 1.5, f32::NAN] {
            let err = separate_touching_objects(&image, f, 3).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_rejects_grayscale() {
        let image = Image::new_with_value(5, 5, 40).unwrap();
        let err = separate_touching_objects(&image, 0.5, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
