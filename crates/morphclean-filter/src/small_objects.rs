//! Small object removal
//!
//! Two strategies with different selectivity:
//!
//! - [`SmallObjectStrategy::ByArea`] drops every connected component with
//!   fewer than `min_size` pixels. Exact pixel counts, independent of the
//!   structuring element.
//! - [`SmallObjectStrategy::ByReconstruction`] is opening by reconstruction:
//!   erode by the SE, then grow the survivors back inside the original.
//!   A component is kept if the SE fits somewhere inside it, whatever its
//!   pixel count.

use crate::error::FilterResult;
use morphclean_core::Image;
use morphclean_morph::{Sel, erode};
use morphclean_region::{
    ConnectivityType, ReconstructionMode, filter_components_by_size, label_components, reconstruct,
};

/// Minimum component size used when none is given
pub const DEFAULT_MIN_SIZE: u32 = 500;

/// How small objects are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallObjectStrategy {
    /// Remove components with fewer than `min_size` pixels
    #[default]
    ByArea,
    /// Remove components the structuring element does not fit inside
    ByReconstruction {
        /// When set, the reconstructed image is binarized with
        /// `v > threshold -> 255` before it is returned
        rebinarize_threshold: Option<u8>,
    },
}

impl SmallObjectStrategy {
    /// Opening by reconstruction, re-binarized at 127.
    pub fn by_reconstruction() -> Self {
        SmallObjectStrategy::ByReconstruction {
            rebinarize_threshold: Some(127),
        }
    }
}

/// Options for [`remove_small_objects_with_options`]
#[derive(Debug, Clone)]
pub struct SmallObjectOptions {
    /// Smallest area that survives (by-area only)
    pub min_size: u32,
    /// Selection strategy
    pub strategy: SmallObjectStrategy,
    /// Component connectivity (by-area only)
    pub connectivity: ConnectivityType,
}

impl Default for SmallObjectOptions {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            strategy: SmallObjectStrategy::ByArea,
            connectivity: ConnectivityType::EightWay,
        }
    }
}

impl SmallObjectOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum component area
    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the strategy
    pub fn with_strategy(mut self, strategy: SmallObjectStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set connectivity
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Remove small foreground objects from a binary image
///
/// # Arguments
///
/// * `image` - Binary image (samples 0 or 255)
/// * `sel` - Structuring element; only used by
///   [`SmallObjectStrategy::ByReconstruction`]
/// * `min_size` - Smallest component area kept by
///   [`SmallObjectStrategy::ByArea`]
/// * `strategy` - Which criterion decides what is small
///
/// # Errors
///
/// Returns a validation error if `image` is not binary.
///
/// # Examples
///
/// ```
/// use morphclean_core::Image;
/// use morphclean_filter::{SmallObjectStrategy, remove_small_objects};
/// use morphclean_morph::Sel;
///
/// // A 3x3 square and a single speck
/// let image = Image::from_fn(8, 8, |x, y| {
///     if (x < 3 && y < 3) || (x == 6 && y == 6) { 255 } else { 0 }
/// })
/// .unwrap();
/// let sel = Sel::create_square(3).unwrap();
/// let out = remove_small_objects(&image, &sel, 2, SmallObjectStrategy::ByArea).unwrap();
/// assert_eq!(out.count_foreground(), 9);
/// ```
pub fn remove_small_objects(
    image: &Image,
    sel: &Sel,
    min_size: u32,
    strategy: SmallObjectStrategy,
) -> FilterResult<Image> {
    let options = SmallObjectOptions::default()
        .with_min_size(min_size)
        .with_strategy(strategy);
    remove_small_objects_with_options(image, sel, &options)
}

/// Remove small foreground objects with explicit options
pub fn remove_small_objects_with_options(
    image: &Image,
    sel: &Sel,
    options: &SmallObjectOptions,
) -> FilterResult<Image> {
    image.ensure_binary()?;

    let out = match options.strategy {
        SmallObjectStrategy::ByArea => {
            let (labels, areas) = label_components(image, options.connectivity)?;
            let kept = filter_components_by_size(&labels, &areas, options.min_size);
            tracing::debug!(
                components = areas.len(),
                kept = areas.iter().filter(|&(_, a)| a >= options.min_size).count(),
                min_size = options.min_size,
                "removed small objects by area"
            );
            kept
        }
        SmallObjectStrategy::ByReconstruction {
            rebinarize_threshold,
        } => {
            let marker = erode(image, sel);
            let reconstructed = reconstruct(&marker, image, sel, ReconstructionMode::Dilation)?;
            tracing::debug!(
                sel_width = sel.width(),
                sel_height = sel.height(),
                before = image.count_foreground(),
                after = reconstructed.count_foreground(),
                "removed small objects by reconstruction"
            );
            match rebinarize_threshold {
                Some(t) => reconstructed.threshold(t),
                None => reconstructed,
            }
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphclean_core::ErrorKind;

    /// 12x12 field: a 4x4 square (area 16), a 1x5 bar (area 5), a speck.
    fn sample() -> Image {
        Image::from_fn(12, 12, |x, y| {
            let square = (1..5).contains(&x) && (1..5).contains(&y);
            let bar = x == 9 && (2..7).contains(&y);
            let speck = x == 3 && y == 9;
            if square || bar || speck { 255 } else { 0 }
        })
        .unwrap()
    }

    fn square3() -> Sel {
        Sel::create_square(3).unwrap()
    }

    #[test]
    fn test_by_area_threshold() {
        let image = sample();
        let out = remove_small_objects(&image, &square3(), 5, SmallObjectStrategy::ByArea).unwrap();
        assert_eq!(out.count_foreground(), 16 + 5);
        assert_eq!(out.get_pixel(3, 9), Some(0));

        let out = remove_small_objects(&image, &square3(), 6, SmallObjectStrategy::ByArea).unwrap();
        assert_eq!(out.count_foreground(), 16);
    }

    #[test]
    fn test_by_area_zero_keeps_everything() {
        let image = sample();
        let out = remove_small_objects(&image, &square3(), 0, SmallObjectStrategy::ByArea).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn test_by_reconstruction_uses_shape() {
        // The bar has more pixels than the speck but is one pixel wide, so a
        // 3x3 SE does not fit inside it.
        let image = sample();
        let out = remove_small_objects(
            &image,
            &square3(),
            0,
            SmallObjectStrategy::by_reconstruction(),
        )
        .unwrap();
        assert_eq!(out.count_foreground(), 16);
        assert_eq!(out.get_pixel(9, 4), Some(0));
        assert_eq!(out.get_pixel(1, 1), Some(255));
    }

    #[test]
    fn test_strategies_differ() {
        // A thin 1x40 line has area 40 but no room for a 3x3 SE.
        let image = Image::from_fn(50, 5, |x, y| if y == 2 && x < 40 { 255 } else { 0 }).unwrap();
        let by_area =
            remove_small_objects(&image, &square3(), 10, SmallObjectStrategy::ByArea).unwrap();
        let by_rec = remove_small_objects(
            &image,
            &square3(),
            10,
            SmallObjectStrategy::ByReconstruction {
                rebinarize_threshold: None,
            },
        )
        .unwrap();
        assert_eq!(by_area.count_foreground(), 40);
        assert_eq!(by_rec.count_foreground(), 0);
    }

    #[test]
    fn test_four_way_connectivity_splits_diagonals() {
        let image = Image::from_fn(4, 4, |x, y| if x == y { 255 } else { 0 }).unwrap();
        let options = SmallObjectOptions::new()
            .with_min_size(2)
            .with_connectivity(ConnectivityType::FourWay);
        let out = remove_small_objects_with_options(&image, &square3(), &options).unwrap();
        assert_eq!(out.count_foreground(), 0);

        let options = options.with_connectivity(ConnectivityType::EightWay);
        let out = remove_small_objects_with_options(&image, &square3(), &options).unwrap();
        assert_eq!(out.count_foreground(), 4);
    }

    #[test]
    fn test_rejects_grayscale() {
        let image = Image::new_with_value(4, 4, 100).unwrap();
        for strategy in [SmallObjectStrategy::ByArea, SmallObjectStrategy::by_reconstruction()] {
            let err = remove_small_objects(&image, &square3(), 1, strategy).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn test_default_options() {
        let options = SmallObjectOptions::default();
        assert_eq!(options.min_size, 500);
        assert_eq!(options.strategy, SmallObjectStrategy::ByArea);
        assert_eq!(options.connectivity, ConnectivityType::EightWay);
    }
}
