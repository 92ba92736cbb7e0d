//! FloatImage - Floating-point image
//!
//! `FloatImage` is a 2D array of `f32` values. It holds distance maps and
//! the elevation surfaces fed to the watershed.
//!
//! # Memory Layout
//!
//! Data is stored in row-major order with no padding. The pixel at (x, y)
//! is at index `y * width + x`.
//!
//! # Examples
//!
//! ```
//! use morphclean_core::FloatImage;
//!
//! let mut fimage = FloatImage::new(10, 10).unwrap();
//! fimage.set_pixel(3, 4, 2.5).unwrap();
//! assert_eq!(fimage.get_pixel(3, 4), Some(2.5));
//! assert_eq!(fimage.max_value(), Some(2.5));
//! ```

use crate::error::{Error, Result};
use crate::image::{BACKGROUND, FOREGROUND, Image};

/// Distance of every pixel to the nearest background pixel.
pub type DistanceMap = FloatImage;

/// Floating-point image
#[derive(Debug, Clone, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl FloatImage {
    /// Create a new FloatImage with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new FloatImage with all pixels set to the specified value
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(FloatImage {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        })
    }

    /// Create a FloatImage from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }
        Ok(FloatImage {
            width,
            height,
            data,
        })
    }

    /// Convert an 8-bit image sample by sample.
    pub fn from_image(image: &Image) -> Self {
        FloatImage {
            width: image.width(),
            height: image.height(),
            data: image.data().iter().map(|&v| v as f32).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get a pixel value, or `None` when out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y as usize) * (self.width as usize) + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Set a pixel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + x as usize,
                len: self.data.len(),
            });
        }
        self.data[(y as usize) * (self.width as usize) + x as usize] = value;
        Ok(())
    }

    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: f32) {
        self.data[(y as usize) * (self.width as usize) + x as usize] = value;
    }

    /// Largest value, ignoring NaN. `None` if every value is NaN.
    pub fn max_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f32::max)
    }

    /// Largest finite value. `None` if no value is finite.
    pub fn max_finite_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f32::max)
    }

    /// Smallest value, ignoring NaN. `None` if every value is NaN.
    pub fn min_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f32::min)
    }

    /// Negate every value, turning ridges into basins.
    pub fn negate(&self) -> FloatImage {
        FloatImage {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| -v).collect(),
        }
    }

    /// Binary image of the pixels whose value is `>= thresh`.
    pub fn threshold_ge(&self, thresh: f32) -> Image {
        let data = self
            .data
            .iter()
            .map(|&v| if v >= thresh { FOREGROUND } else { BACKGROUND })
            .collect();
        Image::from_data(self.width, self.height, data)
            .unwrap_or_else(|_| unreachable!("float image has valid dimensions"))
    }

    /// Fail with `Error::DimensionMismatch` unless `image` has the same size.
    pub fn check_matches(&self, image: &Image) -> Result<()> {
        if self.dimensions() == image.dimensions() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: image.dimensions(),
            })
        }
    }
}
