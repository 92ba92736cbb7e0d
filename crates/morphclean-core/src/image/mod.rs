//! Image - The 8-bit sample grid every operation consumes and produces
//!
//! An [`Image`] is a fixed-size 2D grid of `u8` samples, used either in the
//! binary domain `{0, 255}` or the grayscale domain `[0, 255]`.
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared ownership) and is never
//! mutated once handed to a caller. To build or modify pixel data, convert
//! to [`ImageMut`] via [`Image::try_into_mut`] or [`Image::to_mut`], then
//! convert back with `Into<Image>`.
//!
//! # Memory layout
//!
//! Samples are stored in row-major order with no padding. The sample at
//! `(x, y)` lives at index `y * width + x`.

pub mod arith;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Sample value of a foreground pixel in a binary image.
pub const FOREGROUND: u8 = 255;

/// Sample value of a background pixel in a binary image.
pub const BACKGROUND: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    fn new(width: u32, height: u32, value: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(ImageData {
            width,
            height,
            data: vec![value; (width as usize) * (height as usize)],
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + x as usize)
        } else {
            None
        }
    }
}

/// Immutable 8-bit image
///
/// # Examples
///
/// ```
/// use morphclean_core::Image;
///
/// let image = Image::new(64, 48).unwrap();
/// assert_eq!(image.dimensions(), (64, 48));
/// assert_eq!(image.get_pixel(10, 10), Some(0));
/// assert_eq!(image.get_pixel(64, 0), None);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for Image {}

impl Image {
    /// Create a new image with every sample set to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0)
    }

    /// Create a new image with every sample set to `value`.
    pub fn new_with_value(width: u32, height: u32, value: u8) -> Result<Self> {
        Ok(Image {
            inner: Arc::new(ImageData::new(width, height, value)?),
        })
    }

    /// Create an image from row-major sample data.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `data.len()` does not
    /// equal `width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                data,
            }),
        })
    }

    /// Create an image by evaluating `f(x, y)` at every pixel.
    ///
    /// ```
    /// use morphclean_core::Image;
    ///
    /// let ramp = Image::from_fn(4, 1, |x, _| (x * 10) as u8).unwrap();
    /// assert_eq!(ramp.data(), &[0, 10, 20, 30]);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut inner = ImageData::new(width, height, 0)?;
        for y in 0..height {
            for x in 0..width {
                inner.data[(y as usize) * (width as usize) + x as usize] = f(x, y);
            }
        }
        Ok(Image {
            inner: Arc::new(inner),
        })
    }

    /// Create a zero-filled image with the same dimensions as `self`.
    pub fn create_template(&self) -> Self {
        Image {
            inner: Arc::new(ImageData {
                width: self.inner.width,
                height: self.inner.height,
                data: vec![0; self.inner.data.len()],
            }),
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the image dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.data.len()
    }

    /// Get raw access to the sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.inner.width as usize;
        let start = (y as usize) * w;
        &self.inner.data[start..start + w]
    }

    /// Get the sample at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.index(x, y).map(|i| self.inner.data[i])
    }

    /// Get the sample at `(x, y)` without a bounds check on the coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the computed index is past the end of the data.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u8 {
        self.inner.data[(y as usize) * (self.inner.width as usize) + x as usize]
    }

    /// Check if two images have the same width and height.
    pub fn sizes_equal(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Fail with [`Error::DimensionMismatch`] unless `other` has the same size.
    pub fn check_same_size(&self, other: &Image) -> Result<()> {
        if self.sizes_equal(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// True if every sample is either 0 or 255.
    pub fn is_binary(&self) -> bool {
        self.inner
            .data
            .iter()
            .all(|&v| v == BACKGROUND || v == FOREGROUND)
    }

    /// Fail with [`Error::NotBinary`] at the first sample outside `{0, 255}`.
    ///
    /// Binary-only operations call this instead of silently thresholding.
    pub fn ensure_binary(&self) -> Result<()> {
        match self
            .inner
            .data
            .iter()
            .position(|&v| v != BACKGROUND && v != FOREGROUND)
        {
            None => Ok(()),
            Some(i) => {
                let w = self.inner.width as usize;
                Err(Error::NotBinary {
                    x: (i % w) as u32,
                    y: (i / w) as u32,
                    value: self.inner.data[i],
                })
            }
        }
    }

    /// Count pixels whose sample is non-zero.
    pub fn count_foreground(&self) -> usize {
        self.inner.data.iter().filter(|&&v| v != 0).count()
    }

    /// Get the number of strong references to the shared data.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(ImageMut { inner }),
            Err(inner) => Err(Image { inner }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Get mutable access, copying only if the data is shared.
    pub fn into_mut(self) -> ImageMut {
        self.try_into_mut().unwrap_or_else(|image| image.to_mut())
    }
}

/// Mutable image
///
/// Allows modification of sample data. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the image dimensions as `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let w = self.inner.width as usize;
        let start = (y as usize) * w;
        &mut self.inner.data[start..start + w]
    }

    /// Get the sample at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.inner.index(x, y).map(|i| self.inner.data[i])
    }

    /// Set the sample at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u8) -> Result<()> {
        match self.inner.index(x, y) {
            Some(i) => {
                self.inner.data[i] = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.inner.width as usize) + x as usize,
                len: self.inner.data.len(),
            }),
        }
    }

    /// Set the sample at `(x, y)` without a bounds check on the coordinates.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: u8) {
        let w = self.inner.width as usize;
        self.inner.data[(y as usize) * w + x as usize] = value;
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: u8) {
        self.inner.data.fill(value);
    }
}

impl From<ImageMut> for Image {
    fn from(image: ImageMut) -> Self {
        Image {
            inner: Arc::new(image.inner),
        }
    }
}
