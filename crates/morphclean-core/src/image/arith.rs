//! Image arithmetic operations
//!
//! Pixel-wise operations used to compose the morphological pipeline:
//!
//! - Complement (`invert`)
//! - Pointwise min/max (`arith_min`, `arith_max`)
//! - Saturating subtraction (`arith_subtract`)
//! - Binarization (`threshold`)
//! - Pixel difference counting (`count_pixel_diffs`)

use super::{BACKGROUND, FOREGROUND, Image};
use crate::error::Result;

impl Image {
    /// Complement every sample: `255 - v`.
    pub fn invert(&self) -> Image {
        self.map(|v| 255 - v)
    }

    /// Apply `f` to every sample, producing a new image.
    pub fn map<F>(&self, f: F) -> Image
    where
        F: Fn(u8) -> u8,
    {
        let mut out = self.to_mut();
        for v in out.data_mut() {
            *v = f(*v);
        }
        out.into()
    }

    /// Binarize: samples strictly greater than `thresh` become 255, others 0.
    ///
    /// ```
    /// use morphclean_core::Image;
    ///
    /// let gray = Image::from_data(4, 1, vec![0, 127, 128, 255]).unwrap();
    /// assert_eq!(gray.threshold(127).data(), &[0, 0, 255, 255]);
    /// ```
    pub fn threshold(&self, thresh: u8) -> Image {
        self.map(|v| if v > thresh { FOREGROUND } else { BACKGROUND })
    }

    /// Pointwise minimum of two images of equal size.
    pub fn arith_min(&self, other: &Image) -> Result<Image> {
        self.zip_with(other, |a, b| a.min(b))
    }

    /// Pointwise maximum of two images of equal size.
    pub fn arith_max(&self, other: &Image) -> Result<Image> {
        self.zip_with(other, |a, b| a.max(b))
    }

    /// Pointwise `self - other`, clipped at 0.
    pub fn arith_subtract(&self, other: &Image) -> Result<Image> {
        self.zip_with(other, |a, b| a.saturating_sub(b))
    }

    /// Combine two equally sized images sample by sample.
    pub fn zip_with<F>(&self, other: &Image, f: F) -> Result<Image>
    where
        F: Fn(u8, u8) -> u8,
    {
        self.check_same_size(other)?;
        let mut out = self.to_mut();
        for (a, &b) in out.data_mut().iter_mut().zip(other.data()) {
            *a = f(*a, b);
        }
        Ok(out.into())
    }

    /// True if `self[p] <= other[p]` at every pixel.
    pub fn all_le(&self, other: &Image) -> Result<bool> {
        self.check_same_size(other)?;
        Ok(self.data().iter().zip(other.data()).all(|(a, b)| a <= b))
    }

    /// Number of pixels whose samples differ.
    pub fn count_pixel_diffs(&self, other: &Image) -> Result<usize> {
        self.check_same_size(other)?;
        Ok(self
            .data()
            .iter()
            .zip(other.data())
            .filter(|(a, b)| a != b)
            .count())
    }
}
