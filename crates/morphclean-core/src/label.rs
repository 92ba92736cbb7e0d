//! Label maps and per-label area tables
//!
//! A [`LabelMap`] assigns a non-negative integer to every pixel of a source
//! image. Label 0 is reserved for background, unlabeled pixels and
//! watershed boundaries; `1..=N` identify distinct foreground regions.

use crate::error::{Error, Result};
use crate::image::{BACKGROUND, FOREGROUND, Image};

/// Label carried by background and by watershed boundary pixels.
pub const BOUNDARY_LABEL: u32 = 0;

/// 2D grid of region labels
///
/// Data is stored in row-major order with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl LabelMap {
    /// Create a label map with every pixel unlabeled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(LabelMap {
            width,
            height,
            data: vec![BOUNDARY_LABEL; (width as usize) * (height as usize)],
        })
    }

    /// Create a label map from row-major label data.
    pub fn from_data(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
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
        Ok(LabelMap {
            width,
            height,
            data,
        })
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

    /// Raw row-major labels.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.data
    }

    #[inline]
    pub fn labels_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Get the label at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_label(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[(y as usize) * (self.width as usize) + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_label_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Set the label at `(x, y)`.
    pub fn set_label(&mut self, x: u32, y: u32, label: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize) * (self.width as usize) + x as usize,
                len: self.data.len(),
            });
        }
        self.data[(y as usize) * (self.width as usize) + x as usize] = label;
        Ok(())
    }

    /// Fail with [`Error::DimensionMismatch`] unless `image` has the same size.
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

    /// Largest label present (0 for an all-background map).
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(BOUNDARY_LABEL)
    }

    /// Number of distinct non-zero labels present.
    pub fn num_labels(&self) -> usize {
        let mut seen = vec![false; self.max_label() as usize + 1];
        let mut count = 0;
        for &l in &self.data {
            if l != BOUNDARY_LABEL && !seen[l as usize] {
                seen[l as usize] = true;
                count += 1;
            }
        }
        count
    }

    /// True if the labels present are exactly `1..=max_label` with no gaps.
    pub fn is_contiguous(&self) -> bool {
        self.num_labels() == self.max_label() as usize
    }

    /// Count pixels per label.
    pub fn compute_areas(&self) -> AreaTable {
        let mut areas = vec![0u32; self.max_label() as usize];
        for &l in &self.data {
            if l != BOUNDARY_LABEL {
                areas[(l - 1) as usize] += 1;
            }
        }
        AreaTable::from_areas(areas)
    }

    /// Binary image with every labeled pixel set to foreground.
    ///
    /// Boundary pixels carry label 0 and therefore come out as background,
    /// which yields the "separated objects" rendering of a watershed result.
    pub fn to_mask(&self) -> Image {
        self.mask_where(|l| l != BOUNDARY_LABEL)
    }

    /// Binary image of the pixels carrying `label`.
    pub fn label_mask(&self, label: u32) -> Image {
        self.mask_where(|l| l == label)
    }

    fn mask_where<F: Fn(u32) -> bool>(&self, keep: F) -> Image {
        let data = self
            .data
            .iter()
            .map(|&l| if keep(l) { FOREGROUND } else { BACKGROUND })
            .collect();
        // Dimensions were validated at construction.
        Image::from_data(self.width, self.height, data)
            .unwrap_or_else(|_| unreachable!("label map has valid dimensions"))
    }

    /// Mean `(x, y)` position of the pixels carrying `label`.
    pub fn centroid(&self, label: u32) -> Option<(f64, f64)> {
        let (mut sx, mut sy, mut n) = (0f64, 0f64, 0u64);
        for (i, &l) in self.data.iter().enumerate() {
            if l == label {
                sx += (i % self.width as usize) as f64;
                sy += (i / self.width as usize) as f64;
                n += 1;
            }
        }
        (n > 0).then(|| (sx / n as f64, sy / n as f64))
    }
}

/// Pixel count per label, indexed by label id.
///
/// Entry `i` holds the area of label `i + 1`; label 0 has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AreaTable {
    areas: Vec<u32>,
}

impl AreaTable {
    pub fn from_areas(areas: Vec<u32>) -> Self {
        AreaTable { areas }
    }

    /// Number of labels in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Area of `label`, or `None` for label 0 or labels past the end.
    pub fn area(&self, label: u32) -> Option<u32> {
        if label == BOUNDARY_LABEL {
            return None;
        }
        self.areas.get((label - 1) as usize).copied()
    }

    /// Iterate over `(label, area)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.areas
            .iter()
            .enumerate()
            .map(|(i, &a)| (i as u32 + 1, a))
    }

    /// Sum of all areas.
    pub fn total(&self) -> u64 {
        self.areas.iter().map(|&a| a as u64).sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.areas
    }
}
