//! Label map colorization
//!
//! Each label gets a fixed color computed from its id, so rendering the
//! same label map twice gives byte-identical output. Background is black
//! and, when a mask is supplied, unlabeled pixels inside the mask (the
//! watershed line) are white.

use crate::colorspace::{Hsv, hsv_to_rgb};
use crate::error::{ColorError, ColorResult};
use morphclean_core::{BACKGROUND, Image, LabelMap};

/// Color of background pixels
pub const BACKGROUND_COLOR: (u8, u8, u8) = (0, 0, 0);
/// Color of boundary pixels
pub const BOUNDARY_COLOR: (u8, u8, u8) = (255, 255, 255);

// Coprime with 240, so the first 240 labels get distinct hues.
const HUE_STEP: u32 = 47;

/// 8-bit RGB image, row-major, 3 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ColorImage {
    /// Create a black image
    pub fn new(width: u32, height: u32) -> ColorResult<Self> {
        if width == 0 || height == 0 {
            return Err(ColorError::Core(morphclean_core::Error::InvalidDimension {
                width,
                height,
            }));
        }
        Ok(ColorImage {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 3],
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

    /// Interleaved RGB bytes
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the color at `(x, y)`
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Some((self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Set the color at `(x, y)`; out-of-range coordinates are ignored.
    pub fn set_rgb(&mut self, x: u32, y: u32, (r, g, b): (u8, u8, u8)) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        self.data[i] = r;
        self.data[i + 1] = g;
        self.data[i + 2] = b;
    }
}

/// Palette color of a label. Label 0 is [`BACKGROUND_COLOR`].
///
/// Hue advances by a fixed step per label; brightness drops a notch every
/// 240 labels so later labels stay distinguishable.
pub fn palette_color(label: u32) -> (u8, u8, u8) {
    if label == 0 {
        return BACKGROUND_COLOR;
    }
    let h = ((label - 1).wrapping_mul(HUE_STEP) % 240) as i32;
    let v = 255 - (((label - 1) / 240) % 4) as i32 * 40;
    hsv_to_rgb(Hsv { h, s: 220, v })
}

/// Render a label map with the palette
pub fn colorize_labels(labels: &LabelMap) -> ColorResult<ColorImage> {
    let (w, h) = labels.dimensions();
    let mut out = ColorImage::new(w, h)?;
    for (i, &l) in labels.labels().iter().enumerate() {
        let (r, g, b) = palette_color(l);
        out.data[i * 3] = r;
        out.data[i * 3 + 1] = g;
        out.data[i * 3 + 2] = b;
    }
    Ok(out)
}

/// Render a label map, painting unlabeled pixels inside `mask` white
///
/// # Errors
///
/// Returns a shape-mismatch error if `mask` differs in size.
pub fn colorize_labels_with_mask(labels: &LabelMap, mask: &Image) -> ColorResult<ColorImage> {
    labels.check_matches(mask)?;
    let mut out = colorize_labels(labels)?;
    for (i, (&l, &m)) in labels.labels().iter().zip(mask.data()).enumerate() {
        if l == 0 && m != BACKGROUND {
            let (r, g, b) = BOUNDARY_COLOR;
            out.data[i * 3] = r;
            out.data[i * 3 + 1] = g;
            out.data[i * 3 + 2] = b;
        }
    }
    Ok(out)
}
