//! Hole filling
//!
//! A hole is background that cannot be reached from the image border. The
//! complement of the image is reconstructed from its own border pixels; what
//! the reconstruction does not reach is enclosed and gets filled.

use crate::error::FilterResult;
use morphclean_core::Image;
use morphclean_morph::Sel;
use morphclean_region::{ReconstructionMode, reconstruct};

/// Fill enclosed background regions
///
/// # Arguments
///
/// * `image` - Input image; binary in the usual case, though grayscale
///   input is accepted and filled as a regional-minimum fill
/// * `sel` - Neighborhood used to decide which background pixels connect;
///   a 3x3 square connects background diagonally, a cross does not
///
/// # Returns
///
/// The filled image. Filling is idempotent, and an image without holes
/// comes back unchanged.
///
/// # Examples
///
/// ```
/// use morphclean_core::Image;
/// use morphclean_filter::fill_holes;
/// use morphclean_morph::Sel;
///
/// // A 5x5 ring with a one-pixel hole in the middle
/// let ring = Image::from_fn(5, 5, |x, y| if x == 2 && y == 2 { 0 } else { 255 }).unwrap();
/// let filled = fill_holes(&ring, &Sel::create_square(3).unwrap()).unwrap();
/// assert_eq!(filled.count_foreground(), 25);
/// ```
pub fn fill_holes(image: &Image, sel: &Sel) -> FilterResult<Image> {
    let inverted = image.invert();
    let marker = border_marker(&inverted);
    let reached = reconstruct(&marker, &inverted, sel, ReconstructionMode::Dilation)?;
    let filled = reached.invert();

    tracing::debug!(
        before = image.count_foreground(),
        after = filled.count_foreground(),
        "filled holes"
    );
    Ok(filled)
}

/// `image` on its four edges, 0 everywhere else.
fn border_marker(image: &Image) -> Image {
    let (w, h) = image.dimensions();
    let mut marker = image.create_template().into_mut();
    for y in 0..h {
        let src = image.row(y);
        let dst = marker.row_mut(y);
        if y == 0 || y + 1 == h {
            dst.copy_from_slice(src);
        } else {
            dst[0] = src[0];
            dst[w as usize - 1] = src[w as usize - 1];
        }
    }
    marker.into()
}
