//! Grayscale morphological operations
//!
//! Implements erosion, dilation, opening, and closing of 8-bit images over
//! an arbitrary structuring element.
//!
//! # Algorithm
//!
//! - **Dilation**: `out(p) = max over o in SE of in(p + o)`
//! - **Erosion**: `out(p) = min over o in SE of in(p + o)`
//! - **Opening**: erosion followed by dilation with the reflected SE
//! - **Closing**: dilation followed by erosion with the reflected SE
//!
//! # Border policy
//!
//! Neighbors outside the image take the identity value of the reduction:
//! dilation pads with 0 (the domain minimum) and erosion pads with 255 (the
//! domain maximum). Padding that way keeps the two operations dual under
//! complement, `erode(255 - x) == 255 - dilate(x)`, and lets objects that
//! touch the image edge shrink and grow like interior ones.
//!
//! The cost is `O(W * H * |SE|)`: each offset is applied as one shifted pass
//! over the rows, clipped to the columns whose neighbor falls inside the image.

use crate::{MorphError, MorphResult, Sel};
use morphclean_core::Image;

/// Dilate a grayscale image
///
/// Dilation computes the maximum sample in the SE neighborhood, which
/// expands bright regions and shrinks dark regions.
pub fn dilate(image: &Image, sel: &Sel) -> Image {
    reduce(image, sel, 0, u8::max)
}

/// Erode a grayscale image
///
/// Erosion computes the minimum sample in the SE neighborhood, which
/// shrinks bright regions and expands dark regions.
pub fn erode(image: &Image, sel: &Sel) -> Image {
    reduce(image, sel, 255, u8::min)
}

/// Open a grayscale image (erosion followed by dilation)
///
/// Opening removes bright features the SE does not fit in. The dilation
/// uses the reflected SE, so `open(x) <= x` holds for any SE.
pub fn open(image: &Image, sel: &Sel) -> Image {
    dilate(&erode(image, sel), &sel.reflect())
}

/// Close a grayscale image (dilation followed by erosion)
///
/// Closing fills dark features the SE does not fit in. The erosion uses
/// the reflected SE, so `close(x) >= x` holds for any SE.
pub fn close(image: &Image, sel: &Sel) -> Image {
    erode(&dilate(image, sel), &sel.reflect())
}

/// Apply [`dilate`] `iterations` times.
///
/// Zero iterations returns the input unchanged.
pub fn dilate_iterated(image: &Image, sel: &Sel, iterations: u32) -> Image {
    iterate(image, iterations, |im| dilate(im, sel))
}

/// Apply [`erode`] `iterations` times.
pub fn erode_iterated(image: &Image, sel: &Sel, iterations: u32) -> Image {
    iterate(image, iterations, |im| erode(im, sel))
}

/// Morphological gradient: `dilate(x) - erode(x)`.
pub fn gradient(image: &Image, sel: &Sel) -> MorphResult<Image> {
    dilate(image, sel)
        .arith_subtract(&erode(image, sel))
        .map_err(MorphError::from)
}

fn iterate<F: Fn(&Image) -> Image>(image: &Image, iterations: u32, step: F) -> Image {
    let mut current = image.clone();
    for _ in 0..iterations {
        current = step(&current);
    }
    current
}

/// Reduce the SE neighborhood of every pixel with `op`.
///
/// `pad` must be the identity of `op`, so that skipping out-of-bounds
/// neighbors is the same as reading them as `pad`.
fn reduce(image: &Image, sel: &Sel, pad: u8, op: fn(u8, u8) -> u8) -> Image {
    let (w, h) = image.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let mut out = image.to_mut();
    out.fill(pad);

    for &(dr, dc) in sel.offsets() {
        let (dr, dc) = (dr as i64, dc as i64);
        let x0 = (-dc).clamp(0, wi);
        let x1 = (wi - dc).clamp(0, wi);
        if x0 >= x1 {
            continue;
        }
        for y in 0..hi {
            let sy = y + dr;
            if sy < 0 || sy >= hi {
                continue;
            }
            let src = image.row(sy as u32);
            let dst = out.row_mut(y as u32);
            let src = &src[(x0 + dc) as usize..(x1 + dc) as usize];
            for (d, &s) in dst[x0 as usize..x1 as usize].iter_mut().zip(src) {
                *d = op(*d, s);
            }
        }
    }

    out.into()
}
