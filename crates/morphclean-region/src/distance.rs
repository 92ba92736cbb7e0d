//! Exact Euclidean distance transform
//!
//! For every foreground pixel, the straight-line distance to the nearest
//! background pixel; background pixels get 0.
//!
//! The transform is separable: a 1D squared-distance pass down each column,
//! then a pass along each row that takes the lower envelope of the parabolas
//! `(x - q)^2 + f(q)` rooted at the column results. Both passes are linear,
//! so the whole transform is `O(W * H)`.
//!
//! Squared distances are accumulated in `f64` and are exact integers until
//! the final square root.

use crate::error::RegionResult;
use morphclean_core::{BACKGROUND, DistanceMap, Image};

/// What lies beyond the image edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceBoundary {
    /// Only background pixels inside the image count. An image with no
    /// background pixel maps to `f32::INFINITY` everywhere.
    #[default]
    Foreground,
    /// The image is surrounded by background, so no distance exceeds the
    /// distance to the nearest edge plus one.
    Background,
}

/// Euclidean distance transform of a binary image
///
/// Equivalent to [`distance_transform_with_boundary`] with
/// [`DistanceBoundary::Foreground`].
///
/// # Errors
///
/// Returns a validation error if `image` is not binary.
///
/// # Examples
///
/// ```
/// use morphclean_core::Image;
/// use morphclean_region::distance_transform;
///
/// let image = Image::from_fn(5, 1, |x, _| if x == 0 { 0 } else { 255 }).unwrap();
/// let dist = distance_transform(&image).unwrap();
/// assert_eq!(dist.data(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn distance_transform(image: &Image) -> RegionResult<DistanceMap> {
    distance_transform_with_boundary(image, DistanceBoundary::Foreground)
}

/// Euclidean distance transform with an explicit edge policy
pub fn distance_transform_with_boundary(
    image: &Image,
    boundary: DistanceBoundary,
) -> RegionResult<DistanceMap> {
    image.ensure_binary()?;
    let (w, h) = image.dimensions();

    let pad = match boundary {
        DistanceBoundary::Foreground => 0usize,
        DistanceBoundary::Background => 1usize,
    };
    let pw = w as usize + 2 * pad;
    let ph = h as usize + 2 * pad;

    // Padding is background; the image's own samples go in the middle.
    let mut grid = vec![0f64; pw * ph];
    for y in 0..h as usize {
        let row = image.row(y as u32);
        for (x, &v) in row.iter().enumerate() {
            if v != BACKGROUND {
                grid[(y + pad) * pw + x + pad] = f64::INFINITY;
            }
        }
    }

    let mut scratch = Envelope::with_capacity(pw.max(ph));

    // Columns
    let mut column = vec![0f64; ph];
    let mut column_out = vec![0f64; ph];
    for x in 0..pw {
        for (y, c) in column.iter_mut().enumerate() {
            *c = grid[y * pw + x];
        }
        scratch.transform(&column, &mut column_out);
        for (y, &c) in column_out.iter().enumerate() {
            grid[y * pw + x] = c;
        }
    }

    // Rows
    let mut row_out = vec![0f64; pw];
    for y in 0..ph {
        let row = &mut grid[y * pw..(y + 1) * pw];
        scratch.transform(row, &mut row_out);
        row.copy_from_slice(&row_out);
    }

    let mut out = DistanceMap::new(w, h)?;
    for y in 0..h as usize {
        for x in 0..w as usize {
            let d2 = grid[(y + pad) * pw + x + pad];
            out.set_pixel_unchecked(x as u32, y as u32, d2.sqrt() as f32);
        }
    }

    tracing::debug!(width = w, height = h, ?boundary, max = ?out.max_value(), "distance transform");
    Ok(out)
}

/// Lower envelope of parabolas for the 1D squared distance transform.
struct Envelope {
    /// Roots of the parabolas in the envelope
    sites: Vec<usize>,
    /// `bounds[k]..bounds[k + 1]` is where parabola `k` is lowest
    bounds: Vec<f64>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Envelope {
            sites: Vec::with_capacity(n),
            bounds: Vec::with_capacity(n + 1),
        }
    }

    /// `out[q] = min over p of (q - p)^2 + f[p]`.
    ///
    /// Only finite `f[p]` contribute; if none is finite the result is
    /// infinite everywhere.
    fn transform(&mut self, f: &[f64], out: &mut [f64]) {
        self.sites.clear();
        self.bounds.clear();

        for (q, &fq) in f.iter().enumerate() {
            if !fq.is_finite() {
                continue;
            }
            while let (Some(&p), Some(&left)) = (self.sites.last(), self.bounds.last()) {
                let s = intersection(f, p, q);
                if s > left {
                    self.sites.push(q);
                    self.bounds.push(s);
                    break;
                }
                self.sites.pop();
                self.bounds.pop();
            }
            if self.sites.is_empty() {
                self.sites.push(q);
                self.bounds.push(f64::NEG_INFINITY);
            }
        }

        if self.sites.is_empty() {
            out.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (q, o) in out.iter_mut().enumerate() {
            let qf = q as f64;
            while k + 1 < self.sites.len() && self.bounds[k + 1] < qf {
                k += 1;
            }
            let p = self.sites[k];
            let d = qf - p as f64;
            *o = d * d + f[p];
        }
    }
}

/// Abscissa where the parabolas rooted at `p < q` intersect.
#[inline]
fn intersection(f: &[f64], p: usize, q: usize) -> f64 {
    let (pf, qf) = (p as f64, q as f64);
    ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
}
