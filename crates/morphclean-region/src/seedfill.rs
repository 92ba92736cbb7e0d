//! Geodesic reconstruction
//!
//! Reconstruction grows a marker image inside a mask image by repeating a
//! geodesic dilation (or erosion) until nothing changes:
//!
//! - geodesic dilation: `min(dilate(marker, se), mask)`
//! - geodesic erosion: `max(erode(marker, se), mask)`
//!
//! [`reconstruct_iterative`] is the literal loop. [`reconstruct`] produces
//! the same fixed point by queue propagation, re-examining only the pixels
//! whose neighbors changed, and falls back to the loop when the SE does
//! not contain its origin (the geodesic step is then not extensive and the
//! sequence need not be monotone).

use crate::error::{RegionError, RegionResult};
use morphclean_core::Image;
use morphclean_morph::{Sel, grayscale};
use std::collections::VecDeque;

/// Direction of a geodesic reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconstructionMode {
    /// Grow the marker upward under the mask (`marker <= mask`)
    #[default]
    Dilation,
    /// Shrink the marker downward above the mask (`marker >= mask`)
    Erosion,
}

/// One geodesic dilation step: `min(dilate(marker, sel), mask)`.
///
/// # Errors
///
/// Returns a shape-mismatch error if `marker` and `mask` differ in size.
pub fn geodesic_dilate(marker: &Image, mask: &Image, sel: &Sel) -> RegionResult<Image> {
    marker.check_same_size(mask)?;
    Ok(grayscale::dilate(marker, sel).arith_min(mask)?)
}

/// One geodesic erosion step: `max(erode(marker, sel), mask)`.
///
/// # Errors
///
/// Returns a shape-mismatch error if `marker` and `mask` differ in size.
pub fn geodesic_erode(marker: &Image, mask: &Image, sel: &Sel) -> RegionResult<Image> {
    marker.check_same_size(mask)?;
    Ok(grayscale::erode(marker, sel).arith_max(mask)?)
}

/// Upper bound on reconstruction work for an image: pixel count times the
/// number of sample values.
///
/// The iterative path compares this against whole passes over the image.
/// The queue path used when the element contains its origin compares it
/// against individual pixel pops instead, since each pop can only raise
/// (or lower) a sample and no sample moves more than 255 levels.
pub fn iteration_cap(image: &Image) -> u64 {
    image.pixel_count() as u64 * 256
}

/// Reconstruct `marker` under (or above) `mask` to a fixed point
///
/// # Arguments
///
/// * `marker` - Seed image
/// * `mask` - Bounding image, same size as `marker`
/// * `sel` - Neighborhood of one geodesic step
/// * `mode` - Dilation or erosion
///
/// # Returns
///
/// The fixed point of the geodesic operator started from `marker`. In
/// dilation mode the result lies between `min(marker, mask)` and `mask`.
///
/// # Errors
///
/// - shape mismatch when `marker` and `mask` differ in size
/// - [`RegionError::ConvergenceFailed`] when no fixed point is reached
///   within [`iteration_cap`]
pub fn reconstruct(
    marker: &Image,
    mask: &Image,
    sel: &Sel,
    mode: ReconstructionMode,
) -> RegionResult<Image> {
    marker.check_same_size(mask)?;
    if !sel.contains_origin() {
        return reconstruct_iterative(marker, mask, sel, mode);
    }
    match mode {
        ReconstructionMode::Dilation => propagate_dilation(marker, mask, sel),
        ReconstructionMode::Erosion => {
            // erode(255 - x) == 255 - dilate(x), so erosion mode is dilation
            // mode on the complements.
            let inverted = propagate_dilation(&marker.invert(), &mask.invert(), sel)?;
            Ok(inverted.invert())
        }
    }
}

/// Reconstruct by repeating the geodesic step until the image is unchanged.
///
/// Gives up after [`iteration_cap`] steps.
pub fn reconstruct_iterative(
    marker: &Image,
    mask: &Image,
    sel: &Sel,
    mode: ReconstructionMode,
) -> RegionResult<Image> {
    reconstruct_iterative_capped(marker, mask, sel, mode, iteration_cap(mask))
}

/// [`reconstruct_iterative`] with an explicit iteration cap.
pub fn reconstruct_iterative_capped(
    marker: &Image,
    mask: &Image,
    sel: &Sel,
    mode: ReconstructionMode,
    cap: u64,
) -> RegionResult<Image> {
    marker.check_same_size(mask)?;
    let step = |im: &Image| match mode {
        ReconstructionMode::Dilation => geodesic_dilate(im, mask, sel),
        ReconstructionMode::Erosion => geodesic_erode(im, mask, sel),
    };

    let mut current = marker.clone();
    let mut iterations = 0u64;
    loop {
        if iterations >= cap {
            return Err(RegionError::ConvergenceFailed { iterations, cap });
        }
        let next = step(&current)?;
        iterations += 1;
        if next == current {
            tracing::debug!(iterations, ?mode, "reconstruction converged");
            return Ok(next);
        }
        current = next;
    }
}

/// Queue propagation for dilation mode.
///
/// Starts from one geodesic step so the working image is already under the
/// mask. A pixel `q` can raise every pixel `p = q - o` that reads it through
/// offset `o`; raised pixels are queued and re-examined until the queue
/// drains.
fn propagate_dilation(marker: &Image, mask: &Image, sel: &Sel) -> RegionResult<Image> {
    let start = geodesic_dilate(marker, mask, sel)?;
    let (w, h) = start.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let m = mask.data();
    let mut out = start.into_mut();
    let r = out.data_mut();

    let mut queued = vec![true; r.len()];
    let mut queue: VecDeque<usize> = (0..r.len()).collect();
    let cap = iteration_cap(mask);
    let mut pops = 0u64;

    while let Some(q) = queue.pop_front() {
        pops += 1;
        if pops > cap {
            return Err(RegionError::ConvergenceFailed {
                iterations: pops,
                cap,
            });
        }
        queued[q] = false;
        let value = r[q];
        if value == 0 {
            continue;
        }
        let qx = (q % w as usize) as i64;
        let qy = (q / w as usize) as i64;
        for &(dr, dc) in sel.offsets() {
            let py = qy - dr as i64;
            let px = qx - dc as i64;
            if px < 0 || py < 0 || px >= wi || py >= hi {
                continue;
            }
            let p = (py * wi + px) as usize;
            let candidate = value.min(m[p]);
            if candidate > r[p] {
                r[p] = candidate;
                if !queued[p] {
                    queued[p] = true;
                    queue.push_back(p);
                }
            }
        }
    }

    tracing::debug!(pops, "reconstruction converged");
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphclean_core::ErrorKind;

    fn two_blobs() -> Image {
        Image::from_fn(8, 5, |x, y| {
            let left = (1..=2).contains(&x) && (1..=3).contains(&y);
            let right = (5..=6).contains(&x) && (1..=3).contains(&y);
            if left || right { 255 } else { 0 }
        })
        .unwrap()
    }

    #[test]
    fn test_reconstruct_recovers_marked_blob() {
        let mask = two_blobs();
        let mut m = Image::new(8, 5).unwrap().to_mut();
        m.set_pixel(1, 2, 255).unwrap();
        let marker: Image = m.into();

        let sel = Sel::default();
        let out = reconstruct(&marker, &mask, &sel, ReconstructionMode::Dilation).unwrap();
        assert_eq!(out.count_foreground(), 6);
        assert_eq!(out.get_pixel(2, 3), Some(255));
        assert_eq!(out.get_pixel(5, 1), Some(0));
    }

    #[test]
    fn test_queue_matches_iterative_grayscale() {
        let mask = Image::from_fn(9, 7, |x, y| ((x * 37 + y * 91) % 256) as u8).unwrap();
        let marker = Image::from_fn(9, 7, |x, y| if x == 4 && y == 3 { 200 } else { 0 }).unwrap();
        for sel in [Sel::default(), Sel::create_cross(3).unwrap()] {
            for mode in [ReconstructionMode::Dilation, ReconstructionMode::Erosion] {
                let (mk, mk_mask) = match mode {
                    ReconstructionMode::Dilation => (marker.clone(), mask.clone()),
                    ReconstructionMode::Erosion => (marker.invert(), mask.clone()),
                };
                let fast = reconstruct(&mk, &mk_mask, &sel, mode).unwrap();
                let slow = reconstruct_iterative(&mk, &mk_mask, &sel, mode).unwrap();
                assert_eq!(fast, slow, "{:?}", mode);
            }
        }
    }

    #[test]
    fn test_erosion_mode_bounds() {
        let mask = two_blobs();
        let marker = Image::new_with_value(8, 5, 255).unwrap();
        let out = reconstruct(&marker, &mask, &Sel::default(), ReconstructionMode::Erosion).unwrap();
        assert!(mask.all_le(&out).unwrap());
        assert!(out.all_le(&marker).unwrap());
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Image::new(4, 4).unwrap();
        let b = Image::new(4, 5).unwrap();
        let err = reconstruct(&a, &b, &Sel::default(), ReconstructionMode::Dilation).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_oscillation_hits_cap() {
        // The two outer offsets swap the samples of a 2x1 image every step,
        // and the mask never clips them, so the sequence alternates.
        let sel = Sel::from_string("x.x").unwrap();
        let mask = Image::new_with_value(2, 1, 255).unwrap();
        let marker = Image::from_data(2, 1, vec![255, 0]).unwrap();

        let err = reconstruct_iterative_capped(
            &marker,
            &mask,
            &sel,
            ReconstructionMode::Dilation,
            10,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegionError::ConvergenceFailed {
                iterations: 10,
                cap: 10
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Convergence);

        let err = reconstruct(&marker, &mask, &sel, ReconstructionMode::Dilation).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn test_geodesic_steps() {
        let mask = Image::from_data(3, 1, vec![50, 100, 150]).unwrap();
        let marker = Image::from_data(3, 1, vec![0, 255, 0]).unwrap();
        let sel = Sel::from_string("xxx").unwrap();
        assert_eq!(geodesic_dilate(&marker, &mask, &sel).unwrap().data(), &[50, 100, 150]);
        assert_eq!(geodesic_erode(&marker, &mask, &sel).unwrap().data(), &[50, 100, 150]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Mask plus a marker of the same size.
    fn arbitrary_pair(max_side: u32) -> impl Strategy<Value = (Image, Image)> {
        (1..=max_side, 1..=max_side).prop_flat_map(|(w, h)| {
            let n = (w * h) as usize;
            (
                proptest::collection::vec(any::<u8>(), n),
                proptest::collection::vec(any::<u8>(), n),
            )
                .prop_map(move |(a, b)| {
                    (
                        Image::from_data(w, h, a).unwrap(),
                        Image::from_data(w, h, b).unwrap(),
                    )
                })
        })
    }

    fn origin_sel() -> impl Strategy<Value = Sel> {
        prop_oneof![
            Just(Sel::default()),
            Just(Sel::create_cross(3).unwrap()),
            Just(Sel::create_diamond(2).unwrap()),
            Just(Sel::create_square(1).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn proptest_dilation_fixed_point_and_bounds(
            (mask, raw) in arbitrary_pair(10),
            sel in origin_sel(),
        ) {
            let marker = raw.arith_min(&mask).unwrap();
            let once = reconstruct(&marker, &mask, &sel, ReconstructionMode::Dilation).unwrap();
            let twice = reconstruct(&once, &mask, &sel, ReconstructionMode::Dilation).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(marker.all_le(&once).unwrap());
            prop_assert!(once.all_le(&mask).unwrap());
        }

        #[test]
        fn proptest_erosion_fixed_point_and_bounds(
            (mask, raw) in arbitrary_pair(10),
            sel in origin_sel(),
        ) {
            let marker = raw.arith_max(&mask).unwrap();
            let once = reconstruct(&marker, &mask, &sel, ReconstructionMode::Erosion).unwrap();
            let twice = reconstruct(&once, &mask, &sel, ReconstructionMode::Erosion).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(mask.all_le(&once).unwrap());
            prop_assert!(once.all_le(&marker).unwrap());
        }

        #[test]
        fn proptest_queue_matches_iterative(
            (mask, marker) in arbitrary_pair(8),
            sel in origin_sel(),
        ) {
            for mode in [ReconstructionMode::Dilation, ReconstructionMode::Erosion] {
                let fast = reconstruct(&marker, &mask, &sel, mode).unwrap();
                let slow = reconstruct_iterative(&marker, &mask, &sel, mode).unwrap();
                prop_assert_eq!(fast, slow);
            }
        }
    }
}
