//! Marker-based watershed segmentation
//!
//! Seeds flood an elevation surface in priority order: the lowest pixel on
//! the frontier is settled first, and pixels at equal elevation are settled
//! in the order they joined the frontier. A pixel that touches exactly one
//! label adopts it; a pixel that touches two or more labels becomes part of
//! the watershed line and keeps [`BOUNDARY_LABEL`] for good.
//!
//! With the default 8-way connectivity no two pixels carrying different
//! non-zero labels are ever 8-adjacent in the output.

use crate::conncomp::ConnectivityType;
use crate::error::RegionResult;
use morphclean_core::{BACKGROUND, BOUNDARY_LABEL, FloatImage, Image, LabelMap};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Watershed options
#[derive(Debug, Clone, Default)]
pub struct WatershedOptions {
    /// Neighborhood used both for flooding and for detecting conflicts
    pub connectivity: ConnectivityType,
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connectivity
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// A frontier pixel. Ordered so `BinaryHeap` pops the lowest elevation
/// first, and the earliest insertion among equal elevations.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    elevation: f32,
    seq: u64,
    index: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .elevation
            .total_cmp(&self.elevation)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unlabeled,
    Queued,
    Labeled,
    Boundary,
}

/// Flood `seeds` over `elevation`, restricted to the foreground of `mask`
///
/// Uses [`WatershedOptions::default`].
///
/// # Arguments
///
/// * `elevation` - Surface to flood; basins should sit at object centers
/// * `seeds` - Initial labels; 0 means unknown
/// * `mask` - Binary image; pixels outside its foreground stay 0
///
/// # Errors
///
/// - shape mismatch when the three grids differ in size
/// - validation error when `mask` is not binary
pub fn watershed(elevation: &FloatImage, seeds: &LabelMap, mask: &Image) -> RegionResult<LabelMap> {
    watershed_with_options(elevation, seeds, mask, &WatershedOptions::default())
}

/// Flood `seeds` over `elevation` with explicit options
pub fn watershed_with_options(
    elevation: &FloatImage,
    seeds: &LabelMap,
    mask: &Image,
    options: &WatershedOptions,
) -> RegionResult<LabelMap> {
    elevation.check_matches(mask)?;
    seeds.check_matches(mask)?;
    mask.ensure_binary()?;

    let (w, h) = mask.dimensions();
    let (wi, hi) = (w as i64, h as i64);
    let inside = mask.data();
    let height = elevation.data();
    let offsets = options.connectivity.offsets();

    // Seeds outside the mask are dropped.
    let mut labels = seeds.clone();
    let mut state = vec![State::Unlabeled; inside.len()];
    for (i, l) in labels.labels_mut().iter_mut().enumerate() {
        if inside[i] == BACKGROUND {
            *l = 0;
        } else if *l != 0 {
            state[i] = State::Labeled;
        }
    }

    let neighbors = |i: usize| {
        let x = (i % w as usize) as i64;
        let y = (i / w as usize) as i64;
        offsets.iter().filter_map(move |&(dr, dc)| {
            let (nx, ny) = (x + dc as i64, y + dr as i64);
            (nx >= 0 && ny >= 0 && nx < wi && ny < hi).then(|| (ny * wi + nx) as usize)
        })
    };

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    for i in 0..inside.len() {
        if inside[i] == BACKGROUND || state[i] != State::Unlabeled {
            continue;
        }
        if neighbors(i).any(|n| state[n] == State::Labeled) {
            state[i] = State::Queued;
            heap.push(Frontier {
                elevation: height[i],
                seq,
                index: i,
            });
            seq += 1;
        }
    }

    let mut boundary_count = 0usize;
    let mut adjacent = Vec::with_capacity(offsets.len());
    while let Some(Frontier { index, .. }) = heap.pop() {
        adjacent.clear();
        for n in neighbors(index) {
            let l = labels.labels()[n];
            if state[n] == State::Labeled && !adjacent.contains(&l) {
                adjacent.push(l);
            }
        }

        match adjacent.as_slice() {
            [] => state[index] = State::Unlabeled,
            [label] => {
                labels.labels_mut()[index] = *label;
                state[index] = State::Labeled;
                for n in neighbors(index) {
                    if inside[n] != BACKGROUND && state[n] == State::Unlabeled {
                        state[n] = State::Queued;
                        heap.push(Frontier {
                            elevation: height[n],
                            seq,
                            index: n,
                        });
                        seq += 1;
                    }
                }
            }
            _ => {
                labels.labels_mut()[index] = BOUNDARY_LABEL;
                state[index] = State::Boundary;
                boundary_count += 1;
            }
        }
    }

    tracing::debug!(
        pushed = seq,
        boundary = boundary_count,
        connectivity = ?options.connectivity,
        "watershed flood finished"
    );
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphclean_core::ErrorKind;

    fn full_mask(w: u32, h: u32) -> Image {
        Image::new_with_value(w, h, 255).unwrap()
    }

    #[test]
    fn test_two_seeds_on_ramp_meet_at_ridge() {
        // V-shaped elevation along x with the ridge at x = 4.
        let mut elevation = FloatImage::new(9, 1).unwrap();
        for x in 0..9u32 {
            elevation.set_pixel(x, 0, 4.0 - (x as f32 - 4.0).abs()).unwrap();
        }
        let mut seeds = LabelMap::new(9, 1).unwrap();
        seeds.set_label(0, 0, 1).unwrap();
        seeds.set_label(8, 0, 2).unwrap();

        let out = watershed(&elevation, &seeds, &full_mask(9, 1)).unwrap();
        assert_eq!(out.labels(), &[1, 1, 1, 1, 0, 2, 2, 2, 2]);
    }

    #[test]
    fn test_mask_restricts_flood() {
        let elevation = FloatImage::new(5, 1).unwrap();
        let mut seeds = LabelMap::new(5, 1).unwrap();
        seeds.set_label(0, 0, 1).unwrap();
        let mask = Image::from_data(5, 1, vec![255, 255, 0, 255, 255]).unwrap();
        let out = watershed(&elevation, &seeds, &mask).unwrap();
        assert_eq!(out.labels(), &[1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_seed_outside_mask_ignored() {
        let elevation = FloatImage::new(3, 1).unwrap();
        let seeds = LabelMap::from_data(3, 1, vec![0, 0, 7]).unwrap();
        let mask = Image::from_data(3, 1, vec![255, 255, 0]).unwrap();
        let out = watershed(&elevation, &seeds, &mask).unwrap();
        assert_eq!(out.labels(), &[0, 0, 0]);
    }

    #[test]
    fn test_no_adjacent_distinct_labels() {
        let (w, h) = (12u32, 9u32);
        let elevation = FloatImage::new(w, h).unwrap();
        let mut seeds = LabelMap::new(w, h).unwrap();
        seeds.set_label(1, 1, 1).unwrap();
        seeds.set_label(10, 7, 2).unwrap();
        seeds.set_label(10, 1, 3).unwrap();
        let out = watershed(&elevation, &seeds, &full_mask(w, h)).unwrap();

        for y in 0..h as i64 {
            for x in 0..w as i64 {
                let a = out.get_label(x as u32, y as u32).unwrap();
                for &(dr, dc) in ConnectivityType::EightWay.offsets() {
                    let (nx, ny) = (x + dc as i64, y + dr as i64);
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let b = out.get_label(nx as u32, ny as u32).unwrap();
                    assert!(a == 0 || b == 0 || a == b, "{a} next to {b} at ({x}, {y})");
                }
            }
        }
        assert!(out.labels().contains(&0));
        for label in 1..=3 {
            assert!(out.labels().contains(&label));
        }
    }

    #[test]
    fn test_flat_single_seed_fills_mask() {
        // Flat surface, single seed: every reachable pixel adopts it.
        let elevation = FloatImage::new(6, 4).unwrap();
        let mut seeds = LabelMap::new(6, 4).unwrap();
        seeds.set_label(2, 2, 5).unwrap();
        let out = watershed(&elevation, &seeds, &full_mask(6, 4)).unwrap();
        assert!(out.labels().iter().all(|&l| l == 5));
    }

    fn flat_row_with_end_seeds(w: u32) -> Vec<u32> {
        let elevation = FloatImage::new(w, 1).unwrap();
        let mut seeds = LabelMap::new(w, 1).unwrap();
        seeds.set_label(0, 0, 1).unwrap();
        seeds.set_label(w - 1, 0, 2).unwrap();
        let out = watershed(&elevation, &seeds, &full_mask(w, 1)).unwrap();
        out.labels().to_vec()
    }

    #[test]
    fn test_fifo_among_ties_odd_row() {
        // Both fronts advance one pixel per round and meet at the center.
        // Popping the newest tie first would let label 2 run to x = 2.
        assert_eq!(flat_row_with_end_seeds(9), vec![1, 1, 1, 1, 0, 2, 2, 2, 2]);
    }

    #[test]
    fn test_fifo_among_ties_even_row() {
        // x = 3 was queued before x = 4, so label 1 claims it first and x = 4
        // then touches both labels.
        assert_eq!(flat_row_with_end_seeds(8), vec![1, 1, 1, 1, 0, 2, 2, 2]);
    }

    #[test]
    fn test_shape_and_binary_checks() {
        let elevation = FloatImage::new(4, 4).unwrap();
        let seeds = LabelMap::new(4, 4).unwrap();
        let err = watershed(&elevation, &seeds, &full_mask(4, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);

        let gray = Image::new_with_value(4, 4, 9).unwrap();
        let err = watershed(&elevation, &seeds, &gray).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
