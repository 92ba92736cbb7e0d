//! Connected component analysis
//!
//! Labels maximal connected sets of foreground pixels in a binary image.
//! Labels are handed out in first-seen raster order (row-major scan)
//! starting at 1, and each component's area is counted during the same
//! flood, so the result is deterministic for a given input.

use crate::error::RegionResult;
use morphclean_core::{AreaTable, BACKGROUND, FOREGROUND, Image, LabelMap};
use std::collections::VecDeque;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

const FOUR_WAY: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

#[rustfmt::skip]
const EIGHT_WAY: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

impl ConnectivityType {
    /// `(drow, dcol)` offsets of the neighbors under this connectivity.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY,
            ConnectivityType::EightWay => &EIGHT_WAY,
        }
    }
}

/// Summary of one labeled component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStats {
    /// Label of this component
    pub label: u32,
    /// Number of pixels in this component
    pub area: u32,
    /// Bounding box as `(min_x, min_y, max_x, max_y)`, inclusive
    pub bounds: (u32, u32, u32, u32),
    /// Mean `(x, y)` position of the component's pixels
    pub centroid: (f64, f64),
}

/// Label all connected components in a binary image
///
/// # Arguments
///
/// * `image` - Binary image (samples 0 or 255)
/// * `connectivity` - Adjacency rule used to group pixels
///
/// # Returns
///
/// The label map (0 = background, `1..=N` = components in first-seen
/// raster order) and the per-label area table.
///
/// # Errors
///
/// Returns a validation error if `image` is not binary.
pub fn label_components(
    image: &Image,
    connectivity: ConnectivityType,
) -> RegionResult<(LabelMap, AreaTable)> {
    image.ensure_binary()?;

    let (w, h) = image.dimensions();
    let mut labels = LabelMap::new(w, h)?;
    let mut areas = Vec::new();
    let mut queue = VecDeque::new();
    let pixels = image.data();

    for start in 0..pixels.len() {
        if pixels[start] == BACKGROUND || labels.labels()[start] != 0 {
            continue;
        }
        let label = areas.len() as u32 + 1;
        let mut area = 0u32;
        labels.labels_mut()[start] = label;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            area += 1;
            let x = (idx % w as usize) as i64;
            let y = (idx / w as usize) as i64;
            for &(dr, dc) in connectivity.offsets() {
                let ny = y + dr as i64;
                let nx = x + dc as i64;
                if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let nidx = (ny as usize) * (w as usize) + nx as usize;
                if pixels[nidx] == FOREGROUND && labels.labels()[nidx] == 0 {
                    labels.labels_mut()[nidx] = label;
                    queue.push_back(nidx);
                }
            }
        }
        areas.push(area);
    }

    tracing::debug!(components = areas.len(), ?connectivity, "labeled components");
    Ok((labels, AreaTable::from_areas(areas)))
}

/// Count the foreground components of a binary image
pub fn count_components(image: &Image, connectivity: ConnectivityType) -> RegionResult<usize> {
    Ok(label_components(image, connectivity)?.1.len())
}

/// Compute area, bounding box and centroid of every label
///
/// The returned vector is indexed by `label - 1`; labels absent from the
/// map get an entry with area 0.
pub fn component_stats(labels: &LabelMap) -> Vec<ComponentStats> {
    let n = labels.max_label() as usize;
    let mut acc = vec![(0u32, u32::MAX, u32::MAX, 0u32, 0u32, 0f64, 0f64); n];
    let w = labels.width() as usize;

    for (i, &l) in labels.labels().iter().enumerate() {
        if l == 0 {
            continue;
        }
        let (x, y) = ((i % w) as u32, (i / w) as u32);
        let e = &mut acc[(l - 1) as usize];
        e.0 += 1;
        e.1 = e.1.min(x);
        e.2 = e.2.min(y);
        e.3 = e.3.max(x);
        e.4 = e.4.max(y);
        e.5 += x as f64;
        e.6 += y as f64;
    }

    acc.into_iter()
        .enumerate()
        .map(|(i, (area, x0, y0, x1, y1, sx, sy))| {
            if area == 0 {
                ComponentStats {
                    label: i as u32 + 1,
                    area: 0,
                    bounds: (0, 0, 0, 0),
                    centroid: (0.0, 0.0),
                }
            } else {
                ComponentStats {
                    label: i as u32 + 1,
                    area,
                    bounds: (x0, y0, x1, y1),
                    centroid: (sx / area as f64, sy / area as f64),
                }
            }
        })
        .collect()
}

/// Keep the components whose area is at least `min_size`
///
/// Returns a binary image where pixels of surviving labels are 255.
pub fn filter_components_by_size(labels: &LabelMap, areas: &AreaTable, min_size: u32) -> Image {
    let data = labels
        .labels()
        .iter()
        .map(|&l| match areas.area(l) {
            Some(a) if a >= min_size => FOREGROUND,
            _ => BACKGROUND,
        })
        .collect();
    Image::from_data(labels.width(), labels.height(), data)
        .unwrap_or_else(|_| unreachable!("label map has valid dimensions"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32, pixels: &[(u32, u32)]) -> Image {
        let mut im = Image::new(width, height).unwrap().to_mut();
        for &(x, y) in pixels {
            im.set_pixel(x, y, 255).unwrap();
        }
        im.into()
    }

    #[test]
    fn test_raster_order_labels() {
        // Component B starts on row 0 to the right, component A on row 0 left.
        let image = create_test_image(6, 3, &[(4, 0), (0, 0), (0, 1), (4, 1), (4, 2), (2, 2)]);
        let (labels, areas) = label_components(&image, ConnectivityType::EightWay).unwrap();
        assert_eq!(labels.get_label(0, 0), Some(1));
        assert_eq!(labels.get_label(4, 0), Some(2));
        assert_eq!(labels.get_label(2, 2), Some(3));
        assert_eq!(areas.as_slice(), &[2, 3, 1]);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let image = create_test_image(3, 3, &[(0, 0), (1, 1), (2, 2)]);
        let (_, eight) = label_components(&image, ConnectivityType::EightWay).unwrap();
        let (_, four) = label_components(&image, ConnectivityType::FourWay).unwrap();
        assert_eq!(eight.len(), 1);
        assert_eq!(four.len(), 3);
    }

    #[test]
    fn test_rejects_grayscale() {
        let image = Image::new_with_value(3, 3, 7).unwrap();
        let err = label_components(&image, ConnectivityType::EightWay).unwrap_err();
        assert_eq!(err.kind(), morphclean_core::ErrorKind::Validation);
    }

    #[test]
    fn test_empty_image() {
        let image = Image::new(5, 5).unwrap();
        let (labels, areas) = label_components(&image, ConnectivityType::EightWay).unwrap();
        assert!(areas.is_empty());
        assert_eq!(labels.max_label(), 0);
    }

    #[test]
    fn test_component_stats() {
        let image = create_test_image(5, 5, &[(1, 1), (2, 1), (1, 2), (2, 2), (4, 4)]);
        let (labels, _) = label_components(&image, ConnectivityType::EightWay).unwrap();
        let stats = component_stats(&labels);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].area, 4);
        assert_eq!(stats[0].bounds, (1, 1, 2, 2));
        assert_eq!(stats[0].centroid, (1.5, 1.5));
        assert_eq!(stats[1].centroid, (4.0, 4.0));
    }

    #[test]
    fn test_filter_by_size() {
        let image = create_test_image(5, 5, &[(1, 1), (2, 1), (1, 2), (4, 4)]);
        let (labels, areas) = label_components(&image, ConnectivityType::EightWay).unwrap();
        let kept = filter_components_by_size(&labels, &areas, 2);
        assert_eq!(kept.count_foreground(), 3);
        assert_eq!(kept.get_pixel(4, 4), Some(0));
    }
}
