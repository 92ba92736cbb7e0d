//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used by every
//! morphological primitive. It is an immutable boolean grid with odd
//! dimensions `(2k+1) x (2m+1)` whose center `(k, m)` is the origin.
//!
//! The center is an ordinary cell: it takes part in the neighborhood when
//! its grid cell is set, and is excluded when the caller clears it.

use crate::{MorphError, MorphResult};
use std::fmt;

/// Structuring Element (SEL)
///
/// Offsets are stored as `(drow, dcol)` pairs relative to the center and
/// are precomputed at construction, in row-major order.
///
/// # Examples
///
/// ```
/// use morphclean_morph::Sel;
///
/// let sel = Sel::create_cross(3).unwrap();
/// assert_eq!(sel.hit_count(), 5);
/// assert!(sel.offsets().contains(&(-1, 0)));
/// assert!(sel.contains_origin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    data: Vec<bool>,
    offsets: Vec<(i32, i32)>,
}

impl Sel {
    /// Create a structuring element from a boolean grid given as rows.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if the grid is empty or ragged,
    /// either dimension is even, or no cell is set.
    pub fn from_grid<R: AsRef<[bool]>>(rows: &[R]) -> MorphResult<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(MorphError::InvalidSel("grid has no rows".to_string()));
        }
        let width = rows[0].as_ref().len();
        if width == 0 {
            return Err(MorphError::InvalidSel("grid has no columns".to_string()));
        }
        if let Some(bad) = rows.iter().position(|r| r.as_ref().len() != width) {
            return Err(MorphError::InvalidSel(format!(
                "row {} has length {}, expected {}",
                bad,
                rows[bad].as_ref().len(),
                width
            )));
        }
        let data: Vec<bool> = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().copied())
            .collect();
        Self::from_data(width as u32, height as u32, data)
    }

    fn from_data(width: u32, height: u32, data: Vec<bool>) -> MorphResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be odd, got {}x{}",
                width, height
            )));
        }
        let cx = (width / 2) as i32;
        let cy = (height / 2) as i32;
        let offsets: Vec<(i32, i32)> = data
            .iter()
            .enumerate()
            .filter(|&(_, &hit)| hit)
            .map(|(idx, _)| {
                let x = (idx as u32 % width) as i32;
                let y = (idx as u32 / width) as i32;
                (y - cy, x - cx)
            })
            .collect();
        if offsets.is_empty() {
            return Err(MorphError::InvalidSel("no cell is set".to_string()));
        }
        Ok(Sel {
            width,
            height,
            data,
            offsets,
        })
    }

    /// Create a structuring element from a string pattern.
    ///
    /// One line per row; `x` marks a set cell and `.` a clear one.
    /// Whitespace around each line is ignored and blank lines are skipped.
    ///
    /// ```
    /// use morphclean_morph::Sel;
    ///
    /// let sel = Sel::from_string(
    ///     ".x.
    ///      xxx
    ///      .x.",
    /// )
    /// .unwrap();
    /// assert_eq!(sel, Sel::create_cross(3).unwrap());
    /// ```
    pub fn from_string(pattern: &str) -> MorphResult<Self> {
        let mut rows = Vec::new();
        for line in pattern.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .chars()
                .map(|c| match c {
                    'x' | 'X' => Ok(true),
                    '.' => Ok(false),
                    other => Err(MorphError::InvalidSel(format!(
                        "unexpected character '{}' in pattern",
                        other
                    ))),
                })
                .collect::<MorphResult<Vec<bool>>>()?;
            rows.push(row);
        }
        Self::from_grid(&rows)
    }

    /// Create a `size x size` structuring element with every cell set.
    pub fn create_square(size: u32) -> MorphResult<Self> {
        Self::create_brick(size, size)
    }

    /// Create a `width x height` rectangle with every cell set.
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        Self::from_data(
            width,
            height,
            vec![true; (width as usize) * (height as usize)],
        )
    }

    /// Create a plus-shaped structuring element spanning `size` cells.
    pub fn create_cross(size: u32) -> MorphResult<Self> {
        let c = size / 2;
        Self::from_fn(size, size, |x, y| x == c || y == c)
    }

    /// Create a diamond (L1 ball) of the given radius.
    pub fn create_diamond(radius: u32) -> MorphResult<Self> {
        let r = radius as i32;
        Self::from_fn(2 * radius + 1, 2 * radius + 1, |x, y| {
            (x as i32 - r).abs() + (y as i32 - r).abs() <= r
        })
    }

    /// Create a disk (L2 ball) of the given radius.
    pub fn create_disk(radius: u32) -> MorphResult<Self> {
        let r = radius as i32;
        Self::from_fn(2 * radius + 1, 2 * radius + 1, |x, y| {
            let dx = x as i32 - r;
            let dy = y as i32 - r;
            dx * dx + dy * dy <= r * r
        })
    }

    fn from_fn<F: Fn(u32, u32) -> bool>(width: u32, height: u32, f: F) -> MorphResult<Self> {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_data(width, height, data)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Horizontal half-extent: the origin column.
    #[inline]
    pub fn half_width(&self) -> u32 {
        self.width / 2
    }

    /// Vertical half-extent: the origin row.
    #[inline]
    pub fn half_height(&self) -> u32 {
        self.height / 2
    }

    /// Largest half-extent `k`, so the SE fits in a `(2k+1)` square.
    #[inline]
    pub fn half_extent(&self) -> u32 {
        self.half_width().max(self.half_height())
    }

    /// Get the cell at column `x`, row `y`
    #[inline]
    pub fn get_element(&self, x: u32, y: u32) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// `(drow, dcol)` offsets of every set cell, relative to the origin.
    #[inline]
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Count the number of set cells
    #[inline]
    pub fn hit_count(&self) -> usize {
        self.offsets.len()
    }

    /// True if the origin cell is part of the neighborhood.
    pub fn contains_origin(&self) -> bool {
        self.offsets.contains(&(0, 0))
    }

    /// Create the reflected (180-degree rotated) SEL
    pub fn reflect(&self) -> Self {
        let mut data = self.data.clone();
        data.reverse();
        let offsets = {
            let mut o: Vec<(i32, i32)> =
                self.offsets.iter().map(|&(dr, dc)| (-dr, -dc)).collect();
            o.reverse();
            o
        };
        Sel {
            width: self.width,
            height: self.height,
            data,
            offsets,
        }
    }

    /// True if the SEL equals its own reflection.
    pub fn is_symmetric(&self) -> bool {
        self.data.iter().eq(self.data.iter().rev())
    }
}

impl Default for Sel {
    /// The 3x3 square, i.e. 8-connected neighborhood plus origin.
    fn default() -> Self {
        Sel {
            width: 3,
            height: 3,
            data: vec![true; 9],
            offsets: (-1..=1)
                .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
                .collect(),
        }
    }
}

impl fmt::Display for Sel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.chunks(self.width as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &hit in row {
                f.write_str(if hit { "x" } else { "." })?;
            }
        }
        Ok(())
    }
}
