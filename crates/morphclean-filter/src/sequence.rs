//! Cleanup sequences
//!
//! Chains the pipeline operations from a compact string so a whole cleanup
//! can be given on one command line.
//!
//! # Sequence String Format
//!
//! Operations are separated by `+` and whitespace is ignored. Each
//! operation begins with a case-insensitive character:
//!
//! - `t<level>` - Binarize: `v > level -> 255`
//! - `r<min_size>` or `r<min_size>a` - Remove components smaller than
//!   `min_size` pixels
//! - `r<size>r` - Remove components a `size x size` square does not fit
//!   inside (opening by reconstruction)
//! - `f` or `f<size>` - Fill holes, background connected through a
//!   `size x size` square (default 3)
//! - `s<fraction>.<iterations>` - Separate touching objects; the result is
//!   the separated mask, and the labels are kept in the output
//!
//! Square sizes must be odd.
//!
//! # Examples
//!
//! ```
//! use morphclean_filter::{CleanupOp, CleanupSequence};
//!
//! let seq = CleanupSequence::parse("r500 + f3 + s0.5.3").unwrap();
//! assert_eq!(seq.len(), 3);
//! assert_eq!(seq.ops()[1], CleanupOp::FillHoles { size: 3 });
//! ```

use crate::error::{FilterError, FilterResult};
use crate::holes::fill_holes;
use crate::separate::{SeparationOptions, separate_touching_objects_with_options};
use crate::small_objects::{SmallObjectStrategy, remove_small_objects};
use morphclean_core::{Image, LabelMap};
use morphclean_morph::Sel;
use std::time::Instant;

/// A parsed cleanup operation
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOp {
    /// Binarize with `v > level -> 255`
    Threshold {
        /// Largest sample mapped to background
        level: u8,
    },
    /// Remove components below an exact pixel count
    RemoveSmallByArea {
        /// Smallest area kept
        min_size: u32,
    },
    /// Remove components a square does not fit inside
    RemoveSmallByReconstruction {
        /// Side of the square structuring element
        size: u32,
    },
    /// Fill enclosed background
    FillHoles {
        /// Side of the square structuring element
        size: u32,
    },
    /// Split touching objects with a watershed
    Separate {
        /// Sure-foreground share of the maximum distance
        fraction: f32,
        /// Width of the unknown margin, in 3x3 dilations
        iterations: u32,
    },
}

impl CleanupOp {
    /// Short name used in log events
    pub fn name(&self) -> &'static str {
        match self {
            CleanupOp::Threshold { .. } => "threshold",
            CleanupOp::RemoveSmallByArea { .. } => "remove-small-area",
            CleanupOp::RemoveSmallByReconstruction { .. } => "remove-small-reconstruction",
            CleanupOp::FillHoles { .. } => "fill-holes",
            CleanupOp::Separate { .. } => "separate",
        }
    }
}

/// Result of running a [`CleanupSequence`]
#[derive(Debug, Clone)]
pub struct SequenceOutput {
    /// Image after the last operation
    pub image: Image,
    /// Labels of the last separation step, if the sequence had one
    pub labels: Option<LabelMap>,
}

/// A parsed cleanup sequence
#[derive(Debug, Clone)]
pub struct CleanupSequence {
    ops: Vec<CleanupOp>,
}

impl CleanupSequence {
    /// Parse a sequence string such as `"t127 + r500 + f3 + s0.5.3"`
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidSequence`] for an empty sequence, an
    /// empty operation, an unknown operation letter, or a malformed or
    /// out-of-range argument.
    pub fn parse(sequence: &str) -> FilterResult<Self> {
        if sequence.trim().is_empty() {
            return Err(FilterError::InvalidSequence("empty sequence".to_string()));
        }

        let mut ops = Vec::new();
        for (i, part) in sequence.split('+').enumerate() {
            let op_str: String = part.chars().filter(|c| !c.is_whitespace()).collect();
            if op_str.is_empty() {
                return Err(FilterError::InvalidSequence(format!(
                    "empty operation at position {}",
                    i + 1
                )));
            }
            ops.push(Self::parse_operation(&op_str)?);
        }

        Ok(CleanupSequence { ops })
    }

    fn parse_operation(op_str: &str) -> FilterResult<CleanupOp> {
        let mut chars = op_str.chars();
        let first = chars.next().map(|c| c.to_ascii_lowercase());
        let args = chars.as_str();

        match first {
            Some('t') => Ok(CleanupOp::Threshold {
                level: parse_number(args, op_str, "threshold level")?,
            }),
            Some('r') => {
                let lower = args.to_ascii_lowercase();
                if let Some(size) = lower.strip_suffix('r') {
                    Ok(CleanupOp::RemoveSmallByReconstruction {
                        size: parse_square_size(size, op_str)?,
                    })
                } else {
                    let min_size = lower.strip_suffix('a').unwrap_or(&lower);
                    Ok(CleanupOp::RemoveSmallByArea {
                        min_size: parse_number(min_size, op_str, "minimum size")?,
                    })
                }
            }
            Some('f') => {
                let size = if args.is_empty() {
                    3
                } else {
                    parse_square_size(args, op_str)?
                };
                Ok(CleanupOp::FillHoles { size })
            }
            Some('s') => {
                let (fraction, iterations) = args.rsplit_once('.').ok_or_else(|| {
                    FilterError::InvalidSequence(format!(
                        "invalid separation '{}', expected 's<fraction>.<iterations>'",
                        op_str
                    ))
                })?;
                let fraction: f32 = parse_number(fraction, op_str, "fraction")?;
                if !(fraction > 0.0 && fraction <= 1.0) {
                    return Err(FilterError::InvalidSequence(format!(
                        "fraction {} in '{}' must be in (0, 1]",
                        fraction, op_str
                    )));
                }
                Ok(CleanupOp::Separate {
                    fraction,
                    iterations: parse_number(iterations, op_str, "iterations")?,
                })
            }
            Some(c) => Err(FilterError::InvalidSequence(format!(
                "unknown operation '{}' in '{}'",
                c, op_str
            ))),
            None => Err(FilterError::InvalidSequence("empty operation".to_string())),
        }
    }

    /// Get the operations in this sequence
    pub fn ops(&self) -> &[CleanupOp] {
        &self.ops
    }

    /// Get the number of operations in the sequence
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Run every operation in order
    ///
    /// Operations other than `t` need a binary image, so a grayscale input
    /// must start with a threshold step.
    pub fn run(&self, image: &Image) -> FilterResult<SequenceOutput> {
        let mut current = image.clone();
        let mut labels = None;

        for (i, op) in self.ops.iter().enumerate() {
            let start = Instant::now();
            current = match *op {
                CleanupOp::Threshold { level } => current.threshold(level),
                CleanupOp::RemoveSmallByArea { min_size } => remove_small_objects(
                    &current,
                    &Sel::create_square(3)?,
                    min_size,
                    SmallObjectStrategy::ByArea,
                )?,
                CleanupOp::RemoveSmallByReconstruction { size } => remove_small_objects(
                    &current,
                    &Sel::create_square(size)?,
                    0,
                    SmallObjectStrategy::by_reconstruction(),
                )?,
                CleanupOp::FillHoles { size } => fill_holes(&current, &Sel::create_square(size)?)?,
                CleanupOp::Separate {
                    fraction,
                    iterations,
                } => {
                    let options = SeparationOptions::new()
                        .with_sure_foreground_fraction(fraction)
                        .with_dilation_iterations(iterations);
                    let separated = separate_touching_objects_with_options(&current, &options)?;
                    let mask = separated.to_mask();
                    labels = Some(separated);
                    mask
                }
            };
            tracing::debug!(
                step = i + 1,
                op = op.name(),
                foreground = current.count_foreground(),
                elapsed = ?start.elapsed(),
                "cleanup step done"
            );
        }

        Ok(SequenceOutput {
            image: current,
            labels,
        })
    }
}

/// Parse and run a cleanup sequence in one call
///
/// # Examples
///
/// ```
/// use morphclean_core::Image;
/// use morphclean_filter::cleanup_sequence;
///
/// let image = Image::from_fn(20, 20, |x, y| if x > 2 && y > 2 && x < 15 && y < 15 { 200 } else { 10 }).unwrap();
/// let out = cleanup_sequence(&image, "t127 + r10 + f").unwrap();
/// assert_eq!(out.image.count_foreground(), 144);
/// ```
pub fn cleanup_sequence(image: &Image, sequence: &str) -> FilterResult<SequenceOutput> {
    CleanupSequence::parse(sequence)?.run(image)
}

fn parse_number<T: std::str::FromStr>(s: &str, op_str: &str, what: &str) -> FilterResult<T> {
    s.parse().map_err(|_| {
        FilterError::InvalidSequence(format!("invalid {} '{}' in '{}'", what, s, op_str))
    })
}

fn parse_square_size(s: &str, op_str: &str) -> FilterResult<u32> {
    let size: u32 = parse_number(s, op_str, "size")?;
    if size % 2 == 0 {
        return Err(FilterError::InvalidSequence(format!(
            "size must be odd and > 0, got {} in '{}'",
            size, op_str
        )));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphclean_core::ErrorKind;
    use morphclean_region::{annulus_image, draw_disk};

    #[test]
    fn test_parse_all_ops() {
        let seq = CleanupSequence::parse("T127 + r500 + r40a + r5r + f + f5 + s0.4.2").unwrap();
        assert_eq!(
            seq.ops(),
            &[
                CleanupOp::Threshold { level: 127 },
                CleanupOp::RemoveSmallByArea { min_size: 500 },
                CleanupOp::RemoveSmallByArea { min_size: 40 },
                CleanupOp::RemoveSmallByReconstruction { size: 5 },
                CleanupOp::FillHoles { size: 3 },
                CleanupOp::FillHoles { size: 5 },
                CleanupOp::Separate {
                    fraction: 0.4,
                    iterations: 2
                },
            ]
        );
        assert!(!seq.is_empty());
    }

    #[test]
    fn test_parse_whitespace() {
        let seq = CleanupSequence::parse("  r 10 +f 3 ").unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "", "  ", "r10 +", "+f3", "q5", "r", "rx", "r4r", "f2", "f0", "s0.5", "s2.0.3",
            "s0.0.3", "s0.5.x", "t300",
        ] {
            let err = CleanupSequence::parse(bad).unwrap_err();
            assert!(
                matches!(err, FilterError::InvalidSequence(_)),
                "{:?} gave {:?}",
                bad,
                err
            );
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_run_pipeline() {
        // Annulus plus a speck: remove the speck, fill the annulus.
        let mut im = annulus_image(60, 60, 30, 30, 8, 20).unwrap().into_mut();
        draw_disk(&mut im, 3, 3, 1, 255);
        let image: Image = im.into();

        let out = cleanup_sequence(&image, "r50 + f3").unwrap();
        assert_eq!(out.image.get_pixel(3, 3), Some(0));
        assert_eq!(out.image.get_pixel(30, 30), Some(255));
        assert!(out.labels.is_none());
    }

    #[test]
    fn test_run_with_separation_keeps_labels() {
        let mut im = Image::new(80, 40).unwrap().into_mut();
        draw_disk(&mut im, 24, 20, 14, 255);
        draw_disk(&mut im, 50, 20, 14, 255);
        let image: Image = im.into();

        let out = cleanup_sequence(&image, "s0.5.3").unwrap();
        let labels = out.labels.unwrap();
        assert_eq!(labels.max_label(), 2);
        assert!(out.image.count_foreground() < image.count_foreground());
    }

    #[test]
    fn test_run_rejects_grayscale_without_threshold() {
        let image = Image::new_with_value(8, 8, 90).unwrap();
        let err = cleanup_sequence(&image, "r5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(cleanup_sequence(&image, "t50 + r5").is_ok());
    }
}
