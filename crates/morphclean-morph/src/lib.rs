//! morphclean-morph - Morphological primitives
//!
//! This crate provides:
//!
//! - [`Sel`]: immutable odd-sized structuring elements with precomputed
//!   `(drow, dcol)` offsets
//! - Grayscale morphology over an arbitrary SE: [`dilate`], [`erode`],
//!   [`open`], [`close`], [`gradient`] and iterated variants
//!
//! # Examples
//!
//! ```
//! use morphclean_core::Image;
//! use morphclean_morph::{Sel, dilate, erode};
//!
//! let image = Image::from_fn(16, 16, |x, y| if x == 8 && y == 8 { 255 } else { 0 }).unwrap();
//! let sel = Sel::create_square(3).unwrap();
//! let grown = dilate(&image, &sel);
//! assert_eq!(grown.count_foreground(), 9);
//! assert_eq!(erode(&grown, &sel).count_foreground(), 1);
//! ```

mod error;
pub mod grayscale;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use grayscale::{close, dilate, dilate_iterated, erode, erode_iterated, gradient, open};
pub use sel::Sel;
