//! morphclean-filter - Cleanup pipeline operations
//!
//! This crate composes the region algorithms into the user-facing cleanup
//! steps:
//!
//! - **Small object removal** - by exact area, or by opening by
//!   reconstruction with a structuring element
//! - **Hole filling** - fills background not reachable from the border
//! - **Touching object separation** - distance transform seeds flooded by a
//!   watershed
//! - **Cleanup sequences** - the steps above chained from a string such as
//!   `"t127 + r500 + f3 + s0.5.3"`
//!
//! # Examples
//!
//! ```
//! use morphclean_filter::{SmallObjectStrategy, fill_holes, remove_small_objects};
//! use morphclean_morph::Sel;
//! use morphclean_region::{annulus_image, draw_disk};
//!
//! let mut im = annulus_image(100, 100, 50, 50, 15, 30).unwrap().into_mut();
//! draw_disk(&mut im, 5, 5, 2, 255);
//! let image = im.into();
//!
//! let sel = Sel::create_square(3).unwrap();
//! let cleaned = remove_small_objects(&image, &sel, 100, SmallObjectStrategy::ByArea).unwrap();
//! let filled = fill_holes(&cleaned, &sel).unwrap();
//! assert_eq!(filled.get_pixel(5, 5), Some(0));
//! assert_eq!(filled.get_pixel(50, 50), Some(255));
//! ```

mod error;
pub mod holes;
pub mod separate;
pub mod sequence;
pub mod small_objects;

pub use error::{FilterError, FilterResult};
pub use holes::fill_holes;
pub use separate::{
    SeparationOptions, SeparationResult, separate_touching_objects,
    separate_touching_objects_detailed, separate_touching_objects_with_options,
};
pub use sequence::{CleanupOp, CleanupSequence, SequenceOutput, cleanup_sequence};
pub use small_objects::{
    DEFAULT_MIN_SIZE, SmallObjectOptions, SmallObjectStrategy, remove_small_objects,
    remove_small_objects_with_options,
};
