//! morphclean - Morphological cleanup of binary images
//!
//! Three cleanup operations built on a small mathematical morphology
//! toolkit:
//!
//! - Small object removal, by exact area or by opening by reconstruction
//! - Hole filling through reconstruction of the background from the border
//! - Separation of touching objects with a distance-transform watershed
//!
//! The building blocks live in the domain crates, re-exported here as
//! modules:
//!
//! - [`morph`]: structuring elements and grayscale dilation/erosion
//! - [`region`]: labeling, reconstruction, distance transform, watershed
//! - [`filter`]: the cleanup operations and the cleanup sequence parser
//! - [`color`]: label colorization and thresholding
//! - [`io`]: PNG and PNM reading and writing
//!
//! # Example
//!
//! ```
//! use morphclean::Image;
//! use morphclean::filter::{SmallObjectStrategy, fill_holes, remove_small_objects};
//! use morphclean::morph::Sel;
//! use morphclean::region::annulus_image;
//!
//! let ring = annulus_image(40, 40, 20, 20, 5, 12).unwrap();
//! let sel = Sel::create_square(3).unwrap();
//!
//! let kept = remove_small_objects(&ring, &sel, 10, SmallObjectStrategy::ByArea).unwrap();
//! assert_eq!(kept, ring);
//!
//! let filled = fill_holes(&kept, &sel).unwrap();
//! assert!(filled.count_foreground() > ring.count_foreground());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use morphclean_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use morphclean_color as color;
pub use morphclean_filter as filter;
pub use morphclean_io as io;
pub use morphclean_morph as morph;
pub use morphclean_region as region;
