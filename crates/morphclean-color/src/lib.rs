//! morphclean-color - Color rendering and binarization
//!
//! - **Color space** ([`colorspace`]): integer HSV to RGB, RGB to luma
//! - **Coloring** ([`coloring`]): deterministic label palette and label map
//!   rendering
//! - **Thresholding** ([`threshold`]): fixed and Otsu binarization

pub mod coloring;
pub mod colorspace;
pub mod error;
pub mod threshold;

pub use coloring::{
    BACKGROUND_COLOR, BOUNDARY_COLOR, ColorImage, colorize_labels, colorize_labels_with_mask,
    palette_color,
};
pub use colorspace::{Hsv, hsv_to_rgb, rgb_to_gray};
pub use error::{ColorError, ColorResult};
pub use threshold::{DEFAULT_THRESHOLD, compute_otsu_threshold, threshold_otsu, threshold_to_binary};
