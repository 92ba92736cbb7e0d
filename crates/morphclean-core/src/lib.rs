//! morphclean Core - Basic data structures for morphological cleanup
//!
//! This crate provides the grids shared by every stage of the pipeline:
//!
//! - [`Image`] / [`ImageMut`] - 8-bit sample grid (immutable / mutable)
//! - [`LabelMap`] / [`AreaTable`] - region labels and per-label pixel counts
//! - [`FloatImage`] ([`DistanceMap`]) - floating-point grid for distances
//!   and watershed elevation
//! - [`Error`] / [`ErrorKind`] - error type and the shared failure taxonomy

pub mod error;
pub mod fimage;
pub mod image;
pub mod label;

pub use error::{Error, ErrorKind, Result};
pub use fimage::{DistanceMap, FloatImage};
pub use image::{BACKGROUND, FOREGROUND, Image, ImageMut};
pub use label::{AreaTable, BOUNDARY_LABEL, LabelMap};
