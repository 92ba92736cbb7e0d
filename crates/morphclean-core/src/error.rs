//! Error types for morphclean-core
//!
//! Provides a unified error type for the core data structures. Each variant
//! captures enough context for diagnostics. Higher crates wrap this type
//! and map every failure onto the shared [`ErrorKind`] taxonomy.

use thiserror::Error;

/// Category of a failure, shared by every crate in the workspace.
///
/// Callers that only care about *what kind* of mistake happened can match
/// on this instead of on the crate-specific error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed structuring element or option value
    Configuration,
    /// Two grids that must agree in size do not
    ShapeMismatch,
    /// Input outside the domain an operation accepts (e.g. non-binary image)
    Validation,
    /// An iterate-to-fixed-point loop exceeded its theoretical cap
    Convergence,
    /// I/O, codec or anything else not in the taxonomy
    Other,
}

/// morphclean-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Two grids have different sizes
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A binary image was required
    #[error("image is not binary: found sample value {value} at ({x}, {y})")]
    NotBinary { x: u32, y: u32, value: u8 },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Map this error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DimensionMismatch { .. } => ErrorKind::ShapeMismatch,
            Error::NotBinary { .. } => ErrorKind::Validation,
            Error::InvalidDimension { .. } | Error::InvalidParameter(_) => {
                ErrorKind::Configuration
            }
            Error::IndexOutOfBounds { .. } => ErrorKind::Other,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
