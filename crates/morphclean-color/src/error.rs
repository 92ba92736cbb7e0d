//! Error types for morphclean-color

use morphclean_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur during color processing operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morphclean_core::Error),
}

impl ColorError {
    /// Map this error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ColorError::Core(e) => e.kind(),
        }
    }
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
