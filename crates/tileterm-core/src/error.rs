//! Error type shared by the core crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which engine buffer a length check was made against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferKind {
    Screen,
    Console,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Screen => f.write_str("screen"),
            Self::Console => f.write_str("console"),
        }
    }
}

/// Errors reported by the core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The engine handed out a buffer whose length breaks the geometry
    /// contract.
    #[error("{buffer} buffer has {actual} bytes, expected {expected}")]
    BufferLength {
        buffer: BufferKind,
        expected: usize,
        actual: usize,
    },

    /// Atlas pixel data does not cover `num_tiles × num_tiles` tiles.
    #[error("atlas is {width}x{height} px, needs at least {required}x{required} px")]
    AtlasTooSmall {
        width: usize,
        height: usize,
        required: usize,
    },

    /// Atlas pixel data length does not match its stated dimensions.
    #[error("atlas data has {actual} bytes, expected {expected}")]
    AtlasData { expected: usize, actual: usize },

    /// A geometry value that makes the grid unusable (zero sized).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
}
