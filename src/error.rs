//! Error type shared by every storage, matrix and registry operation.

use thiserror::Error;

/// Errors raised by storage and matrix operations.
///
/// All variants are raised immediately at the failing construction or
/// assignment and propagate to the caller; nothing in the crate retries.
///
/// ```
/// use matlayout::{DenseMatrix, StorageError};
///
/// let err = DenseMatrix::<f64>::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
/// assert_eq!(err, StorageError::RaggedRows { row: 1, expected: 2, got: 1 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Fixed-size storage built or assigned from a buffer of the wrong length.
    #[error("size mismatch: expected {expected} elements, got {got}")]
    SizeMismatch {
        /// Number of elements the storage holds.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },

    /// Fixed-shape matrix built or assigned with a different extent.
    #[error("shape mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .got.0, .got.1)]
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Got `(rows, cols)`.
        got: (usize, usize),
    },

    /// Extent whose element count `nrows * ncols` does not fit a `usize`.
    #[error("extent {nrows}x{ncols} overflows the element count")]
    ExtentOverflow { nrows: usize, ncols: usize },

    /// Nested row initializer whose inner sequences differ in length.
    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        /// Offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// Attempt to reallocate a buffer the storage does not own.
    #[error("storage does not own its buffer and cannot reallocate it")]
    NotOwned,

    /// Element access outside the logical extent.
    #[error("index ({row}, {col}) out of bounds for {nrows}x{ncols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    /// Sub-view window reaching past the parent extent.
    #[error(
        "sub-matrix at ({}, {}) of size {}x{} exceeds {}x{} parent",
        .begin.0, .begin.1, .shape.0, .shape.1, .parent.0, .parent.1
    )]
    ViewOutOfBounds {
        /// `(begin_row, begin_col)`.
        begin: (usize, usize),
        /// `(rows, cols)` of the requested window.
        shape: (usize, usize),
        /// `(rows, cols)` of the parent.
        parent: (usize, usize),
    },

    /// Sparse copy between different orientations; transpose first.
    #[error("sparse matrices of different orientation must be transposed before copying")]
    OrientationMismatch,

    /// Sparse arrays violating the offset/key invariants.
    #[error("malformed sparse structure: {0}")]
    MalformedSparse(&'static str),

    /// Key or offset too large for the configured index type.
    #[error("index {0} does not fit the sparse index type")]
    IndexOverflow(usize),

    /// Element not representable in the destination element type.
    #[error("value cannot be represented in the target element type")]
    NumericCast,

    /// The allocator could not provide the requested buffer.
    #[error("failed to allocate {len} elements")]
    AllocationFailed {
        /// Requested element count.
        len: usize,
    },
}

/// Result type for storage and matrix operations.
pub type Result<T> = core::result::Result<T, StorageError>;
