//! Pre-defined parameter bundles and matrix aliases.

use crate::dense::DenseMatrix;
use crate::parameter::{
    ColumnMajor, FixedSize, NoLeadingDimension, NoUnblockedDimension, NormTwo, OnStack, Parameter,
    RowMajor, UnblockedDimension, VariableSize,
};
use crate::sparse::SparseMatrix;
use crate::zero::ZeroMatrix;

// ── Parameter bundles ───────────────────────────────────────────────

/// Variable-size, heap, row-major.
pub type RowMajorParameter = Parameter<usize, RowMajor>;

/// `R x C`, inline on the stack.
pub type StackParameter<const R: usize, const C: usize, O = ColumnMajor> =
    Parameter<usize, O, FixedSize<R, C>, NoLeadingDimension, NoUnblockedDimension, NormTwo, OnStack>;

/// `R x C`, on the heap.
pub type FixedParameter<const R: usize, const C: usize, O = ColumnMajor> =
    Parameter<usize, O, FixedSize<R, C>>;

/// Variable-size blocked matrix that records its unblocked shape.
pub type BlockedParameter<O = ColumnMajor> =
    Parameter<usize, O, VariableSize, NoLeadingDimension, UnblockedDimension>;

// ── Dense aliases ───────────────────────────────────────────────────

/// Dense column-major matrix with `f32` elements.
pub type DenseMatrixf32 = DenseMatrix<f32>;
/// Dense column-major matrix with `f64` elements.
pub type DenseMatrixf64 = DenseMatrix<f64>;

pub type RowMajorMatrix<T> = DenseMatrix<T, RowMajorParameter>;
pub type StackMatrix<T, const R: usize, const C: usize> = DenseMatrix<T, StackParameter<R, C>>;
pub type FixedMatrix<T, const R: usize, const C: usize> = DenseMatrix<T, FixedParameter<R, C>>;
pub type BlockedMatrix<T> = DenseMatrix<T, BlockedParameter>;

// ── Sparse and zero aliases ─────────────────────────────────────────

/// Compressed sparse column matrix with `f32` elements.
pub type SparseMatrixf32 = SparseMatrix<f32>;
/// Compressed sparse column matrix with `f64` elements.
pub type SparseMatrixf64 = SparseMatrix<f64>;
/// Compressed sparse row matrix.
pub type CsrMatrix<T> = SparseMatrix<T, RowMajorParameter>;

pub type ZeroMatrixf32 = ZeroMatrix<f32>;
pub type ZeroMatrixf64 = ZeroMatrix<f64>;
