//! # matlayout
//!
//! Compile-time configurable matrix storage and layout engine, no-std
//! compatible (requires `alloc`). Dense, sparse and structurally-zero
//! matrices share one parameterized design, and a closed registry gives
//! every concrete configuration a stable index for kernel dispatch.
//!
//! ## Quick start
//!
//! ```
//! use matlayout::{DenseMatrix, DynamicMatrix, RowMajorMatrix, SparseMatrix};
//! use matlayout::sparse::non_zero;
//!
//! let a = DenseMatrix::<f64>::from_rows(&[[2.0, 3.0], [-4.0, 1.0], [7.0, -1.0]]).unwrap();
//! assert_eq!(a[(2, 1)], -1.0);
//!
//! // window into `a`, no copy
//! let v = a.sub_matrix(2, 1, 1, 0).unwrap();
//! assert_eq!(v[(1, 0)], 7.0);
//!
//! // conversions always allocate a fresh owning matrix
//! let r = RowMajorMatrix::<f32>::from_dense(&a).unwrap();
//! let s = SparseMatrix::<f64>::from_dense(&a, non_zero).unwrap();
//! assert_eq!(s.nnz(), 6);
//!
//! let erased = DynamicMatrix::new(r);
//! assert_eq!(erased.type_index(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`parameter`]: The [`Parameter`] bundle: orientation ([`RowMajor`] /
//!   [`ColumnMajor`]), extent ([`FixedSize`] / [`VariableSize`]), leading and
//!   unblocked dimension facets, norm tag and placement. [`ParameterSet`]
//!   resolves the storage type at compile time.
//!
//! - [`storage`]: Four buffers behind dense matrices: inline
//!   [`StackStorage`](storage::StackStorage), fixed
//!   [`FixedHeapStorage`](storage::FixedHeapStorage), owned-or-external
//!   [`HeapStorage`](storage::HeapStorage) and borrowed
//!   [`StripedStorage`](storage::StripedStorage) for sub-views.
//!
//! - [`dense`]: [`DenseMatrix`] with construction, checked and unchecked
//!   access, resize, copy, sub-views ([`MatrixView`] / [`MatrixViewMut`]) and
//!   conversions from every other representation.
//!
//! - [`sparse`]: [`SparseMatrix`] in compressed major-line form (CSC for
//!   column-major, CSR for row-major) with a pluggable inclusion predicate.
//!
//! - [`zero`]: [`ZeroMatrix`], an extent without storage.
//!
//! - [`registry`]: [`DynamicMatrix`], the [`Registered`] trait and the
//!   index constants used by a dispatcher.
//!
//! - [`traits`]: Element traits ([`Scalar`], [`Tolerance`], [`IndexType`])
//!   and the generic access traits [`MatrixRef`] / [`MatrixMut`].
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Enables `std` in num-traits, approx, thiserror and tracing |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod aliases;
pub mod dense;
pub mod error;
pub mod parameter;
pub mod registry;
pub mod sparse;
pub mod storage;
pub mod traits;
pub mod zero;

pub use aliases::{
    BlockedMatrix, BlockedParameter, CsrMatrix, DenseMatrixf32, DenseMatrixf64, FixedMatrix,
    FixedParameter, RowMajorMatrix, RowMajorParameter, SparseMatrixf32, SparseMatrixf64,
    StackMatrix, StackParameter, ZeroMatrixf32, ZeroMatrixf64,
};
pub use dense::{DenseMatrix, MatrixView, MatrixViewMut, SubMatrix};
pub use error::{Result, StorageError};
pub use parameter::{
    ColumnMajor, FixedSize, Order, Parameter, ParameterSet, RowMajor, SubParameter, VariableSize,
};
pub use registry::{pair_index, DynamicMatrix, Format, Registered, REGISTRY_SIZE, TYPE_NAMES};
pub use sparse::SparseMatrix;
pub use traits::{IndexType, MatrixMut, MatrixRef, Scalar, Tolerance};
pub use zero::ZeroMatrix;
