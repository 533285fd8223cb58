//! Compressed sparse matrices.
//!
//! Significant elements are stored line by line in the orientation of the
//! parameter: `offsets[i]..offsets[i + 1]` delimits the keys (minor
//! indices) and values of major line `i`. Column-major therefore gives
//! CSC, row-major gives CSR.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use tracing::debug;

use crate::dense::DenseMatrix;
use crate::error::{Result, StorageError};
use crate::parameter::{Dimension, Order, Orientation, Parameter, ParameterSet};
use crate::registry::DynamicMatrix;
use crate::traits::{cast, IndexType, Scalar};

/// Inclusion predicate accepting every element.
#[inline]
pub fn keep_all<T>(_: &T) -> bool {
    true
}

/// Inclusion predicate accepting every non-zero element.
#[inline]
pub fn non_zero<T: Scalar>(value: &T) -> bool {
    !value.is_zero()
}

/// Sparse matrix in compressed major-line form.
///
/// ```
/// use matlayout::{DenseMatrix, SparseMatrix};
/// use matlayout::sparse::non_zero;
///
/// let d = DenseMatrix::<f64>::from_rows(&[[1.0, 0.0], [0.0, 2.0], [3.0, 0.0]]).unwrap();
/// let s = SparseMatrix::<f64>::from_dense(&d, non_zero).unwrap();
/// assert_eq!(s.nnz(), 3);
/// assert_eq!(s.offsets(), &[0, 2, 3]);
/// assert_eq!(s.keys(), &[0, 2, 1]);
/// assert_eq!(s.try_get(1, 1), Ok(2.0));
/// assert_eq!(s.try_get(0, 1), Ok(0.0));
/// ```
pub struct SparseMatrix<T: Scalar, P: ParameterSet = Parameter> {
    dim: P::Size,
    values: Vec<T>,
    keys: Vec<P::Index>,
    offsets: Vec<P::Index>,
}

fn reserve<X>(len: usize) -> Result<Vec<X>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| StorageError::AllocationFailed { len })?;
    Ok(v)
}

/// `lines + 1` zero offsets.
fn empty_offsets<I: IndexType>(lines: usize) -> Result<Vec<I>> {
    let len = lines
        .checked_add(1)
        .ok_or(StorageError::AllocationFailed { len: usize::MAX })?;
    let mut offsets = reserve(len)?;
    offsets.resize(len, I::default());
    Ok(offsets)
}

fn to_index<I: IndexType>(n: usize) -> Result<I> {
    I::from_usize(n).ok_or(StorageError::IndexOverflow(n))
}

impl<T: Scalar, P: ParameterSet> SparseMatrix<T, P> {
    /// Empty matrix; for a fixed extent, `R x C` without significant elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// `nrows x ncols` matrix without significant elements.
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self> {
        let dim = P::Size::new(nrows, ncols)?;
        Ok(Self {
            dim,
            values: Vec::new(),
            keys: Vec::new(),
            offsets: empty_offsets(P::Orientation::major_lines(nrows, ncols))?,
        })
    }

    /// Assemble from raw arrays, checking every structural invariant.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        values: Vec<T>,
        keys: Vec<P::Index>,
        offsets: Vec<P::Index>,
    ) -> Result<Self> {
        let dim = P::Size::new(nrows, ncols)?;
        let lines = P::Orientation::major_lines(nrows, ncols);
        let len = P::Orientation::line_len(nrows, ncols);

        if values.len() != keys.len() {
            return Err(StorageError::MalformedSparse("values and keys differ in length"));
        }
        if offsets.len().checked_sub(1) != Some(lines) {
            return Err(StorageError::MalformedSparse(
                "offsets must hold one entry per major line plus one",
            ));
        }
        if offsets[0].index() != 0 {
            return Err(StorageError::MalformedSparse("offsets must start at zero"));
        }
        if offsets[lines].index() != values.len() {
            return Err(StorageError::MalformedSparse(
                "last offset must equal the number of values",
            ));
        }
        for w in offsets.windows(2) {
            let (start, end) = (w[0].index(), w[1].index());
            if start > end || end > keys.len() {
                return Err(StorageError::MalformedSparse("offsets must be non-decreasing"));
            }
            let line = &keys[start..end];
            let increasing = line.windows(2).all(|k| k[0] < k[1]);
            if !increasing || line.last().is_some_and(|k| k.index() >= len) {
                return Err(StorageError::MalformedSparse(
                    "keys must increase within a line and stay below its length",
                ));
            }
        }

        Ok(Self {
            dim,
            values,
            keys,
            offsets,
        })
    }

    /// Significant elements of `src`, as selected by `keep`.
    ///
    /// The arrays are sized exactly to the number of kept elements.
    pub fn from_dense<U, Q, F>(src: &DenseMatrix<U, Q>, keep: F) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
        F: Fn(&U) -> bool,
    {
        let nnz = src.iter().filter(|v| keep(*v)).count();
        Self::assemble(src.nrows(), src.ncols(), nnz, |r, c| src[(r, c)], keep)
    }

    /// Copy of a sparse matrix with the same orientation.
    ///
    /// Fails with [`StorageError::OrientationMismatch`] otherwise: changing
    /// orientation is a transpose of the compressed form.
    pub fn from_sparse<U, Q>(src: &SparseMatrix<U, Q>) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
    {
        if P::Orientation::ORDER != Q::Orientation::ORDER {
            return Err(StorageError::OrientationMismatch);
        }
        let dim = P::Size::new(src.nrows(), src.ncols())?;
        let mut values = reserve(src.values.len())?;
        for v in &src.values {
            values.push(cast(*v)?);
        }
        let convert = |idx: &[Q::Index]| -> Result<Vec<P::Index>> {
            let mut out = reserve(idx.len())?;
            for i in idx {
                out.push(to_index(i.index())?);
            }
            Ok(out)
        };
        Ok(Self {
            dim,
            values,
            keys: convert(&src.keys)?,
            offsets: convert(&src.offsets)?,
        })
    }

    /// Elements of a type-erased matrix whose magnitude exceeds `threshold`.
    pub fn from_dynamic(src: &DynamicMatrix, threshold: f64) -> Result<Self> {
        fn above<V: Scalar>(threshold: f64) -> impl Fn(&V) -> bool {
            move |v: &V| v.to_f64().is_some_and(|x| x.abs() > threshold)
        }
        match src {
            DynamicMatrix::ZeroF32(m) => Self::zeros(m.nrows(), m.ncols()),
            DynamicMatrix::ZeroF64(m) => Self::zeros(m.nrows(), m.ncols()),
            DynamicMatrix::SparseF32(m) => Self::from_sparse_filtered(m, above(threshold)),
            DynamicMatrix::SparseF64(m) => Self::from_sparse_filtered(m, above(threshold)),
            DynamicMatrix::DenseF32(m) => Self::from_dense(m, above(threshold)),
            DynamicMatrix::DenseRowMajorF32(m) => Self::from_dense(m, above(threshold)),
            DynamicMatrix::DenseF64(m) => Self::from_dense(m, above(threshold)),
            DynamicMatrix::DenseRowMajorF64(m) => Self::from_dense(m, above(threshold)),
        }
    }

    /// Significant elements of any sparse matrix, in this orientation.
    fn from_sparse_filtered<U, Q, F>(src: &SparseMatrix<U, Q>, keep: F) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
        F: Fn(&U) -> bool,
    {
        let nnz = src.values.iter().filter(|v| keep(*v)).count();
        Self::assemble(src.nrows(), src.ncols(), nnz, |r, c| src.value_at(r, c), keep)
    }

    /// Walk a source line by line in this orientation and append the
    /// `nnz` elements passing `keep`.
    fn assemble<U, G, F>(nrows: usize, ncols: usize, nnz: usize, get: G, keep: F) -> Result<Self>
    where
        U: Scalar,
        G: Fn(usize, usize) -> U,
        F: Fn(&U) -> bool,
    {
        let dim = P::Size::new(nrows, ncols)?;
        let lines = P::Orientation::major_lines(nrows, ncols);
        let len = P::Orientation::line_len(nrows, ncols);
        to_index::<P::Index>(nnz)?;

        let mut values = reserve(nnz)?;
        let mut keys = reserve(nnz)?;
        let mut offsets = reserve(
            lines
                .checked_add(1)
                .ok_or(StorageError::AllocationFailed { len: usize::MAX })?,
        )?;
        offsets.push(P::Index::default());
        for line in 0..lines {
            for k in 0..len {
                let (row, col) = P::Orientation::coords(line, k);
                let v = get(row, col);
                if keep(&v) {
                    values.push(cast(v)?);
                    keys.push(to_index(k)?);
                }
            }
            offsets.push(to_index(values.len())?);
        }
        debug!(nrows, ncols, nnz = values.len(), "assembled sparse matrix");
        Ok(Self {
            dim,
            values,
            keys,
            offsets,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    pub fn nrows(&self) -> usize {
        self.dim.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.dim.ncols()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dim.size()
    }

    /// Number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn order(&self) -> Order {
        P::Orientation::ORDER
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn keys(&self) -> &[P::Index] {
        &self.keys
    }

    pub fn offsets(&self) -> &[P::Index] {
        &self.offsets
    }

    /// Keys and values of major line `i`, `None` past the last line.
    pub fn line(&self, i: usize) -> Option<(&[P::Index], &[T])> {
        let start = self.offsets.get(i)?.index();
        let end = self.offsets.get(i + 1)?.index();
        Some((&self.keys[start..end], &self.values[start..end]))
    }

    fn value_at(&self, row: usize, col: usize) -> T {
        let (line, k) = P::Orientation::line_of(row, col);
        self.line(line)
            .and_then(|(keys, values)| {
                keys.binary_search_by(|key| key.index().cmp(&k))
                    .ok()
                    .map(|j| values[j])
            })
            .unwrap_or_else(T::zero)
    }

    /// Element at `(row, col)`; zero when it is not stored.
    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.nrows() || col >= self.ncols() {
            return Err(StorageError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows(),
                ncols: self.ncols(),
            });
        }
        Ok(self.value_at(row, col))
    }

    /// `(row, col, value)` of every stored element, in storage order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.offsets.windows(2).enumerate().flat_map(move |(line, w)| {
            (w[0].index()..w[1].index()).map(move |j| {
                let (row, col) = P::Orientation::coords(line, self.keys[j].index());
                (row, col, self.values[j])
            })
        })
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Drop every element and set a new extent, reserving room for
    /// `capacity` elements (`nrows * ncols` when zero).
    pub fn resize(&mut self, nrows: usize, ncols: usize, capacity: usize) -> Result<()> {
        let dim = P::Size::new(nrows, ncols)?;
        let capacity = if capacity == 0 { dim.size() } else { capacity };
        let values = reserve(capacity)?;
        let keys = reserve(capacity)?;
        let offsets = empty_offsets(P::Orientation::major_lines(nrows, ncols))?;
        debug!(nrows, ncols, capacity, "reset sparse matrix");
        self.dim = dim;
        self.values = values;
        self.keys = keys;
        self.offsets = offsets;
        Ok(())
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Element-wise comparison with any sparse matrix of the same shape.
    ///
    /// Same orientation compares the three arrays, otherwise every
    /// position is compared.
    pub fn equal_by<U, Q, F>(&self, other: &SparseMatrix<U, Q>, mut eq: F) -> bool
    where
        U: Scalar,
        Q: ParameterSet,
        F: FnMut(&T, &U) -> bool,
    {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return false;
        }
        if P::Orientation::ORDER == Q::Orientation::ORDER {
            return self.values.len() == other.values.len()
                && self.keys.iter().map(|k| k.index()).eq(other.keys.iter().map(|k| k.index()))
                && self
                    .offsets
                    .iter()
                    .map(|k| k.index())
                    .eq(other.offsets.iter().map(|k| k.index()))
                && self.values.iter().zip(&other.values).all(|(a, b)| eq(a, b));
        }
        (0..self.nrows()).all(|r| {
            (0..self.ncols()).all(|c| eq(&self.value_at(r, c), &other.value_at(r, c)))
        })
    }

    /// Equality within numerical accuracy, after converting `other`'s
    /// elements to `T`.
    pub fn approx_eq<U, Q>(&self, other: &SparseMatrix<U, Q>) -> bool
    where
        U: Scalar,
        Q: ParameterSet,
    {
        self.equal_by(other, |a, b| {
            cast::<T, U>(*b).is_ok_and(|b| a.within_tolerance(&b))
        })
    }
}

// ── Standard traits ─────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> Default for SparseMatrix<T, P> {
    /// No significant elements.
    ///
    /// Panics if the allocator cannot provide the offsets of a fixed
    /// extent; use [`SparseMatrix::zeros`] to observe that failure instead.
    fn default() -> Self {
        let dim = P::Size::default();
        Self {
            dim,
            values: Vec::new(),
            keys: Vec::new(),
            offsets: vec![
                P::Index::default();
                P::Orientation::major_lines(dim.nrows(), dim.ncols()) + 1
            ],
        }
    }
}

impl<T: Scalar, P: ParameterSet> Clone for SparseMatrix<T, P> {
    fn clone(&self) -> Self {
        Self {
            dim: self.dim,
            values: self.values.clone(),
            keys: self.keys.clone(),
            offsets: self.offsets.clone(),
        }
    }
}

impl<T: Scalar, P: ParameterSet> PartialEq for SparseMatrix<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim
            && self.values == other.values
            && self.keys == other.keys
            && self.offsets == other.offsets
    }
}

impl<T: Scalar, P: ParameterSet> fmt::Debug for SparseMatrix<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMatrix")
            .field("nrows", &self.nrows())
            .field("ncols", &self.ncols())
            .field("order", &self.order())
            .field("values", &self.values)
            .field("keys", &self.keys)
            .field("offsets", &self.offsets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::RowMajorParameter;

    type Csr<T> = SparseMatrix<T, RowMajorParameter>;

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::from_rows(&[[1.0, 0.0, 2.0], [0.0, 0.0, 3.0], [4.0, 5.0, 0.0]]).unwrap()
    }

    #[test]
    fn empty_structure() {
        let s = SparseMatrix::<f64>::zeros(3, 4).unwrap();
        assert_eq!(s.nnz(), 0);
        assert_eq!(s.offsets(), &[0; 5]);
        assert_eq!(SparseMatrix::<f32>::new().offsets(), &[0]);
    }

    #[test]
    fn offsets_allocation_failure_is_reported() {
        assert_eq!(
            SparseMatrix::<f64>::zeros(1, usize::MAX / 4),
            Err(StorageError::AllocationFailed {
                len: usize::MAX / 4 + 1
            })
        );
        assert_eq!(
            SparseMatrix::<f64>::zeros(1, usize::MAX),
            Err(StorageError::AllocationFailed { len: usize::MAX })
        );
        assert_eq!(
            Csr::<f64>::zeros(usize::MAX, 0),
            Err(StorageError::AllocationFailed { len: usize::MAX })
        );

        let mut s = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        assert!(s.resize(1, usize::MAX, 1).is_err());
        assert_eq!((s.nrows(), s.ncols(), s.nnz()), (3, 3, 5));
    }

    #[test]
    fn overflowing_extent() {
        assert_eq!(
            SparseMatrix::<f64>::zeros(usize::MAX / 2, 3),
            Err(StorageError::ExtentOverflow {
                nrows: usize::MAX / 2,
                ncols: 3
            })
        );
    }

    #[test]
    fn column_major_compression() {
        let s = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        assert_eq!(s.values(), &[1.0, 4.0, 5.0, 2.0, 3.0]);
        assert_eq!(s.keys(), &[0, 2, 2, 0, 1]);
        assert_eq!(s.offsets(), &[0, 2, 3, 5]);
    }

    #[test]
    fn row_major_compression() {
        let s = Csr::<f64>::from_dense(&sample(), non_zero).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.keys(), &[0, 2, 2, 0, 1]);
        assert_eq!(s.offsets(), &[0, 2, 3, 5]);
        assert_eq!(s.line(2), Some((&[0, 1][..], &[4.0, 5.0][..])));
        assert_eq!(s.line(3), None);
    }

    #[test]
    fn keep_all_stores_everything() {
        let s = SparseMatrix::<f64>::from_dense(&sample(), keep_all).unwrap();
        assert_eq!(s.nnz(), 9);
        assert_eq!(s.values().len(), s.keys().len());
    }

    #[test]
    fn element_lookup() {
        let s = Csr::<f64>::from_dense(&sample(), non_zero).unwrap();
        assert_eq!(s.try_get(2, 1), Ok(5.0));
        assert_eq!(s.try_get(1, 1), Ok(0.0));
        assert!(matches!(
            s.try_get(3, 0),
            Err(StorageError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn triplets_in_storage_order() {
        let s = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        let t: Vec<_> = s.triplets().collect();
        assert_eq!(
            t,
            vec![(0, 0, 1.0), (2, 0, 4.0), (2, 1, 5.0), (0, 2, 2.0), (1, 2, 3.0)]
        );
    }

    #[test]
    fn from_parts_validation() {
        let ok = SparseMatrix::<f64>::from_parts(2, 2, vec![1.0, 2.0], vec![0, 1], vec![0, 1, 2]);
        assert!(ok.is_ok());
        let cases = [
            (vec![1.0], vec![0, 1], vec![0, 1, 2]),
            (vec![1.0, 2.0], vec![0, 1], vec![0, 2]),
            (vec![1.0, 2.0], vec![0, 1], vec![1, 1, 2]),
            (vec![1.0, 2.0], vec![0, 1], vec![0, 1, 3]),
            (vec![1.0, 2.0], vec![1, 0], vec![0, 2, 2]),
            (vec![1.0, 2.0], vec![0, 2], vec![0, 1, 2]),
        ];
        for (values, keys, offsets) in cases {
            assert!(matches!(
                SparseMatrix::<f64>::from_parts(2, 2, values, keys, offsets),
                Err(StorageError::MalformedSparse(_))
            ));
        }
    }

    #[test]
    fn narrow_index_overflow() {
        type Narrow = Parameter<u16>;
        let d = DenseMatrix::<f32>::from_element(1, 70_000, 1.0).unwrap();
        assert!(matches!(
            SparseMatrix::<f32, Narrow>::from_dense(&d, keep_all),
            Err(StorageError::IndexOverflow(_))
        ));
    }

    #[test]
    fn copy_requires_same_orientation() {
        let csc = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        let copy = SparseMatrix::<f32>::from_sparse(&csc).unwrap();
        assert!(copy.approx_eq(&csc));
        assert_eq!(
            Csr::<f64>::from_sparse(&csc).unwrap_err(),
            StorageError::OrientationMismatch
        );
    }

    #[test]
    fn comparison_across_orientation() {
        let csc = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        let csr = Csr::<f64>::from_dense(&sample(), non_zero).unwrap();
        assert!(csc.equal_by(&csr, |a, b| a == b));
        let mut other = csr.clone();
        other.resize(3, 3, 0).unwrap();
        assert!(!csc.equal_by(&other, |a, b| a == b));
    }

    #[test]
    fn resize_clears() {
        let mut s = SparseMatrix::<f64>::from_dense(&sample(), non_zero).unwrap();
        s.resize(2, 5, 4).unwrap();
        assert_eq!((s.nrows(), s.ncols(), s.nnz()), (2, 5, 0));
        assert_eq!(s.offsets().len(), 6);
        assert_eq!(s.try_get(1, 4), Ok(0.0));
    }
}
