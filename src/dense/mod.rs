mod convert;
mod view;

pub use view::{MatrixView, MatrixViewMut, SubMatrix};

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};

use tracing::debug;

use crate::error::{Result, StorageError};
use crate::parameter::{
    Dimension, LeadingPolicy, Order, Orientation, Parameter, ParameterSet, UnblockedDimension,
    UnblockedPolicy,
};
use crate::storage::{ExternalStorage, OwnedStorage, Storage};
use crate::traits::{cast, MatrixMut, MatrixRef, Scalar};

/// Dense matrix configured at compile time by a [`Parameter`] bundle.
///
/// The parameter selects orientation, fixed or variable extent, stack or
/// heap placement and, for sub-views, striped borrowed storage. All
/// index arithmetic is resolved statically.
///
/// # Examples
///
/// ```
/// use matlayout::DenseMatrix;
///
/// let m = DenseMatrix::<f64>::from_rows(&[[2.0, 3.0], [-4.0, 1.0], [7.0, -1.0]]).unwrap();
/// assert_eq!(m.size(), 6);
/// assert_eq!(m[(0, 0)], 2.0);
/// assert_eq!(m[(2, 1)], -1.0);
///
/// // column-major by default
/// assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![2.0, -4.0, 7.0, 3.0, 1.0, -1.0]);
/// ```
pub struct DenseMatrix<T: Scalar, P: ParameterSet = Parameter> {
    dim: P::Size,
    leading: P::Leading,
    unblocked: P::Unblocked,
    storage: P::Storage<T>,
}

// ── Accessors ───────────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> DenseMatrix<T, P> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.dim.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.dim.ncols()
    }

    /// Logical element count, `nrows * ncols`.
    #[inline]
    pub fn size(&self) -> usize {
        self.dim.size()
    }

    /// Number of elements held by the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// `false` for sub-views and matrices over external memory.
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.storage.is_owned()
    }

    /// Leading row extent: the parent's row count for a sub-view.
    #[inline]
    pub fn ld_rows(&self) -> usize {
        self.leading.ld_rows(self.nrows())
    }

    /// Leading column extent: the parent's column count for a sub-view.
    #[inline]
    pub fn ld_cols(&self) -> usize {
        self.leading.ld_cols(self.ncols())
    }

    #[inline]
    pub fn unblocked_rows(&self) -> usize {
        self.unblocked.unblocked_rows(self.nrows())
    }

    #[inline]
    pub fn unblocked_cols(&self) -> usize {
        self.unblocked.unblocked_cols(self.ncols())
    }

    #[inline]
    pub fn order(&self) -> Order {
        P::Orientation::ORDER
    }

    /// Distance between consecutive major lines in the buffer.
    #[inline]
    pub fn stride(&self) -> usize {
        P::Orientation::stride(self.ld_rows(), self.ld_cols())
    }

    #[inline]
    pub fn storage(&self) -> &P::Storage<T> {
        &self.storage
    }

    /// Elements in storage order.
    #[inline]
    pub fn iter(&self) -> <P::Storage<T> as Storage<T>>::Iter<'_> {
        self.storage.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> <P::Storage<T> as Storage<T>>::IterMut<'_> {
        self.storage.iter_mut()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    // ── Element access ──────────────────────────────────────────────

    #[inline]
    fn position(&self, row: usize, col: usize) -> usize {
        P::Orientation::position(row, col, self.ld_rows(), self.ld_cols())
    }

    #[inline]
    fn check(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.nrows() || col >= self.ncols() {
            return Err(StorageError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows(),
                ncols: self.ncols(),
            });
        }
        Ok(())
    }

    /// Bounds-checked element access.
    ///
    /// ```
    /// use matlayout::{DenseMatrix, StorageError};
    ///
    /// let m = DenseMatrix::<i32>::zeros(2, 2).unwrap();
    /// assert_eq!(m.try_get(1, 1), Ok(&0));
    /// assert!(matches!(m.try_get(2, 0), Err(StorageError::IndexOutOfBounds { .. })));
    /// ```
    pub fn try_get(&self, row: usize, col: usize) -> Result<&T> {
        self.check(row, col)?;
        Ok(&self.storage.span()[self.position(row, col)])
    }

    pub fn try_get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        self.check(row, col)?;
        let pos = self.position(row, col);
        Ok(&mut self.storage.span_mut()[pos])
    }

    /// Element access without bounds checks.
    ///
    /// # Safety
    ///
    /// `row < nrows()` and `col < ncols()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> &T {
        debug_assert!(row < self.nrows() && col < self.ncols());
        let pos = self.position(row, col);
        self.storage.span().get_unchecked(pos)
    }

    /// Mutable element access without bounds checks.
    ///
    /// # Safety
    ///
    /// `row < nrows()` and `col < ncols()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert!(row < self.nrows() && col < self.ncols());
        let pos = self.position(row, col);
        self.storage.span_mut().get_unchecked_mut(pos)
    }

    /// `(position, row, col)` of every element, in storage order.
    pub(crate) fn storage_coords(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let lines = P::Orientation::major_lines(self.nrows(), self.ncols());
        let len = P::Orientation::line_len(self.nrows(), self.ncols());
        let stride = self.stride();
        (0..lines).flat_map(move |line| {
            (0..len).map(move |k| {
                let (row, col) = P::Orientation::coords(line, k);
                (line * stride + k, row, col)
            })
        })
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Assign `value` to every element.
    pub fn fill(&mut self, value: T) {
        self.storage.fill(value);
    }

    /// Change the extent, reallocating owned storage.
    ///
    /// The storage is resized first; the extent only changes once that
    /// succeeded. Contents are zero after a reallocation. Fails with
    /// [`StorageError::ShapeMismatch`] on a fixed extent and
    /// [`StorageError::NotOwned`] on borrowed memory.
    pub fn resize(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        let dim = P::Size::new(nrows, ncols)?;
        self.storage.resize(dim.size())?;
        self.dim = dim;
        Ok(())
    }

    /// Resize, then set every element from `f(row, col)`.
    pub fn resize_with<F>(&mut self, nrows: usize, ncols: usize, mut f: F) -> Result<()>
    where
        F: FnMut(usize, usize) -> T,
    {
        self.resize(nrows, ncols)?;
        let coords = self.storage_coords();
        let span = self.storage.span_mut();
        for (pos, row, col) in coords {
            span[pos] = f(row, col);
        }
        Ok(())
    }

    /// Copy the elements of `src`, converting the element type.
    ///
    /// An owned variable-size destination takes the shape of `src`; a
    /// fixed or borrowed destination must already have it. On a failed
    /// element conversion the destination is left partially written.
    pub fn copy_from<U, M>(&mut self, src: &M) -> Result<()>
    where
        U: Scalar,
        M: MatrixRef<U> + ?Sized,
    {
        let shape = (src.nrows(), src.ncols());
        if shape != (self.nrows(), self.ncols()) {
            if P::IS_FIXED || !self.is_owned() {
                return Err(StorageError::ShapeMismatch {
                    expected: (self.nrows(), self.ncols()),
                    got: shape,
                });
            }
            self.resize(shape.0, shape.1)?;
        }
        let coords = self.storage_coords();
        let span = self.storage.span_mut();
        for (pos, row, col) in coords {
            span[pos] = cast(*src.get(row, col))?;
        }
        Ok(())
    }

    /// Move the matrix out, leaving an empty one behind.
    ///
    /// ```
    /// use matlayout::DenseMatrix;
    ///
    /// let mut a = DenseMatrix::<f32>::from_element(3, 2, 1.5).unwrap();
    /// let b = a.take();
    /// assert_eq!(a.len(), 0);
    /// assert_eq!(b.size(), 6);
    /// ```
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Compare element-wise with any dense matrix of the same shape.
    ///
    /// Matrices of the same orientation are walked in storage order,
    /// others position by position.
    pub fn equal_by<U, Q, F>(&self, other: &DenseMatrix<U, Q>, mut eq: F) -> bool
    where
        U: Scalar,
        Q: ParameterSet,
        F: FnMut(&T, &U) -> bool,
    {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return false;
        }
        if P::Orientation::ORDER == Q::Orientation::ORDER {
            return self.storage.equal_by(&other.storage, eq);
        }
        self.storage_coords()
            .all(|(pos, row, col)| eq(&self.storage.span()[pos], &other[(row, col)]))
    }

    /// Equality within numerical accuracy, after converting `other`'s
    /// elements to `T`.
    pub fn approx_eq<U, Q>(&self, other: &DenseMatrix<U, Q>) -> bool
    where
        U: Scalar,
        Q: ParameterSet,
    {
        self.equal_by(other, |a, b| {
            cast::<T, U>(*b).is_ok_and(|b| a.within_tolerance(&b))
        })
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> DenseMatrix<T, P>
where
    P::Storage<T>: OwnedStorage<T>,
{
    /// Empty matrix; `R x C` zeros for a fixed extent.
    pub fn new() -> Self {
        Self::default()
    }

    /// `nrows x ncols` zeros.
    ///
    /// ```
    /// use matlayout::{DenseMatrix, StackMatrix};
    ///
    /// let m = DenseMatrix::<f64>::zeros(3, 4).unwrap();
    /// assert_eq!(m.size(), 12);
    /// assert!(m.iter().all(|&x| x == 0.0));
    ///
    /// assert!(StackMatrix::<f64, 2, 2>::zeros(3, 3).is_err());
    /// ```
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self> {
        let dim = P::Size::new(nrows, ncols)?;
        Ok(Self {
            dim,
            leading: P::Leading::default(),
            unblocked: P::Unblocked::default(),
            storage: OwnedStorage::zeroed(dim.size())?,
        })
    }

    pub fn from_element(nrows: usize, ncols: usize, value: T) -> Result<Self> {
        let mut m = Self::zeros(nrows, ncols)?;
        m.fill(value);
        Ok(m)
    }

    /// Build from `f(row, col)`.
    ///
    /// ```
    /// use matlayout::DenseMatrix;
    ///
    /// let m = DenseMatrix::<i64>::from_fn(2, 3, |r, c| (10 * r + c) as i64).unwrap();
    /// assert_eq!(m[(1, 2)], 12);
    /// ```
    pub fn from_fn<F>(nrows: usize, ncols: usize, f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut m = Self::zeros(nrows, ncols)?;
        m.resize_with(nrows, ncols, f)?;
        Ok(m)
    }

    /// Take `values` as the buffer, in storage order.
    pub fn from_vec(nrows: usize, ncols: usize, values: Vec<T>) -> Result<Self> {
        let dim = P::Size::new(nrows, ncols)?;
        if values.len() != dim.size() {
            return Err(StorageError::SizeMismatch {
                expected: dim.size(),
                got: values.len(),
            });
        }
        Ok(Self {
            dim,
            leading: P::Leading::default(),
            unblocked: P::Unblocked::default(),
            storage: OwnedStorage::from_vec(values)?,
        })
    }

    /// Build from nested rows.
    ///
    /// The row count is the outer length and the column count the length
    /// of the first row; every other row must match it.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        for (row, r) in rows.iter().enumerate() {
            let got = r.as_ref().len();
            if got != ncols {
                return Err(StorageError::RaggedRows {
                    row,
                    expected: ncols,
                    got,
                });
            }
        }
        Self::from_fn(rows.len(), ncols, |r, c| rows[r].as_ref()[c])
    }
}

impl<T: Scalar, P: ParameterSet> DenseMatrix<T, P>
where
    P::Storage<T>: ExternalStorage<T>,
{
    /// Wrap `nrows * ncols` elements of external memory, laid out in
    /// this configuration's storage order.
    ///
    /// The matrix never frees nor reallocates the memory; resizing it to
    /// another size fails with [`StorageError::NotOwned`].
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `nrows * ncols`
    /// elements while the matrix is alive, and nothing else may access
    /// that memory in the meantime.
    pub unsafe fn from_raw_parts(nrows: usize, ncols: usize, ptr: *mut T) -> Result<Self> {
        let dim = P::Size::new(nrows, ncols)?;
        Ok(Self {
            dim,
            leading: P::Leading::default(),
            unblocked: P::Unblocked::default(),
            storage: ExternalStorage::from_raw_parts(ptr, dim.size()),
        })
    }
}

impl<T: Scalar, P> DenseMatrix<T, P>
where
    P: ParameterSet<Unblocked = UnblockedDimension>,
    P::Storage<T>: OwnedStorage<T>,
{
    /// Zeroed blocked matrix of `nrows x ncols` blocks that expands to
    /// `ub_rows x ub_cols`.
    pub fn blocked(nrows: usize, ncols: usize, ub_rows: usize, ub_cols: usize) -> Result<Self> {
        let mut m = Self::zeros(nrows, ncols)?;
        m.unblocked = UnblockedDimension::new(ub_rows, ub_cols);
        Ok(m)
    }

    pub fn resize_blocked(
        &mut self,
        nrows: usize,
        ncols: usize,
        ub_rows: usize,
        ub_cols: usize,
    ) -> Result<()> {
        self.resize(nrows, ncols)?;
        self.unblocked = UnblockedDimension::new(ub_rows, ub_cols);
        Ok(())
    }
}

// ── Standard traits ─────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> Default for DenseMatrix<T, P> {
    fn default() -> Self {
        Self {
            dim: P::Size::default(),
            leading: P::Leading::default(),
            unblocked: P::Unblocked::default(),
            storage: Default::default(),
        }
    }
}

impl<T: Scalar, P: ParameterSet> Clone for DenseMatrix<T, P>
where
    P::Storage<T>: Clone,
{
    fn clone(&self) -> Self {
        if self.is_owned() {
            debug!(len = self.len(), "duplicating dense storage");
        }
        Self {
            dim: self.dim,
            leading: self.leading,
            unblocked: self.unblocked,
            storage: self.storage.clone(),
        }
    }
}

impl<T: Scalar, P: ParameterSet> PartialEq for DenseMatrix<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.equal_by(other, |a, b| a == b)
    }
}

impl<T: Scalar, P: ParameterSet> fmt::Debug for DenseMatrix<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseMatrix")
            .field("nrows", &self.nrows())
            .field("ncols", &self.ncols())
            .field("order", &self.order())
            .field("owned", &self.is_owned())
            .field("data", &DataList(self))
            .finish()
    }
}

struct DataList<'a, T: Scalar, P: ParameterSet>(&'a DenseMatrix<T, P>);

impl<T: Scalar, P: ParameterSet> fmt::Debug for DataList<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T: Scalar, P: ParameterSet> Index<(usize, usize)> for DenseMatrix<T, P> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.try_get(row, col) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar, P: ParameterSet> IndexMut<(usize, usize)> for DenseMatrix<T, P> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.try_get_mut(row, col) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar, P: ParameterSet> MatrixRef<T> for DenseMatrix<T, P> {
    #[inline]
    fn nrows(&self) -> usize {
        self.dim.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.dim.ncols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self[(row, col)]
    }
}

impl<T: Scalar, P: ParameterSet> MatrixMut<T> for DenseMatrix<T, P> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self[(row, col)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{BlockedMatrix, FixedMatrix, RowMajorMatrix, StackMatrix};
    use alloc::vec;

    #[test]
    fn fresh_matrix_is_fully_addressable() {
        let m = DenseMatrix::<f64>::zeros(4, 3).unwrap();
        assert_eq!(m.size(), 12);
        assert_eq!(m.len(), 12);
        for r in 0..4 {
            for c in 0..3 {
                assert_eq!(m.try_get(r, c), Ok(&0.0));
            }
        }
    }

    #[test]
    fn from_rows_scenario() {
        let m = DenseMatrix::<f64>::from_rows(&[[2.0, 3.0], [-4.0, 1.0], [7.0, -1.0]]).unwrap();
        assert_eq!(m.size(), 6);
        assert_eq!(m[(0, 0)], 2.0);
        assert_eq!(m[(2, 1)], -1.0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows: [&[i32]; 3] = [&[1, 2], &[3, 4], &[5]];
        assert_eq!(
            DenseMatrix::<i32>::from_rows(&rows),
            Err(StorageError::RaggedRows {
                row: 2,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn storage_order_follows_orientation() {
        let rows = [[1, 2, 3], [4, 5, 6]];
        let cm = DenseMatrix::<i32>::from_rows(&rows).unwrap();
        let rm = RowMajorMatrix::<i32>::from_rows(&rows).unwrap();
        assert_eq!(cm.iter().copied().collect::<Vec<_>>(), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(rm.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(cm.order(), Order::ColumnMajor);
        assert_eq!(rm.order(), Order::RowMajor);
        assert!(cm.equal_by(&rm, |a, b| a == b));
    }

    #[test]
    fn from_vec_length_checked() {
        assert_eq!(
            DenseMatrix::<f32>::from_vec(2, 2, vec![1.0; 3]),
            Err(StorageError::SizeMismatch { expected: 4, got: 3 })
        );
        let m = RowMajorMatrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn index_mut_and_fill() {
        let mut m = DenseMatrix::<i32>::zeros(2, 2).unwrap();
        m[(0, 1)] = 5;
        *m.try_get_mut(1, 0).unwrap() = 7;
        assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![0, 7, 5, 0]);
        m.fill(1);
        assert!(m.iter().all(|&x| x == 1));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_panics_out_of_range() {
        let m = DenseMatrix::<f64>::zeros(2, 2).unwrap();
        let _ = m[(0, 2)];
    }

    #[test]
    fn unchecked_access() {
        let m = DenseMatrix::<i32>::from_fn(3, 3, |r, c| (r * 3 + c) as i32).unwrap();
        assert_eq!(unsafe { *m.get_unchecked(2, 1) }, 7);
    }

    #[test]
    fn resize_reallocates_owned() {
        let mut m = DenseMatrix::<f64>::from_element(2, 2, 3.0).unwrap();
        m.resize(3, 5).unwrap();
        assert_eq!((m.nrows(), m.ncols(), m.len()), (3, 5, 15));
    }

    #[test]
    fn overflowing_extent_is_an_error() {
        let overflow = StorageError::ExtentOverflow {
            nrows: usize::MAX / 2,
            ncols: 3,
        };
        assert_eq!(DenseMatrix::<f64>::zeros(usize::MAX / 2, 3), Err(overflow));
        assert_eq!(
            RowMajorMatrix::<f32>::from_vec(usize::MAX / 2, 3, vec![]),
            Err(overflow)
        );

        let mut m = DenseMatrix::<f64>::from_element(2, 2, 1.0).unwrap();
        assert_eq!(m.resize(usize::MAX / 2, 3), Err(overflow));
        assert_eq!((m.nrows(), m.ncols(), m.len()), (2, 2, 4));
        assert!(matches!(m.try_get(2, 0), Err(StorageError::IndexOutOfBounds { .. })));

        let mut backing = [0.0_f64; 4];
        let external =
            unsafe { DenseMatrix::<f64>::from_raw_parts(usize::MAX / 2, 3, backing.as_mut_ptr()) };
        assert_eq!(external.unwrap_err(), overflow);
    }

    #[test]
    fn resize_fixed_rejects_other_shape() {
        let mut m = StackMatrix::<f64, 2, 2>::new();
        assert!(m.resize(2, 2).is_ok());
        assert_eq!(
            m.resize(3, 3),
            Err(StorageError::ShapeMismatch {
                expected: (2, 2),
                got: (3, 3)
            })
        );
        assert_eq!(m.size(), 4);
    }

    #[test]
    fn resize_with_fills() {
        let mut m = DenseMatrix::<i32>::new();
        m.resize_with(2, 3, |r, c| (r + c) as i32).unwrap();
        assert_eq!(m[(1, 2)], 3);
    }

    #[test]
    fn external_memory_refuses_resize() {
        let mut backing = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut m = unsafe { DenseMatrix::<f64>::from_raw_parts(2, 3, backing.as_mut_ptr()) }.unwrap();
        assert!(!m.is_owned());
        assert_eq!(m.resize(3, 3), Err(StorageError::NotOwned));
        assert_eq!((m.nrows(), m.ncols()), (2, 3));
        assert_eq!(m[(1, 2)], 6.0);
        m[(0, 0)] = -1.0;
        drop(m);
        assert_eq!(backing[0], -1.0);
    }

    #[test]
    fn copy_from_converts_and_reshapes() {
        let src = RowMajorMatrix::<i32>::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let mut dst = DenseMatrix::<f64>::new();
        dst.copy_from(&src).unwrap();
        assert_eq!((dst.nrows(), dst.ncols()), (2, 3));
        assert_eq!(dst[(1, 0)], 4.0);
    }

    #[test]
    fn copy_into_fixed_checks_shape() {
        let src = DenseMatrix::<f64>::zeros(3, 3).unwrap();
        let mut dst = FixedMatrix::<f64, 2, 2>::new();
        assert_eq!(
            dst.copy_from(&src),
            Err(StorageError::ShapeMismatch {
                expected: (2, 2),
                got: (3, 3)
            })
        );
    }

    #[test]
    fn take_leaves_empty_source() {
        let mut a = DenseMatrix::<f64>::from_element(2, 2, 1.0).unwrap();
        let ptr = a.as_ptr();
        let b = a.take();
        assert_eq!(a.len(), 0);
        assert_eq!(a.size(), 0);
        drop(a);
        assert_eq!(b.as_ptr(), ptr);
        assert!(b.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn clone_is_deep() {
        let a = DenseMatrix::<i32>::from_element(2, 2, 4).unwrap();
        let mut b = a.clone();
        b[(0, 0)] = 0;
        assert_eq!(a[(0, 0)], 4);
        assert_ne!(a, b);
    }

    #[test]
    fn approx_eq_across_types() {
        let a = DenseMatrix::<f64>::from_element(2, 2, 0.1).unwrap();
        let b = RowMajorMatrix::<f32>::from_element(2, 2, 0.1).unwrap();
        assert!(b.approx_eq(&a));
        assert!(!a.approx_eq(&DenseMatrix::<f64>::zeros(2, 2).unwrap()));
        assert!(!a.approx_eq(&DenseMatrix::<f64>::zeros(2, 3).unwrap()));
    }

    #[test]
    fn blocked_shape() {
        let mut m = BlockedMatrix::<f64>::blocked(2, 2, 6, 6).unwrap();
        assert_eq!((m.unblocked_rows(), m.unblocked_cols()), (6, 6));
        m.resize_blocked(3, 3, 9, 9).unwrap();
        assert_eq!(m.size(), 9);
        assert_eq!(m.unblocked_rows(), 9);
        let plain = DenseMatrix::<f64>::zeros(2, 3).unwrap();
        assert_eq!(plain.unblocked_cols(), 3);
    }

    #[test]
    fn stack_matrix_layout() {
        let m = StackMatrix::<i32, 2, 3>::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(m.iter().copied().collect::<Vec<_>>(), vec![1, 4, 2, 5, 3, 6]);
        assert!(m.is_owned());
        let copy = m.clone();
        assert_eq!(copy, m);
    }

    #[test]
    fn matrix_ref_trait() {
        fn trace<T: Scalar + core::ops::Add<Output = T>>(m: &impl MatrixRef<T>) -> T {
            let mut sum = T::zero();
            for i in 0..m.nrows().min(m.ncols()) {
                sum = sum + *m.get(i, i);
            }
            sum
        }
        let m = DenseMatrix::<f64>::from_fn(3, 3, |r, c| (r * 3 + c) as f64).unwrap();
        assert_eq!(trace(&m), 12.0);
    }

    #[test]
    fn fixed_storage_crosses_threads() {
        fn thread_safe<M: Send + Sync>(_: &M) {}
        let s = StackMatrix::<f64, 2, 2>::from_element(2, 2, 1.0).unwrap();
        let f = FixedMatrix::<f32, 3, 1>::zeros(3, 1).unwrap();
        thread_safe(&s);
        thread_safe(&f);
        thread_safe(&crate::zero::ZeroMatrix::<f64>::new(2, 2).unwrap());
    }

    #[test]
    fn debug_lists_data() {
        let m = DenseMatrix::<i32>::from_element(1, 2, 3).unwrap();
        let s = alloc::format!("{m:?}");
        assert!(s.contains("nrows: 1"));
        assert!(s.contains("data: [3, 3]"));
    }
}
