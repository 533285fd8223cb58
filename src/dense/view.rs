use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, Index, IndexMut};

use super::DenseMatrix;
use crate::error::{Result, StorageError};
use crate::parameter::{
    Dimension, LeadingDimension, NoUnblockedDimension, NormKind, OnHeap, Orientation, Parameter,
    ParameterSet, SubParameter, VariableSize,
};
use crate::storage::{Storage, StripedLines, StripedStorage};
use crate::traits::{IndexType, MatrixMut, MatrixRef, Scalar};

/// Dense matrix over a window of another matrix's buffer.
pub type SubMatrix<T, P> = DenseMatrix<T, SubParameter<P>>;

/// Read-only window into a dense matrix.
///
/// Dereferences to a [`SubMatrix`] sharing the parent's buffer; nothing is
/// copied. The borrow keeps the parent alive and unmodified.
pub struct MatrixView<'a, T: Scalar, P: ParameterSet> {
    inner: SubMatrix<T, P>,
    _parent: PhantomData<&'a DenseMatrix<T, P>>,
}

/// Mutable window into a dense matrix.
///
/// Writes land in the parent's buffer. Only element-level mutation is
/// exposed, so the borrowed storage cannot be swapped out of the view.
pub struct MatrixViewMut<'a, T: Scalar, P: ParameterSet> {
    inner: SubMatrix<T, P>,
    _parent: PhantomData<&'a mut DenseMatrix<T, P>>,
}

/// Placement of a window inside its parent's span.
#[derive(Clone, Copy)]
struct Window {
    offset: usize,
    continuous: usize,
    nb_blocks: usize,
    separator: usize,
    nrows: usize,
    ncols: usize,
    ld_rows: usize,
    ld_cols: usize,
}

impl Window {
    /// # Safety
    ///
    /// `base` must be the start of the parent's span and stay valid for
    /// the lifetime of the returned matrix.
    unsafe fn build<T: Scalar, P: ParameterSet>(self, base: *mut T) -> SubMatrix<T, P> {
        DenseMatrix {
            dim: VariableSize::new(self.nrows, self.ncols).unwrap_or_default(),
            leading: LeadingDimension::new(self.ld_rows, self.ld_cols),
            unblocked: NoUnblockedDimension,
            storage: StripedStorage::from_raw_parts(
                base.add(self.offset),
                self.continuous,
                self.nb_blocks,
                self.separator,
            ),
        }
    }
}

impl<T: Scalar, P: ParameterSet> DenseMatrix<T, P> {
    fn window(
        &self,
        nrows: usize,
        ncols: usize,
        begin_row: usize,
        begin_col: usize,
    ) -> Result<Window> {
        let err = StorageError::ViewOutOfBounds {
            begin: (begin_row, begin_col),
            shape: (nrows, ncols),
            parent: (self.nrows(), self.ncols()),
        };
        let end_row = begin_row.checked_add(nrows).ok_or(err)?;
        let end_col = begin_col.checked_add(ncols).ok_or(err)?;
        if end_row > self.nrows() || end_col > self.ncols() {
            return Err(err);
        }

        let continuous = P::Orientation::line_len(nrows, ncols);
        let nb_blocks = P::Orientation::major_lines(nrows, ncols);
        let stride = self.stride();
        if nrows == 0 || ncols == 0 {
            return Ok(Window {
                offset: 0,
                continuous,
                nb_blocks,
                separator: stride.saturating_sub(continuous),
                nrows,
                ncols,
                ld_rows: self.ld_rows(),
                ld_cols: self.ld_cols(),
            });
        }

        let offset = self.position(begin_row, begin_col);
        let span_end = (nb_blocks - 1) * stride + continuous;
        if stride < continuous || offset + span_end > self.storage.span().len() {
            return Err(err);
        }
        Ok(Window {
            offset,
            continuous,
            nb_blocks,
            separator: stride - continuous,
            nrows,
            ncols,
            ld_rows: self.ld_rows(),
            ld_cols: self.ld_cols(),
        })
    }

    /// Read-only `nrows x ncols` window whose top-left element is
    /// `(begin_row, begin_col)` of `self`.
    ///
    /// ```
    /// use matlayout::DenseMatrix;
    ///
    /// let m = DenseMatrix::<i32>::from_fn(4, 4, |r, c| (10 * r + c) as i32).unwrap();
    /// let v = m.sub_matrix(2, 2, 1, 2).unwrap();
    /// assert_eq!(v[(0, 0)], 12);
    /// assert_eq!(v[(1, 1)], 23);
    /// assert!(m.sub_matrix(2, 2, 3, 0).is_err());
    /// ```
    pub fn sub_matrix(
        &self,
        nrows: usize,
        ncols: usize,
        begin_row: usize,
        begin_col: usize,
    ) -> Result<MatrixView<'_, T, P>> {
        let window = self.window(nrows, ncols, begin_row, begin_col)?;
        // SAFETY: the window lies inside the span, and the view only hands
        // out shared access while `self` is borrowed.
        let inner = unsafe { window.build::<T, P>(self.storage.as_ptr().cast_mut()) };
        Ok(MatrixView {
            inner,
            _parent: PhantomData,
        })
    }

    /// Mutable window; writes are visible in `self` once the view is gone.
    ///
    /// ```
    /// use matlayout::DenseMatrix;
    ///
    /// let mut m = DenseMatrix::<f64>::zeros(3, 3).unwrap();
    /// m.sub_matrix_mut(2, 2, 1, 1).unwrap().fill(1.0);
    /// assert_eq!(m[(0, 0)], 0.0);
    /// assert_eq!(m[(2, 2)], 1.0);
    /// ```
    pub fn sub_matrix_mut(
        &mut self,
        nrows: usize,
        ncols: usize,
        begin_row: usize,
        begin_col: usize,
    ) -> Result<MatrixViewMut<'_, T, P>> {
        let window = self.window(nrows, ncols, begin_row, begin_col)?;
        // SAFETY: the window lies inside the span, and `self` stays mutably
        // borrowed for the lifetime of the view.
        let inner = unsafe { window.build::<T, P>(self.storage.as_mut_ptr()) };
        Ok(MatrixViewMut {
            inner,
            _parent: PhantomData,
        })
    }
}

impl<T, I, O, N> DenseMatrix<T, Parameter<I, O, VariableSize, LeadingDimension, NoUnblockedDimension, N, OnHeap>>
where
    T: Scalar,
    I: IndexType,
    O: Orientation,
    N: NormKind,
{
    /// Contiguous runs of the window, one per major line.
    pub fn lines(&self) -> StripedLines<'_, T> {
        self.storage.runs()
    }
}

// ── MatrixView ──────────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> Deref for MatrixView<'_, T, P> {
    type Target = SubMatrix<T, P>;

    #[inline]
    fn deref(&self) -> &SubMatrix<T, P> {
        &self.inner
    }
}

impl<T: Scalar, P: ParameterSet> fmt::Debug for MatrixView<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: Scalar, P: ParameterSet> MatrixRef<T> for MatrixView<'_, T, P> {
    #[inline]
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.inner[(row, col)]
    }
}

// ── MatrixViewMut ───────────────────────────────────────────────────

impl<T: Scalar, P: ParameterSet> Deref for MatrixViewMut<'_, T, P> {
    type Target = SubMatrix<T, P>;

    #[inline]
    fn deref(&self) -> &SubMatrix<T, P> {
        &self.inner
    }
}

impl<T: Scalar, P: ParameterSet> MatrixViewMut<'_, T, P> {
    pub fn try_get_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        self.inner.try_get_mut(row, col)
    }

    pub fn iter_mut(&mut self) -> <StripedStorage<T> as Storage<T>>::IterMut<'_> {
        self.inner.storage.iter_mut()
    }

    pub fn fill(&mut self, value: T) {
        self.inner.fill(value);
    }

    /// Copy `src` into the window. The shapes must match.
    pub fn copy_from<U, M>(&mut self, src: &M) -> Result<()>
    where
        U: Scalar,
        M: MatrixRef<U> + ?Sized,
    {
        self.inner.copy_from(src)
    }

    /// Nested mutable window, relative to this one.
    pub fn sub_matrix_mut(
        &mut self,
        nrows: usize,
        ncols: usize,
        begin_row: usize,
        begin_col: usize,
    ) -> Result<MatrixViewMut<'_, T, SubParameter<P>>> {
        self.inner.sub_matrix_mut(nrows, ncols, begin_row, begin_col)
    }
}

impl<T: Scalar, P: ParameterSet> IndexMut<(usize, usize)> for MatrixViewMut<'_, T, P> {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut T {
        &mut self.inner[index]
    }
}

impl<T: Scalar, P: ParameterSet> Index<(usize, usize)> for MatrixViewMut<'_, T, P> {
    type Output = T;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &T {
        &self.inner[index]
    }
}

impl<T: Scalar, P: ParameterSet> fmt::Debug for MatrixViewMut<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: Scalar, P: ParameterSet> MatrixRef<T> for MatrixViewMut<'_, T, P> {
    #[inline]
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.inner[(row, col)]
    }
}

impl<T: Scalar, P: ParameterSet> MatrixMut<T> for MatrixViewMut<'_, T, P> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.inner[(row, col)]
    }
}
