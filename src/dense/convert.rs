//! Conversion constructors. Each builds a fresh owning matrix.

use tracing::trace;

use super::DenseMatrix;
use crate::error::Result;
use crate::parameter::{Orientation, ParameterSet};
use crate::registry::DynamicMatrix;
use crate::sparse::{keep_all, SparseMatrix};
use crate::storage::{OwnedStorage, Storage};
use crate::traits::{cast, Scalar};
use crate::zero::ZeroMatrix;

impl<T: Scalar, P: ParameterSet> DenseMatrix<T, P>
where
    P::Storage<T>: OwnedStorage<T>,
{
    /// Copy of any dense matrix, including sub-views, converting the
    /// element type and orientation as needed.
    ///
    /// ```
    /// use matlayout::{DenseMatrix, RowMajorMatrix};
    ///
    /// let a = RowMajorMatrix::<i32>::from_rows(&[[1, 2], [3, 4]]).unwrap();
    /// let b = DenseMatrix::<f64>::from_dense(&a).unwrap();
    /// assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![1.0, 3.0, 2.0, 4.0]);
    /// ```
    pub fn from_dense<U, Q>(src: &DenseMatrix<U, Q>) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
    {
        Self::from_dense_filtered(src, keep_all)
    }

    /// Copy of a dense matrix in which every element rejected by `keep`
    /// becomes zero.
    ///
    /// ```
    /// use matlayout::{DenseMatrix, RowMajorMatrix};
    ///
    /// let a = DenseMatrix::<f64>::from_rows(&[[0.5, -3.0], [2.0, 1e-9]]).unwrap();
    /// let b = RowMajorMatrix::<f64>::from_dense_filtered(&a, |v| v.abs() > 1e-6).unwrap();
    /// assert_eq!(b.iter().copied().collect::<Vec<_>>(), vec![0.5, -3.0, 2.0, 0.0]);
    /// ```
    pub fn from_dense_filtered<U, Q, F>(src: &DenseMatrix<U, Q>, keep: F) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
        F: Fn(&U) -> bool,
    {
        trace!(nrows = src.nrows(), ncols = src.ncols(), "dense from dense");
        let convert = |v: &U| if keep(v) { cast(*v) } else { Ok(T::zero()) };
        let mut out = Self::zeros(src.nrows(), src.ncols())?;
        if P::Orientation::ORDER == Q::Orientation::ORDER {
            for (dst, v) in out.storage.iter_mut().zip(src.iter()) {
                *dst = convert(v)?;
            }
            return Ok(out);
        }
        let (ld_rows, ld_cols) = (out.ld_rows(), out.ld_cols());
        let span = out.storage.span_mut();
        for ((_, row, col), v) in src.storage_coords().zip(src.iter()) {
            span[P::Orientation::position(row, col, ld_rows, ld_cols)] = convert(v)?;
        }
        Ok(out)
    }

    /// Dense expansion of a sparse matrix.
    pub fn from_sparse<U, Q>(src: &SparseMatrix<U, Q>) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
    {
        trace!(nrows = src.nrows(), ncols = src.ncols(), nnz = src.nnz(), "dense from sparse");
        let mut out = Self::zeros(src.nrows(), src.ncols())?;
        for (row, col, v) in src.triplets() {
            *out.try_get_mut(row, col)? = cast(v)?;
        }
        Ok(out)
    }

    pub fn from_zero<U, Q>(src: &ZeroMatrix<U, Q>) -> Result<Self>
    where
        U: Scalar,
        Q: ParameterSet,
    {
        Self::zeros(src.nrows(), src.ncols())
    }

    /// Dense copy of whatever a [`DynamicMatrix`] holds.
    pub fn from_dynamic(src: &DynamicMatrix) -> Result<Self> {
        match src {
            DynamicMatrix::ZeroF32(m) => Self::from_zero(m),
            DynamicMatrix::SparseF32(m) => Self::from_sparse(m),
            DynamicMatrix::DenseF32(m) => Self::from_dense(m),
            DynamicMatrix::DenseRowMajorF32(m) => Self::from_dense(m),
            DynamicMatrix::ZeroF64(m) => Self::from_zero(m),
            DynamicMatrix::SparseF64(m) => Self::from_sparse(m),
            DynamicMatrix::DenseF64(m) => Self::from_dense(m),
            DynamicMatrix::DenseRowMajorF64(m) => Self::from_dense(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::{RowMajorMatrix, StackMatrix};
    use crate::error::StorageError;
    use crate::sparse::non_zero;
    use alloc::vec;
    use alloc::vec::Vec;

    fn sample() -> DenseMatrix<f64> {
        DenseMatrix::from_fn(3, 4, |r, c| (r * 4 + c) as f64 - 5.0).unwrap()
    }

    #[test]
    fn orientation_round_trip() {
        let a = RowMajorMatrix::<f64>::from_dense(&sample()).unwrap();
        let b = DenseMatrix::<f64>::from_dense(&a).unwrap();
        let c = RowMajorMatrix::<f64>::from_dense(&b).unwrap();
        assert_eq!(a, c);
        assert_eq!(b, sample());
        assert_eq!(a.iter().copied().collect::<Vec<_>>()[..4], [-5.0, -4.0, -3.0, -2.0]);
    }

    #[test]
    fn from_sub_view() {
        let m = sample();
        let v = m.sub_matrix(2, 2, 1, 1).unwrap();
        let owned = RowMajorMatrix::<f32>::from_dense(&*v).unwrap();
        assert!(owned.is_owned());
        assert_eq!(owned.iter().copied().collect::<Vec<_>>(), vec![0.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn into_fixed_checks_shape() {
        let m = sample();
        assert!(matches!(
            StackMatrix::<f64, 2, 2>::from_dense(&m),
            Err(StorageError::ShapeMismatch { .. })
        ));
        let v = m.sub_matrix(2, 2, 0, 0).unwrap();
        let s = StackMatrix::<f64, 2, 2>::from_dense(&*v).unwrap();
        assert_eq!(s[(1, 1)], m[(1, 1)]);
    }

    #[test]
    fn element_cast_failure() {
        let m = sample();
        assert_eq!(
            DenseMatrix::<u32>::from_dense(&m).unwrap_err(),
            StorageError::NumericCast
        );
    }

    #[test]
    fn filtered_copy_zeroes_rejected() {
        let m = sample();
        let kept = DenseMatrix::<f64>::from_dense_filtered(&m, |v| *v > 0.0).unwrap();
        let crossed = RowMajorMatrix::<f32>::from_dense_filtered(&m, |v| *v > 0.0).unwrap();
        for r in 0..3 {
            for c in 0..4 {
                let expected = m[(r, c)].max(0.0);
                assert_eq!(kept[(r, c)], expected);
                assert_eq!(crossed[(r, c)], expected as f32);
            }
        }
        // rejected elements are never cast
        let small = DenseMatrix::<f64>::from_rows(&[[1.0, -1.0]]).unwrap();
        let u = DenseMatrix::<u32>::from_dense_filtered(&small, |v| *v >= 0.0).unwrap();
        assert_eq!(u.iter().copied().collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn sparse_round_trip() {
        let d = sample();
        let csr = crate::aliases::CsrMatrix::<f64>::from_dense(&d, keep_all).unwrap();
        let csc = SparseMatrix::<f64>::from_dense(&d, non_zero).unwrap();
        assert_eq!(DenseMatrix::<f64>::from_sparse(&csr).unwrap(), d);
        assert_eq!(DenseMatrix::<f64>::from_sparse(&csc).unwrap(), d);
        assert_eq!(RowMajorMatrix::<f64>::from_sparse(&csc).unwrap()[(2, 3)], 6.0);
    }

    #[test]
    fn zero_expands() {
        let z = ZeroMatrix::<f32>::new(2, 3).unwrap();
        let d = DenseMatrix::<f64>::from_zero(&z).unwrap();
        assert_eq!((d.nrows(), d.ncols()), (2, 3));
        assert!(d.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn dynamic_sources() {
        let d = sample();
        let s = SparseMatrix::<f64>::from_dense(&d, non_zero).unwrap();
        let erased = [
            DynamicMatrix::new(d.clone()),
            DynamicMatrix::new(RowMajorMatrix::<f64>::from_dense(&d).unwrap()),
            DynamicMatrix::new(s),
        ];
        for m in &erased {
            assert_eq!(DenseMatrix::<f64>::from_dynamic(m).unwrap(), d);
        }
        let z = DynamicMatrix::new(ZeroMatrix::<f32>::new(4, 4).unwrap());
        assert_eq!(DenseMatrix::<f64>::from_dynamic(&z).unwrap().size(), 16);
    }
}
