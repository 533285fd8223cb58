use core::fmt;
use core::marker::PhantomData;

use crate::error::{Result, StorageError};
use crate::parameter::{Dimension, Parameter, ParameterSet};
use crate::traits::Scalar;

/// Structurally zero matrix: an extent and nothing else.
pub struct ZeroMatrix<T: Scalar, P: ParameterSet = Parameter> {
    dim: P::Size,
    _element: PhantomData<T>,
}

impl<T: Scalar, P: ParameterSet> ZeroMatrix<T, P> {
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        Ok(Self {
            dim: P::Size::new(nrows, ncols)?,
            _element: PhantomData,
        })
    }

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

    pub fn resize(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        self.dim = P::Size::new(nrows, ncols)?;
        Ok(())
    }

    /// Zero, once `(row, col)` is checked against the extent.
    pub fn try_get(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.nrows() || col >= self.ncols() {
            return Err(StorageError::IndexOutOfBounds {
                row,
                col,
                nrows: self.nrows(),
                ncols: self.ncols(),
            });
        }
        Ok(T::zero())
    }
}

impl<T: Scalar, P: ParameterSet> Default for ZeroMatrix<T, P> {
    fn default() -> Self {
        Self {
            dim: P::Size::default(),
            _element: PhantomData,
        }
    }
}

impl<T: Scalar, P: ParameterSet> Clone for ZeroMatrix<T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar, P: ParameterSet> Copy for ZeroMatrix<T, P> {}

impl<T: Scalar, P: ParameterSet> PartialEq for ZeroMatrix<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim
    }
}

impl<T: Scalar, P: ParameterSet> fmt::Debug for ZeroMatrix<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroMatrix")
            .field("nrows", &self.nrows())
            .field("ncols", &self.ncols())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::FixedParameter;

    #[test]
    fn extent_only() {
        let mut z = ZeroMatrix::<f64>::new(3, 2).unwrap();
        assert_eq!(z.size(), 6);
        assert_eq!(z.try_get(2, 1), Ok(0.0));
        assert!(z.try_get(3, 0).is_err());
        z.resize(1, 1).unwrap();
        assert_eq!((z.nrows(), z.ncols()), (1, 1));
        assert_eq!(core::mem::size_of::<ZeroMatrix<f64>>(), 2 * core::mem::size_of::<usize>());
    }

    #[test]
    fn overflowing_extent() {
        assert_eq!(
            ZeroMatrix::<f64>::new(usize::MAX, 2),
            Err(StorageError::ExtentOverflow {
                nrows: usize::MAX,
                ncols: 2
            })
        );
        let mut z = ZeroMatrix::<f64>::new(2, 2).unwrap();
        assert!(z.resize(usize::MAX, 2).is_err());
        assert_eq!(z.size(), 4);
    }

    #[test]
    fn fixed_extent() {
        let mut z = ZeroMatrix::<f32, FixedParameter<2, 2>>::default();
        assert_eq!(z.size(), 4);
        assert!(z.resize(3, 3).is_err());
        assert_eq!(core::mem::size_of_val(&z), 0);
    }
}
