use alloc::vec::Vec;

use super::{OwnedStorage, Storage};
use crate::error::{Result, StorageError};
use crate::traits::Scalar;

/// Inline `R x C` buffer. No allocation, copied by value.
///
/// The nested array is only addressed as a flat run of `R * C` elements;
/// the matrix orientation decides which element sits where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackStorage<T, const R: usize, const C: usize> {
    data: [[T; C]; R],
}

impl<T: Scalar, const R: usize, const C: usize> Default for StackStorage<T, R, C> {
    fn default() -> Self {
        Self {
            data: [[T::zero(); C]; R],
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Storage<T> for StackStorage<T, R, C> {
    type Iter<'a> = core::slice::Iter<'a, T>;
    type IterMut<'a> = core::slice::IterMut<'a, T>;

    #[inline]
    fn len(&self) -> usize {
        R * C
    }

    #[inline]
    fn is_owned(&self) -> bool {
        true
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.span().iter()
    }

    #[inline]
    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        self.span_mut().iter_mut()
    }

    #[inline]
    fn span(&self) -> &[T] {
        self.data.as_flattened()
    }

    #[inline]
    fn span_mut(&mut self) -> &mut [T] {
        self.data.as_flattened_mut()
    }

    /// Extent is fixed; nothing to do.
    #[inline]
    fn resize(&mut self, _len: usize) -> Result<()> {
        Ok(())
    }

    fn fill(&mut self, value: T) {
        self.span_mut().fill(value);
    }
}

impl<T: Scalar, const R: usize, const C: usize> OwnedStorage<T> for StackStorage<T, R, C> {
    fn zeroed(len: usize) -> Result<Self> {
        if len != R * C {
            return Err(StorageError::SizeMismatch {
                expected: R * C,
                got: len,
            });
        }
        Ok(Self::default())
    }

    fn from_vec(values: Vec<T>) -> Result<Self> {
        let mut out = Self::zeroed(values.len())?;
        out.span_mut().copy_from_slice(&values);
        Ok(out)
    }
}
