use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{try_zeroed, OwnedStorage, Storage};
use crate::error::{Result, StorageError};
use crate::traits::Scalar;

/// Heap buffer of exactly `R * C` elements.
///
/// Always owns its memory; cloning duplicates the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedHeapStorage<T, const R: usize, const C: usize> {
    data: Box<[T]>,
}

impl<T: Scalar, const R: usize, const C: usize> FixedHeapStorage<T, R, C> {
    fn check_len(len: usize) -> Result<()> {
        if len != R * C {
            return Err(StorageError::SizeMismatch {
                expected: R * C,
                got: len,
            });
        }
        Ok(())
    }
}

impl<T: Scalar, const R: usize, const C: usize> Default for FixedHeapStorage<T, R, C> {
    /// Zeroed buffer.
    ///
    /// Panics if the allocator cannot provide `R * C` elements; use
    /// [`OwnedStorage::zeroed`] to observe that failure instead.
    fn default() -> Self {
        Self {
            data: alloc::vec![T::zero(); R * C].into_boxed_slice(),
        }
    }
}

impl<T: Scalar, const R: usize, const C: usize> Storage<T> for FixedHeapStorage<T, R, C> {
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
        self.data.iter()
    }

    #[inline]
    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        self.data.iter_mut()
    }

    #[inline]
    fn span(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn span_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn resize(&mut self, len: usize) -> Result<()> {
        Self::check_len(len)
    }

    fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T: Scalar, const R: usize, const C: usize> OwnedStorage<T> for FixedHeapStorage<T, R, C> {
    fn zeroed(len: usize) -> Result<Self> {
        Self::check_len(len)?;
        Ok(Self {
            data: try_zeroed(len)?.into_boxed_slice(),
        })
    }

    fn from_vec(values: Vec<T>) -> Result<Self> {
        Self::check_len(values.len())?;
        Ok(Self {
            data: values.into_boxed_slice(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn construction() {
        let s = FixedHeapStorage::<f64, 3, 2>::zeroed(6).unwrap();
        assert_eq!(s.len(), 6);
        assert!(s.iter().all(|&x| x == 0.0));
        assert_eq!(
            FixedHeapStorage::<f64, 3, 2>::from_vec(vec![1.0; 5]),
            Err(StorageError::SizeMismatch { expected: 6, got: 5 })
        );
    }

    #[test]
    fn resize_only_to_own_size() {
        let mut s = FixedHeapStorage::<i32, 2, 2>::default();
        assert!(s.resize(4).is_ok());
        assert_eq!(
            s.resize(9),
            Err(StorageError::SizeMismatch { expected: 4, got: 9 })
        );
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn clone_duplicates_buffer() {
        let a = FixedHeapStorage::<i32, 1, 3>::from_vec(vec![1, 2, 3]).unwrap();
        let mut b = a.clone();
        b.fill(7);
        assert_eq!(a.span(), &[1, 2, 3]);
        assert_eq!(b.span(), &[7, 7, 7]);
        assert_ne!(a.as_ptr(), b.as_ptr());
    }
}
