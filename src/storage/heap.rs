use alloc::vec::Vec;
use core::fmt;
use core::ptr::NonNull;

use tracing::debug;

use super::{try_zeroed, ExternalStorage, OwnedStorage, Storage};
use crate::error::{Result, StorageError};
use crate::traits::Scalar;

enum Buffer<T> {
    Owned(Vec<T>),
    External { ptr: NonNull<T>, len: usize },
}

/// Variable-length heap buffer, owned or wrapping external memory.
///
/// An owned buffer reallocates on resize; an external one refuses with
/// [`StorageError::NotOwned`]. Cloning always produces an owned copy.
///
/// Whether a buffer is external is only known at run time, so the type
/// holds a raw pointer in every case and is neither `Send` nor `Sync`,
/// owned or not. This extends to every heap-backed [`DenseMatrix`] and
/// therefore to [`DynamicMatrix`]; fixed-size storages are unaffected.
///
/// [`DenseMatrix`]: crate::DenseMatrix
/// [`DynamicMatrix`]: crate::DynamicMatrix
///
/// ```
/// use matlayout::storage::{HeapStorage, OwnedStorage, Storage};
///
/// let mut s = HeapStorage::<f64>::zeroed(4).unwrap();
/// s.resize(6).unwrap();
/// assert_eq!(s.len(), 6);
/// ```
pub struct HeapStorage<T> {
    buf: Buffer<T>,
}

impl<T> Default for HeapStorage<T> {
    fn default() -> Self {
        Self {
            buf: Buffer::Owned(Vec::new()),
        }
    }
}

impl<T: Scalar> Clone for HeapStorage<T> {
    fn clone(&self) -> Self {
        Self {
            buf: Buffer::Owned(self.span().to_vec()),
        }
    }
}

impl<T: Scalar> PartialEq for HeapStorage<T> {
    fn eq(&self, other: &Self) -> bool {
        self.span() == other.span()
    }
}

impl<T: Scalar> fmt::Debug for HeapStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStorage")
            .field("owned", &self.is_owned())
            .field("data", &self.span())
            .finish()
    }
}

impl<T: Scalar> Storage<T> for HeapStorage<T> {
    type Iter<'a> = core::slice::Iter<'a, T>;
    type IterMut<'a> = core::slice::IterMut<'a, T>;

    #[inline]
    fn len(&self) -> usize {
        match &self.buf {
            Buffer::Owned(v) => v.len(),
            Buffer::External { len, .. } => *len,
        }
    }

    #[inline]
    fn is_owned(&self) -> bool {
        matches!(self.buf, Buffer::Owned(_))
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
        match &self.buf {
            Buffer::Owned(v) => v,
            // SAFETY: validity of `len` elements at `ptr` is the contract of
            // `from_raw_parts`.
            Buffer::External { ptr, len } => unsafe {
                core::slice::from_raw_parts(ptr.as_ptr(), *len)
            },
        }
    }

    #[inline]
    fn span_mut(&mut self) -> &mut [T] {
        match &mut self.buf {
            Buffer::Owned(v) => v,
            // SAFETY: as in `span`; `&mut self` guarantees exclusivity.
            Buffer::External { ptr, len } => unsafe {
                core::slice::from_raw_parts_mut(ptr.as_ptr(), *len)
            },
        }
    }

    fn resize(&mut self, len: usize) -> Result<()> {
        if self.len() == len {
            return Ok(());
        }
        match &mut self.buf {
            Buffer::External { .. } => Err(StorageError::NotOwned),
            Buffer::Owned(v) => {
                debug!(from = v.len(), to = len, "reallocating heap storage");
                // allocate before releasing the old buffer
                *v = try_zeroed(len)?;
                Ok(())
            }
        }
    }

    fn fill(&mut self, value: T) {
        self.span_mut().fill(value);
    }
}

impl<T: Scalar> OwnedStorage<T> for HeapStorage<T> {
    fn zeroed(len: usize) -> Result<Self> {
        Ok(Self {
            buf: Buffer::Owned(try_zeroed(len)?),
        })
    }

    fn from_vec(values: Vec<T>) -> Result<Self> {
        Ok(Self {
            buf: Buffer::Owned(values),
        })
    }
}

impl<T: Scalar> ExternalStorage<T> for HeapStorage<T> {
    unsafe fn from_raw_parts(ptr: *mut T, len: usize) -> Self {
        let ptr = NonNull::new(ptr).unwrap_or(NonNull::dangling());
        Self {
            buf: Buffer::External { ptr, len },
        }
    }
}
