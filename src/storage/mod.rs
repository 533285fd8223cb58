//! Element buffers behind dense matrices.
//!
//! | type | extent | owns | resize |
//! |---|---|---|---|
//! | [`StackStorage`] | fixed | inline | no-op |
//! | [`FixedHeapStorage`] | fixed | always | only to `R * C` |
//! | [`HeapStorage`] | variable | unless external | reallocates if owned |
//! | [`StripedStorage`] | variable | never | never |
//!
//! Fresh buffers are zero-initialized.

mod fixed_heap;
mod heap;
mod stack;
mod striped;

pub use fixed_heap::FixedHeapStorage;
pub use heap::HeapStorage;
pub use stack::StackStorage;
pub use striped::{StripedLines, StripedLinesMut, StripedStorage};

use alloc::vec::Vec;

use crate::error::{Result, StorageError};
use crate::traits::{cast, Scalar};

/// Flat buffer of matrix elements.
///
/// Iteration follows storage order and skips any gaps a strided buffer
/// leaves between its runs. [`span`](Storage::span) exposes the whole
/// addressable region, gaps included.
pub trait Storage<T: Scalar>: Default {
    type Iter<'a>: DoubleEndedIterator<Item = &'a T>
    where
        Self: 'a;
    type IterMut<'a>: DoubleEndedIterator<Item = &'a mut T>
    where
        Self: 'a;

    /// Number of elements, gaps excluded.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `false` when the buffer is borrowed and must not be reallocated.
    fn is_owned(&self) -> bool;

    fn iter(&self) -> Self::Iter<'_>;
    fn iter_mut(&mut self) -> Self::IterMut<'_>;

    fn span(&self) -> &[T];
    fn span_mut(&mut self) -> &mut [T];

    #[inline]
    fn as_ptr(&self) -> *const T {
        self.span().as_ptr()
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.span_mut().as_mut_ptr()
    }

    /// Make room for `len` elements, or fail.
    ///
    /// Contents are unspecified after a successful reallocation.
    fn resize(&mut self, len: usize) -> Result<()>;

    fn fill(&mut self, value: T) {
        for x in self.iter_mut() {
            *x = value;
        }
    }

    /// Element-wise comparison in storage order.
    fn equal_by<U, S, F>(&self, other: &S, mut eq: F) -> bool
    where
        U: Scalar,
        S: Storage<U>,
        F: FnMut(&T, &U) -> bool,
    {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| eq(a, b))
    }

    /// Element-wise comparison within numerical accuracy.
    fn approx_eq<S: Storage<T>>(&self, other: &S) -> bool {
        self.equal_by(other, |a: &T, b: &T| a.within_tolerance(b))
    }
}

/// Storage that allocates and owns its buffer.
pub trait OwnedStorage<T: Scalar>: Storage<T> + Sized {
    /// `len` zero elements. Fixed storage requires `len` to match.
    fn zeroed(len: usize) -> Result<Self>;

    /// Take `values` as the buffer, in storage order.
    fn from_vec(values: Vec<T>) -> Result<Self>;

    /// Element-wise numeric conversion of another storage.
    fn convert_from<U: Scalar, S: Storage<U>>(other: &S) -> Result<Self> {
        let mut out = Self::zeroed(other.len())?;
        for (dst, src) in out.iter_mut().zip(other.iter()) {
            *dst = cast(*src)?;
        }
        Ok(out)
    }
}

/// Storage able to wrap memory it does not own.
pub trait ExternalStorage<T: Scalar>: Storage<T> {
    /// Wrap `len` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` elements for as
    /// long as the storage (or anything built from it) is used, and no
    /// other reference may access that memory in the meantime.
    unsafe fn from_raw_parts(ptr: *mut T, len: usize) -> Self;
}

/// Zeroed vector of exactly `len` elements, reporting allocator failure.
pub(crate) fn try_zeroed<T: Scalar>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| StorageError::AllocationFailed { len })?;
    buf.resize(len, T::zero());
    Ok(buf)
}
