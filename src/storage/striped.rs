use core::fmt;
use core::iter::{Flatten, FusedIterator};
use core::ptr::NonNull;

use super::Storage;
use crate::error::{Result, StorageError};
use crate::traits::Scalar;

/// Borrowed buffer made of `nb_blocks` runs of `continuous` elements,
/// consecutive runs separated by `separator` skipped elements.
///
/// This is the storage of every sub-view: each run is one major line of
/// the view, the separator is the part of the parent's line outside the
/// window. It never owns memory and cannot be reallocated.
pub struct StripedStorage<T> {
    ptr: NonNull<T>,
    continuous: usize,
    nb_blocks: usize,
    separator: usize,
}

impl<T> Default for StripedStorage<T> {
    fn default() -> Self {
        Self {
            ptr: NonNull::dangling(),
            continuous: 0,
            nb_blocks: 0,
            separator: 0,
        }
    }
}

impl<T: Scalar> fmt::Debug for StripedStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripedStorage")
            .field("continuous", &self.continuous)
            .field("nb_blocks", &self.nb_blocks)
            .field("separator", &self.separator)
            .field("data", &StripedDebug(self))
            .finish()
    }
}

struct StripedDebug<'a, T>(&'a StripedStorage<T>);

impl<T: Scalar> fmt::Debug for StripedDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<T: Scalar> StripedStorage<T> {
    /// Wrap a striped region starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes over
    /// `(nb_blocks - 1) * (continuous + separator) + continuous` elements
    /// for as long as the storage is used, with no other live reference
    /// writing to that region.
    pub unsafe fn from_raw_parts(
        ptr: *mut T,
        continuous: usize,
        nb_blocks: usize,
        separator: usize,
    ) -> Self {
        Self {
            ptr: NonNull::new(ptr).unwrap_or(NonNull::dangling()),
            continuous,
            nb_blocks,
            separator,
        }
    }

    #[inline]
    pub fn continuous(&self) -> usize {
        self.continuous
    }

    #[inline]
    pub fn nb_blocks(&self) -> usize {
        self.nb_blocks
    }

    #[inline]
    pub fn separator(&self) -> usize {
        self.separator
    }

    /// Distance between the starts of consecutive runs.
    #[inline]
    pub fn stride(&self) -> usize {
        self.continuous + self.separator
    }

    /// Number of runs iteration visits; zero when the runs are empty.
    #[inline]
    fn lines(&self) -> usize {
        if self.continuous == 0 {
            0
        } else {
            self.nb_blocks
        }
    }

    #[inline]
    fn span_len(&self) -> usize {
        match self.lines() {
            0 => 0,
            n => (n - 1) * self.stride() + self.continuous,
        }
    }

    /// Contiguous runs, front to back.
    pub fn runs(&self) -> StripedLines<'_, T> {
        StripedLines {
            rest: self.span(),
            continuous: self.continuous,
            separator: self.separator,
            remaining: self.lines(),
        }
    }

    pub fn runs_mut(&mut self) -> StripedLinesMut<'_, T> {
        let continuous = self.continuous;
        let separator = self.separator;
        let remaining = self.lines();
        StripedLinesMut {
            rest: self.span_mut(),
            continuous,
            separator,
            remaining,
        }
    }
}

impl<T: Scalar> Storage<T> for StripedStorage<T> {
    type Iter<'a> = Flatten<StripedLines<'a, T>>;
    type IterMut<'a> = Flatten<StripedLinesMut<'a, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.continuous * self.nb_blocks
    }

    #[inline]
    fn is_owned(&self) -> bool {
        false
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.runs().flatten()
    }

    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        self.runs_mut().flatten()
    }

    fn span(&self) -> &[T] {
        // SAFETY: the region is valid per the `from_raw_parts` contract.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.span_len()) }
    }

    fn span_mut(&mut self) -> &mut [T] {
        // SAFETY: as in `span`; `&mut self` guarantees exclusivity.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.span_len()) }
    }

    /// Borrowed memory cannot grow or shrink.
    fn resize(&mut self, len: usize) -> Result<()> {
        if len == self.len() {
            Ok(())
        } else {
            Err(StorageError::NotOwned)
        }
    }
}

// ── Run iterators ───────────────────────────────────────────────────

/// Iterator over the contiguous runs of a [`StripedStorage`].
///
/// `rest` always starts at the first remaining run and ends at the last,
/// so both ends pop in constant time.
pub struct StripedLines<'a, T> {
    rest: &'a [T],
    continuous: usize,
    separator: usize,
    remaining: usize,
}

impl<'a, T> Iterator for StripedLines<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (line, tail) = self.rest.split_at(self.continuous);
        self.rest = if self.remaining > 0 {
            &tail[self.separator..]
        } else {
            &[]
        };
        Some(line)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for StripedLines<'a, T> {
    fn next_back(&mut self) -> Option<&'a [T]> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (head, line) = self.rest.split_at(self.rest.len() - self.continuous);
        self.rest = if self.remaining > 0 {
            &head[..head.len() - self.separator]
        } else {
            &[]
        };
        Some(line)
    }
}

impl<T> ExactSizeIterator for StripedLines<'_, T> {}
impl<T> FusedIterator for StripedLines<'_, T> {}

/// Mutable counterpart of [`StripedLines`].
pub struct StripedLinesMut<'a, T> {
    rest: &'a mut [T],
    continuous: usize,
    separator: usize,
    remaining: usize,
}

impl<'a, T> Iterator for StripedLinesMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<&'a mut [T]> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rest = core::mem::take(&mut self.rest);
        let (line, tail) = rest.split_at_mut(self.continuous);
        if self.remaining > 0 {
            self.rest = tail.split_at_mut(self.separator).1;
        }
        Some(line)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for StripedLinesMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut [T]> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rest = core::mem::take(&mut self.rest);
        let at = rest.len() - self.continuous;
        let (head, line) = rest.split_at_mut(at);
        if self.remaining > 0 {
            let keep = head.len() - self.separator;
            self.rest = head.split_at_mut(keep).0;
        }
        Some(line)
    }
}

impl<T> ExactSizeIterator for StripedLinesMut<'_, T> {}
impl<T> FusedIterator for StripedLinesMut<'_, T> {}
