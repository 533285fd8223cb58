use core::fmt::Debug;

use crate::error::{Result, StorageError};

/// Logical row/column extent of a matrix.
///
/// Equality compares logical extents only.
pub trait Dimension: Copy + Default + Debug + PartialEq + 'static {
    /// `true` when the extent is a compile-time constant.
    const FIXED: bool;

    /// Build an extent. Fails with [`StorageError::ExtentOverflow`] when
    /// `nrows * ncols` does not fit a `usize`, and on the fixed variant if
    /// the shape differs from the compile-time one.
    fn new(nrows: usize, ncols: usize) -> Result<Self>;

    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;

    /// Element count. Never overflows: every constructor checks it.
    #[inline]
    fn size(&self) -> usize {
        self.nrows() * self.ncols()
    }

    /// Change the extent. No-op on the fixed variant.
    fn resize(&mut self, nrows: usize, ncols: usize) -> Result<()>;
}

/// `nrows * ncols`, or [`StorageError::ExtentOverflow`].
#[inline]
pub fn checked_size(nrows: usize, ncols: usize) -> Result<usize> {
    nrows
        .checked_mul(ncols)
        .ok_or(StorageError::ExtentOverflow { nrows, ncols })
}

/// Dimension determined at compile time. Zero-sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixedSize<const R: usize, const C: usize>;

impl<const R: usize, const C: usize> Dimension for FixedSize<R, C> {
    const FIXED: bool = true;

    fn new(nrows: usize, ncols: usize) -> Result<Self> {
        checked_size(R, C)?;
        if (nrows, ncols) != (R, C) {
            return Err(StorageError::ShapeMismatch {
                expected: (R, C),
                got: (nrows, ncols),
            });
        }
        Ok(Self)
    }

    #[inline]
    fn nrows(&self) -> usize {
        R
    }

    #[inline]
    fn ncols(&self) -> usize {
        C
    }

    #[inline]
    fn resize(&mut self, _nrows: usize, _ncols: usize) -> Result<()> {
        Ok(())
    }
}

/// Dimension determined at run time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VariableSize {
    nrows: usize,
    ncols: usize,
}

impl Dimension for VariableSize {
    const FIXED: bool = false;

    #[inline]
    fn new(nrows: usize, ncols: usize) -> Result<Self> {
        checked_size(nrows, ncols)?;
        Ok(Self { nrows, ncols })
    }

    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn resize(&mut self, nrows: usize, ncols: usize) -> Result<()> {
        *self = Self::new(nrows, ncols)?;
        Ok(())
    }
}

// ── Leading dimension facet ─────────────────────────────────────────

/// Stride facet of a matrix.
///
/// Plain matrices are addressed through their own extent; sub-views
/// record the extent of the buffer they borrow from.
pub trait LeadingPolicy: Copy + Default + Debug + PartialEq + 'static {
    const IS_SUB_MATRIX: bool;

    fn ld_rows(&self, nrows: usize) -> usize;
    fn ld_cols(&self, ncols: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoLeadingDimension;

impl LeadingPolicy for NoLeadingDimension {
    const IS_SUB_MATRIX: bool = false;

    #[inline]
    fn ld_rows(&self, nrows: usize) -> usize {
        nrows
    }

    #[inline]
    fn ld_cols(&self, ncols: usize) -> usize {
        ncols
    }
}

/// Leading extents of the parent buffer of a sub-view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LeadingDimension {
    ld_rows: usize,
    ld_cols: usize,
}

impl LeadingDimension {
    pub fn new(ld_rows: usize, ld_cols: usize) -> Self {
        Self { ld_rows, ld_cols }
    }
}

impl LeadingPolicy for LeadingDimension {
    const IS_SUB_MATRIX: bool = true;

    #[inline]
    fn ld_rows(&self, _nrows: usize) -> usize {
        self.ld_rows
    }

    #[inline]
    fn ld_cols(&self, _ncols: usize) -> usize {
        self.ld_cols
    }
}

// ── Unblocked dimension facet ───────────────────────────────────────

/// Logical shape of a blocked matrix once its blocks are expanded.
pub trait UnblockedPolicy: Copy + Default + Debug + PartialEq + 'static {
    const IS_BLOCKED_MATRIX: bool;

    fn unblocked_rows(&self, nrows: usize) -> usize;
    fn unblocked_cols(&self, ncols: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoUnblockedDimension;

impl UnblockedPolicy for NoUnblockedDimension {
    const IS_BLOCKED_MATRIX: bool = false;

    #[inline]
    fn unblocked_rows(&self, nrows: usize) -> usize {
        nrows
    }

    #[inline]
    fn unblocked_cols(&self, ncols: usize) -> usize {
        ncols
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UnblockedDimension {
    ub_rows: usize,
    ub_cols: usize,
}

impl UnblockedDimension {
    pub fn new(ub_rows: usize, ub_cols: usize) -> Self {
        Self { ub_rows, ub_cols }
    }
}

impl UnblockedPolicy for UnblockedDimension {
    const IS_BLOCKED_MATRIX: bool = true;

    #[inline]
    fn unblocked_rows(&self, _nrows: usize) -> usize {
        self.ub_rows
    }

    #[inline]
    fn unblocked_cols(&self, _ncols: usize) -> usize {
        self.ub_cols
    }
}
