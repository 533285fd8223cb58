use core::fmt::Debug;

/// Runtime orientation tag, for layers that need to record or branch on
/// the storage order (serialization, kernel selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    RowMajor,
    ColumnMajor,
}

/// Compile-time storage order.
///
/// A *major line* is the contiguous run in storage: a row for row-major,
/// a column for column-major. All index arithmetic of the crate goes
/// through these functions, so the formula is fixed per configuration.
pub trait Orientation: Copy + Default + Debug + 'static {
    const ORDER: Order;

    /// Number of major lines of a `nrows x ncols` extent.
    fn major_lines(nrows: usize, ncols: usize) -> usize;

    /// Length of each major line (the minor extent).
    fn line_len(nrows: usize, ncols: usize) -> usize;

    /// Logical `(row, col)` of element `k` of major line `line`.
    fn coords(line: usize, k: usize) -> (usize, usize);

    /// `(line, k)` of logical position `(row, col)`; inverse of [`coords`](Self::coords).
    fn line_of(row: usize, col: usize) -> (usize, usize);

    /// Distance between consecutive major lines for the given leading extents.
    fn stride(ld_rows: usize, ld_cols: usize) -> usize;

    /// Linear offset of `(row, col)` given the leading extents.
    #[inline]
    fn position(row: usize, col: usize, ld_rows: usize, ld_cols: usize) -> usize {
        let (line, k) = Self::line_of(row, col);
        line * Self::stride(ld_rows, ld_cols) + k
    }
}

/// Matrix is stored row-wise (C-style).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowMajor;

/// Matrix is stored column-wise (Fortran-style).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnMajor;

impl Orientation for RowMajor {
    const ORDER: Order = Order::RowMajor;

    #[inline]
    fn major_lines(nrows: usize, _ncols: usize) -> usize {
        nrows
    }

    #[inline]
    fn line_len(_nrows: usize, ncols: usize) -> usize {
        ncols
    }

    #[inline]
    fn coords(line: usize, k: usize) -> (usize, usize) {
        (line, k)
    }

    #[inline]
    fn line_of(row: usize, col: usize) -> (usize, usize) {
        (row, col)
    }

    #[inline]
    fn stride(_ld_rows: usize, ld_cols: usize) -> usize {
        ld_cols
    }
}

impl Orientation for ColumnMajor {
    const ORDER: Order = Order::ColumnMajor;

    #[inline]
    fn major_lines(_nrows: usize, ncols: usize) -> usize {
        ncols
    }

    #[inline]
    fn line_len(nrows: usize, _ncols: usize) -> usize {
        nrows
    }

    #[inline]
    fn coords(line: usize, k: usize) -> (usize, usize) {
        (k, line)
    }

    #[inline]
    fn line_of(row: usize, col: usize) -> (usize, usize) {
        (col, row)
    }

    #[inline]
    fn stride(ld_rows: usize, _ld_cols: usize) -> usize {
        ld_rows
    }
}
