use core::fmt::Debug;
use core::hash::Hash;
use num_traits::{NumCast, One, Zero};

use crate::error::{Result, StorageError};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all primitive integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + NumCast + Tolerance + 'static {}

impl<T: Copy + PartialEq + Debug + Zero + One + NumCast + Tolerance + 'static> Scalar for T {}

/// Equality within numerical accuracy.
///
/// This is the predicate behind `approx_eq` on storages and matrices.
/// Floats compare with a combined absolute/relative tolerance, integers
/// compare exactly.
pub trait Tolerance {
    fn within_tolerance(&self, other: &Self) -> bool;
}

macro_rules! impl_tolerance_float {
    ($($t:ty => $eps:expr),*) => {
        $(
            impl Tolerance for $t {
                #[inline]
                fn within_tolerance(&self, other: &$t) -> bool {
                    approx::relative_eq!(*self, *other, epsilon = $eps, max_relative = $eps)
                }
            }
        )*
    };
}

impl_tolerance_float!(f32 => 1e-6, f64 => 1e-12);

macro_rules! impl_tolerance_exact {
    ($($t:ty),*) => {
        $(
            impl Tolerance for $t {
                #[inline]
                fn within_tolerance(&self, other: &$t) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_tolerance_exact!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Convert one element type into another, failing if the value does not fit.
///
/// ```
/// use matlayout::traits::cast;
/// let x: f32 = cast(2.5_f64).unwrap();
/// assert_eq!(x, 2.5);
/// assert!(cast::<u8, _>(-1_i32).is_err());
/// ```
#[inline]
pub fn cast<T: Scalar, U: Scalar>(value: U) -> Result<T> {
    <T as NumCast>::from(value).ok_or(StorageError::NumericCast)
}

/// Integer width used for sparse keys and offsets.
pub trait IndexType: Copy + Debug + Default + Eq + Ord + Hash + 'static {
    /// Narrow a `usize`, `None` if it does not fit.
    fn from_usize(n: usize) -> Option<Self>;

    /// Widen to `usize`.
    fn index(self) -> usize;
}

macro_rules! impl_index_type {
    ($($t:ty),*) => {
        $(
            impl IndexType for $t {
                #[inline]
                fn from_usize(n: usize) -> Option<$t> {
                    <$t>::try_from(n).ok()
                }

                #[inline]
                fn index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_index_type!(u16, u32, u64, usize);

/// Read-only access to a matrix-like type.
///
/// This is the surface handed to collaborators that only need extents and
/// element reads (norm and occupation layers, copy routines).
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
}

/// Mutable access to a matrix-like type.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
}
