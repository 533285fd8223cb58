//! Closed registry of concrete matrix types.
//!
//! Every registered type carries a stable, contiguous index. A kernel
//! dispatcher addresses a table of `REGISTRY_SIZE * REGISTRY_SIZE` slots
//! with [`pair_index`] of its two operands' indices.
//!
//! ```
//! use matlayout::{DenseMatrix, DynamicMatrix, Registered, REGISTRY_SIZE};
//!
//! assert_eq!(<DenseMatrix<f64> as Registered>::TYPE_INDEX, 6);
//! assert_eq!(<DenseMatrix<f32> as Registered>::TYPE_INDEX, 2);
//!
//! let a = DynamicMatrix::new(DenseMatrix::<f64>::zeros(2, 2).unwrap());
//! assert_eq!(a.type_index(), 6);
//! assert_eq!(a.type_name(), "Matrix<Dense,double>");
//! assert_eq!(REGISTRY_SIZE, 8);
//! ```

use tracing::trace;

use crate::aliases::RowMajorParameter;
use crate::dense::DenseMatrix;
use crate::sparse::SparseMatrix;
use crate::zero::ZeroMatrix;

/// Storage family of a registered matrix type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Zero,
    Sparse,
    Dense,
}

/// A matrix type with a place in the registry.
pub trait Registered: Sized {
    const TYPE_INDEX: usize;
    const NAME: &'static str;
    const FORMAT: Format;

    fn into_dynamic(self) -> DynamicMatrix;
    fn downcast_ref(matrix: &DynamicMatrix) -> Option<&Self>;
    fn downcast_mut(matrix: &mut DynamicMatrix) -> Option<&mut Self>;

    /// Take the matrix back out, or return the original if it holds
    /// another type.
    fn downcast(matrix: DynamicMatrix) -> Result<Self, DynamicMatrix>;

    #[inline]
    fn type_index(&self) -> usize {
        Self::TYPE_INDEX
    }
}

/// Slot of an operand pair in a row-major `REGISTRY_SIZE x REGISTRY_SIZE`
/// kernel table.
#[inline]
pub const fn pair_index(lhs: usize, rhs: usize) -> usize {
    lhs * REGISTRY_SIZE + rhs
}

macro_rules! registry {
    ($($index:literal => $variant:ident($ty:ty), $name:literal, $format:ident;)*) => {
        /// Owning, type-erased matrix.
        ///
        /// Holds exactly one registered matrix; cloning deep-copies it.
        #[derive(Debug, Clone, PartialEq)]
        pub enum DynamicMatrix {
            $($variant($ty),)*
        }

        $(
            impl Registered for $ty {
                const TYPE_INDEX: usize = $index;
                const NAME: &'static str = $name;
                const FORMAT: Format = Format::$format;

                #[inline]
                fn into_dynamic(self) -> DynamicMatrix {
                    DynamicMatrix::$variant(self)
                }

                fn downcast_ref(matrix: &DynamicMatrix) -> Option<&Self> {
                    match matrix {
                        DynamicMatrix::$variant(m) => Some(m),
                        _ => None,
                    }
                }

                fn downcast_mut(matrix: &mut DynamicMatrix) -> Option<&mut Self> {
                    match matrix {
                        DynamicMatrix::$variant(m) => Some(m),
                        _ => None,
                    }
                }

                fn downcast(matrix: DynamicMatrix) -> Result<Self, DynamicMatrix> {
                    match matrix {
                        DynamicMatrix::$variant(m) => Ok(m),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for DynamicMatrix {
                #[inline]
                fn from(matrix: $ty) -> Self {
                    DynamicMatrix::$variant(matrix)
                }
            }
        )*

        /// Names of the registered types, by index.
        pub const TYPE_NAMES: &[&str] = &[$($name),*];

        /// Number of registered types.
        pub const REGISTRY_SIZE: usize = TYPE_NAMES.len();

        const _: () = {
            let mut expected = 0;
            $(
                assert!($index == expected, "registry indices must be contiguous from zero");
                expected += 1;
            )*
            assert!(expected == REGISTRY_SIZE);
        };

        impl DynamicMatrix {
            /// Registry index of the held matrix.
            pub fn type_index(&self) -> usize {
                match self {
                    $(DynamicMatrix::$variant(m) => m.type_index(),)*
                }
            }

            pub fn type_name(&self) -> &'static str {
                match self {
                    $(DynamicMatrix::$variant(_) => <$ty as Registered>::NAME,)*
                }
            }

            pub fn format(&self) -> Format {
                match self {
                    $(DynamicMatrix::$variant(_) => <$ty as Registered>::FORMAT,)*
                }
            }

            pub fn nrows(&self) -> usize {
                match self {
                    $(DynamicMatrix::$variant(m) => m.nrows(),)*
                }
            }

            pub fn ncols(&self) -> usize {
                match self {
                    $(DynamicMatrix::$variant(m) => m.ncols(),)*
                }
            }
        }
    };
}

registry! {
    0 => ZeroF32(ZeroMatrix<f32>), "Matrix<Zero,float>", Zero;
    1 => SparseF32(SparseMatrix<f32>), "Matrix<Sparse,float>", Sparse;
    2 => DenseF32(DenseMatrix<f32>), "Matrix<Dense,float>", Dense;
    3 => DenseRowMajorF32(DenseMatrix<f32, RowMajorParameter>), "Matrix<Dense,float,RowMajor>", Dense;
    4 => ZeroF64(ZeroMatrix<f64>), "Matrix<Zero,double>", Zero;
    5 => SparseF64(SparseMatrix<f64>), "Matrix<Sparse,double>", Sparse;
    6 => DenseF64(DenseMatrix<f64>), "Matrix<Dense,double>", Dense;
    7 => DenseRowMajorF64(DenseMatrix<f64, RowMajorParameter>), "Matrix<Dense,double,RowMajor>", Dense;
}

impl DynamicMatrix {
    /// Take ownership of a registered matrix.
    pub fn new<M: Registered>(matrix: M) -> Self {
        trace!(type_index = M::TYPE_INDEX, name = M::NAME, "erasing matrix type");
        matrix.into_dynamic()
    }

    pub fn downcast_ref<M: Registered>(&self) -> Option<&M> {
        M::downcast_ref(self)
    }

    pub fn downcast_mut<M: Registered>(&mut self) -> Option<&mut M> {
        M::downcast_mut(self)
    }

    pub fn downcast<M: Registered>(self) -> Result<M, Self> {
        M::downcast(self)
    }
}
