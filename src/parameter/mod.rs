//! Compile-time configuration of a matrix type.
//!
//! A [`Parameter`] is a pure type-level record: it is never instantiated.
//! Its [`ParameterSet`] implementation picks the extent, orientation,
//! stride facets and storage of every matrix built from it. Combinations
//! without a storage (variable extent on the stack, a fixed-size view)
//! fail to compile.
//!
//! ```
//! use matlayout::parameter::*;
//!
//! type P = Parameter<
//!     usize, RowMajor, FixedSize<2, 2>, NoLeadingDimension, NoUnblockedDimension, NormTwo, OnStack,
//! >;
//! assert!(P::ON_STACK);
//! assert!(P::IS_FIXED);
//! assert!(!P::IS_SUB_MATRIX);
//! ```

pub mod dimension;
pub mod orientation;

use core::fmt::Debug;
use core::marker::PhantomData;

use crate::storage::{FixedHeapStorage, HeapStorage, StackStorage, Storage, StripedStorage};
use crate::traits::{IndexType, Scalar};

pub use dimension::{
    checked_size, Dimension, FixedSize, LeadingDimension, LeadingPolicy, NoLeadingDimension,
    NoUnblockedDimension, UnblockedDimension, UnblockedPolicy, VariableSize,
};
pub use orientation::{ColumnMajor, Order, Orientation, RowMajor};

// ── Placement ───────────────────────────────────────────────────────

/// Where the buffer of a fixed-size matrix lives.
pub trait Placement: Copy + Default + Debug + 'static {
    const ON_STACK: bool;
}

/// Inline array, no allocation. Fixed extents only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OnStack;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OnHeap;

impl Placement for OnStack {
    const ON_STACK: bool = true;
}

impl Placement for OnHeap {
    const ON_STACK: bool = false;
}

// ── Norm tags ───────────────────────────────────────────────────────

/// Norm used by an external norm layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Norm {
    One,
    Two,
    Max,
}

pub trait NormKind: Copy + Default + Debug + 'static {
    const NORM: Norm;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NormOne;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NormTwo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NormMax;

impl NormKind for NormOne {
    const NORM: Norm = Norm::One;
}

impl NormKind for NormTwo {
    const NORM: Norm = Norm::Two;
}

impl NormKind for NormMax {
    const NORM: Norm = Norm::Max;
}

// ── Storage selection ───────────────────────────────────────────────

/// Maps an `(extent, placement, leading)` triple to a storage type.
///
/// Only the supported combinations are implemented.
pub trait SelectStorage {
    type Storage<T: Scalar>: Storage<T>;
}

impl<const R: usize, const C: usize> SelectStorage
    for (FixedSize<R, C>, OnStack, NoLeadingDimension)
{
    type Storage<T: Scalar> = StackStorage<T, R, C>;
}

impl<const R: usize, const C: usize> SelectStorage
    for (FixedSize<R, C>, OnHeap, NoLeadingDimension)
{
    type Storage<T: Scalar> = FixedHeapStorage<T, R, C>;
}

impl SelectStorage for (VariableSize, OnHeap, NoLeadingDimension) {
    type Storage<T: Scalar> = HeapStorage<T>;
}

impl SelectStorage for (VariableSize, OnHeap, LeadingDimension) {
    type Storage<T: Scalar> = StripedStorage<T>;
}

// ── Parameter bundle ────────────────────────────────────────────────

/// Everything a matrix type is configured with, resolved at compile time.
pub trait ParameterSet: 'static {
    type Index: IndexType;
    type Orientation: Orientation;
    type Size: Dimension;
    type Leading: LeadingPolicy;
    type Unblocked: UnblockedPolicy;
    type Norm: NormKind;
    type Placement: Placement;

    /// Storage backing a dense matrix of this configuration.
    type Storage<T: Scalar>: Storage<T>;

    const IS_SUB_MATRIX: bool;
    const IS_BLOCKED_MATRIX: bool;
    const ON_STACK: bool;
    const IS_FIXED: bool;
}

/// Type-level parameter record.
///
/// | position | facet | default |
/// |---|---|---|
/// | `I` | sparse index width | `usize` |
/// | `O` | orientation | [`ColumnMajor`] |
/// | `S` | extent | [`VariableSize`] |
/// | `L` | leading dimension | [`NoLeadingDimension`] |
/// | `U` | unblocked dimension | [`NoUnblockedDimension`] |
/// | `N` | norm | [`NormTwo`] |
/// | `P` | placement | [`OnHeap`] |
pub struct Parameter<
    I = usize,
    O = ColumnMajor,
    S = VariableSize,
    L = NoLeadingDimension,
    U = NoUnblockedDimension,
    N = NormTwo,
    P = OnHeap,
>(PhantomData<fn() -> (I, O, S, L, U, N, P)>);

impl<I, O, S, L, U, N, P> ParameterSet for Parameter<I, O, S, L, U, N, P>
where
    I: IndexType,
    O: Orientation,
    S: Dimension,
    L: LeadingPolicy,
    U: UnblockedPolicy,
    N: NormKind,
    P: Placement,
    (S, P, L): SelectStorage,
{
    type Index = I;
    type Orientation = O;
    type Size = S;
    type Leading = L;
    type Unblocked = U;
    type Norm = N;
    type Placement = P;

    type Storage<T: Scalar> = <(S, P, L) as SelectStorage>::Storage<T>;

    const IS_SUB_MATRIX: bool = L::IS_SUB_MATRIX;
    const IS_BLOCKED_MATRIX: bool = U::IS_BLOCKED_MATRIX;
    const ON_STACK: bool = P::ON_STACK;
    const IS_FIXED: bool = S::FIXED;
}

/// Configuration of a sub-view into a matrix configured by `P`.
///
/// Views always borrow through striped storage; nesting a view inside a
/// view yields the same configuration.
pub type SubParameter<P> = Parameter<
    <P as ParameterSet>::Index,
    <P as ParameterSet>::Orientation,
    VariableSize,
    LeadingDimension,
    NoUnblockedDimension,
    <P as ParameterSet>::Norm,
    OnHeap,
>;
