//! Index types and dense side tables keyed by them.
//!
//! Node indices are plain integers wrapped in newtypes. Data associated to a
//! node is kept in [`SecondaryMap`]s indexed by those integers rather than in
//! the node records themselves.
pub mod map;

pub use map::SecondaryMap;

/// An integer-like index into dense storage.
pub trait EntityIndex: Copy + Eq + Default {
    /// Creates an index from a `usize`.
    ///
    /// # Panics
    ///
    /// Panics when `index` does not fit into the backing integer type.
    fn new(index: usize) -> Self {
        match Self::try_new(index) {
            Some(index) => index,
            None => panic!("index {index} exceeds the capacity of the index type"),
        }
    }

    /// Creates an index from a `usize`, or `None` when it does not fit.
    fn try_new(index: usize) -> Option<Self>;

    /// Returns the index as a `usize`.
    fn index(self) -> usize;
}

/// Implements [`EntityIndex`] for a tuple struct wrapping an unsigned integer.
#[macro_export]
macro_rules! entity_impl {
    ($entity:ident, $backing:ty) => {
        impl $crate::memory::EntityIndex for $entity {
            #[inline(always)]
            fn try_new(ix: usize) -> Option<Self> {
                <$backing>::try_from(ix).ok().map($entity)
            }

            #[inline(always)]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

macro_rules! int_entity_impl {
    ($entity:ident) => {
        impl $crate::memory::EntityIndex for $entity {
            #[inline(always)]
            fn try_new(ix: usize) -> Option<Self> {
                <$entity>::try_from(ix).ok()
            }

            #[inline(always)]
            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

int_entity_impl!(usize);
int_entity_impl!(u32);
