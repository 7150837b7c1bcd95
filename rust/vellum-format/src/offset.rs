//! Typed handles to data already written by a [`BufferBuilder`](crate::BufferBuilder).

use std::marker::PhantomData;

use crate::scalar::UOffset;

/// Marker types describing what an [`Offset`] points to.
pub mod kind {
    /// A table (object with a vtable).
    pub enum Table {}
    /// A length-prefixed, zero-terminated string.
    pub enum Str {}
    /// A length-prefixed vector.
    pub enum Vector {}
    /// A fixed-layout struct.
    pub enum Struct {}
}

/// Position of previously written data inside an unfinished buffer, measured as
/// the number of bytes between that data and the end of the buffer.
///
/// Because the builder writes backward, an offset stays valid no matter how much
/// is written afterwards, and every offset handed out is smaller than the
/// builder's current [`offset`](crate::BufferBuilder::offset).
pub struct Offset<K> {
    value: UOffset,
    _kind: PhantomData<fn() -> K>,
}

pub type TableOffset = Offset<kind::Table>;
pub type StringOffset = Offset<kind::Str>;
pub type VectorOffset = Offset<kind::Vector>;
pub type StructOffset = Offset<kind::Struct>;

impl<K> Offset<K> {
    #[inline]
    pub fn new(value: UOffset) -> Offset<K> {
        Offset {
            value,
            _kind: PhantomData,
        }
    }

    #[inline]
    pub fn value(self) -> UOffset {
        self.value
    }

    /// Reinterprets the offset as pointing to a different kind of data.
    #[inline]
    pub fn cast<L>(self) -> Offset<L> {
        Offset::new(self.value)
    }
}

impl<K> Clone for Offset<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Offset<K> {}

impl<K> PartialEq for Offset<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Offset<K> {}

impl<K> std::hash::Hash for Offset<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> std::fmt::Debug for Offset<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Offset").field(&self.value).finish()
    }
}
