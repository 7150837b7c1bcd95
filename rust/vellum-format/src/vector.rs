//! Length-prefixed runs of inline elements.

use std::marker::PhantomData;

use crate::{
    SIZE_UOFFSET,
    follow::{Follow, ForwardsUOffset, InlineSize, StructElem},
    scalar::{UOffset, read_scalar_at},
    table::Table,
};

/// A vector at `loc` (its length prefix) whose elements `T` decodes.
///
/// Element `i` lives at `loc + 4 + i * T::INLINE_SIZE`. Indexing past the end
/// returns `None` rather than reading neighbouring bytes.
pub struct Vector<'a, T> {
    buf: &'a [u8],
    loc: usize,
    len: usize,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Vector<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Vector<'_, T> {}

impl<T> std::fmt::Debug for Vector<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector")
            .field("loc", &self.loc)
            .field("len", &self.len)
            .finish()
    }
}

/// Vector of sub-tables.
pub type TableVector<'a> = Vector<'a, ForwardsUOffset<Table<'a>>>;

/// Vector of strings; each element yields a UTF-8 check result.
pub type StringVector<'a> = Vector<'a, ForwardsUOffset<&'a str>>;

/// Vector of structs stored inline.
pub type StructVector<'a, S> = Vector<'a, StructElem<S>>;

impl<'a, T: Follow<'a> + InlineSize> Vector<'a, T> {
    #[inline]
    pub fn new(buf: &'a [u8], loc: usize) -> Vector<'a, T> {
        let len = read_scalar_at::<UOffset>(buf, loc) as usize;
        Vector {
            buf,
            loc,
            len,
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the length prefix.
    #[inline]
    pub fn loc(&self) -> usize {
        self.loc
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T::Inner> {
        if index >= self.len {
            return None;
        }
        Some(T::follow(
            self.buf,
            self.loc + SIZE_UOFFSET + index * T::INLINE_SIZE,
        ))
    }

    pub fn iter(&self) -> VectorIter<'a, T> {
        VectorIter {
            vector: *self,
            front: 0,
            back: self.len,
        }
    }

    /// The raw element bytes.
    pub fn data_bytes(&self) -> &'a [u8] {
        let start = self.loc + SIZE_UOFFSET;
        &self.buf[start..start + self.len * T::INLINE_SIZE]
    }
}

impl<'a, T: Follow<'a> + InlineSize> Follow<'a> for Vector<'a, T> {
    type Inner = Vector<'a, T>;

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> Vector<'a, T> {
        Vector::new(buf, loc)
    }
}

pub struct VectorIter<'a, T> {
    vector: Vector<'a, T>,
    front: usize,
    back: usize,
}

impl<'a, T: Follow<'a> + InlineSize> Iterator for VectorIter<'a, T> {
    type Item = T::Inner;

    fn next(&mut self) -> Option<T::Inner> {
        if self.front >= self.back {
            return None;
        }
        let item = self.vector.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Follow<'a> + InlineSize> DoubleEndedIterator for VectorIter<'a, T> {
    fn next_back(&mut self) -> Option<T::Inner> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.vector.get(self.back)
    }
}

impl<'a, T: Follow<'a> + InlineSize> ExactSizeIterator for VectorIter<'a, T> {}

impl<'a, T: Follow<'a> + InlineSize> IntoIterator for Vector<'a, T> {
    type Item = T::Inner;
    type IntoIter = VectorIter<'a, T>;

    fn into_iter(self) -> VectorIter<'a, T> {
        self.iter()
    }
}
