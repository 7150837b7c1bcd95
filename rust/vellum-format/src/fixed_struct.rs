//! Fixed-layout, inline aggregates.
//!
//! A struct has no vtable: its fields live at byte displacements known entirely
//! from the schema, and it is always stored in place, never behind an offset
//! (except as a union payload).

use crate::scalar::{Scalar, read_scalar_at, write_scalar_at};

/// A schema struct with a fixed byte layout.
///
/// `SIZE` must be a non-zero multiple of `ALIGN`, and `ALIGN` must be the size
/// of the largest scalar the struct contains.
pub trait FixedStruct: Sized {
    const SIZE: usize;
    const ALIGN: usize;

    /// Encodes the struct into `dst` (exactly `SIZE` bytes, pre-zeroed so that
    /// padding needs no attention).
    fn write_to(&self, dst: &mut [u8]);

    /// Decodes the struct from `src` (exactly `SIZE` bytes).
    fn read_from(src: &[u8]) -> Self;
}

/// Zero-copy view of a struct inside a finished buffer.
#[derive(Debug, Clone, Copy)]
pub struct StructRef<'a> {
    buf: &'a [u8],
    loc: usize,
}

impl<'a> StructRef<'a> {
    #[inline]
    pub fn new(buf: &'a [u8], loc: usize) -> StructRef<'a> {
        StructRef { buf, loc }
    }

    #[inline]
    pub fn loc(&self) -> usize {
        self.loc
    }

    /// Reads the scalar at `byte_offset` within the struct.
    #[inline]
    pub fn get<T: Scalar>(&self, byte_offset: usize) -> T {
        read_scalar_at(self.buf, self.loc + byte_offset)
    }

    /// Returns a view of a struct embedded at `byte_offset`.
    #[inline]
    pub fn nested(&self, byte_offset: usize) -> StructRef<'a> {
        StructRef::new(self.buf, self.loc + byte_offset)
    }

    /// Copies the struct out of the buffer.
    pub fn decode<S: FixedStruct>(&self) -> S {
        S::read_from(&self.buf[self.loc..self.loc + S::SIZE])
    }
}

/// Mutable view of a struct inside a finished buffer.
#[derive(Debug)]
pub struct StructMut<'a> {
    buf: &'a mut [u8],
    loc: usize,
}

impl<'a> StructMut<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8], loc: usize) -> StructMut<'a> {
        StructMut { buf, loc }
    }

    #[inline]
    pub fn get<T: Scalar>(&self, byte_offset: usize) -> T {
        read_scalar_at(&*self.buf, self.loc + byte_offset)
    }

    /// Overwrites the scalar at `byte_offset` within the struct.
    #[inline]
    pub fn set<T: Scalar>(&mut self, byte_offset: usize, value: T) {
        write_scalar_at(self.buf, self.loc + byte_offset, value);
    }

    pub fn as_struct_ref(&self) -> StructRef<'_> {
        StructRef::new(&*self.buf, self.loc)
    }
}
