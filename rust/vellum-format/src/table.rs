//! Lazy field access over a table in a finished buffer.

use vellum_common::Result;

use crate::{
    fixed_struct::{FixedStruct, StructRef},
    follow::{Follow, InlineSize, indirect, read_byte_vector, read_string},
    scalar::{SOffset, Scalar, UOffset, VOffset, read_scalar_at},
    vector::Vector,
    vtable::VTable,
};

/// A table positioned at `loc` within `buf`.
///
/// Nothing is decoded up front. Each accessor consults the vtable and, when
/// the slot is absent, answers from the caller-supplied default without
/// touching the field bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table<'a> {
    buf: &'a [u8],
    loc: usize,
}

impl<'a> Table<'a> {
    #[inline]
    pub fn new(buf: &'a [u8], loc: usize) -> Table<'a> {
        Table { buf, loc }
    }

    #[inline]
    pub fn buf(&self) -> &'a [u8] {
        self.buf
    }

    #[inline]
    pub fn loc(&self) -> usize {
        self.loc
    }

    /// The vtable describing this table's layout.
    #[inline]
    pub fn vtable(&self) -> VTable<'a> {
        let soffset = read_scalar_at::<SOffset>(self.buf, self.loc);
        VTable::init(self.buf, (self.loc as isize - soffset as isize) as usize)
    }

    /// Byte offset of `slot` within the table, `0` when absent.
    #[inline]
    pub fn field_offset(&self, slot: u16) -> VOffset {
        self.vtable().get(slot)
    }

    #[inline]
    pub fn has(&self, slot: u16) -> bool {
        self.field_offset(slot) != 0
    }

    #[inline]
    fn field_pos(&self, slot: u16) -> Option<usize> {
        match self.field_offset(slot) {
            0 => None,
            off => Some(self.loc + off as usize),
        }
    }

    /// Reads a scalar field, falling back to `default` when absent.
    #[inline]
    pub fn get<T: Scalar>(&self, slot: u16, default: T) -> T {
        self.get_optional(slot).unwrap_or(default)
    }

    /// Reads a scalar field that has no meaningful default.
    #[inline]
    pub fn get_optional<T: Scalar>(&self, slot: u16) -> Option<T> {
        self.field_pos(slot)
            .map(|pos| read_scalar_at::<T>(self.buf, pos))
    }

    /// Resolves an offset field to the absolute position of its target.
    ///
    /// The stored offset is relative to the field's own location.
    #[inline]
    pub fn get_offset_pos(&self, slot: u16) -> Option<usize> {
        self.field_pos(slot).map(|pos| indirect(self.buf, pos))
    }

    /// Reads a string field.
    pub fn get_str(&self, slot: u16) -> Result<Option<&'a str>> {
        self.get_offset_pos(slot)
            .map(|pos| read_string(self.buf, pos))
            .transpose()
    }

    /// Reads a string field as raw bytes, without UTF-8 validation.
    pub fn get_byte_string(&self, slot: u16) -> Option<&'a [u8]> {
        self.get_offset_pos(slot)
            .map(|pos| read_byte_vector(self.buf, pos))
    }

    /// Reads a sub-table field.
    pub fn get_table(&self, slot: u16) -> Option<Table<'a>> {
        self.get_offset_pos(slot)
            .map(|pos| Table::new(self.buf, pos))
    }

    /// Returns a view of an inline struct field.
    pub fn get_struct(&self, slot: u16) -> Option<StructRef<'a>> {
        self.field_pos(slot).map(|pos| StructRef::new(self.buf, pos))
    }

    /// Copies an inline struct field out of the buffer.
    pub fn get_struct_as<S: FixedStruct>(&self, slot: u16) -> Option<S> {
        self.get_struct(slot).map(|s| s.decode::<S>())
    }

    /// Reads a vector field with elements decoded by `T`.
    pub fn get_vector<T>(&self, slot: u16) -> Option<Vector<'a, T>>
    where
        T: Follow<'a> + InlineSize,
    {
        self.get_offset_pos(slot)
            .map(|pos| Vector::new(self.buf, pos))
    }

    /// Element count of a vector field, `0` when absent.
    pub fn vector_len(&self, slot: u16) -> usize {
        self.get_offset_pos(slot)
            .map_or(0, |pos| read_scalar_at::<UOffset>(self.buf, pos) as usize)
    }
}

impl<'a> Follow<'a> for Table<'a> {
    type Inner = Table<'a>;

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> Table<'a> {
        Table::new(buf, loc)
    }
}
