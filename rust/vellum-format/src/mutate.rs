//! In-place updates of a finished buffer.
//!
//! Mutation rewrites bytes that already exist. It never changes which fields
//! are present and never resizes the buffer. A [`TableMut`] can only be
//! obtained from an exclusively borrowed `&mut [u8]`, so read-only storage
//! (a shared slice, a read-only mapping) cannot be mutated at all.

use vellum_common::Result;

use crate::{
    SIZE_UOFFSET,
    fixed_struct::StructMut,
    follow::indirect,
    root::{check_table, root},
    scalar::{Scalar, UOffset, read_scalar_at, write_scalar_at},
    table::Table,
};

/// Mutable view of a table at `loc`.
#[derive(Debug)]
pub struct TableMut<'a> {
    buf: &'a mut [u8],
    loc: usize,
}

/// Resolves the root table of a finished buffer for mutation.
pub fn root_mut(buf: &mut [u8]) -> Result<TableMut<'_>> {
    let loc = root(&*buf)?.loc();
    Ok(TableMut::new(buf, loc))
}

impl<'a> TableMut<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8], loc: usize) -> TableMut<'a> {
        TableMut { buf, loc }
    }

    #[inline]
    pub fn loc(&self) -> usize {
        self.loc
    }

    /// Read access to the same table.
    #[inline]
    pub fn as_table(&self) -> Table<'_> {
        Table::new(&*self.buf, self.loc)
    }

    fn field_pos(&self, slot: u16) -> Option<usize> {
        match self.as_table().field_offset(slot) {
            0 => None,
            off => Some(self.loc + off as usize),
        }
    }

    /// Overwrites a present scalar field. Returns `false`, leaving the buffer
    /// untouched, when the field is absent.
    pub fn mutate<T: Scalar>(&mut self, slot: u16, value: T) -> bool {
        match self.field_pos(slot) {
            Some(pos) => {
                write_scalar_at(self.buf, pos, value);
                true
            }
            None => false,
        }
    }

    /// Overwrites element `index` of a present scalar vector field.
    ///
    /// Returns `false` when the field is absent or the index is out of range.
    pub fn mutate_vector_element<T: Scalar>(&mut self, slot: u16, index: usize, value: T) -> bool {
        let Some(pos) = self.as_table().get_offset_pos(slot) else {
            return false;
        };
        let len = read_scalar_at::<UOffset>(&*self.buf, pos) as usize;
        if index >= len {
            return false;
        }
        write_scalar_at(self.buf, pos + SIZE_UOFFSET + index * T::SIZE, value);
        true
    }

    /// Re-points a present offset field at the data found at `target`.
    ///
    /// `target` must lie after the field itself, since stored offsets only
    /// point forward. Returns `false` otherwise, or when the field is absent.
    pub fn mutate_offset(&mut self, slot: u16, target: usize) -> bool {
        let Some(pos) = self.field_pos(slot) else {
            return false;
        };
        if target <= pos || target >= self.buf.len() {
            return false;
        }
        match UOffset::try_from(target - pos) {
            Ok(relative) => {
                write_scalar_at(self.buf, pos, relative);
                true
            }
            Err(_) => false,
        }
    }

    /// Descends into a present sub-table field.
    pub fn table_mut(&mut self, slot: u16) -> Option<Result<TableMut<'_>>> {
        let pos = self.field_pos(slot)?;
        let loc = indirect(&*self.buf, pos);
        if let Err(e) = check_table(&*self.buf, loc) {
            return Some(Err(e));
        }
        Some(Ok(TableMut::new(&mut *self.buf, loc)))
    }

    /// Mutable view of a present inline struct field.
    pub fn struct_mut(&mut self, slot: u16) -> Option<StructMut<'_>> {
        let pos = self.field_pos(slot)?;
        Some(StructMut::new(&mut *self.buf, pos))
    }
}
