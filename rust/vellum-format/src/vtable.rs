//! Read-only view of a serialized vtable.
//!
//! Layout: `num_bytes:u16`, `object_num_bytes:u16`, then one `u16` per declared
//! field holding the field's byte offset within its table (`0` = absent).

use crate::{
    SIZE_VOFFSET,
    scalar::{VOffset, read_scalar_at},
};

/// Number of metadata entries preceding the per-field entries.
pub const VTABLE_METADATA_FIELDS: usize = 2;

/// Largest field count a vtable can describe.
pub const MAX_VTABLE_FIELDS: usize = u16::MAX as usize / SIZE_VOFFSET - VTABLE_METADATA_FIELDS;

/// Byte position of the entry for `slot` within a vtable.
#[inline]
pub fn field_index_to_voffset(slot: u16) -> usize {
    (slot as usize + VTABLE_METADATA_FIELDS) * SIZE_VOFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VTable<'a> {
    buf: &'a [u8],
    loc: usize,
}

impl<'a> VTable<'a> {
    #[inline]
    pub fn init(buf: &'a [u8], loc: usize) -> VTable<'a> {
        VTable { buf, loc }
    }

    #[inline]
    pub fn loc(&self) -> usize {
        self.loc
    }

    /// Total vtable size in bytes, metadata included.
    #[inline]
    pub fn num_bytes(&self) -> usize {
        read_scalar_at::<VOffset>(self.buf, self.loc) as usize
    }

    /// Size of the inline part of the referencing table, its vtable offset included.
    #[inline]
    pub fn object_inline_num_bytes(&self) -> usize {
        read_scalar_at::<VOffset>(self.buf, self.loc + SIZE_VOFFSET) as usize
    }

    /// Number of field slots declared by the schema version that wrote the buffer.
    #[inline]
    pub fn num_fields(&self) -> usize {
        (self.num_bytes() / SIZE_VOFFSET).saturating_sub(VTABLE_METADATA_FIELDS)
    }

    /// Returns the byte offset of `slot` within the table, or `0` when the field
    /// is absent, including slots beyond the vtable's declared length.
    #[inline]
    pub fn get(&self, slot: u16) -> VOffset {
        let voffset = field_index_to_voffset(slot);
        if voffset >= self.num_bytes() {
            return 0;
        }
        read_scalar_at::<VOffset>(self.buf, self.loc + voffset)
    }

    /// Iterates over `(slot, byte offset)` for every present field.
    pub fn present_fields(self) -> impl Iterator<Item = (u16, VOffset)> + 'a {
        (0..self.num_fields() as u16).filter_map(move |slot| {
            let offset = self.get(slot);
            (offset != 0).then_some((slot, offset))
        })
    }

    /// Raw vtable bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buf[self.loc..self.loc + self.num_bytes()]
    }
}
