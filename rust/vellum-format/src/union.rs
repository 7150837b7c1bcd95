//! Discriminated unions.
//!
//! A union occupies two sibling slots of its table: a `u8` tag and an offset
//! to the payload. Both sides of the API treat the pair as one value so that
//! the tag and the payload cannot be set or read independently.

use vellum_common::{Result, error::ErrorKind, verify_arg};

use crate::{
    builder::BufferBuilder,
    fixed_struct::{FixedStruct, StructRef},
    follow::read_string,
    offset::{Offset, kind},
    table::Table,
};

/// Offset kinds that may serve as a union payload.
pub trait UnionPayload {}

impl UnionPayload for kind::Table {}
impl UnionPayload for kind::Str {}
impl UnionPayload for kind::Struct {}

/// A union value ready to be added to a table: either `NONE`, or a non-zero
/// tag together with the payload it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionOffset {
    tag: u8,
    payload: Option<Offset<kind::Table>>,
}

impl UnionOffset {
    pub const NONE: UnionOffset = UnionOffset {
        tag: 0,
        payload: None,
    };

    /// Pairs `tag` with a payload written earlier. Tag `0` is reserved for `NONE`.
    ///
    /// Struct payloads must be written out of line with
    /// [`BufferBuilder::create_struct`] before the enclosing table is started.
    pub fn new<K: UnionPayload>(tag: u8, payload: Offset<K>) -> Result<UnionOffset> {
        verify_arg!(tag, tag != 0);
        Ok(UnionOffset {
            tag,
            payload: Some(payload.cast()),
        })
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn is_none(&self) -> bool {
        self.payload.is_none()
    }
}

impl BufferBuilder {
    /// Writes a union into its tag slot and its value slot.
    ///
    /// Both slots are validated before anything is written.
    pub fn add_union(&mut self, type_slot: u16, value_slot: u16, union: UnionOffset) -> Result<()> {
        verify_arg!(value_slot, value_slot != type_slot);
        self.check_open_slot(type_slot, "add_union")?;
        self.check_open_slot(value_slot, "add_union")?;
        match union.payload {
            Some(payload) => {
                self.add_offset(value_slot, payload)?;
                self.add_scalar_always::<u8>(type_slot, union.tag)
            }
            None => Ok(()),
        }
    }
}

/// A resolved union value: its tag and the position of its payload.
#[derive(Debug, Clone, Copy)]
pub struct UnionRef<'a> {
    tag: u8,
    buf: &'a [u8],
    loc: usize,
}

impl<'a> UnionRef<'a> {
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Position of the payload.
    pub fn loc(&self) -> usize {
        self.loc
    }

    pub fn as_table(&self) -> Table<'a> {
        Table::new(self.buf, self.loc)
    }

    pub fn as_str(&self) -> Result<&'a str> {
        read_string(self.buf, self.loc)
    }

    pub fn as_struct_ref(&self) -> StructRef<'a> {
        StructRef::new(self.buf, self.loc)
    }

    pub fn as_struct<S: FixedStruct>(&self) -> S {
        self.as_struct_ref().decode::<S>()
    }
}

impl<'a> Table<'a> {
    /// Reads the union stored in `type_slot` and `value_slot`.
    ///
    /// Returns `Ok(None)` when neither slot is set and
    /// [`ErrorKind::UnionMismatch`] when only one of them is.
    pub fn get_union(&self, type_slot: u16, value_slot: u16) -> Result<Option<UnionRef<'a>>> {
        let tag = self.get::<u8>(type_slot, 0);
        match (tag, self.get_offset_pos(value_slot)) {
            (0, None) => Ok(None),
            (0, Some(_)) | (_, None) => Err(ErrorKind::UnionMismatch { tag }.into()),
            (tag, Some(loc)) => Ok(Some(UnionRef {
                tag,
                buf: self.buf(),
                loc,
            })),
        }
    }
}
