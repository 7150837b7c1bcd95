//! Entry points for reading a finished buffer.

use vellum_common::{Result, error::ErrorKind, verify_data};

use crate::{
    FILE_IDENTIFIER_LENGTH, SIZE_PREFIX_LENGTH, SIZE_SOFFSET, SIZE_UOFFSET, SIZE_VOFFSET,
    follow::indirect,
    scalar::{SOffset, UOffset, read_scalar_at},
    table::Table,
    vtable::VTable,
};

/// Resolves the root table of a finished buffer.
///
/// Only the root offset, the root's vtable header and the extent of the root
/// object are checked here. Later field reads rely on slice bounds checks.
pub fn root(buf: &[u8]) -> Result<Table<'_>> {
    verify_data!(buffer_len, buf.len() >= SIZE_UOFFSET);
    check_table(buf, root_loc(buf))
}

/// Like [`root`], after checking the 4-byte identifier that follows the root
/// offset.
pub fn root_with_identifier<'a>(buf: &'a [u8], identifier: &[u8; 4]) -> Result<Table<'a>> {
    let actual = read_identifier(buf).unwrap_or_default();
    if &actual != identifier {
        log::debug!(
            "file identifier mismatch: expected {:?}, found {:?}",
            String::from_utf8_lossy(identifier),
            String::from_utf8_lossy(&actual)
        );
        return Err(ErrorKind::IdentifierMismatch {
            expected: *identifier,
            actual,
        }
        .into());
    }
    root(buf)
}

/// Returns the 4 bytes following the root offset, if the buffer is long enough.
///
/// A buffer finished without an identifier still has bytes there; they are
/// simply not meaningful.
pub fn read_identifier(buf: &[u8]) -> Option<[u8; 4]> {
    buf.get(SIZE_UOFFSET..SIZE_UOFFSET + FILE_IDENTIFIER_LENGTH)
        .and_then(|bytes| bytes.try_into().ok())
}

pub fn buffer_has_identifier(buf: &[u8], identifier: &[u8; 4]) -> bool {
    read_identifier(buf).as_ref() == Some(identifier)
}

/// Strips the length prefix of a size-prefixed buffer.
fn split_size_prefix(buf: &[u8]) -> Result<&[u8]> {
    verify_data!(buffer_len, buf.len() >= SIZE_PREFIX_LENGTH);
    let size = read_scalar_at::<UOffset>(buf, 0) as usize;
    verify_data!(size_prefix, size <= buf.len() - SIZE_PREFIX_LENGTH);
    Ok(&buf[SIZE_PREFIX_LENGTH..SIZE_PREFIX_LENGTH + size])
}

/// Resolves the root table of a buffer finished with a size prefix.
pub fn size_prefixed_root(buf: &[u8]) -> Result<Table<'_>> {
    root(split_size_prefix(buf)?)
}

pub fn size_prefixed_has_identifier(buf: &[u8], identifier: &[u8; 4]) -> bool {
    split_size_prefix(buf).is_ok_and(|inner| buffer_has_identifier(inner, identifier))
}

/// Checks that a table at `loc` and its vtable header lie within `buf`.
pub(crate) fn check_table(buf: &[u8], loc: usize) -> Result<Table<'_>> {
    verify_data!(
        table_position,
        loc.checked_add(SIZE_SOFFSET)
            .is_some_and(|end| end <= buf.len())
    );

    let soffset = read_scalar_at::<SOffset>(buf, loc) as i64;
    let vtable_loc = loc as i64 - soffset;
    verify_data!(
        vtable_position,
        vtable_loc >= 0 && vtable_loc as usize + 2 * SIZE_VOFFSET <= buf.len()
    );

    let vtable = VTable::init(buf, vtable_loc as usize);
    let vtable_len = vtable.num_bytes();
    verify_data!(
        vtable_len,
        vtable_len >= 2 * SIZE_VOFFSET && vtable_len % SIZE_VOFFSET == 0
    );
    verify_data!(vtable_len, vtable.loc() + vtable_len <= buf.len());

    let object_len = vtable.object_inline_num_bytes();
    verify_data!(object_len, object_len >= SIZE_SOFFSET);
    verify_data!(object_len, loc + object_len <= buf.len());

    Ok(Table::new(buf, loc))
}

/// Position of the table referenced by the root offset of `buf`.
pub(crate) fn root_loc(buf: &[u8]) -> usize {
    indirect(buf, 0)
}
