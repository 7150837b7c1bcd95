//! Inspect command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use vellum_format::{
    SIZE_PREFIX_LENGTH, Table, UOffset, read_identifier, root, scalar::read_scalar_at,
    size_prefixed_root,
};

use crate::utils::{format_size, hex_bytes, parse_identifier, validate_file_exists};

#[derive(Serialize)]
struct InspectSummary {
    file_size: u64,
    file_size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_prefix: Option<u32>,
    root_offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier_matches: Option<bool>,
    root: RootTableInfo,
}

/// Positions are relative to the root offset, i.e. past any size prefix.
#[derive(Serialize)]
struct RootTableInfo {
    position: usize,
    vtable_position: usize,
    vtable_len: usize,
    object_len: usize,
    slot_count: usize,
    fields: Vec<FieldInfo>,
}

#[derive(Serialize)]
struct FieldInfo {
    slot: u16,
    offset: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<String>,
}

/// Run the inspect command
pub fn run(verbose: u8, ident: Option<String>, size_prefixed: bool, path: String) -> Result<()> {
    validate_file_exists(&path)?;
    let expected = ident.as_deref().map(parse_identifier).transpose()?;

    let data = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    log::debug!("read {} bytes from {}", data.len(), path);

    let summary = inspect_bytes(&data, expected, size_prefixed, verbose > 0)
        .with_context(|| format!("Failed to inspect {}", path))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn inspect_bytes(
    data: &[u8],
    expected: Option<[u8; 4]>,
    size_prefixed: bool,
    dump_bytes: bool,
) -> Result<InspectSummary> {
    let (size_prefix, table) = if size_prefixed {
        let table = size_prefixed_root(data).context("Invalid size-prefixed buffer")?;
        (Some(read_scalar_at::<UOffset>(data, 0)), table)
    } else {
        (None, root(data).context("Invalid buffer")?)
    };
    let buf = table.buf();
    let body = if size_prefixed {
        &data[SIZE_PREFIX_LENGTH..]
    } else {
        data
    };

    // Identifiers are only shown when they look like one.
    let identifier = read_identifier(body).filter(|id| id.iter().all(u8::is_ascii_graphic));
    let identifier_matches = expected.map(|expected| read_identifier(body) == Some(expected));
    if identifier_matches == Some(false) {
        log::warn!("file identifier does not match the expected one");
    }

    Ok(InspectSummary {
        file_size: data.len() as u64,
        file_size_human: format_size(data.len() as u64),
        size_prefix,
        root_offset: read_scalar_at::<UOffset>(buf, 0),
        identifier: identifier.map(|id| String::from_utf8_lossy(&id).into_owned()),
        identifier_matches,
        root: root_table_info(table, dump_bytes),
    })
}

fn root_table_info(table: Table<'_>, dump_bytes: bool) -> RootTableInfo {
    let vtable = table.vtable();
    let object_len = vtable.object_inline_num_bytes();
    let mut fields = vtable
        .present_fields()
        .map(|(slot, offset)| FieldInfo {
            slot,
            offset,
            bytes: None,
        })
        .collect::<Vec<_>>();

    if dump_bytes {
        // A field spans up to the next field in the object, or the object end.
        let mut ends = fields.iter().map(|f| f.offset as usize).collect::<Vec<_>>();
        ends.push(object_len);
        ends.sort_unstable();
        for field in &mut fields {
            let start = field.offset as usize;
            let end = ends
                .iter()
                .copied()
                .find(|&end| end > start)
                .unwrap_or(object_len);
            let bytes = table
                .buf()
                .get(table.loc() + start..table.loc() + end)
                .unwrap_or_default();
            field.bytes = Some(hex_bytes(bytes));
        }
    }

    RootTableInfo {
        position: table.loc(),
        vtable_position: vtable.loc(),
        vtable_len: vtable.num_bytes(),
        object_len,
        slot_count: vtable.num_fields(),
        fields,
    }
}
