//! Encoding and decoding engine for the vellum table format.
//!
//! A buffer is built back-to-front by [`BufferBuilder`]: leaves (strings,
//! vectors, sub-tables) first, then the tables that reference them, and finally
//! the root offset. Readers resolve the root with [`root`] and answer field
//! queries lazily through [`Table`]; fields that are never requested are never
//! touched.
//!
//! All offsets stored in a buffer are relative to their own storage location,
//! so a finished buffer can be moved around as raw bytes.

pub mod builder;
pub mod finished;
pub mod fixed_struct;
pub mod follow;
pub mod mutate;
pub mod nested;
pub mod offset;
pub mod options;
pub mod root;
pub mod scalar;
pub mod table;
pub mod union;
pub mod vector;
pub mod vtable;
pub mod vtable_cache;

pub use builder::BufferBuilder;
pub use finished::FinishedBuffer;
pub use fixed_struct::{FixedStruct, StructMut, StructRef};
pub use follow::{Follow, ForwardsUOffset, InlineSize, StructElem};
pub use mutate::{TableMut, root_mut};
pub use offset::{Offset, StringOffset, StructOffset, TableOffset, VectorOffset};
pub use options::BuilderOptions;
pub use root::{
    buffer_has_identifier, read_identifier, root, root_with_identifier,
    size_prefixed_has_identifier, size_prefixed_root,
};
pub use scalar::{Endian, SOffset, Scalar, UOffset, VOffset};
pub use table::Table;
pub use union::{UnionOffset, UnionRef};
pub use vector::{StringVector, StructVector, TableVector, Vector};
pub use vtable::VTable;

/// Size of a forward (unsigned) offset.
pub const SIZE_UOFFSET: usize = std::mem::size_of::<UOffset>();

/// Size of the signed offset from a table to its vtable.
pub const SIZE_SOFFSET: usize = std::mem::size_of::<SOffset>();

/// Size of a single vtable entry.
pub const SIZE_VOFFSET: usize = std::mem::size_of::<VOffset>();

/// Size of the optional file identifier that follows the root offset.
pub const FILE_IDENTIFIER_LENGTH: usize = 4;

/// Size of the optional length prefix of a size-prefixed buffer.
pub const SIZE_PREFIX_LENGTH: usize = SIZE_UOFFSET;

/// Largest scalar size, and therefore the strictest alignment any element needs.
pub const LARGEST_SCALAR_SIZE: usize = 8;
