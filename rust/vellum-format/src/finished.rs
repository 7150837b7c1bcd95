use vellum_common::Result;

use crate::{
    mutate::{TableMut, root_mut},
    root::{buffer_has_identifier, root},
    table::Table,
};

/// An owned, finished buffer.
///
/// Shared borrows read it through [`Table`]; an exclusive borrow is needed to
/// mutate it through [`TableMut`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedBuffer {
    data: Vec<u8>,
}

impl FinishedBuffer {
    /// Wraps bytes produced by a builder, or received from elsewhere.
    pub fn from_vec(data: Vec<u8>) -> FinishedBuffer {
        FinishedBuffer { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn root(&self) -> Result<Table<'_>> {
        root(&self.data)
    }

    pub fn root_mut(&mut self) -> Result<TableMut<'_>> {
        root_mut(&mut self.data)
    }

    pub fn has_identifier(&self, identifier: &[u8; 4]) -> bool {
        buffer_has_identifier(&self.data, identifier)
    }
}

impl AsRef<[u8]> for FinishedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<FinishedBuffer> for Vec<u8> {
    fn from(buffer: FinishedBuffer) -> Vec<u8> {
        buffer.data
    }
}
