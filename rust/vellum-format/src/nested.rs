//! Finished buffers embedded as byte vectors of an outer buffer.

use vellum_common::Result;

use crate::{
    LARGEST_SCALAR_SIZE, builder::BufferBuilder, follow::read_byte_vector, offset::VectorOffset,
    root::root, table::Table,
};

impl BufferBuilder {
    /// Embeds a finished buffer as a byte vector.
    ///
    /// The vector data is aligned to the largest scalar size, so the embedded
    /// buffer keeps every alignment it was built with.
    pub fn create_nested_buffer(&mut self, finished: &[u8]) -> Result<VectorOffset> {
        self.create_byte_vector_aligned(finished, LARGEST_SCALAR_SIZE)
    }
}

impl<'a> Table<'a> {
    /// The raw bytes of a nested buffer field.
    pub fn get_nested_buffer(&self, slot: u16) -> Option<&'a [u8]> {
        self.get_offset_pos(slot)
            .map(|pos| read_byte_vector(self.buf(), pos))
    }

    /// Resolves the root of a nested buffer field, without copying and
    /// without consulting the outer buffer.
    pub fn get_nested_root(&self, slot: u16) -> Option<Result<Table<'a>>> {
        self.get_nested_buffer(slot).map(root)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BufferBuilder, root};

    #[test]
    fn test_nested_data_is_aligned() {
        let mut inner = BufferBuilder::new();
        inner.start_object(1).unwrap();
        inner.add_scalar::<f64>(0, 2.5, 0.0).unwrap();
        let table = inner.end_object().unwrap();
        inner.finish(table, None).unwrap();
        let inner = inner.finished_data().unwrap();

        let mut outer = BufferBuilder::new();
        outer.create_string("pad").unwrap();
        let nested = outer.create_nested_buffer(inner).unwrap();
        outer.start_object(1).unwrap();
        outer.add_offset(0, nested).unwrap();
        let table = outer.end_object().unwrap();
        outer.finish(table, None).unwrap();

        let buf = outer.finished_data().unwrap();
        let table = root(buf).unwrap();
        let bytes = table.get_nested_buffer(0).unwrap();
        assert_eq!(bytes, inner);
        let start = bytes.as_ptr() as usize - buf.as_ptr() as usize;
        assert_eq!(start % 8, 0);
        let nested = table.get_nested_root(0).unwrap().unwrap();
        assert_eq!(nested.get::<f64>(0, 0.0), 2.5);
    }
}
