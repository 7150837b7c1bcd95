//! Back-to-front serializer for table buffers.

use vellum_bytes::{BackBuf, align::padding_len};
use vellum_common::{
    Result,
    error::{Error, ErrorKind},
    verify_arg,
};

use crate::{
    FILE_IDENTIFIER_LENGTH, LARGEST_SCALAR_SIZE, SIZE_PREFIX_LENGTH, SIZE_SOFFSET, SIZE_UOFFSET,
    SIZE_VOFFSET,
    finished::FinishedBuffer,
    fixed_struct::FixedStruct,
    offset::{Offset, StringOffset, StructOffset, TableOffset, VectorOffset},
    options::BuilderOptions,
    scalar::{SOffset, Scalar, UOffset, VOffset, write_scalar_at},
    table::Table,
    vtable::{MAX_VTABLE_FIELDS, field_index_to_voffset},
    vtable_cache::VTableCache,
};

/// A field written into the table under construction.
#[derive(Debug, Clone, Copy)]
struct FieldLoc {
    /// Offset of the field's first byte.
    off: UOffset,
    size: usize,
    slot: u16,
}

/// A vector started with `start_vector` and not yet ended.
#[derive(Debug, Clone, Copy)]
struct VectorState {
    num_elems: usize,
    /// Builder offset where element data begins.
    start: UOffset,
    data_len: usize,
}

#[derive(Debug, Clone, Copy)]
struct ObjectState {
    /// Builder offset when the object was started.
    start: UOffset,
    num_fields: u16,
}

/// Serializes an object graph into a single buffer.
///
/// Leaves are written first: strings, vectors and sub-tables return an
/// [`Offset`] that containing tables reference afterwards. The buffer grows
/// toward lower addresses, so every reference points to a higher address, and
/// [`finish`](Self::finish) places the root offset at the very front.
///
/// Every scalar and offset is padded to its own size, measured from the end of
/// the buffer; `finish` pads the front so the total size is a multiple of the
/// strictest alignment seen, which makes those positions aligned from the
/// start as well.
///
/// Methods return [`ErrorKind::InvalidOperation`] when called out of order
/// (for example starting a table while another one is open). Such an error
/// leaves the builder in an unspecified state; call [`reset`](Self::reset)
/// before reusing it.
pub struct BufferBuilder {
    buf: BackBuf,
    options: BuilderOptions,
    /// Strictest alignment requested so far.
    min_align: usize,
    object: Option<ObjectState>,
    field_locs: Vec<FieldLoc>,
    vector: Option<VectorState>,
    vtables: VTableCache,
    vtable_scratch: Vec<u8>,
    vtables_written: usize,
    /// Size of the struct last written by `create_struct`.
    last_struct_len: usize,
    finished: bool,
}

impl BufferBuilder {
    /// Creates a builder with default options.
    pub fn new() -> BufferBuilder {
        Self::from_valid_options(BuilderOptions::default())
    }

    pub fn with_options(options: BuilderOptions) -> Result<BufferBuilder> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: BuilderOptions) -> BufferBuilder {
        BufferBuilder {
            buf: BackBuf::with_capacity(options.initial_capacity, options.max_size),
            options,
            min_align: 1,
            object: None,
            field_locs: Vec::with_capacity(16),
            vector: None,
            vtables: VTableCache::new(),
            vtable_scratch: Vec::with_capacity(64),
            vtables_written: 0,
            last_struct_len: 0,
            finished: false,
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.min_align = 1;
        self.object = None;
        self.field_locs.clear();
        self.vector = None;
        self.vtables.clear();
        self.vtables_written = 0;
        self.last_struct_len = 0;
        self.finished = false;
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn offset(&self) -> UOffset {
        self.buf.len() as UOffset
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of vtables actually serialized (shared ones count once).
    pub fn vtables_written(&self) -> usize {
        self.vtables_written
    }

    /// Returns the finished buffer: root offset first.
    pub fn finished_data(&self) -> Result<&[u8]> {
        if !self.finished {
            return Err(Error::invalid_operation(
                "finished_data: buffer is not finished",
            ));
        }
        Ok(self.buf.as_slice())
    }

    /// Consumes the builder and returns the finished buffer.
    pub fn into_finished(self) -> Result<FinishedBuffer> {
        if !self.finished {
            return Err(Error::invalid_operation(
                "into_finished: buffer is not finished",
            ));
        }
        Ok(FinishedBuffer::from_vec(self.buf.into_vec()))
    }

    /// Pads so that an element of `size` bytes, written after `additional`
    /// further bytes, lands on a multiple of `size`. Reserves room for all of it.
    pub fn prep(&mut self, size: usize, additional: usize) -> Result<()> {
        self.ensure_writable()?;
        verify_arg!(size, size.is_power_of_two());
        if size > self.min_align {
            self.min_align = size;
        }
        let align_size = padding_len(self.buf.len() + additional, size);
        self.buf.reserve(align_size + size + additional)?;
        self.buf.pad(align_size);
        Ok(())
    }

    /// Writes `n` zero bytes.
    pub fn pad(&mut self, n: usize) -> Result<()> {
        self.ensure_writable()?;
        self.buf.reserve(n)?;
        self.buf.pad(n);
        Ok(())
    }

    /// Writes an aligned scalar and returns its offset.
    pub fn push<T: Scalar>(&mut self, value: T) -> Result<UOffset> {
        self.prep(T::SIZE, 0)?;
        self.put(value);
        Ok(self.offset())
    }

    /// Writes an aligned forward offset to `target`, e.g. as an element of a
    /// vector assembled with [`start_vector`](Self::start_vector).
    pub fn push_offset<K>(&mut self, target: Offset<K>) -> Result<UOffset> {
        self.verify_written(target.value(), self.offset(), "push_offset")?;
        self.push_uoffset(target.value())?;
        Ok(self.offset())
    }

    /// Writes a scalar without alignment; room must already be reserved.
    #[inline]
    fn put<T: Scalar>(&mut self, value: T) {
        value.write_to(self.buf.claim(T::SIZE));
    }

    fn push_uoffset(&mut self, target: UOffset) -> Result<()> {
        self.prep(SIZE_UOFFSET, 0)?;
        let relative = self.offset() - target + SIZE_UOFFSET as UOffset;
        self.put::<UOffset>(relative);
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.finished {
            return Err(ErrorKind::AlreadyFinished.into());
        }
        Ok(())
    }

    fn ensure_not_nested(&self, op: &str) -> Result<()> {
        self.ensure_writable()?;
        if self.object.is_some() {
            return Err(Error::invalid_operation(format!(
                "{op}: object serialization must not be nested"
            )));
        }
        if self.vector.is_some() {
            return Err(Error::invalid_operation(format!(
                "{op}: a vector is under construction"
            )));
        }
        Ok(())
    }

    fn current_object(&self, op: &str) -> Result<ObjectState> {
        self.ensure_writable()?;
        self.object.ok_or_else(|| {
            Error::invalid_operation(format!("{op}: no object is under construction"))
        })
    }

    /// Referenced data must already be in the buffer: written before `bound`.
    fn verify_written(&self, target: UOffset, bound: UOffset, op: &str) -> Result<()> {
        if target == 0 || target > bound {
            return Err(Error::invalid_operation(format!(
                "{op}: offset {target} does not refer to data written before {bound}"
            )));
        }
        Ok(())
    }

    fn check_slot(&self, state: ObjectState, slot: u16, op: &str) -> Result<()> {
        if slot >= state.num_fields {
            return Err(Error::invalid_arg(
                "slot",
                format!(
                    "{op}: slot {slot} out of range for an object with {} fields",
                    state.num_fields
                ),
            ));
        }
        if self.field_locs.iter().any(|f| f.slot == slot) {
            return Err(Error::invalid_operation(format!(
                "{op}: slot {slot} is already set"
            )));
        }
        Ok(())
    }

    /// Validates that `slot` can receive a field of the open object.
    pub(crate) fn check_open_slot(&self, slot: u16, op: &str) -> Result<()> {
        let state = self.current_object(op)?;
        self.check_slot(state, slot, op)
    }

    /// Begins a table with `num_fields` declared slots.
    pub fn start_object(&mut self, num_fields: u16) -> Result<()> {
        self.ensure_not_nested("start_object")?;
        verify_arg!(num_fields, num_fields as usize <= MAX_VTABLE_FIELDS);
        self.field_locs.clear();
        self.object = Some(ObjectState {
            start: self.offset(),
            num_fields,
        });
        Ok(())
    }

    /// Adds a scalar field unless it equals `default` (and defaults are not
    /// forced), in which case the slot stays absent.
    pub fn add_scalar<T: Scalar>(&mut self, slot: u16, value: T, default: T) -> Result<()> {
        self.check_open_slot(slot, "add_scalar")?;
        if value == default && !self.options.force_defaults {
            return Ok(());
        }
        let off = self.push(value)?;
        self.field_locs.push(FieldLoc {
            off,
            size: T::SIZE,
            slot,
        });
        Ok(())
    }

    /// Adds a scalar field regardless of any default.
    pub fn add_scalar_always<T: Scalar>(&mut self, slot: u16, value: T) -> Result<()> {
        self.check_open_slot(slot, "add_scalar_always")?;
        let off = self.push(value)?;
        self.field_locs.push(FieldLoc {
            off,
            size: T::SIZE,
            slot,
        });
        Ok(())
    }

    /// Adds a field referencing data completed before the current object began.
    pub fn add_offset<K>(&mut self, slot: u16, offset: Offset<K>) -> Result<()> {
        let state = self.current_object("add_offset")?;
        self.check_slot(state, slot, "add_offset")?;
        self.verify_written(offset.value(), state.start, "add_offset")?;
        self.push_uoffset(offset.value())?;
        self.field_locs.push(FieldLoc {
            off: self.offset(),
            size: SIZE_UOFFSET,
            slot,
        });
        Ok(())
    }

    /// Adds a struct field. The struct must have been written by
    /// [`create_struct`](Self::create_struct) immediately before this call.
    pub fn add_struct(&mut self, slot: u16, offset: StructOffset) -> Result<()> {
        let state = self.current_object("add_struct")?;
        self.check_slot(state, slot, "add_struct")?;
        if offset.value() != self.offset() || offset.value() <= state.start {
            return Err(Error::invalid_operation(
                "add_struct: struct must be serialized inline, right before it is added",
            ));
        }
        self.field_locs.push(FieldLoc {
            off: offset.value(),
            size: self.last_struct_len,
            slot,
        });
        Ok(())
    }

    /// Writes a fixed-layout struct in place.
    pub fn create_struct<S: FixedStruct>(&mut self, value: &S) -> Result<StructOffset> {
        self.prep(S::ALIGN, S::SIZE)?;
        let dst = self.buf.claim(S::SIZE);
        dst.fill(0);
        value.write_to(dst);
        self.last_struct_len = S::SIZE;
        Ok(Offset::new(self.offset()))
    }

    /// Completes the open table: writes its vtable (or reuses an identical one)
    /// and returns the table's offset.
    pub fn end_object(&mut self) -> Result<TableOffset> {
        let state = self.current_object("end_object")?;

        self.push::<SOffset>(0)?;
        let object_off = self.offset();
        // Padding written before the first field is not part of the object.
        let object_len = self
            .field_locs
            .iter()
            .map(|loc| (object_off - loc.off) as usize + loc.size)
            .fold(SIZE_SOFFSET, usize::max);
        if object_len > VOffset::MAX as usize {
            return Err(Error::invalid_operation(format!(
                "end_object: object of {object_len} bytes is too large for a vtable"
            )));
        }

        let vtable_len = field_index_to_voffset(state.num_fields);
        self.vtable_scratch.clear();
        self.vtable_scratch.resize(vtable_len, 0);
        write_scalar_at(&mut self.vtable_scratch, 0, vtable_len as VOffset);
        write_scalar_at(&mut self.vtable_scratch, SIZE_VOFFSET, object_len as VOffset);
        for loc in &self.field_locs {
            let field_pos = (object_off - loc.off) as VOffset;
            write_scalar_at(
                &mut self.vtable_scratch,
                field_index_to_voffset(loc.slot),
                field_pos,
            );
        }
        self.field_locs.clear();
        self.object = None;

        let existing = if self.options.dedup_vtables {
            self.vtables.lookup(&self.vtable_scratch)
        } else {
            None
        };

        let vtable_off = match existing {
            Some(off) => {
                log::trace!("reusing vtable at {off} for object at {object_off}");
                off
            }
            None => {
                self.prep(SIZE_VOFFSET, vtable_len)?;
                self.buf
                    .claim(vtable_len)
                    .copy_from_slice(&self.vtable_scratch);
                let off = self.offset();
                if self.options.dedup_vtables {
                    self.vtables.insert(&self.vtable_scratch, off);
                }
                self.vtables_written += 1;
                off
            }
        };

        // Stored as table position minus vtable position.
        let soffset = vtable_off as i64 - object_off as i64;
        write_scalar_at(
            self.buf.at_offset_mut(object_off as usize, SIZE_SOFFSET),
            0,
            soffset as SOffset,
        );
        Ok(Offset::new(object_off))
    }

    /// Checks that a table finished earlier has `slot` present.
    pub fn required(&self, table: TableOffset, slot: u16) -> Result<()> {
        let written = self.buf.as_slice();
        verify_arg!(
            table,
            table.value() != 0 && table.value() as usize <= written.len()
        );
        let table = Table::new(written, written.len() - table.value() as usize);
        if table.has(slot) {
            Ok(())
        } else {
            Err(ErrorKind::RequiredFieldMissing { slot }.into())
        }
    }

    /// Begins a vector of `num_elems` elements of `elem_size` bytes each.
    ///
    /// Elements are then written last to first with [`push`](Self::push) or
    /// [`push_offset`](Self::push_offset), and the vector is completed with
    /// [`end_vector`](Self::end_vector).
    pub fn start_vector(
        &mut self,
        elem_size: usize,
        num_elems: usize,
        alignment: usize,
    ) -> Result<()> {
        self.ensure_not_nested("start_vector")?;
        let data_len = elem_size.checked_mul(num_elems).ok_or_else(|| {
            Error::invalid_arg("num_elems", format!("{num_elems} elements overflow"))
        })?;
        self.prep(SIZE_UOFFSET, data_len)?;
        self.prep(alignment, data_len)?;
        self.vector = Some(VectorState {
            num_elems,
            start: self.offset(),
            data_len,
        });
        Ok(())
    }

    /// Writes the length prefix of the vector under construction.
    pub fn end_vector(&mut self) -> Result<VectorOffset> {
        self.ensure_writable()?;
        let vector = self.vector.take().ok_or_else(|| {
            Error::invalid_operation("end_vector: no vector is under construction")
        })?;
        let written = (self.offset() - vector.start) as usize;
        if written != vector.data_len {
            return Err(Error::invalid_operation(format!(
                "end_vector: {written} bytes written, expected {} for {} elements",
                vector.data_len, vector.num_elems
            )));
        }
        self.buf.reserve(SIZE_UOFFSET)?;
        self.put::<UOffset>(vector.num_elems as UOffset);
        Ok(Offset::new(self.offset()))
    }

    /// Writes a vector of scalars; `items[0]` ends up at the lowest address.
    pub fn create_vector<T: Scalar>(&mut self, items: &[T]) -> Result<VectorOffset> {
        self.start_vector(T::SIZE, items.len(), T::SIZE)?;
        let dst = self.buf.claim(T::SIZE * items.len());
        for (chunk, item) in dst.chunks_exact_mut(T::SIZE).zip(items) {
            item.write_to(chunk);
        }
        self.end_vector()
    }

    /// Writes a vector of bytes.
    pub fn create_byte_vector(&mut self, bytes: &[u8]) -> Result<VectorOffset> {
        self.create_byte_vector_aligned(bytes, 1)
    }

    /// Writes a vector of bytes whose data starts at a multiple of `alignment`.
    pub fn create_byte_vector_aligned(
        &mut self,
        bytes: &[u8],
        alignment: usize,
    ) -> Result<VectorOffset> {
        verify_arg!(
            alignment,
            alignment.is_power_of_two() && alignment <= LARGEST_SCALAR_SIZE
        );
        self.start_vector(1, bytes.len(), alignment)?;
        self.buf.claim(bytes.len()).copy_from_slice(bytes);
        self.end_vector()
    }

    /// Writes a vector of offsets to strings or tables completed earlier.
    pub fn create_vector_of_offsets<K>(&mut self, items: &[Offset<K>]) -> Result<VectorOffset> {
        self.ensure_not_nested("create_vector_of_offsets")?;
        let bound = self.offset();
        for item in items {
            self.verify_written(item.value(), bound, "create_vector_of_offsets")?;
        }
        self.start_vector(SIZE_UOFFSET, items.len(), SIZE_UOFFSET)?;
        for item in items.iter().rev() {
            let relative = self.offset() - item.value() + SIZE_UOFFSET as UOffset;
            self.put::<UOffset>(relative);
        }
        self.end_vector()
    }

    /// Writes a vector of fixed-layout structs stored inline.
    pub fn create_vector_of_structs<S: FixedStruct>(
        &mut self,
        items: &[S],
    ) -> Result<VectorOffset> {
        verify_arg!(struct_size, S::SIZE > 0);
        self.start_vector(S::SIZE, items.len(), S::ALIGN)?;
        let dst = self.buf.claim(S::SIZE * items.len());
        dst.fill(0);
        for (chunk, item) in dst.chunks_exact_mut(S::SIZE).zip(items) {
            item.write_to(chunk);
        }
        self.end_vector()
    }

    /// Writes a UTF-8 string with a trailing zero byte not counted in its length.
    pub fn create_string(&mut self, s: &str) -> Result<StringOffset> {
        self.create_byte_string(s.as_bytes())
    }

    /// Writes raw bytes using the string layout.
    pub fn create_byte_string(&mut self, bytes: &[u8]) -> Result<StringOffset> {
        self.ensure_not_nested("create_string")?;
        self.prep(SIZE_UOFFSET, bytes.len() + 1)?;
        self.put::<u8>(0);
        self.buf.claim(bytes.len()).copy_from_slice(bytes);
        self.buf.reserve(SIZE_UOFFSET)?;
        self.put::<UOffset>(bytes.len() as UOffset);
        Ok(Offset::new(self.offset()))
    }

    /// Writes the root offset (and optional identifier) at the front of the
    /// buffer. No further writes are accepted afterwards.
    pub fn finish(&mut self, root: TableOffset, file_identifier: Option<&[u8; 4]>) -> Result<()> {
        self.finish_with(root, file_identifier, false)
    }

    /// Like [`finish`](Self::finish), preceded by a `u32` length of the rest of
    /// the buffer.
    pub fn finish_size_prefixed(
        &mut self,
        root: TableOffset,
        file_identifier: Option<&[u8; 4]>,
    ) -> Result<()> {
        self.finish_with(root, file_identifier, true)
    }

    fn finish_with(
        &mut self,
        root: TableOffset,
        file_identifier: Option<&[u8; 4]>,
        size_prefixed: bool,
    ) -> Result<()> {
        self.ensure_not_nested("finish")?;
        self.verify_written(root.value(), self.offset(), "finish")?;

        let identifier_len = if file_identifier.is_some() {
            FILE_IDENTIFIER_LENGTH
        } else {
            0
        };
        let prefix_len = if size_prefixed { SIZE_PREFIX_LENGTH } else { 0 };
        let min_align = self.min_align.max(SIZE_UOFFSET);
        self.prep(min_align, SIZE_UOFFSET + identifier_len + prefix_len)?;

        if let Some(identifier) = file_identifier {
            self.buf
                .claim(FILE_IDENTIFIER_LENGTH)
                .copy_from_slice(identifier);
        }
        self.push_uoffset(root.value())?;
        if size_prefixed {
            let size = self.offset();
            self.buf.reserve(SIZE_PREFIX_LENGTH)?;
            self.put::<UOffset>(size);
        }

        self.finished = true;
        log::debug!(
            "finished buffer of {} bytes with {} vtables",
            self.offset(),
            self.vtables_written
        );
        Ok(())
    }
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}
