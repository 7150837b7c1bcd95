use ahash::AHashMap;

use crate::scalar::UOffset;

/// Maps serialized vtables to the location where they were first written.
///
/// Two vtables are the same entry iff their bytes are identical (same length,
/// same object size, same per-slot offsets, trailing empty slots included).
/// Which schema produced them does not matter.
#[derive(Debug, Default, Clone)]
pub struct VTableCache {
    /// Encoded vtable bytes to offset (distance from the buffer end).
    entries: AHashMap<Box<[u8]>, UOffset>,
    hits: u64,
}

impl VTableCache {
    pub fn new() -> VTableCache {
        Default::default()
    }

    /// Returns the offset of a previously written vtable equal to `vtable`.
    pub fn lookup(&mut self, vtable: &[u8]) -> Option<UOffset> {
        let found = self.entries.get(vtable).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    /// Records a newly written vtable. The first location wins if the same
    /// bytes are inserted twice.
    pub fn insert(&mut self, vtable: &[u8], offset: UOffset) {
        self.entries.entry(vtable.into()).or_insert(offset);
    }

    /// Number of distinct vtables recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful lookups since the last `clear`.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}
