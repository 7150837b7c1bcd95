use serde::{Deserialize, Serialize};
use vellum_common::{Result, verify_arg};

/// Hard ceiling on the size of a buffer: offsets must stay representable as
/// positive 32-bit signed values.
pub const MAX_BUFFER_SIZE: usize = (1 << 31) - 1;

/// Tuning knobs for [`BufferBuilder`](crate::BufferBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    /// Bytes allocated up front. The arena doubles whenever it runs out.
    pub initial_capacity: usize,
    /// Growing past this size fails with `BufferTooLarge`.
    pub max_size: usize,
    /// Write scalar fields even when they equal their declared default.
    pub force_defaults: bool,
    /// Share one serialized vtable among all tables with identical layouts.
    pub dedup_vtables: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            initial_capacity: 1024,
            max_size: MAX_BUFFER_SIZE,
            force_defaults: false,
            dedup_vtables: true,
        }
    }
}

impl BuilderOptions {
    pub fn new() -> BuilderOptions {
        Default::default()
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> BuilderOptions {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> BuilderOptions {
        self.max_size = max_size;
        self
    }

    pub fn with_force_defaults(mut self, force_defaults: bool) -> BuilderOptions {
        self.force_defaults = force_defaults;
        self
    }

    pub fn with_dedup_vtables(mut self, dedup_vtables: bool) -> BuilderOptions {
        self.dedup_vtables = dedup_vtables;
        self
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_size, self.max_size > 0);
        verify_arg!(max_size, self.max_size <= MAX_BUFFER_SIZE);
        verify_arg!(initial_capacity, self.initial_capacity <= self.max_size);
        Ok(())
    }
}
