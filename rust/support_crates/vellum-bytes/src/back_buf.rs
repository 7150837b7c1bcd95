//! A growable byte arena that is filled from the back towards the front.

use vellum_common::{Result, error::ErrorKind};

/// A byte arena with a monotonically decreasing write cursor.
///
/// Bytes are claimed at the front of the written region, so the most recently
/// written data always has the lowest address. Positions handed out to callers
/// are measured as the distance from the *end* of the arena ("offsets"), which
/// keeps them stable when the arena is reallocated.
///
/// # Growth
/// - Capacity doubles on every reallocation, and the written bytes are copied
///   to the tail of the new allocation.
/// - Growth past `max_len` is refused with [`ErrorKind::BufferTooLarge`].
#[derive(Debug, Clone)]
pub struct BackBuf {
    /// Backing storage; the written bytes are `inner[head..]`.
    inner: Vec<u8>,
    /// Index of the first written byte.
    head: usize,
    /// Hard ceiling for the arena size.
    max_len: usize,
}

impl BackBuf {
    /// Creates an arena with the given initial capacity and size ceiling.
    ///
    /// The initial capacity is clamped to `max_len`.
    pub fn with_capacity(capacity: usize, max_len: usize) -> BackBuf {
        let capacity = capacity.min(max_len);
        BackBuf {
            inner: vec![0; capacity],
            head: capacity,
            max_len,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len() - self.head
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current size of the allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.len()
    }

    /// Bytes that can still be claimed without reallocating.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Makes sure that at least `additional` more bytes can be claimed.
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if self.head >= additional {
            return Ok(());
        }
        self.grow(additional)
    }

    #[cold]
    fn grow(&mut self, additional: usize) -> Result<()> {
        let used = self.len();
        let required = used.saturating_add(additional);
        if required > self.max_len {
            return Err(ErrorKind::BufferTooLarge {
                requested: required,
                max: self.max_len,
            }
            .into());
        }

        let old_capacity = self.inner.len();
        let new_capacity = old_capacity
            .saturating_mul(2)
            .max(required)
            .min(self.max_len);

        let mut inner = vec![0u8; new_capacity];
        inner[new_capacity - used..].copy_from_slice(self.as_slice());
        self.inner = inner;
        self.head = new_capacity - used;

        log::debug!("back buffer grew from {old_capacity} to {new_capacity} bytes");
        Ok(())
    }

    /// Writes `n` zero bytes at the front.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` bytes were reserved.
    #[inline]
    pub fn pad(&mut self, n: usize) {
        self.claim(n).fill(0);
    }

    /// Claims `n` bytes at the front of the written region and returns them
    /// for the caller to fill.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` bytes were reserved.
    #[inline]
    pub fn claim(&mut self, n: usize) -> &mut [u8] {
        assert!(n <= self.head, "claim of {n} bytes exceeds reserved space");
        self.head -= n;
        &mut self.inner[self.head..self.head + n]
    }

    /// Returns the written bytes, lowest address first.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[self.head..]
    }

    /// Returns `len` bytes starting at the position `offset` bytes before the end.
    #[inline]
    pub fn at_offset_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        let start = self.inner.len() - offset;
        &mut self.inner[start..start + len]
    }

    /// Forgets all written bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.head = self.inner.len();
    }

    /// Consumes the arena and returns the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        let mut inner = self.inner;
        inner.drain(..self.head);
        inner
    }
}
