//! Byte-level building blocks for the vellum encoder: alignment arithmetic and
//! the backward-growing arena that serialized buffers are assembled in.

pub mod align;
pub mod back_buf;

pub use back_buf::BackBuf;
