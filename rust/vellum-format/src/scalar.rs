//! Fixed-width scalar encoding shared by the builder and the readers.
//!
//! Every multi-byte value in a buffer uses the same byte order: little-endian
//! unless the crate is built with the `big-endian` feature.

use byteorder::ByteOrder;

#[cfg(not(feature = "big-endian"))]
pub type Endian = byteorder::LittleEndian;

#[cfg(feature = "big-endian")]
pub type Endian = byteorder::BigEndian;

/// Forward offset: distance from its own storage location to a higher address.
pub type UOffset = u32;

/// Signed offset from a table to its vtable.
pub type SOffset = i32;

/// VTable entry: byte offset of a field within its table, `0` when absent.
pub type VOffset = u16;

/// A fixed-size value that can be stored inline in a buffer.
///
/// Equality is by value; the builder relies on it to elide fields that equal
/// their declared default.
pub trait Scalar: Copy + PartialEq + std::fmt::Debug + 'static {
    /// Encoded size in bytes, which is also the required alignment.
    const SIZE: usize;

    /// Decodes a value from the first `SIZE` bytes of `src`.
    fn read_from(src: &[u8]) -> Self;

    /// Encodes the value into the first `SIZE` bytes of `dst`.
    fn write_to(self, dst: &mut [u8]);
}

macro_rules! impl_scalar {
    ($ty:ty, $read:ident, $write:ident) => {
        impl Scalar for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn read_from(src: &[u8]) -> Self {
                Endian::$read(&src[..Self::SIZE])
            }

            #[inline]
            fn write_to(self, dst: &mut [u8]) {
                Endian::$write(&mut dst[..Self::SIZE], self)
            }
        }
    };
}

impl_scalar!(u16, read_u16, write_u16);
impl_scalar!(i16, read_i16, write_i16);
impl_scalar!(u32, read_u32, write_u32);
impl_scalar!(i32, read_i32, write_i32);
impl_scalar!(u64, read_u64, write_u64);
impl_scalar!(i64, read_i64, write_i64);
impl_scalar!(f32, read_f32, write_f32);
impl_scalar!(f64, read_f64, write_f64);

impl Scalar for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn read_from(src: &[u8]) -> Self {
        src[0]
    }

    #[inline]
    fn write_to(self, dst: &mut [u8]) {
        dst[0] = self;
    }
}

impl Scalar for i8 {
    const SIZE: usize = 1;

    #[inline]
    fn read_from(src: &[u8]) -> Self {
        src[0] as i8
    }

    #[inline]
    fn write_to(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }
}

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline]
    fn read_from(src: &[u8]) -> Self {
        src[0] != 0
    }

    #[inline]
    fn write_to(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }
}

/// Reads a scalar stored at `loc`.
#[inline]
pub fn read_scalar_at<T: Scalar>(buf: &[u8], loc: usize) -> T {
    T::read_from(&buf[loc..loc + T::SIZE])
}

/// Overwrites the scalar stored at `loc`.
#[inline]
pub fn write_scalar_at<T: Scalar>(buf: &mut [u8], loc: usize, value: T) {
    value.write_to(&mut buf[loc..loc + T::SIZE]);
}
