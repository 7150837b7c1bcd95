//! Rules for turning a position in a finished buffer into a typed value.

use std::marker::PhantomData;

use vellum_common::Result;

use crate::{
    SIZE_UOFFSET,
    fixed_struct::FixedStruct,
    scalar::{UOffset, read_scalar_at},
};

/// Decodes a value of some kind found at `loc` in `buf`.
pub trait Follow<'a> {
    type Inner;

    fn follow(buf: &'a [u8], loc: usize) -> Self::Inner;
}

/// Number of bytes an element occupies when stored inline in a vector.
pub trait InlineSize {
    const INLINE_SIZE: usize;
}

macro_rules! impl_follow_scalar {
    ($($ty:ty),*) => {
        $(
            impl<'a> Follow<'a> for $ty {
                type Inner = $ty;

                #[inline]
                fn follow(buf: &'a [u8], loc: usize) -> $ty {
                    read_scalar_at::<$ty>(buf, loc)
                }
            }

            impl InlineSize for $ty {
                const INLINE_SIZE: usize = std::mem::size_of::<$ty>();
            }
        )*
    };
}

impl_follow_scalar!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// An element stored as a forward offset to the real data: one extra hop.
pub struct ForwardsUOffset<T>(PhantomData<T>);

impl<'a, T: Follow<'a>> Follow<'a> for ForwardsUOffset<T> {
    type Inner = T::Inner;

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> T::Inner {
        T::follow(buf, indirect(buf, loc))
    }
}

impl<T> InlineSize for ForwardsUOffset<T> {
    const INLINE_SIZE: usize = SIZE_UOFFSET;
}

impl<'a> Follow<'a> for &'a str {
    type Inner = Result<&'a str>;

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> Result<&'a str> {
        read_string(buf, loc)
    }
}

impl<'a> Follow<'a> for &'a [u8] {
    type Inner = &'a [u8];

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> &'a [u8] {
        read_byte_vector(buf, loc)
    }
}

/// A fixed-layout struct stored inline, decoded by value.
pub struct StructElem<S>(PhantomData<S>);

impl<'a, S: FixedStruct> Follow<'a> for StructElem<S> {
    type Inner = S;

    #[inline]
    fn follow(buf: &'a [u8], loc: usize) -> S {
        S::read_from(&buf[loc..loc + S::SIZE])
    }
}

impl<S: FixedStruct> InlineSize for StructElem<S> {
    const INLINE_SIZE: usize = S::SIZE;
}

/// Resolves the forward offset stored at `loc` to the position it refers to.
///
/// The stored value is relative to `loc` itself, not to any enclosing object.
#[inline]
pub fn indirect(buf: &[u8], loc: usize) -> usize {
    loc + read_scalar_at::<UOffset>(buf, loc) as usize
}

/// Returns the payload of the length-prefixed byte vector at `loc`.
#[inline]
pub fn read_byte_vector(buf: &[u8], loc: usize) -> &[u8] {
    let len = read_scalar_at::<UOffset>(buf, loc) as usize;
    let start = loc + SIZE_UOFFSET;
    &buf[start..start + len]
}

/// Returns the string at `loc`; the implicit zero terminator is not included.
#[inline]
pub fn read_string(buf: &[u8], loc: usize) -> Result<&str> {
    Ok(std::str::from_utf8(read_byte_vector(buf, loc))?)
}
