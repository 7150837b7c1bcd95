/// Aligns a number up to the next multiple of the specified alignment.
///
/// If the input is already aligned, it is returned unchanged.
///
/// # Examples
///
/// ```
/// use vellum_bytes::align::align_up;
///
/// assert_eq!(align_up(0, 8), 0);
/// assert_eq!(align_up(1, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 4), 12);
/// ```
///
/// # Panics
///
/// Panics in debug builds if `alignment` is zero or not a power of two.
#[inline]
pub fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (n + alignment - 1) & !(alignment - 1)
}

/// Checks if a number is a multiple of the specified alignment.
///
/// ```
/// use vellum_bytes::align::is_aligned;
///
/// assert!(is_aligned(0, 8));
/// assert!(is_aligned(16, 8));
/// assert!(!is_aligned(17, 8));
/// ```
#[inline]
pub fn is_aligned(n: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    (n & (alignment - 1)) == 0
}

/// Number of zero bytes that must be inserted in front of `len` already-written
/// bytes so that the next element of the given alignment starts on an aligned
/// boundary.
///
/// Positions are measured from the end of a backward-built buffer, which is
/// why this is the complement of the forward padding: `len + padding_len(len, a)`
/// is always a multiple of `a`.
///
/// ```
/// use vellum_bytes::align::padding_len;
///
/// assert_eq!(padding_len(0, 4), 0);
/// assert_eq!(padding_len(1, 4), 3);
/// assert_eq!(padding_len(6, 8), 2);
/// assert_eq!(padding_len(13, 1), 0);
/// ```
#[inline]
pub fn padding_len(len: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (!len).wrapping_add(1) & (alignment - 1)
}
