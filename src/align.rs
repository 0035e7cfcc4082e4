//! Alignment helpers for the 8-byte allocation quantum.
//!
//! Every header offset and every payload size the allocator hands out is a
//! multiple of [`ALIGNMENT`]. Requested sizes are rounded up with
//! [`align_up`]; the usable end of the arena is rounded down with
//! [`align_down`].

/// The allocation quantum. Payload sizes and block offsets are multiples of
/// this value.
pub const ALIGNMENT: usize = 8;

/// Rounds `value` up to the next multiple of [`ALIGNMENT`].
///
/// ```rust
/// use ringalloc::align::align_up;
///
/// assert_eq!(align_up(0), 0);
/// assert_eq!(align_up(13), 16);
/// assert_eq!(align_up(16), 16);
/// ```
pub const fn align_up(value: usize) -> usize {
  (value + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// Rounds `value` down to the previous multiple of [`ALIGNMENT`].
///
/// ```rust
/// use ringalloc::align::align_down;
///
/// assert_eq!(align_down(7), 0);
/// assert_eq!(align_down(24), 24);
/// assert_eq!(align_down(31), 24);
/// ```
pub const fn align_down(value: usize) -> usize {
  value & !(ALIGNMENT - 1)
}
