//! Error types for arena construction and block release.

use thiserror::Error;

/// Unified allocator error type.
///
/// Failed allocations are not errors; [`Arena::allocate`] signals them with
/// `None`. Only impossible initialization and caller misuse on release are
/// reported here.
///
/// [`Arena::allocate`]: crate::Arena::allocate
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// The supplied region cannot hold two headers plus a minimum payload.
  #[error("arena of {got} bytes is too small, need at least {need}")]
  TooSmall { need: usize, got: usize },

  /// The supplied region exceeds what a 32-bit header link can address.
  #[error("arena of {0} bytes exceeds the 4 GiB limit")]
  TooLarge(usize),

  /// A released offset lies outside the arena's usable range.
  #[error("offset {0:#x} is outside the arena")]
  OutOfRange(usize),

  /// An in-range offset that does not correspond to any allocated block.
  #[error("offset {0:#x} does not refer to an allocated block")]
  BadBlock(usize),
}
