//! In-arena block header codec.
//!
//! A header occupies [`HEADER_SIZE`] bytes immediately before its block's
//! payload. The layout is:
//!
//! ```text
//!   byte 0..4   next   little-endian u32, offset of the next header
//!   byte 4      free   0 = used, 1 = free
//!   byte 5..8   reserved, written as zero
//! ```
//!
//! `next` is an offset into the arena, not an address, so a stale header can
//! never dangle; it is simply an offset no live header links to anymore.
//! Storing it as a `u32` caps the arena at 4 GiB, which the constructor
//! enforces.

use crate::align::ALIGNMENT;

/// Bytes of bookkeeping in front of every payload.
pub const HEADER_SIZE: usize = 8;

/// Smallest payload a block may carry. Splitting never produces a block
/// below this, so every header in the ring (sentinel aside) describes at
/// least this many usable bytes.
pub const MIN_PAYLOAD: usize = ALIGNMENT;

/// Decoded form of one block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
  pub next: usize,
  pub free: bool,
}

impl Header {
  pub fn new(
    next: usize,
    free: bool,
  ) -> Self {
    Self { next, free }
  }

  /// Decodes the header stored at byte offset `at`.
  pub fn read(
    memory: &[u8],
    at: usize,
  ) -> Self {
    let b = &memory[at..at + HEADER_SIZE];

    Self {
      next: u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize,
      free: b[4] != 0,
    }
  }

  /// Encodes the header into the arena at byte offset `at`.
  pub fn write(
    &self,
    memory: &mut [u8],
    at: usize,
  ) {
    let b = &mut memory[at..at + HEADER_SIZE];

    b[..4].copy_from_slice(&(self.next as u32).to_le_bytes());
    b[4] = self.free as u8;
    b[5..].fill(0);
  }
}
