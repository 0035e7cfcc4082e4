use tracing::{debug, trace};

use crate::align::{align_down, align_up};
use crate::error::Error;
use crate::header::{HEADER_SIZE, Header, MIN_PAYLOAD};

/// Offset of the first header. Offsets are relative to the arena base, so
/// the first header needs no rounding.
const FIRST: usize = 0;

/// Smallest region `Arena::new` accepts: two headers plus one minimum
/// payload, after the end of the region has been aligned down.
const MIN_ARENA: usize = 2 * HEADER_SIZE + MIN_PAYLOAD;

/// Handle to an allocated block, wrapping the byte offset of its payload.
///
/// Obtained from [`Arena::allocate`] and given back to [`Arena::release`].
/// The handle stays `Copy` so callers can hold it in plain data structures;
/// the arena validates it on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block(usize);

impl Block {
  /// Byte offset of the payload within the arena. Always a multiple of the
  /// allocation quantum.
  pub fn offset(&self) -> usize {
    self.0
  }
}

/// One entry of a [`Arena::blocks`] walk: a header's position, derived
/// payload size, and free flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  pub offset: usize,
  pub size: usize,
  pub free: bool,
}

/// Next-fit allocator over a caller-supplied byte region.
///
/// The arena partitions `[0, limit)` of the borrowed slice into blocks, each
/// preceded by an 8-byte header. Headers form a circular singly linked ring
/// closed by a permanently-used, zero-sized sentinel at `limit - 8`.
///
/// No internal locking is provided: the arena is single-threaded and
/// non-reentrant, and concurrent callers need an external mutex around it.
pub struct Arena<'a> {
  memory: &'a mut [u8],
  /// End of the usable range, the region length aligned down.
  limit: usize,
  /// Offset of the sentinel header, `limit - HEADER_SIZE`.
  sentinel: usize,
  /// Where the next allocation search begins.
  cursor: usize,
}

impl<'a> Arena<'a> {
  /// Builds the two-header ring over `memory` and returns the allocator.
  ///
  /// The usable range is `[0, align_down(memory.len()))`; aligning the end
  /// downward costs at most 7 bytes and keeps every header offset a multiple
  /// of the quantum. Fails with [`Error::TooSmall`] if the aligned region
  /// cannot hold two headers plus a minimum payload, and with
  /// [`Error::TooLarge`] past the 4 GiB reach of a header link.
  pub fn new(memory: &'a mut [u8]) -> Result<Self, Error> {
    if memory.len() > u32::MAX as usize {
      return Err(Error::TooLarge(memory.len()));
    }

    let limit = align_down(memory.len());

    if limit < MIN_ARENA {
      return Err(Error::TooSmall {
        need: MIN_ARENA,
        got: memory.len(),
      });
    }

    let sentinel = limit - HEADER_SIZE;

    let mut arena = Self {
      memory,
      limit,
      sentinel,
      cursor: FIRST,
    };

    arena.set_header(FIRST, Header::new(sentinel, true));
    arena.set_header(sentinel, Header::new(FIRST, false));

    trace!(limit, sentinel, "arena initialized");

    Ok(arena)
  }

  /// Usable bytes when no block is allocated: the region minus the first
  /// header and the sentinel.
  pub fn capacity(&self) -> usize {
    self.limit - 2 * HEADER_SIZE
  }

  /// Allocates at least `size` contiguous bytes and returns a handle to
  /// them, or `None` if no free block can satisfy the request.
  ///
  /// The size is rounded up to the 8-byte quantum. A request for zero bytes
  /// returns `None` without touching the ring. Exhaustion is a normal
  /// negative result, not an error.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Option<Block> {
    if size == 0 {
      return None;
    }

    if size > self.capacity() {
      // Cannot ever fit, even in an empty arena. Also keeps align_up from
      // overflowing on absurd requests.
      return None;
    }

    let want = align_up(size);
    let search_start = self.cursor;

    loop {
      let at = self.cursor;
      let header = self.header(at);

      if at != self.sentinel && header.free {
        let avail = header.next - at - HEADER_SIZE;

        if avail >= want {
          if avail - want >= HEADER_SIZE + MIN_PAYLOAD {
            // Carve the tail of the block into a new free header that takes
            // over this block's link.
            let tail = at + HEADER_SIZE + want;
            self.set_header(tail, Header::new(header.next, true));
            self.set_header(at, Header::new(tail, false));

            trace!(offset = at, size = want, tail, "allocated, block split");
          } else {
            // Remainder too small to carry a header and a minimum payload;
            // hand out the whole block.
            self.set_header(at, Header::new(header.next, false));

            trace!(offset = at, size = avail, "allocated whole block");
          }

          self.cursor = self.header(at).next;

          return Some(Block(at + HEADER_SIZE));
        }
      }

      self.cursor = header.next;

      if self.cursor == search_start {
        trace!(size = want, "allocation failed, no block large enough");

        return None;
      }
    }
  }

  /// Returns a block to the arena and merges it with any run of free
  /// successors.
  ///
  /// `None` is accepted and ignored. Releasing a block that is already free
  /// is a safe no-op. A handle whose offset falls outside the arena or does
  /// not match a live block is rejected without touching the ring.
  pub fn release(
    &mut self,
    block: Option<Block>,
  ) -> Result<(), Error> {
    let Some(block) = block else {
      return Ok(());
    };

    let at = block.offset();

    if at < HEADER_SIZE || at >= self.limit {
      return Err(Error::OutOfRange(at));
    }

    let head = at - HEADER_SIZE;

    if !self.is_live_header(head) {
      return Err(Error::BadBlock(at));
    }

    let mut header = self.header(head);

    if header.free {
      trace!(offset = head, "double release ignored");

      return Ok(());
    }

    header.free = true;
    self.set_header(head, header);

    // Forward coalescing: absorb free successors until a used block or the
    // sentinel closes the run. Each absorbed header leaves the ring for
    // good; nothing links to it afterwards.
    let mut succ = header.next;

    while succ != self.sentinel {
      let succ_header = self.header(succ);

      if !succ_header.free {
        break;
      }

      self.set_header(head, Header::new(succ_header.next, true));

      if self.cursor == succ {
        // The search cursor pointed at the absorbed header; park it on the
        // merged block so the next search starts on a live header.
        self.cursor = head;
      }

      trace!(offset = head, absorbed = succ, "merged with free successor");

      succ = succ_header.next;
    }

    trace!(offset = head, "released");

    Ok(())
  }

  /// Borrows the usable bytes of a live, used block.
  ///
  /// The slice covers the block's full derived size, which may exceed the
  /// requested size because of rounding and the no-split policy.
  pub fn payload(
    &self,
    block: Block,
  ) -> Result<&[u8], Error> {
    let head = self.used_header(block)?;
    let end = self.header(head).next;

    Ok(&self.memory[block.offset()..end])
  }

  /// Mutably borrows the usable bytes of a live, used block.
  pub fn payload_mut(
    &mut self,
    block: Block,
  ) -> Result<&mut [u8], Error> {
    let head = self.used_header(block)?;
    let end = self.header(head).next;

    Ok(&mut self.memory[block.offset()..end])
  }

  /// Walks the ring in order, yielding every header including the sentinel.
  /// Never mutates the arena.
  pub fn blocks(&self) -> Blocks<'_, 'a> {
    Blocks {
      arena: self,
      at: FIRST,
      done: false,
    }
  }

  /// Logs one event per header in ring order, for inspection while
  /// debugging a client. Never mutates the arena.
  pub fn dump(&self) {
    for block in self.blocks() {
      debug!(
        offset = block.offset,
        size = block.size,
        free = block.free,
        sentinel = block.offset == self.sentinel,
        "block"
      );
    }
  }

  fn header(&self, at: usize) -> Header {
    Header::read(self.memory, at)
  }

  fn set_header(
    &mut self,
    at: usize,
    header: Header,
  ) {
    header.write(self.memory, at);
  }

  fn block_size(&self, at: usize) -> usize {
    if at == self.sentinel {
      0
    } else {
      self.header(at).next - at - HEADER_SIZE
    }
  }

  /// Whether `at` is a non-sentinel header currently present in the ring.
  /// Absorbed headers fail this check: no live header links to them.
  fn is_live_header(&self, at: usize) -> bool {
    let mut walk = FIRST;

    while walk != self.sentinel {
      if walk == at {
        return true;
      }

      walk = self.header(walk).next;
    }

    false
  }

  /// Validates a handle down to the header of a live, used block.
  fn used_header(&self, block: Block) -> Result<usize, Error> {
    let at = block.offset();

    if at < HEADER_SIZE || at >= self.limit {
      return Err(Error::OutOfRange(at));
    }

    let head = at - HEADER_SIZE;

    if !self.is_live_header(head) || self.header(head).free {
      return Err(Error::BadBlock(at));
    }

    Ok(head)
  }
}

/// Iterator over the header ring, created by [`Arena::blocks`].
pub struct Blocks<'s, 'a> {
  arena: &'s Arena<'a>,
  at: usize,
  done: bool,
}

impl Iterator for Blocks<'_, '_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<BlockInfo> {
    if self.done {
      return None;
    }

    let at = self.at;
    let header = self.arena.header(at);

    if at == self.arena.sentinel {
      self.done = true;
    }

    self.at = header.next;

    Some(BlockInfo {
      offset: at,
      size: self.arena.block_size(at),
      free: header.free,
    })
  }
}
