//! # ringalloc - A Fixed-Arena Next-Fit Allocator
//!
//! This crate provides a from-scratch **next-fit allocator** that manages a
//! single caller-supplied byte region, without touching the platform heap
//! for the memory it hands out.
//!
//! ## Overview
//!
//! The arena is partitioned into blocks, each preceded by an 8-byte header.
//! Headers form a circular singly linked ring, closed by a permanently-used,
//! zero-sized **sentinel** at the end of the region:
//!
//! ```text
//!   Arena Layout:
//!
//!   ┌────┬────────────┬────┬──────────┬────┬───────────────────────┬────┐
//!   │ H0 │  payload   │ H1 │ payload  │ H2 │       payload         │ S  │
//!   └────┴────────────┴────┴──────────┴────┴───────────────────────┴────┘
//!     │     (used)      │    (free)     │          (free)            │
//!     │                 │               │                            │
//!     └──── next ───────┴──── next ─────┴────────── next ────────────┘
//!                                                                    │
//!         ┌──────────────────── next (wrap) ─────────────────────────┘
//!         ▼
//!        H0
//!
//!   A block's size is never stored; it is derived from the distance to
//!   the next header: size = next - offset - HEADER_SIZE.
//! ```
//!
//! Allocation walks the ring starting from a cursor left behind by the
//! previous allocation (**next-fit**), takes the first free block that is
//! large enough, and splits off the tail as a new free block when the
//! remainder can still hold a header plus a minimum payload. Release marks
//! the block free and merges it with any run of free successors, reclaiming
//! their headers.
//!
//! ## Crate Structure
//!
//! ```text
//!   ringalloc
//!   ├── align      - 8-byte quantum, align_up / align_down
//!   ├── header     - in-arena header codec (internal)
//!   ├── arena      - Arena, Block and the allocate/release machinery
//!   └── error      - Error enum
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ringalloc::Arena;
//!
//! fn main() -> Result<(), ringalloc::Error> {
//!     let mut region = vec![0u8; 4096];
//!     let mut arena = Arena::new(&mut region)?;
//!
//!     // Allocate a block and use its bytes.
//!     let block = arena.allocate(64).expect("arena is empty, 64 bytes fit");
//!     arena.payload_mut(block)?.fill(0x42);
//!
//!     // Inspect the ring.
//!     for info in arena.blocks() {
//!         println!("{:#06x}: {} bytes, free = {}", info.offset, info.size, info.free);
//!     }
//!
//!     // Hand the block back.
//!     arena.release(Some(block))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! All bookkeeping is expressed as byte **offsets** into the borrowed
//! region, not raw addresses, and every access is bounds-checked: the crate
//! contains no `unsafe`. The free flag is a plain field of the decoded
//! header rather than a bit stolen from a pointer. Blocks are identified by
//! [`Block`] handles which the arena validates on every use, so releasing a
//! bogus or stale handle is a reported error or a no-op, never corruption.
//!
//! Failure to satisfy an allocation is a normal `None` result. Only an
//! unusable region at construction time is an error; see [`Error`].
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no internal synchronization; wrap the arena
//!   in a mutex to share it across threads
//! - **Fixed region**: the arena never grows or shrinks
//! - **8-byte quantum**: no alignment guarantees beyond it
//! - **4 GiB cap**: header links are stored as 32-bit offsets
//! - **Forward-only coalescing**: a freed block merges with free
//!   successors, never into a free predecessor

pub mod align;
mod arena;
mod error;
mod header;

pub use arena::{Arena, Block, BlockInfo, Blocks};
pub use error::Error;
