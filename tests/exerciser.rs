//! Randomized workload against a single arena: blocks of random sizes are
//! allocated, filled with known patterns, and checksummed immediately before
//! release, while several other blocks stay live.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ringalloc::Arena;

const SLOTS: usize = 8;
const ITERATIONS: usize = 1000;

fn checksum(bytes: &[u8]) -> u32 {
  bytes
    .iter()
    .fold(0u32, |acc, &byte| acc.rotate_left(8) ^ u32::from(byte))
}

#[test]
fn test_memory_exerciser() {
  let mut region = vec![0u8; 256 * 1024];
  let mut arena = Arena::new(&mut region).unwrap();

  let mut rng = StdRng::seed_from_u64(0x5EED);
  let mut slots: [Option<(ringalloc::Block, u32)>; SLOTS] = [None; SLOTS];
  let mut clock = 0;

  for _ in 0..ITERATIONS {
    // Evict the oldest slot, verifying its content survived the lifetime
    // of every block allocated since.
    if let Some((block, crc)) = slots[clock].take() {
      let payload = arena.payload(block).unwrap();
      assert_eq!(crc, checksum(payload), "block content changed while live");

      arena.release(Some(block)).unwrap();
    }

    let size = rng.random_range(1..=1024);

    match arena.allocate(size) {
      Some(block) => {
        assert_eq!(0, block.offset() % 8, "unaligned block returned");

        let payload = arena.payload_mut(block).unwrap();
        assert!(payload.len() >= size);
        rng.fill(payload);

        let crc = checksum(arena.payload(block).unwrap());
        slots[clock] = Some((block, crc));
      }
      None => {
        // Fragmentation can starve a request; drain the live set (checking
        // every checksum on the way out) and carry on.
        for slot in &mut slots {
          if let Some((block, crc)) = slot.take() {
            assert_eq!(crc, checksum(arena.payload(block).unwrap()));
            arena.release(Some(block)).unwrap();
          }
        }
      }
    }

    clock = (clock + 1) % SLOTS;
  }

  for slot in &mut slots {
    if let Some((block, crc)) = slot.take() {
      assert_eq!(crc, checksum(arena.payload(block).unwrap()));
      arena.release(Some(block)).unwrap();
    }
  }
}

proptest! {
  #[test]
  fn allocations_are_aligned_and_disjoint(
    sizes in prop::collection::vec(1usize..512, 1..32),
  ) {
    let mut region = vec![0u8; 64 * 1024];
    let mut arena = Arena::new(&mut region).unwrap();

    let mut ranges = Vec::new();

    for &size in &sizes {
      let block = arena.allocate(size).unwrap();
      prop_assert_eq!(0, block.offset() % 8);

      let len = arena.payload(block).unwrap().len();
      prop_assert!(len >= size);

      ranges.push((block.offset(), block.offset() + len));
    }

    ranges.sort_unstable();

    for pair in ranges.windows(2) {
      prop_assert!(pair[0].1 <= pair[1].0, "blocks overlap: {:?}", pair);
    }
  }

  #[test]
  fn reverse_release_restores_full_capacity(
    sizes in prop::collection::vec(1usize..512, 1..32),
  ) {
    let mut region = vec![0u8; 64 * 1024];
    let mut arena = Arena::new(&mut region).unwrap();

    let capacity = arena.capacity();

    let blocks: Vec<_> = sizes
      .iter()
      .map(|&size| arena.allocate(size).unwrap())
      .collect();

    // Releasing back-to-front lets every release coalesce forward, so the
    // arena must end up as the single initial free block.
    for block in blocks.into_iter().rev() {
      arena.release(Some(block)).unwrap();
    }

    prop_assert!(arena.allocate(capacity).is_some());
  }
}
