use std::fmt;

use crate::block::HEADER_SIZE;

/// One block of the list as seen at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
  pub index: usize,
  pub address: usize,
  pub size: usize,
  pub is_free: bool,
  /// Address of the successor, `None` for the last block.
  pub next: Option<usize>,
}

/// Read-only copy of the block list, in list (and address) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
  pub blocks: Vec<BlockInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
  pub blocks: usize,
  pub used_blocks: usize,
  pub free_blocks: usize,
  pub used_bytes: usize,
  pub free_bytes: usize,
  /// Bytes taken by block headers.
  pub overhead_bytes: usize,
  /// Everything obtained from the arena: payloads plus headers.
  pub arena_bytes: usize,
}

impl Snapshot {
  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  /// Whether two neighbouring blocks are both free.
  pub fn has_adjacent_free(&self) -> bool {
    self
      .blocks
      .windows(2)
      .any(|pair| pair[0].is_free && pair[1].is_free)
  }

  pub fn stats(&self) -> HeapStats {
    let mut stats = HeapStats {
      blocks: self.blocks.len(),
      overhead_bytes: self.blocks.len() * HEADER_SIZE,
      ..HeapStats::default()
    };

    for block in &self.blocks {
      if block.is_free {
        stats.free_blocks += 1;
        stats.free_bytes += block.size;
      } else {
        stats.used_blocks += 1;
        stats.used_bytes += block.size;
      }
    }

    stats.arena_bytes = stats.used_bytes + stats.free_bytes + stats.overhead_bytes;
    stats
  }
}

impl fmt::Display for BlockInfo {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let state = if self.is_free { "FREE" } else { "USED" };

    write!(f, "#{} {} size={} at={:#x} next=", self.index, state, self.size, self.address)?;
    match self.next {
      Some(next) => write!(f, "{:#x}", next),
      None => write!(f, "none"),
    }
  }
}

impl fmt::Display for Snapshot {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    if self.blocks.is_empty() {
      return writeln!(f, "(empty heap)");
    }

    for block in &self.blocks {
      writeln!(f, "{}", block)?;
    }
    Ok(())
  }
}

/// Prints the block list of `snapshot` under `label`.
pub fn print_heap(
  label: &str,
  snapshot: &Snapshot,
) {
  let stats = snapshot.stats();

  println!(
    "[{}] {} blocks ({} used, {} free), {} of {} arena bytes in use",
    label, stats.blocks, stats.used_blocks, stats.free_blocks, stats.used_bytes, stats.arena_bytes
  );
  print!("{}", snapshot);
}
