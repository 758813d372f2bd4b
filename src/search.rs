use std::ptr;

use crate::block::Block;

/// Strategy used to pick a free block for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
  /// First free block that is large enough.
  #[default]
  FirstFit,
  /// Smallest free block that is large enough, earliest on ties.
  BestFit,
}

/// Outcome of a scan over the block list.
pub(crate) struct Fit {
  /// Chosen block, null on a miss.
  pub block: *mut Block,
  /// Block a new arena extension has to be linked after.
  pub last: *mut Block,
}

/// # Safety
///
/// `head` must be null or the first block of a well formed list.
pub(crate) unsafe fn find(
  mode: SearchMode,
  head: *mut Block,
  size: usize,
) -> Fit {
  unsafe {
    match mode {
      SearchMode::FirstFit => first_fit(head, size),
      SearchMode::BestFit => best_fit(head, size),
    }
  }
}

pub(crate) unsafe fn first_fit(
  head: *mut Block,
  size: usize,
) -> Fit {
  unsafe {
    let mut last: *mut Block = ptr::null_mut();
    let mut current = head;

    while !current.is_null() {
      if (*current).is_free && (*current).size >= size {
        return Fit {
          block: current,
          last,
        };
      }
      last = current;
      current = (*current).next;
    }

    Fit {
      block: ptr::null_mut(),
      last,
    }
  }
}

pub(crate) unsafe fn best_fit(
  head: *mut Block,
  size: usize,
) -> Fit {
  unsafe {
    let mut best: *mut Block = ptr::null_mut();
    let mut best_size = usize::MAX;
    let mut last: *mut Block = ptr::null_mut();
    let mut current = head;

    while !current.is_null() {
      let candidate = &*current;

      if candidate.is_free && candidate.size >= size && candidate.size < best_size {
        best = current;
        best_size = candidate.size;
      }

      last = current;
      current = candidate.next;
    }

    Fit { block: best, last }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{arena::FixedArena, heap::Heap};

  // free 64 | used 8 | free 32 | used 8 | free 32 | used 8
  fn fragmented_heap() -> Heap<FixedArena> {
    let mut heap = Heap::new(FixedArena::new(4096).unwrap());

    let blocks: Vec<_> = [64, 8, 32, 8, 32, 8]
      .into_iter()
      .map(|size| heap.allocate(size).unwrap())
      .collect();

    unsafe {
      heap.release(blocks[0].as_ptr());
      heap.release(blocks[2].as_ptr());
      heap.release(blocks[4].as_ptr());
    }

    heap
  }

  fn nth(
    heap: &Heap<FixedArena>,
    n: usize,
  ) -> *mut Block {
    let mut current = heap.head;
    for _ in 0..n {
      current = unsafe { (*current).next };
    }
    current
  }

  #[test]
  fn test_first_fit_takes_first_large_enough() {
    let heap = fragmented_heap();

    let fit = unsafe { first_fit(heap.head, 24) };
    assert_eq!(fit.block, nth(&heap, 0));

    let fit = unsafe { first_fit(heap.head, 64) };
    assert_eq!(fit.block, nth(&heap, 0));
  }

  #[test]
  fn test_first_fit_miss_reports_tail() {
    let heap = fragmented_heap();

    let fit = unsafe { first_fit(heap.head, 72) };
    assert!(fit.block.is_null());
    assert_eq!(fit.last, nth(&heap, 5));
  }

  #[test]
  fn test_best_fit_prefers_smallest_then_earliest() {
    let heap = fragmented_heap();

    let fit = unsafe { best_fit(heap.head, 24) };
    assert_eq!(fit.block, nth(&heap, 2));

    let fit = unsafe { best_fit(heap.head, 40) };
    assert_eq!(fit.block, nth(&heap, 0));
  }

  #[test]
  fn test_best_fit_tracks_real_tail() {
    let heap = fragmented_heap();

    let hit = unsafe { best_fit(heap.head, 32) };
    assert_eq!(hit.block, nth(&heap, 2));
    assert_eq!(hit.last, nth(&heap, 5));

    let miss = unsafe { best_fit(heap.head, 128) };
    assert!(miss.block.is_null());
    assert_eq!(miss.last, nth(&heap, 5));
  }

  #[test]
  fn test_empty_list() {
    let fit = unsafe { find(SearchMode::BestFit, ptr::null_mut(), 8) };
    assert!(fit.block.is_null());
    assert!(fit.last.is_null());
  }
}
