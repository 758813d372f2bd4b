use std::{
  cmp,
  ptr::{self, NonNull},
};

use log::{debug, trace};

use crate::{
  align::{ALIGNMENT, align_up},
  arena::ArenaProvider,
  block::{Block, HEADER_SIZE},
  error::{AllocError, AllocResult},
  search::{self, SearchMode},
  snapshot::{BlockInfo, HeapStats, Snapshot},
};

/// Free-list heap over a single growing arena.
///
/// Every block, free or used, is linked in address order, and two blocks that
/// follow each other in the list also follow each other in memory.
pub struct Heap<A: ArenaProvider> {
  pub(crate) head: *mut Block,
  arena: A,
  mode: SearchMode,
}

impl<A: ArenaProvider> Heap<A> {
  pub fn new(arena: A) -> Self {
    Self::with_search_mode(arena, SearchMode::default())
  }

  pub fn with_search_mode(
    arena: A,
    mode: SearchMode,
  ) -> Self {
    Self {
      head: ptr::null_mut(),
      arena,
      mode,
    }
  }

  pub fn search_mode(&self) -> SearchMode {
    self.mode
  }

  pub fn set_search_mode(
    &mut self,
    mode: SearchMode,
  ) {
    self.mode = mode;
  }

  pub fn arena(&self) -> &A {
    &self.arena
  }

  /// Allocates at least `size` bytes and returns the payload address,
  /// aligned to [`ALIGNMENT`].
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> AllocResult<NonNull<u8>> {
    if size == 0 {
      return Err(AllocError::InvalidRequest);
    }

    let size = align_up(size).ok_or(AllocError::AllocationDenied { requested: size })?;

    unsafe {
      let block = if self.head.is_null() {
        self.request_space(ptr::null_mut(), size)?
      } else {
        let fit = search::find(self.mode, self.head, size);

        if fit.block.is_null() {
          self.request_space(fit.last, size)?
        } else {
          split_block(fit.block, size);
          (*fit.block).is_free = false;
          fit.block
        }
      };

      Ok(Block::payload(block))
    }
  }

  /// Gives the block back to the heap and merges it with free neighbours.
  ///
  /// # Safety
  ///
  /// `address` must be null or a pointer returned by [`Heap::allocate`] or
  /// [`Heap::reallocate`] on this heap that has not been released yet.
  pub unsafe fn release(
    &mut self,
    address: *mut u8,
  ) {
    if address.is_null() {
      return;
    }

    unsafe {
      let block = Block::from_payload(address);
      debug!("release {:?} ({} bytes)", address, (*block).size);

      (*block).is_free = true;
      self.coalesce();
    }
  }

  /// Resizes the allocation at `address` to hold at least `size` bytes.
  ///
  /// A null `address` allocates; a zero `size` releases and returns `None`.
  /// When the block is already large enough it is shrunk in place. Otherwise
  /// the content moves to a new block; if that block cannot be obtained the
  /// original allocation is left untouched and the error is returned.
  ///
  /// # Safety
  ///
  /// Same contract as [`Heap::release`] for `address`.
  pub unsafe fn reallocate(
    &mut self,
    address: *mut u8,
    size: usize,
  ) -> AllocResult<Option<NonNull<u8>>> {
    let Some(current) = NonNull::new(address) else {
      return self.allocate(size).map(Some);
    };

    unsafe {
      if size == 0 {
        self.release(address);
        return Ok(None);
      }

      let block = Block::from_payload(address);
      let capacity = (*block).size;
      let aligned = align_up(size).ok_or(AllocError::AllocationDenied { requested: size })?;

      if capacity >= aligned {
        debug!("reallocate {:?} in place: {} -> {} bytes", address, capacity, aligned);
        split_block(block, aligned);
        self.coalesce();
        return Ok(Some(current));
      }

      let moved = self.allocate(size)?;
      debug!("reallocate {:?} -> {:?}: {} -> {} bytes", address, moved, capacity, aligned);

      ptr::copy_nonoverlapping(address, moved.as_ptr(), cmp::min(capacity, size));
      self.release(address);

      Ok(Some(moved))
    }
  }

  /// Payload capacity of the block behind `address`.
  ///
  /// # Safety
  ///
  /// `address` must be a live allocation of this heap.
  pub unsafe fn usable_size(
    &self,
    address: NonNull<u8>,
  ) -> usize {
    unsafe { (*Block::from_payload(address.as_ptr())).size }
  }

  pub fn snapshot(&self) -> Snapshot {
    let mut blocks = Vec::new();
    let mut current = self.head;

    unsafe {
      while !current.is_null() {
        let block = &*current;
        blocks.push(BlockInfo {
          index: blocks.len(),
          address: current as usize,
          size: block.size,
          is_free: block.is_free,
          next: (!block.next.is_null()).then_some(block.next as usize),
        });
        current = block.next;
      }
    }

    Snapshot { blocks }
  }

  pub fn stats(&self) -> HeapStats {
    self.snapshot().stats()
  }

  /// Grows the arena by one block of `size` bytes and links it after `last`.
  unsafe fn request_space(
    &mut self,
    last: *mut Block,
    size: usize,
  ) -> AllocResult<*mut Block> {
    let denied = AllocError::AllocationDenied { requested: size };
    let total = HEADER_SIZE.checked_add(size).ok_or(denied)?;

    let block = self.arena.extend(total).ok_or(denied)?.as_ptr() as *mut Block;

    unsafe {
      block.write(Block::new(size, false, ptr::null_mut()));

      if last.is_null() {
        self.head = block;
      } else {
        (*last).next = block;
      }
    }

    trace!("extended arena by {} bytes, new block at {:?}", total, block);

    Ok(block)
  }

  /// Merges every run of adjacent free blocks into its first block.
  unsafe fn coalesce(&mut self) {
    let mut current = self.head;

    unsafe {
      while !current.is_null() {
        let next = (*current).next;

        if !next.is_null() && (*current).is_free && (*next).is_free {
          trace!("merge {:?} ({}) with {:?} ({})", current, (*current).size, next, (*next).size);
          (*current).size += HEADER_SIZE + (*next).size;
          (*current).next = (*next).next;
        } else {
          current = next;
        }
      }
    }
  }
}

/// Shrinks `block` to `size` bytes and turns the tail into a new free block,
/// provided the tail can hold a header plus at least [`ALIGNMENT`] bytes.
///
/// # Safety
///
/// `block` must be a valid block with `size <= (*block).size`, and `size`
/// must be aligned.
unsafe fn split_block(
  block: *mut Block,
  size: usize,
) {
  unsafe {
    let remainder = (*block).size - size;
    if remainder < HEADER_SIZE + ALIGNMENT {
      return;
    }

    (*block).size = size;

    let new_block = Block::end(block) as *mut Block;
    new_block.write(Block::new(remainder - HEADER_SIZE, true, (*block).next));
    (*block).next = new_block;

    trace!("split {:?}: {} + {} free at {:?}", block, size, remainder - HEADER_SIZE, new_block);
  }
}
