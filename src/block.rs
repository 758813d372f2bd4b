use std::{mem, ptr::NonNull};

/// Header embedded right before every payload.
///
/// `align(8)` keeps the header a multiple of the heap alignment on every
/// target, so a payload that starts after an aligned header stays aligned.
#[repr(C, align(8))]
pub struct Block {
  pub size: usize,
  pub is_free: bool,
  pub next: *mut Block,
}

pub const HEADER_SIZE: usize = mem::size_of::<Block>();

impl Block {
  pub fn new(
    size: usize,
    is_free: bool,
    next: *mut Block,
  ) -> Self {
    Self { size, is_free, next }
  }

  /// Address of the first payload byte of `block`.
  ///
  /// # Safety
  ///
  /// `block` must point to a header living inside the arena.
  pub unsafe fn payload(block: *mut Block) -> NonNull<u8> {
    unsafe { NonNull::new_unchecked((block as *mut u8).add(HEADER_SIZE)) }
  }

  /// Recovers the header from a payload address.
  ///
  /// # Safety
  ///
  /// `payload` must have been produced by [`Block::payload`].
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Block {
    unsafe { payload.sub(HEADER_SIZE) as *mut Block }
  }

  /// Address one past the end of the payload, where the successor starts.
  ///
  /// # Safety
  ///
  /// `block` must point to a valid header.
  pub unsafe fn end(block: *mut Block) -> *mut u8 {
    unsafe { Block::payload(block).as_ptr().add((*block).size) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::ALIGNMENT;

  #[test]
  fn test_header_is_aligned() {
    assert_eq!(HEADER_SIZE % ALIGNMENT, 0);
    assert!(HEADER_SIZE >= mem::size_of::<usize>() * 2);
  }

  #[test]
  fn test_payload_round_trip() {
    let mut storage = [0u64; 8];
    let block = storage.as_mut_ptr() as *mut Block;

    unsafe {
      block.write(Block::new(16, false, std::ptr::null_mut()));

      let payload = Block::payload(block);
      assert_eq!(payload.as_ptr() as usize - block as usize, HEADER_SIZE);
      assert_eq!(Block::from_payload(payload.as_ptr()), block);
      assert_eq!(Block::end(block) as usize, block as usize + HEADER_SIZE + 16);
    }
  }
}
