//! Memory arena providers.
//!
//! The heap never asks for memory anywhere else than the top of its arena:
//!
//! ```text
//!   ┌──────────┬──────────┬──────────┐
//!   │ region 1 │ region 2 │ region 3 │ ──► top (next extend starts here)
//!   └──────────┴──────────┴──────────┘
//!   ▲
//!   └── first region, aligned to ALIGNMENT
//! ```

use std::{
  alloc::{self, Layout},
  ptr::{self, NonNull},
};

use crate::{
  align::{ALIGNMENT, align_up},
  error::{AllocError, AllocResult},
};

/// A monotonically growing, contiguous address range.
///
/// # Safety
///
/// Implementors guarantee that a successful `extend(n)` returns the previous
/// top of the arena and that the returned region:
///
/// - is exactly `n` bytes long and writable,
/// - immediately follows the region returned by the previous call,
/// - never overlaps another region handed out by this provider,
/// - starts on an [`ALIGNMENT`] boundary when it is the first one.
///
/// `extend(0)` reports the current top without growing the arena.
pub unsafe trait ArenaProvider {
  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>>;
}

/// Arena backed by the program break, grown with `sbrk(2)`.
///
/// Nothing else in the process may move the break while the heap is in use:
/// if the break is not where the last extension left it, further extensions
/// are refused so the arena stays contiguous.
#[cfg(unix)]
pub struct Sbrk {
  top: *mut u8,
}

#[cfg(unix)]
const SBRK_FAILED: *mut libc::c_void = usize::MAX as *mut libc::c_void;

#[cfg(unix)]
impl Sbrk {
  pub fn new() -> Self {
    Self {
      top: ptr::null_mut(),
    }
  }

  /// Current program break, `sbrk(0)`.
  pub fn program_break() -> *mut u8 {
    unsafe { libc::sbrk(0) as *mut u8 }
  }

  unsafe fn grow(increment: isize) -> Option<*mut u8> {
    let previous = unsafe { libc::sbrk(increment as _) };

    if previous == SBRK_FAILED {
      return None;
    }

    Some(previous as *mut u8)
  }
}

#[cfg(unix)]
impl Default for Sbrk {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(unix)]
unsafe impl ArenaProvider for Sbrk {
  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>> {
    let increment = isize::try_from(increment).ok()?;

    unsafe {
      let current = Sbrk::program_break();
      if current as *mut libc::c_void == SBRK_FAILED {
        return None;
      }

      let mut padding = 0;
      if self.top.is_null() {
        padding = (align_up(current as usize)? - current as usize) as isize;
        if padding > 0 {
          Sbrk::grow(padding)?;
        }
      } else if current != self.top {
        log::warn!(
          "program break moved from {:?} to {:?}, refusing to extend",
          self.top,
          current
        );
        return None;
      }

      let Some(previous) = Sbrk::grow(increment) else {
        if padding > 0 {
          let _ = Sbrk::grow(-padding);
        }
        return None;
      };
      self.top = previous.offset(increment);

      log::trace!("sbrk: +{} bytes at {:?}", increment, previous);

      NonNull::new(previous)
    }
  }
}

/// Arena carved out of one region reserved up front.
///
/// Extensions bump an offset inside the region and fail once `capacity`
/// bytes have been handed out. Unlike [`Sbrk`] it can be created many times
/// in one process, which makes heap behaviour reproducible.
pub struct FixedArena {
  base: NonNull<u8>,
  layout: Layout,
  used: usize,
}

impl FixedArena {
  pub fn new(capacity: usize) -> AllocResult<Self> {
    let denied = AllocError::AllocationDenied {
      requested: capacity,
    };

    let size = align_up(capacity.max(ALIGNMENT)).ok_or(denied)?;
    let layout = Layout::from_size_align(size, ALIGNMENT).map_err(|_| denied)?;

    let base = unsafe { alloc::alloc_zeroed(layout) };
    let base = NonNull::new(base).ok_or(denied)?;

    Ok(Self {
      base,
      layout,
      used: 0,
    })
  }

  pub fn base(&self) -> NonNull<u8> {
    self.base
  }

  pub fn capacity(&self) -> usize {
    self.layout.size()
  }

  /// Bytes handed out so far.
  pub fn used(&self) -> usize {
    self.used
  }
}

unsafe impl ArenaProvider for FixedArena {
  fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>> {
    if increment > self.capacity() - self.used {
      log::trace!(
        "fixed arena: +{} bytes denied ({} of {} used)",
        increment,
        self.used,
        self.capacity()
      );
      return None;
    }

    let previous = unsafe { self.base.add(self.used) };
    self.used += increment;

    log::trace!("fixed arena: +{} bytes at {:?}", increment, previous);

    Some(previous)
  }
}

impl Drop for FixedArena {
  fn drop(&mut self) {
    unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) };
  }
}
