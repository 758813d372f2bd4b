//! # rfreelist - A Free-List Memory Allocator Library
//!
//! This crate provides a **free-list allocator**: it manages its own heap on top
//! of a raw, monotonically growing arena (the program break via `sbrk`, or a
//! fixed region reserved up front) and hands out, releases and resizes
//! variable-sized blocks inside it.
//!
//! ## Overview
//!
//! Every block carries a small header and all blocks, free or used, are kept in
//! one singly linked list ordered by address:
//!
//! ```text
//!   Block List:
//!
//!   head
//!    │
//!    ▼
//!   ┌────────┬─────────┐   ┌────────┬─────────┐   ┌────────┬─────────┐
//!   │ header │ payload │──►│ header │ payload │──►│ header │ payload │──► null
//!   │  USED  │  40 B   │   │  FREE  │  80 B   │   │  USED  │  24 B   │
//!   └────────┴─────────┘   └────────┴─────────┘   └────────┴─────────┘
//!   ◄──────────────────── contiguous arena ──────────────────────────► top
//! ```
//!
//! Neighbours in the list are also neighbours in memory: the next block starts
//! exactly `HEADER_SIZE + size` bytes after the current one.
//!
//! ## Crate Structure
//!
//! ```text
//!   rfreelist
//!   ├── align      - Alignment constant and macros (align!, align_to!)
//!   ├── arena      - ArenaProvider contract, Sbrk and FixedArena
//!   ├── block      - Block header and payload/header conversions
//!   ├── error      - AllocError
//!   ├── heap       - Heap: allocate, release, reallocate, split, coalesce
//!   ├── search     - First-fit and best-fit scans
//!   └── snapshot   - Read-only dump of the block list
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rfreelist::{FixedArena, Heap};
//!
//! let mut heap = Heap::new(FixedArena::new(4096).unwrap());
//!
//! let ptr = heap.allocate(8).unwrap().as_ptr() as *mut u64;
//!
//! unsafe {
//!     *ptr = 42;
//!     assert_eq!(*ptr, 42);
//!
//!     heap.release(ptr as *mut u8);
//! }
//!
//! assert!(heap.snapshot().blocks[0].is_free);
//! ```
//!
//! ## How It Works
//!
//! ```text
//!   allocate(n)
//!     │
//!     ├── n == 0 ─────────────────────────────► InvalidRequest
//!     ├── search list (first-fit / best-fit)
//!     │     ├── hit  ──► split if worth it ──► mark USED ──► payload
//!     │     └── miss ──► extend arena, link after tail ──► payload
//!     └── arena refuses ──────────────────────► AllocationDenied
//!
//!   release(p)   ──► mark FREE ──► coalesce whole list
//!   reallocate   ──► shrink in place, or allocate + copy + release
//! ```
//!
//! Splitting a free block of capacity `C` for a request `r` leaves a new free
//! block of `C - r - HEADER_SIZE` bytes right after the payload, but only when
//! that is at least [`ALIGNMENT`] bytes:
//!
//! ```text
//!   before:  ┌────────┬──────────────────────────────────┐
//!            │ FREE C │                                  │
//!            └────────┴──────────────────────────────────┘
//!   after:   ┌────────┬─────────┬────────┬───────────────┐
//!            │ USED r │         │ FREE   │ C - r - H     │
//!            └────────┴─────────┴────────┴───────────────┘
//! ```
//!
//! Coalescing walks the list once after every release and folds each run of
//! free neighbours into its first block.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Heap` is neither `Send` nor `Sync`; wrap it in
//!   a lock to share it
//! - **Never shrinks**: memory is not returned to the operating system
//! - **No hardening**: foreign or double-released pointers are undefined
//!   behaviour, nothing checks for them
//! - **Fixed alignment**: every payload is aligned to [`ALIGNMENT`] bytes
//!
//! ## Safety
//!
//! Allocation is safe to call. Releasing and resizing take raw pointers and
//! are `unsafe`: the pointer must come from the same heap and still be live.

pub mod align;
pub mod arena;
mod block;
mod error;
mod heap;
mod search;
mod snapshot;

pub use align::ALIGNMENT;
#[cfg(unix)]
pub use arena::Sbrk;
pub use arena::{ArenaProvider, FixedArena};
pub use block::HEADER_SIZE;
pub use error::{AllocError, AllocResult};
pub use heap::Heap;
pub use search::SearchMode;
pub use snapshot::{BlockInfo, HeapStats, Snapshot, print_heap};
