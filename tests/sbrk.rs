#![cfg(unix)]

use rfreelist::{ALIGNMENT, HEADER_SIZE, Heap, Sbrk};

#[test]
fn test_heap_on_program_break() {
  let mut heap = Heap::new(Sbrk::new());
  let start = Sbrk::program_break() as usize;

  let first = heap.allocate(40).unwrap();
  let second = heap.allocate(80).unwrap();
  let third = heap.allocate(20).unwrap();

  for address in [first, second, third] {
    assert!(address.as_ptr() as usize >= start + HEADER_SIZE);
    assert_eq!(address.as_ptr() as usize % ALIGNMENT, 0);
  }
  assert_eq!(second.as_ptr() as usize, first.as_ptr() as usize + 40 + HEADER_SIZE);
  assert_eq!(third.as_ptr() as usize, second.as_ptr() as usize + 80 + HEADER_SIZE);

  unsafe {
    let value = first.as_ptr() as *mut u64;
    value.write(0xDEADBEEF);

    heap.release(second.as_ptr());
    let reused = heap.allocate(24).unwrap();
    assert_eq!(reused, second);

    assert_eq!(value.read(), 0xDEADBEEF);
  }

  let snapshot = heap.snapshot();
  assert_eq!(snapshot.len(), 4);
  assert!(snapshot.blocks[2].is_free);
  assert!(!snapshot.has_adjacent_free());
}
