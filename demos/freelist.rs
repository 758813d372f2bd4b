use std::ptr;

use rfreelist::{AllocError, Heap, Sbrk, SearchMode, print_heap};

/// Prints the current program break using `sbrk(0)`.
fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    Sbrk::program_break(),
  );
}

fn main() -> Result<(), AllocError> {
  env_logger::init();

  let mut heap = Heap::new(Sbrk::new());

  print_program_break("start");

  // --------------------------------------------------------------------
  // A) Three allocations, each one extends the arena.
  // --------------------------------------------------------------------
  let first = heap.allocate(40)?;
  let second = heap.allocate(80)?;
  let third = heap.allocate(20)?;
  print_heap("A: allocate 40, 80, 20", &heap.snapshot());
  print_program_break("after A");

  unsafe {
    // --------------------------------------------------------------------
    // B) Free the middle block. Its neighbours are used, nothing merges.
    // --------------------------------------------------------------------
    heap.release(second.as_ptr());
    print_heap("B: release second", &heap.snapshot());

    // --------------------------------------------------------------------
    // C) A small request lands in the freed slot and splits it.
    // --------------------------------------------------------------------
    let reused = heap.allocate(24)?;
    println!(
      "[C] reused == second? {}",
      if reused == second { "yes, same slot" } else { "no" }
    );
    print_heap("C: allocate 24", &heap.snapshot());

    // --------------------------------------------------------------------
    // D) Free the outer blocks; the tail merges into one free block.
    // --------------------------------------------------------------------
    heap.release(first.as_ptr());
    heap.release(third.as_ptr());
    print_heap("D: release first and third", &heap.snapshot());

    // --------------------------------------------------------------------
    // E) Grow the reused block; content moves with it.
    // --------------------------------------------------------------------
    ptr::write_bytes(reused.as_ptr(), 0xAB, 24);
    if let Some(grown) = heap.reallocate(reused.as_ptr(), 200)? {
      println!("[E] moved {:?} -> {:?}, first byte = {:#X}", reused, grown, grown.as_ptr().read());
    }
    print_heap("E: reallocate to 200", &heap.snapshot());
  }

  // --------------------------------------------------------------------
  // F) Best-fit picks the smallest hole instead of the first one.
  // --------------------------------------------------------------------
  heap.set_search_mode(SearchMode::BestFit);
  let small = heap.allocate(16)?;
  print_heap("F: best-fit allocate 16", &heap.snapshot());
  println!("[F] placed at {:?}", small);

  print_program_break("end");
  println!("\nThe arena is never shrunk; the OS reclaims it when the process exits.");

  Ok(())
}
