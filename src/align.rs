/// Boundary every payload address and every block size is rounded to.
pub const ALIGNMENT: usize = 8;

/// Rounds the given size up to the heap alignment ([`ALIGNMENT`]).
///
/// # Examples
///
/// ```rust
/// use rfreelist::align;
///
/// assert_eq!(align!(1), 8);
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(16), 16);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align_to!($value, $crate::align::ALIGNMENT)
  };
}

/// Rounds `value` up to a multiple of `align`, which must be a power of two.
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Overflow-checked version of [`align!`], used on caller supplied sizes.
pub fn align_up(value: usize) -> Option<usize> {
  value
    .checked_add(ALIGNMENT - 1)
    .map(|v| v & !(ALIGNMENT - 1))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align() {
    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (ALIGNMENT * i + 1)..=(ALIGNMENT * (i + 1));

      let expected_alignment = ALIGNMENT * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(expected, align!(size));
        assert_eq!(Some(expected), align_up(size));
      }
    }
  }

  #[test]
  fn test_align_to() {
    assert_eq!(align_to!(3usize, 4), 4);
    assert_eq!(align_to!(17usize, 16), 32);
    assert_eq!(align_to!(0usize, 8), 0);
  }

  #[test]
  fn test_align_up_overflow() {
    assert_eq!(align_up(0), Some(0));
    assert_eq!(align_up(usize::MAX - 7), Some(usize::MAX - 7));
    assert_eq!(align_up(usize::MAX - 6), None);
  }
}
