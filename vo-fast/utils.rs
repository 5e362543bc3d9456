//! Circular run helpers over 16-bit sample masks (bit `i` = circle sample `i`).

/// Pack a per-sample flag array into a mask.
pub fn mask_from_flags(flags: &[bool; 16]) -> u16 {
    flags
        .iter()
        .enumerate()
        .fold(0u16, |mask, (i, &set)| mask | ((set as u16) << i))
}

/// Bit `j` of the result is set iff samples `j - len + 1 ..= j` (wrapping)
/// are all set in `mask`, i.e. a run of `len` samples ends at `j`.
///
/// Branch-free AND of rotated copies; exits early once no run can survive.
pub fn run_ends(mask: u16, len: usize) -> u16 {
    if len == 0 || len > 16 {
        return 0;
    }

    let mut ends = mask;
    for i in 1..len {
        ends &= mask.rotate_left(i as u32);
        if ends == 0 {
            return 0;
        }
    }
    ends
}

/// Whether `mask` holds at least `len` consecutive set samples, wrap included.
pub fn has_circular_run(mask: u16, len: usize) -> bool {
    run_ends(mask, len) != 0
}

/// Longest circular run of set samples, by direct scan.
pub fn longest_circular_run(mask: u16) -> usize {
    if mask == u16::MAX {
        return 16;
    }

    let mut longest = 0;
    let mut current = 0;
    // Two laps so runs crossing index 15 -> 0 are counted whole.
    for i in 0..32 {
        if mask & (1 << (i % 16)) != 0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
