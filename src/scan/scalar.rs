//! Scalar reference implementations of the byte-scan primitives (spec
//! §4.A). Always compiled in: used directly when `perf-simd` is off, and as
//! the fuzz oracle for the accelerated paths in `scan::simd` when it's on
//! (spec §9, "SIMD is optional... the reference must be implemented first
//! and fuzzed against the vectorised one").

/// Index of the first `\n` at or after `start`, or `input.len()`.
#[inline]
pub fn find_next_newline(input: &[u8], start: usize) -> usize {
    match input[start..].iter().position(|&b| b == b'\n') {
        Some(i) => start + i,
        None => input.len(),
    }
}

/// ASCII-fold a single byte: `[A-Z] -> [a-z]`, else unchanged.
#[inline]
pub fn to_lower_byte(b: u8) -> u8 {
    if b.is_ascii_uppercase() {
        b + 32
    } else {
        b
    }
}

/// ASCII-fold every byte of `bytes` in place.
#[inline]
pub fn to_lower_ascii(bytes: &mut [u8]) {
    for b in bytes {
        *b = to_lower_byte(*b);
    }
}

/// True iff `byte` equals any byte in `separator_bytes`.
#[inline]
pub fn is_separator(byte: u8, separator_bytes: &[u8]) -> bool {
    separator_bytes.contains(&byte)
}

/// True iff `window` contains an AWK-whitespace byte (space or tab).
#[inline]
pub fn contains_whitespace(window: &[u8]) -> bool {
    window.iter().any(|&b| b == b' ' || b == b'\t')
}
