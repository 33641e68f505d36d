//! Byte-scan primitives (spec §4.A): vectorised newline search, case
//! folding, and separator detection over fixed-width byte lanes, with a
//! scalar reference each always available.
//!
//! The functions re-exported at this module's root dispatch to
//! [`simd`] when the `perf-simd` feature is enabled, and to [`scalar`]
//! otherwise — a target without easy vectorisation can depend on this crate
//! with `default-features = false` and still get a fully correct core
//! (spec §9, "SIMD is optional").

pub mod scalar;
#[cfg(feature = "perf-simd")]
pub mod simd;

/// Index of the first `\n` at or after `start`, or `input.len()`.
#[inline]
pub fn find_next_newline(input: &[u8], start: usize) -> usize {
    #[cfg(feature = "perf-simd")]
    return simd::find_next_newline(input, start);
    #[cfg(not(feature = "perf-simd"))]
    return scalar::find_next_newline(input, start);
}

/// ASCII-fold every byte of `bytes` in place: `[A-Z] -> [a-z]`, else
/// unchanged.
#[inline]
pub fn to_lower_ascii(bytes: &mut [u8]) {
    #[cfg(feature = "perf-simd")]
    return simd::to_lower_ascii(bytes);
    #[cfg(not(feature = "perf-simd"))]
    return scalar::to_lower_ascii(bytes);
}

/// True iff `byte` equals any byte in `separator_bytes`.
#[inline]
pub fn is_separator(byte: u8, separator_bytes: &[u8]) -> bool {
    #[cfg(feature = "perf-simd")]
    return simd::is_separator(byte, separator_bytes);
    #[cfg(not(feature = "perf-simd"))]
    return scalar::is_separator(byte, separator_bytes);
}

/// True iff `window` contains an AWK-whitespace byte (space or tab); used
/// as the fixed-width pre-check in the field splitter's whitespace mode
/// (spec §4.E).
#[inline]
pub fn contains_whitespace(window: &[u8]) -> bool {
    #[cfg(feature = "perf-simd")]
    return simd::contains_whitespace(window);
    #[cfg(not(feature = "perf-simd"))]
    return scalar::contains_whitespace(window);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_matches_scalar_reference() {
        let input = b"the quick\tbrown fox\njumps over\n";
        assert_eq!(
            find_next_newline(input, 0),
            scalar::find_next_newline(input, 0)
        );
        assert_eq!(
            contains_whitespace(input),
            scalar::contains_whitespace(input)
        );
    }
}
