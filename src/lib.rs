/*!
A byte-oriented matching and field-extraction core for an AWK-like text
engine.

This crate scans a byte buffer line-by-line, tests each line against a
pattern (a literal byte string or a compiled regex), optionally splits
matching lines into fields, and reports everything as index-only records
into the caller's buffer — no line content is ever copied inside the core.

## Overview

- [`literal`] — a Boyer-Moore-Horspool literal matcher.
- [`regex`] — an ERE-subset parser, Thompson-NFA compiler and executor,
  sharing one byte-exact program layout with the GPU backend.
- [`scan`] — the vectorised byte-scan primitives (newline search, case
  folding, separator detection) that both of the above build on.
- [`fields`] — whitespace / single-byte / multi-byte field splitting.
- [`engine`] — the per-line pipeline that composes the above into match and
  field record arrays ([`MatchRecord`], [`FieldRecord`]).
- [`subst`] — whole-buffer substitution, producing a new buffer.
- [`dispatch`] — classifies a workload and picks a CPU or GPU backend.
- [`gpu`] — the GPU compute-kernel contract (feature `gpu`).

## Usage

```
use vecawk::{engine, options::Options};

let input = b"hello world\nerror occurred\nall is well\nerror again\n";
let pattern = vecawk::Pattern::literal(b"error");
let options = Options::builder().build();

let result = engine::scan_lines(input, &pattern, &options);
assert_eq!(result.matches.len(), 2);
assert_eq!(result.matches[0].line_num, 1);
assert_eq!(result.matches[1].line_num, 3);
```

## Non-goals

Full AWK language semantics (control flow, arrays, user functions),
arbitrary-precision arithmetic, Unicode-aware regex (this engine is strictly
byte-oriented), streaming/incremental input, and regex backreferences are
all out of scope; see the crate's `SPEC_FULL.md` for the full rationale.
*/
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod fields;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod literal;
pub mod options;
pub mod records;
pub mod regex;
pub mod scan;
pub mod subst;

pub use error::{Error, Result};
pub use records::{FieldRecord, MatchRecord, SubstitutionRecord};

/// Threshold, in bytes, above which `auto` backend selection prefers GPU
/// over CPU (spec §6).
pub const MIN_GPU_SIZE: usize = 128 * 1024;
/// Per-dispatch input cap for the GPU path (spec §6).
pub const MAX_GPU_BUFFER_SIZE: usize = 64 * 1024 * 1024;
/// Maximum pattern length accepted at the external boundary (spec §6).
pub const MAX_PATTERN_LEN: usize = 256;
/// Capacity of the bounded match-record array a GPU dispatch writes into
/// (spec §6).
pub const MAX_RESULTS: usize = 1_000_000;
/// Capacity of the bounded field-record array a GPU dispatch writes into
/// (spec §6).
pub const MAX_FIELDS: usize = 100_000;
/// Maximum length of a multi-byte field separator (spec §6).
pub const MAX_FIELD_SEP_LEN: usize = 16;

/// A pattern to match against a line: either a literal byte string or a
/// compiled regex program (spec §3).
#[derive(Clone, Debug)]
pub enum Pattern {
    Literal(Vec<u8>),
    Regex(regex::Program),
}

impl Pattern {
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Literal(bytes.into())
    }

    /// Compile `pat` as a regex, falling back to a literal match on the raw
    /// pattern bytes if it fails to parse (spec §4.D "Failure behaviour",
    /// the documented contract of the backend dispatcher).
    pub fn compile(pat: &[u8], case_insensitive: bool) -> Self {
        if regex::syntax::is_regex_like(pat) {
            match regex::Program::compile(pat, case_insensitive) {
                Ok(prog) => return Self::Regex(prog),
                Err(err) => {
                    log::warn!(
                        "pattern {:?} failed to compile as regex ({err}); falling back to literal match",
                        String::from_utf8_lossy(pat)
                    );
                }
            }
        }
        Self::Literal(pat.to_vec())
    }
}
