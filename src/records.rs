//! Output record layouts (spec §3, §6).
//!
//! Every offset here is a `u32` byte index into the caller-supplied input
//! buffer. Records never own or copy line content — they are pure indices,
//! the "arena + index" pattern from the design notes: the input buffer is
//! the arena, match/field arrays are secondary arenas that index into it and
//! into each other.
//!
//! `MatchRecord` carries an explicit 8-byte tail pad so its size matches
//! what a GPU compute kernel writes into a structured storage buffer with
//! native alignment; see [`crate::gpu::layout`].

#[cfg(feature = "gpu")]
use bytemuck::{Pod, Zeroable};

/// One selected (or, under `invert_match`, rejected-then-selected) line.
///
/// `match_start`/`match_end` are relative to `line_start`, and are `0`/`0`
/// when the match concept does not apply (empty pattern, or an inverted
/// match where no span was ever computed).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "gpu", derive(Pod, Zeroable))]
pub struct MatchRecord {
    pub line_start: u32,
    pub line_end: u32,
    pub match_start: u32,
    pub match_end: u32,
    pub line_num: u32,
    pub field_count: u32,
    _pad: [u32; 2],
}

impl MatchRecord {
    pub fn new(
        line_start: u32,
        line_end: u32,
        match_start: u32,
        match_end: u32,
        line_num: u32,
        field_count: u32,
    ) -> Self {
        debug_assert!(line_start <= match_start);
        debug_assert!(match_start <= match_end);
        debug_assert!(match_end <= line_end);
        Self {
            line_start,
            line_end,
            match_start,
            match_end,
            line_num,
            field_count,
            _pad: [0; 2],
        }
    }
}

/// One field within a selected line (spec §4.E), 1-indexed in AWK
/// convention, referencing its owning [`MatchRecord`] by array index.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "gpu", derive(Pod, Zeroable))]
pub struct FieldRecord {
    pub line_idx: u32,
    pub field_idx: u32,
    pub start_offset: u32,
    pub end_offset: u32,
}

impl FieldRecord {
    pub fn new(line_idx: u32, field_idx: u32, start_offset: u32, end_offset: u32) -> Self {
        Self {
            line_idx,
            field_idx,
            start_offset,
            end_offset,
        }
    }

    pub fn len(&self) -> u32 {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

/// One match found by the substitution engine (spec §4.G), in absolute
/// buffer offsets (unlike `MatchRecord`, which is line-relative).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "gpu", derive(Pod, Zeroable))]
pub struct SubstitutionRecord {
    pub position: u32,
    pub match_len: u32,
    pub line_num: u32,
    _pad: u32,
}

impl SubstitutionRecord {
    pub fn new(position: u32, match_len: u32, line_num: u32) -> Self {
        Self {
            position,
            match_len,
            line_num,
            _pad: 0,
        }
    }
}
