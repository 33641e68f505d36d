//! Byte-exact NFA program layout (spec §4.C), shared verbatim between the
//! CPU executor ([`super::exec`]) and the GPU compute kernel: every field
//! here is a plain `u32`, so the whole program uploads to a GPU buffer
//! with `bytemuck::cast_slice` and no further translation (spec §4.I,
//! "one compiler, two executors").
//!
//! Unlike the teacher (`ib-matcher`), which hands NFA construction off to
//! `regex-automata`, this program is compiled from scratch by
//! [`super::compile`] precisely so its layout can be this simple and this
//! portable.

/// Number of `u32` words backing a 256-bit character-class bitmap.
pub const NUM_BITMAP_WORDS: usize = 8;

/// A 256-bit set of bytes, one bit per possible byte value.
pub type ClassBitmap = [u32; NUM_BITMAP_WORDS];

/// True iff `byte`'s bit is set in `class`.
#[inline]
pub fn class_contains(class: &ClassBitmap, byte: u8) -> bool {
    let word = class[(byte >> 5) as usize];
    (word >> (byte & 31)) & 1 != 0
}

/// Set `byte`'s bit in `class`.
#[inline]
pub fn class_insert(class: &mut ClassBitmap, byte: u8) {
    class[(byte >> 5) as usize] |= 1 << (byte & 31);
}

/// Opcode tag for [`NfaState::op`]. Kept as a plain `u32` rather than a
/// Rust enum so the state array is directly `bytemuck`-castable.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Consume one byte matching class `a`, then continue at `b`.
    Byte = 0,
    /// Epsilon-split: follow both `a` and `b`, `a` first (higher priority).
    Split = 1,
    /// Epsilon-jump to `a`.
    Jmp = 2,
    /// Zero-width assertion: buffer start. Continue at `a` iff `sp == 0`.
    AssertStart = 3,
    /// Zero-width assertion: buffer end. Continue at `a` iff `sp == len`.
    AssertEnd = 4,
    /// Accepting state.
    Match = 5,
    /// Zero-width capture-group open, tagged with group number `b`.
    /// Transparent to matching — continues unconditionally at `a`.
    GroupStart = 6,
    /// Zero-width capture-group close, tagged with group number `b`.
    GroupEnd = 7,
    /// Zero-width assertion: `\b`. Continue at `a` iff `sp` sits on a
    /// word/non-word byte boundary.
    AssertWordBoundary = 8,
    /// Zero-width assertion: `\B`, the negation of `AssertWordBoundary`.
    AssertNotWordBoundary = 9,
}

/// One instruction of the compiled program. `a`/`b` are overloaded by
/// `op` (see [`Op`]); `_pad` exists only to round the struct to 16 bytes,
/// a GPU-friendly alignment (mirrors [`crate::records::MatchRecord`]'s own
/// padding rationale).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "gpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct NfaState {
    pub op: u32,
    pub a: u32,
    pub b: u32,
    pub _pad: u32,
}

impl NfaState {
    pub fn byte(class: u32, next: u32) -> Self {
        Self { op: Op::Byte as u32, a: class, b: next, _pad: 0 }
    }
    pub fn split(a: u32, b: u32) -> Self {
        Self { op: Op::Split as u32, a, b, _pad: 0 }
    }
    pub fn jmp(next: u32) -> Self {
        Self { op: Op::Jmp as u32, a: next, b: 0, _pad: 0 }
    }
    pub fn assert_start(next: u32) -> Self {
        Self { op: Op::AssertStart as u32, a: next, b: 0, _pad: 0 }
    }
    pub fn assert_end(next: u32) -> Self {
        Self { op: Op::AssertEnd as u32, a: next, b: 0, _pad: 0 }
    }
    pub fn matching() -> Self {
        Self { op: Op::Match as u32, a: 0, b: 0, _pad: 0 }
    }
    pub fn group_start(next: u32, group: u32) -> Self {
        Self { op: Op::GroupStart as u32, a: next, b: group, _pad: 0 }
    }
    pub fn group_end(next: u32, group: u32) -> Self {
        Self { op: Op::GroupEnd as u32, a: next, b: group, _pad: 0 }
    }
    pub fn assert_word_boundary(next: u32) -> Self {
        Self { op: Op::AssertWordBoundary as u32, a: next, b: 0, _pad: 0 }
    }
    pub fn assert_not_word_boundary(next: u32) -> Self {
        Self { op: Op::AssertNotWordBoundary as u32, a: next, b: 0, _pad: 0 }
    }

    #[inline]
    pub fn op(&self) -> Op {
        match self.op {
            0 => Op::Byte,
            1 => Op::Split,
            2 => Op::Jmp,
            3 => Op::AssertStart,
            4 => Op::AssertEnd,
            5 => Op::Match,
            6 => Op::GroupStart,
            7 => Op::GroupEnd,
            8 => Op::AssertWordBoundary,
            _ => Op::AssertNotWordBoundary,
        }
    }
}

/// A compiled regex program: an instruction array plus the byte-class
/// bitmaps its `Byte` states reference, addressed by `start` (spec §4.C).
#[derive(Clone, Debug)]
pub struct Program {
    pub states: Vec<NfaState>,
    pub classes: Vec<ClassBitmap>,
    pub start: u32,
    /// Set when the pattern opens with an unescaped `^`, letting the
    /// executor skip the per-position unanchored restart loop (spec §4.D,
    /// "anchored patterns short-circuit").
    pub anchored_start: bool,
    /// Set when the pattern closes with an unescaped `$` on every branch.
    pub anchored_end: bool,
    /// Whether this program was compiled with case folding baked into its
    /// byte-class bitmaps (spec §3 header: "global flags").
    pub case_insensitive: bool,
    /// Number of capture groups in the pattern (not counting the implicit
    /// whole-match group), i.e. the highest group index assigned.
    pub num_groups: u32,
}

impl Program {
    #[inline]
    pub fn state(&self, pc: u32) -> NfaState {
        self.states[pc as usize]
    }

    #[inline]
    pub fn class(&self, id: u32) -> &ClassBitmap {
        &self.classes[id as usize]
    }

    /// Number of `u32` words the flattened GPU upload occupies: the state
    /// array plus the class bitmap pool (spec §4.I layout note).
    pub fn gpu_word_count(&self) -> usize {
        self.states.len() * 4 + self.classes.len() * NUM_BITMAP_WORDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_bitmap_round_trips() {
        let mut class: ClassBitmap = [0; NUM_BITMAP_WORDS];
        class_insert(&mut class, b'a');
        class_insert(&mut class, b'z');
        class_insert(&mut class, 0);
        class_insert(&mut class, 255);
        assert!(class_contains(&class, b'a'));
        assert!(class_contains(&class, b'z'));
        assert!(class_contains(&class, 0));
        assert!(class_contains(&class, 255));
        assert!(!class_contains(&class, b'b'));
    }

    #[test]
    fn state_constructors_round_trip_through_op() {
        assert_eq!(NfaState::byte(3, 7).op(), Op::Byte);
        assert_eq!(NfaState::split(1, 2).op(), Op::Split);
        assert_eq!(NfaState::jmp(4).op(), Op::Jmp);
        assert_eq!(NfaState::assert_start(0).op(), Op::AssertStart);
        assert_eq!(NfaState::assert_end(0).op(), Op::AssertEnd);
        assert_eq!(NfaState::matching().op(), Op::Match);
    }

    #[test]
    fn nfa_state_is_16_bytes() {
        assert_eq!(std::mem::size_of::<NfaState>(), 16);
    }
}
