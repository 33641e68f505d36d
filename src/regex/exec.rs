//! Thompson-NFA simulation (spec §4.D): a Pike's-VM-style executor, shaped
//! after `yara-x`'s `pikevm.rs` in the retrieval pack — two generation-
//! stamped thread lists (current/next), epsilon closure expanded eagerly
//! into each list, one byte consumed per step.
//!
//! Candidate selection follows spec §4.D literally: the best candidate is
//! the one with the smallest `match_start`; among threads sharing that
//! start, the one with the largest `match_end` wins (POSIX leftmost-longest,
//! spec §9 Open Question ii). A thread reaching `Match` never displaces
//! threads still running — every thread keeps simulating until it dies or
//! the input is exhausted, so a short alternation branch that matches early
//! doesn't prevent a same-start, longer branch from overtaking it later.
//!
//! Unanchored search is not a separate mode: a fresh thread starting at the
//! current position is appended at every step no match has been found yet,
//! equivalent to an implicit non-greedy `.*?` prefix without actually
//! compiling one in.

use crate::regex::nfa::{class_contains, Op, Program};

#[derive(Clone, Copy)]
struct Thread {
    pc: u32,
    start: u32,
}

struct ThreadList {
    threads: Vec<Thread>,
    on_list: Vec<u32>,
    gen: u32,
}

impl ThreadList {
    fn new(num_states: usize) -> Self {
        Self { threads: Vec::new(), on_list: vec![0; num_states], gen: 0 }
    }

    fn clear(&mut self) {
        self.threads.clear();
        self.gen += 1;
    }
}

/// Find the leftmost match of `prog` in `haystack`, returning `(start,
/// end)` byte offsets, or `None`. Zero-width matches (`(start, start)`) are
/// valid results, e.g. for `a*` against input with no `a`.
pub fn find(prog: &Program, haystack: &[u8]) -> Option<(usize, usize)> {
    let len = haystack.len();
    let mut clist = ThreadList::new(prog.states.len());
    let mut nlist = ThreadList::new(prog.states.len());
    clist.clear();

    let mut best: Option<(usize, usize)> = None;

    for sp in 0..=len {
        if best.is_none() && (sp == 0 || !prog.anchored_start) {
            add_thread(prog, &mut clist, prog.start, sp as u32, sp, len, haystack);
        }
        if clist.threads.is_empty() {
            if best.is_some() || prog.anchored_start {
                break;
            }
            continue;
        }

        nlist.clear();
        for t in std::mem::take(&mut clist.threads) {
            match prog.state(t.pc).op() {
                Op::Match => {
                    let candidate = (t.start as usize, sp);
                    let better = match best {
                        None => true,
                        Some((best_start, best_end)) => {
                            candidate.0 < best_start || (candidate.0 == best_start && candidate.1 > best_end)
                        }
                    };
                    if better {
                        best = Some(candidate);
                    }
                }
                Op::Byte => {
                    if sp < len {
                        let state = prog.state(t.pc);
                        if class_contains(prog.class(state.a), haystack[sp]) {
                            add_thread(prog, &mut nlist, state.b, t.start, sp + 1, len, haystack);
                        }
                    }
                }
                _ => unreachable!("epsilon states never survive closure into a thread list"),
            }
        }
        std::mem::swap(&mut clist, &mut nlist);
    }

    best
}

/// True iff `prog` matches anywhere in `haystack`, without computing match
/// bounds.
pub fn is_match(prog: &Program, haystack: &[u8]) -> bool {
    find(prog, haystack).is_some()
}

/// True iff `b` is an ASCII "word" byte for `\b`/`\B` purposes: alphanumeric
/// or underscore.
#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// True iff position `sp` in `haystack` sits on a word/non-word transition
/// — the boundary before the first byte and after the last byte counts
/// too, treating out-of-bounds as non-word.
#[inline]
fn is_word_boundary(haystack: &[u8], sp: usize, len: usize) -> bool {
    let before = sp > 0 && is_word_byte(haystack[sp - 1]);
    let after = sp < len && is_word_byte(haystack[sp]);
    before != after
}

/// Epsilon-closure `pc` into `list`, recording `start`/`sp` on every
/// `Byte`/`Match` state it reaches. Returns without adding anything if
/// `pc` (or an ancestor already queued this generation) was already
/// visited at this position, so each state appears at most once per step.
fn add_thread(prog: &Program, list: &mut ThreadList, pc: u32, start: u32, sp: usize, len: usize, haystack: &[u8]) {
    if list.on_list[pc as usize] == list.gen {
        return;
    }
    list.on_list[pc as usize] = list.gen;

    let state = prog.state(pc);
    match state.op() {
        Op::Jmp | Op::GroupStart | Op::GroupEnd => add_thread(prog, list, state.a, start, sp, len, haystack),
        Op::Split => {
            add_thread(prog, list, state.a, start, sp, len, haystack);
            add_thread(prog, list, state.b, start, sp, len, haystack);
        }
        Op::AssertStart => {
            if sp == 0 {
                add_thread(prog, list, state.a, start, sp, len, haystack);
            }
        }
        Op::AssertEnd => {
            if sp == len {
                add_thread(prog, list, state.a, start, sp, len, haystack);
            }
        }
        Op::AssertWordBoundary => {
            if is_word_boundary(haystack, sp, len) {
                add_thread(prog, list, state.a, start, sp, len, haystack);
            }
        }
        Op::AssertNotWordBoundary => {
            if !is_word_boundary(haystack, sp, len) {
                add_thread(prog, list, state.a, start, sp, len, haystack);
            }
        }
        Op::Byte | Op::Match => list.threads.push(Thread { pc, start }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::compile::compile;

    fn run(pattern: &[u8], haystack: &[u8]) -> Option<(usize, usize)> {
        find(&compile(pattern, false).unwrap(), haystack)
    }

    #[test]
    fn unanchored_search_finds_leftmost_occurrence() {
        assert_eq!(run(b"bc", b"abcabc"), Some((1, 3)));
    }

    #[test]
    fn anchored_start_rejects_mid_string_match() {
        assert_eq!(run(b"^bc", b"abc"), None);
        assert_eq!(run(b"^ab", b"abc"), Some((0, 2)));
    }

    #[test]
    fn end_anchor_requires_suffix_match() {
        assert_eq!(run(b"bc$", b"abc"), Some((1, 3)));
        assert_eq!(run(b"bc$", b"abcd"), None);
    }

    #[test]
    fn empty_pattern_matches_zero_width_at_start() {
        assert_eq!(run(b"", b"anything"), Some((0, 0)));
    }

    #[test]
    fn star_matches_zero_width_when_body_absent() {
        assert_eq!(run(b"x*", b"yyy"), Some((0, 0)));
    }

    #[test]
    fn no_match_returns_none() {
        assert_eq!(run(b"zzz", b"abcabc"), None);
    }

    #[test]
    fn word_boundary_matches_at_word_edges_only() {
        assert_eq!(run(b"\\bcat\\b", b"a cat sat"), Some((2, 5)));
        assert_eq!(run(b"\\bcat\\b", b"concatenate"), None);
    }

    #[test]
    fn negated_word_boundary_matches_inside_a_word() {
        assert_eq!(run(b"cat\\B", b"concatenate"), Some((3, 6)));
        assert_eq!(run(b"cat\\B", b"a cat sat"), None);
    }

    #[test]
    fn capture_group_is_transparent_to_matching() {
        assert_eq!(run(b"(ab)+c", b"ababc"), Some((0, 5)));
    }

    #[test]
    fn alternation_same_start_prefers_longer_match() {
        // "a" and "ab" both start at 0; POSIX leftmost-longest picks "ab"
        // even though "a" is the first-listed branch and matches earlier.
        assert_eq!(run(b"a|ab", b"ab"), Some((0, 2)));
    }
}
