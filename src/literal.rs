//! Boyer-Moore-Horspool literal matcher (spec §4.B), grounded on the
//! dedicated BMH implementation in the retrieval pack
//! (`SanchithHegde-boyer-moore-visualization-rs`): a 256-entry skip table
//! mapping each byte to the distance from its last occurrence in
//! `pattern[..len-1]` to the end of the pattern, with a `max(skip, 1)` guard
//! against degenerate zero shifts.

use crate::scan;

/// A precomputed skip table plus the (possibly lowered) pattern bytes,
/// ready for repeated searches. Cheap to build, cheap to clone (a 256-byte
/// array and the pattern bytes), and immutable during search — safe to
/// share across threads, matching the read-only contract the concurrency
/// model (spec §5) requires of every compiled pattern.
#[derive(Clone, Debug)]
pub struct LiteralMatcher {
    pattern: Box<[u8]>,
    skip: [u8; 256],
    case_insensitive: bool,
}

/// `min(pattern.len(), 255)`, the value used for bytes absent from the
/// pattern alphabet — distances beyond 255 don't fit in a `u8` skip
/// table entry, and capping is harmless since any real mismatch at that
/// byte will re-derive the same large shift on the next iteration.
fn default_skip(pattern_len: usize) -> u8 {
    pattern_len.min(255) as u8
}

impl LiteralMatcher {
    /// Build a matcher for `pattern`. When `case_insensitive` is set, the
    /// pattern is lowered and the skip table is populated for both cases of
    /// every letter, so `find` can lower haystack bytes on the fly without
    /// losing skip distance information for either case.
    pub fn new(pattern: &[u8], case_insensitive: bool) -> Self {
        let mut owned: Box<[u8]> = pattern.into();
        if case_insensitive {
            scan::to_lower_ascii(&mut owned);
        }

        let mut skip = [default_skip(owned.len()); 256];
        if !owned.is_empty() {
            // Distance from each byte's last occurrence in pattern[..len-1]
            // to the end of the pattern (the classic BMH table).
            for (i, &b) in owned[..owned.len() - 1].iter().enumerate() {
                let dist = (owned.len() - 1 - i) as u8;
                skip[b as usize] = dist;
                if case_insensitive && b.is_ascii_lowercase() {
                    skip[b.to_ascii_uppercase() as usize] = dist;
                }
            }
        }

        Self {
            pattern: owned,
            skip,
            case_insensitive,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Find the leftmost match of this pattern in `haystack`, or `None`.
    /// An empty pattern is handled by the caller (spec §4.B: "Empty pattern
    /// matches trivially everywhere and is handled specially by F").
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        let plen = self.pattern.len();
        if plen == 0 {
            return Some(0);
        }
        if haystack.len() < plen {
            return None;
        }

        let mut pos = 0usize;
        let last = plen - 1;
        while pos <= haystack.len() - plen {
            if self.window_matches(&haystack[pos..pos + plen]) {
                return Some(pos);
            }
            let last_byte_in_window = haystack[pos + last];
            let lookup = if self.case_insensitive {
                scan::scalar::to_lower_byte(last_byte_in_window)
            } else {
                last_byte_in_window
            };
            let shift = self.skip[lookup as usize].max(1) as usize;
            pos += shift;
        }
        None
    }

    /// True iff this pattern appears anywhere in `haystack`.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.find(haystack).is_some()
    }

    #[inline]
    fn window_matches(&self, window: &[u8]) -> bool {
        debug_assert_eq!(window.len(), self.pattern.len());
        if self.case_insensitive {
            window
                .iter()
                .zip(self.pattern.iter())
                .all(|(&h, &p)| scan::scalar::to_lower_byte(h) == p)
        } else {
            window == &*self.pattern
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_leftmost_match() {
        let m = LiteralMatcher::new(b"error", false);
        assert_eq!(m.find(b"no error here, another error"), Some(3));
        assert_eq!(m.find(b"all clear"), None);
    }

    #[test]
    fn empty_pattern_matches_at_zero() {
        let m = LiteralMatcher::new(b"", false);
        assert_eq!(m.find(b"anything"), Some(0));
        assert_eq!(m.find(b""), Some(0));
    }

    #[test]
    fn case_insensitive_matches_either_case() {
        let m = LiteralMatcher::new(b"ERROR", true);
        assert_eq!(m.find(b"an Error occurred"), Some(3));
        assert_eq!(m.find(b"an error occurred"), Some(3));
    }

    #[test]
    fn shorter_haystack_than_pattern_is_not_found() {
        let m = LiteralMatcher::new(b"longpattern", false);
        assert_eq!(m.find(b"short"), None);
    }

    #[test]
    fn skip_table_never_yields_a_miss_against_naive_search() {
        fn naive_find(hay: &[u8], pat: &[u8]) -> Option<usize> {
            if pat.is_empty() {
                return Some(0);
            }
            hay.windows(pat.len()).position(|w| w == pat)
        }

        let haystacks: &[&[u8]] = &[
            b"abababababab",
            b"mississippi",
            b"aaaaaaaaaaaaaaaaaaaaaab",
            b"the quick brown fox jumps over the lazy dog",
        ];
        let patterns: &[&[u8]] = &[b"ab", b"issi", b"aab", b"fox", b"zzz"];

        for &hay in haystacks {
            for &pat in patterns {
                let m = LiteralMatcher::new(pat, false);
                assert_eq!(m.find(hay), naive_find(hay, pat), "pat={pat:?} hay={hay:?}");
            }
        }
    }

    #[test]
    fn skip_table_respects_min_one_and_max_len_bound() {
        let m = LiteralMatcher::new(b"banana", false);
        for &b in m.skip.iter() {
            assert!(b >= 1);
            assert!(b as usize <= m.pattern.len());
        }
    }
}
