//! Whole-buffer substitution engine (spec §4.G): finds every non-
//! overlapping match across the full input (not line-by-line) and
//! produces a new buffer with each match replaced by a caller-supplied
//! replacement, plus a [`SubstitutionRecord`] per replacement performed.
//!
//! Output size is computed up front from the match list so the result
//! buffer is allocated exactly once, at its final size — no repeated
//! `Vec` growth while copying (spec §4.G, "single pass, exact
//! allocation").

use crate::error::Result;
use crate::literal::LiteralMatcher;
use crate::records::SubstitutionRecord;
use crate::regex;
use crate::scan;
use crate::Pattern;

/// The result of a substitution pass: the rewritten buffer and one record
/// per replacement actually made, in order.
#[derive(Clone, Debug, Default)]
pub struct SubstResult {
    pub output: Vec<u8>,
    pub substitutions: Vec<SubstitutionRecord>,
}

/// Replace matches of `pattern` in `input` with `replacement`.
///
/// When `global` is `false`, the driver stops after the very first match
/// found anywhere in the buffer; when `true`, every non-overlapping match
/// across the whole buffer is replaced (spec §4.G). An empty pattern
/// matches a zero-width span, advancing by one byte afterward to
/// guarantee forward progress.
///
/// Fails with [`crate::error::Error::Alloc`] rather than aborting the process if the
/// computed output buffer (which can be larger than `input` when
/// `replacement` is longer than the matched text) can't be allocated
/// (spec §7).
pub fn substitute(
    input: &[u8],
    pattern: &Pattern,
    replacement: &[u8],
    case_insensitive: bool,
    global: bool,
) -> Result<SubstResult> {
    let matches = find_matches(input, pattern, case_insensitive, global);

    let replaced_len: usize = matches.iter().map(|&(s, e)| e - s).sum();
    let output_len = input.len() - replaced_len + matches.len() * replacement.len();
    let mut output = Vec::new();
    output.try_reserve(output_len)?;
    let mut substitutions = Vec::with_capacity(matches.len());

    let mut cursor = 0usize;
    let mut line_num = 0u32;
    let mut next_line_end = scan::find_next_newline(input, 0);

    for (start, end) in matches {
        while start > next_line_end && next_line_end < input.len() {
            line_num += 1;
            next_line_end = scan::find_next_newline(input, next_line_end + 1);
        }
        output.extend_from_slice(&input[cursor..start]);
        output.extend_from_slice(replacement);
        substitutions.push(SubstitutionRecord::new(start as u32, (end - start) as u32, line_num));
        cursor = end;
    }
    output.extend_from_slice(&input[cursor..]);

    Ok(SubstResult { output, substitutions })
}

/// Find non-overlapping matches across the whole buffer. Without `global`,
/// the driver stops entirely after the first match found anywhere in the
/// input (spec §4.G: "When global_substitution is false the driver stops
/// after the first match").
fn find_matches(input: &[u8], pattern: &Pattern, case_insensitive: bool, global: bool) -> Vec<(usize, usize)> {
    let prepared = match pattern {
        Pattern::Literal(bytes) => MatchSource::Literal(LiteralMatcher::new(bytes, case_insensitive)),
        Pattern::Regex(prog) => MatchSource::Regex(prog),
    };

    let mut matches = Vec::new();
    let mut pos = 0usize;

    while pos <= input.len() {
        match prepared.find(&input[pos..]) {
            Some((rel_start, rel_end)) => {
                let start = pos + rel_start;
                let end = pos + rel_end;
                matches.push((start, end));
                if !global {
                    break;
                }
                pos = if end > start { end } else { end + 1 };
            }
            None => break,
        }
    }

    matches
}

enum MatchSource<'p> {
    Literal(LiteralMatcher),
    Regex(&'p regex::Program),
}

impl MatchSource<'_> {
    fn find(&self, haystack: &[u8]) -> Option<(usize, usize)> {
        match self {
            Self::Literal(m) => {
                if m.is_empty() {
                    Some((0, 0))
                } else {
                    m.find(haystack).map(|s| (s, s + m.pattern().len()))
                }
            }
            Self::Regex(prog) => prog.find(haystack),
        }
    }
}
