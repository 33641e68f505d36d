//! The per-line pipeline (spec §4.F): walk the input buffer line by line,
//! test each line against a pattern, optionally invert the selection, and
//! split selected lines into fields — composing [`scan`], [`literal`] or
//! [`regex`], and [`fields`] into the match/field record arrays a caller
//! (or the GPU layout in [`crate::gpu`]) consumes directly.

use crate::fields::{self, Field};
use crate::literal::LiteralMatcher;
use crate::options::Options;
use crate::records::{FieldRecord, MatchRecord};
use crate::regex;
use crate::scan;
use crate::Pattern;

/// The result of scanning a whole buffer: one [`MatchRecord`] per selected
/// line, and the flattened [`FieldRecord`] array for all of them, each
/// field pointing back at its line by index into `matches` (spec §4.E/§4.F).
#[derive(Clone, Debug, Default)]
pub struct EngineResult {
    pub matches: Vec<MatchRecord>,
    pub fields: Vec<FieldRecord>,
}

/// A pattern prepared once for repeated use across every line of a buffer,
/// rather than rebuilding a [`LiteralMatcher`]'s skip table per line.
enum Prepared<'p> {
    Literal(LiteralMatcher),
    Regex(&'p regex::Program),
}

impl Prepared<'_> {
    fn find(&self, line: &[u8]) -> Option<(usize, usize)> {
        match self {
            Self::Literal(m) => {
                if m.is_empty() {
                    Some((0, 0))
                } else {
                    m.find(line).map(|start| (start, start + m.pattern().len()))
                }
            }
            Self::Regex(prog) => prog.find(line),
        }
    }
}

fn prepare(pattern: &Pattern, case_insensitive: bool) -> Prepared<'_> {
    match pattern {
        Pattern::Literal(bytes) => Prepared::Literal(LiteralMatcher::new(bytes, case_insensitive)),
        Pattern::Regex(prog) => Prepared::Regex(prog),
    }
}

/// Scan every line of `input` against `pattern`, honoring `options`'
/// case folding, `invert_match`, and field separator, returning every
/// selected line's [`MatchRecord`] plus the field records split from it.
///
/// Line numbers are 0-indexed and count every line in the buffer, matched
/// or not. A final unterminated line (no trailing `\n`) is scanned like
/// any other; a buffer ending in `\n` does not produce a trailing empty
/// line.
pub fn scan_lines(input: &[u8], pattern: &Pattern, options: &Options) -> EngineResult {
    let prepared = prepare(pattern, options.case_insensitive);
    let mut result = EngineResult::default();

    let mut line_start = 0usize;
    let mut line_num: u32 = 0;

    while line_start < input.len() {
        let line_end = scan::find_next_newline(input, line_start);
        let line = &input[line_start..line_end];

        let found = prepared.find(line);
        let selected = found.is_some() != options.invert_match;

        if selected {
            record_line(&mut result, line, line_start, line_end, line_num, found, options);
        }

        line_start = line_end + 1;
        line_num += 1;
    }

    result
}

fn record_line(
    result: &mut EngineResult,
    line: &[u8],
    line_start: usize,
    line_end: usize,
    line_num: u32,
    found: Option<(usize, usize)>,
    options: &Options,
) {
    let (match_start, match_end) = match found {
        Some((s, e)) => ((line_start + s) as u32, (line_start + e) as u32),
        None => (line_start as u32, line_start as u32),
    };

    let line_fields: Vec<Field> = fields::split(line, &options.field_separator);
    let match_idx = result.matches.len() as u32;
    for (i, field) in line_fields.iter().enumerate() {
        result.fields.push(FieldRecord::new(
            match_idx,
            (i + 1) as u32,
            line_start as u32 + field.start,
            line_start as u32 + field.end,
        ));
    }

    result.matches.push(MatchRecord::new(
        line_start as u32,
        line_end as u32,
        match_start,
        match_end,
        line_num,
        line_fields.len() as u32,
    ));
}
