//! ERE-subset regex engine (spec §4.C/§4.D): parse ([`syntax`]) to compile
//! ([`compile`]) to execute ([`exec`]), all three stages sharing the single
//! byte-exact [`nfa::Program`] layout the GPU kernel contract depends on.
//!
//! Generalises the NFA newtype shape the teacher (`ib-matcher`) wraps
//! around `regex-automata`, but owns construction end-to-end (see
//! `DESIGN.md`) so the resulting program is a flat, `bytemuck`-castable
//! struct rather than an opaque library type.

pub mod compile;
pub mod exec;
pub mod nfa;
pub mod syntax;

pub use nfa::Program as NfaProgram;
pub use syntax::{is_regex_like, ParseError};

/// A compiled regex, ready for repeated matching against line buffers.
#[derive(Clone, Debug)]
pub struct Program {
    nfa: nfa::Program,
}

impl Program {
    /// Parse and compile `pattern`. Errors are always recoverable at the
    /// call site (spec §4.D, "Failure behaviour"): [`crate::Pattern::compile`]
    /// falls back to a literal match on any `Err`.
    pub fn compile(pattern: &[u8], case_insensitive: bool) -> Result<Self, ParseError> {
        compile::compile(pattern, case_insensitive).map(|nfa| Self { nfa })
    }

    /// Find the leftmost match in `haystack`, or `None`.
    pub fn find(&self, haystack: &[u8]) -> Option<(usize, usize)> {
        exec::find(&self.nfa, haystack)
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        exec::is_match(&self.nfa, haystack)
    }

    /// The underlying flat program, for the GPU upload path (spec §4.I):
    /// [`crate::gpu::GpuContext::dispatch_regex`] uploads this directly and
    /// checks its state count against the kernel's fixed scratch capacity
    /// before doing so.
    pub fn nfa(&self) -> &nfa::Program {
        &self.nfa
    }
}
