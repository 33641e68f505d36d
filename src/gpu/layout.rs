//! GPU buffer layouts (spec §4.I): the flat, `bytemuck`-castable structs
//! uploaded to and read back from the compute kernels in
//! `shaders/line_match_literal.wgsl` and `shaders/line_match_regex.wgsl`.
//!
//! Line boundaries are computed once on the CPU with [`crate::scan`] (the
//! same newline search the CPU engine uses) and uploaded as a pair of
//! `u32` arrays, so the kernel itself never scans for line breaks — each
//! invocation is handed its line's `[start, end)` range and just tests it.

use bytemuck::{Pod, Zeroable};

use crate::scan;

/// Uniform parameters shared by both kernels. The second word is
/// kernel-specific: the literal kernel reads it as `pattern_len`, the
/// regex kernel as the NFA program's `start_pc` — same slot, different
/// meaning, exactly as the two kernels' own (separately namespaced) WGSL
/// `Params` structs declare it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuParams {
    pub line_count: u32,
    pub aux: u32,
    pub flags: u32,
    pub max_results: u32,
}

/// Precomputed `[start, end)` byte ranges for every line of a buffer,
/// parallel arrays so they upload as two plain `u32` storage buffers.
#[derive(Clone, Debug, Default)]
pub struct LineBounds {
    pub starts: Vec<u32>,
    pub ends: Vec<u32>,
}

impl LineBounds {
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Split `input` into line boundaries the same way [`crate::engine`] does,
/// so GPU and CPU paths report identical line numbers for identical input
/// (spec §4.I, "byte-exact parity with the CPU path").
pub fn compute_line_bounds(input: &[u8]) -> LineBounds {
    let mut bounds = LineBounds::default();
    let mut line_start = 0usize;
    while line_start < input.len() {
        let line_end = scan::find_next_newline(input, line_start);
        bounds.starts.push(line_start as u32);
        bounds.ends.push(line_end as u32);
        line_start = line_end + 1;
    }
    bounds
}
