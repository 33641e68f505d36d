//! Caller-visible error taxonomy.
//!
//! Per the error-handling design: the core recovers every GPU-path failure
//! (unavailable device, init failure, dispatch failure) and every
//! regex-compile failure locally, by falling back to an equivalent path. It
//! surfaces only the two conditions below; see [`crate::dispatch`] and
//! [`crate::regex`] for where the silent recoveries happen instead.

use thiserror::Error;

/// Errors that can reach a caller of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The input buffer is larger than [`crate::MAX_GPU_BUFFER_SIZE`] and a
    /// GPU dispatch was requested (explicitly, or selected by `auto` mode).
    /// The caller may retry on a CPU backend.
    #[error("input of {len} bytes exceeds the GPU per-dispatch cap of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    /// Growing an output array failed. Propagated verbatim, never recovered.
    #[error("allocation failed while growing a result array: {0}")]
    Alloc(#[from] std::collections::TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
