// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! shroud_region - The only place in the workspace that touches raw memory.
//!
//! A [`PageWindow`] is a typed capability over one page-aligned span of
//! live process memory: it is opened read+write+execute, hands out exactly
//! one mutable view of the unaligned target range, and must be closed back
//! to read+execute before the protected code may run again. Opening probes
//! the span with [`is_range_mapped`] first, so a corrupted address fails
//! with an error instead of faulting the process.
//!
//! [`flush_icache`] makes freshly written bytes visible to the instruction
//! fetch path; the flush sequence is selected per target architecture
//! behind the one function.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod error;
mod flush;
mod probe;
#[cfg(test)]
mod tests;
mod window;

pub use error::RegionError;
pub use flush::flush_icache;
pub use probe::is_range_mapped;
pub use window::{PageWindow, page_size};
