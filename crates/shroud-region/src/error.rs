// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for shroud-region.
use thiserror::Error;

/// Errors from opening or closing a permission window.
#[derive(Debug, Error)]
pub enum RegionError {
    /// The translated range is not mapped in this process; the probe ran
    /// before any permission change, so nothing was mutated.
    #[error("address range {addr:#x}+{len:#x} is not mapped in this process")]
    AddressInaccessible {
        /// Unaligned start of the requested range.
        addr: usize,
        /// Requested length in bytes.
        len: usize,
    },

    /// The OS refused to make the span writable+executable. Hardened
    /// kernels with a write-xor-execute policy commonly refuse this.
    #[error("mprotect(READ|WRITE|EXEC) refused: {source}")]
    PermissionDenied {
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to restore the span to read+execute. The window is
    /// left writable, which callers must treat as a failed operation.
    #[error("mprotect(READ|EXEC) restore refused: {source}")]
    RestoreFailed {
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}
