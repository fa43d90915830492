// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! shroud_locate - Resolves where a module lives, on disk and in memory.
//!
//! Two discovery paths, matching the two target kinds:
//!
//! - **Shared library**: the dynamic loader knows every loaded object, so
//!   [`find_shared_library`] enumerates them via `dl_iterate_phdr` and falls
//!   back to a no-load `dlopen` handle introspection.
//! - **Running executable**: the executable has no loader entry of its own
//!   worth trusting, so [`find_self_executable`] scans the process's
//!   `/proc/self/maps` for the first executable file-backed mapping.
//!
//! Both return a [`ResolvedModule`]; callers re-resolve on every attempt and
//! never cache across processes.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod error;
#[cfg(target_os = "linux")]
mod loader;
#[cfg(target_os = "linux")]
mod maps;

use std::path::PathBuf;

pub use error::LocateError;
#[cfg(target_os = "linux")]
pub use loader::find_shared_library;
#[cfg(target_os = "linux")]
pub use maps::find_self_executable;

/// A module resolved to its on-disk image and in-memory placement.
///
/// Derived state: recompute on every use, never persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Path of the backing file, used to re-read the image at rest.
    pub path: PathBuf,
    /// Load base: the virtual address the module was placed at.
    ///
    /// For shared libraries this is the relocation bias reported by the
    /// loader. For executables it is the start of the first executable
    /// file mapping, which equals the load base only for non-relocated or
    /// base-fixed images; position-independent executables with split
    /// segments may report a biased value.
    pub base: usize,
}
