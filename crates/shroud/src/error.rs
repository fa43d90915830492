// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for the runtime decryptor.
use std::path::PathBuf;

use thiserror::Error;

use shroud_elf::ElfError;
use shroud_locate::LocateError;
use shroud_region::RegionError;

/// Errors from a decrypt attempt.
///
/// Every variant is a reported, retryable outcome; a failed attempt leaves
/// the decryptor in its not-decrypted state with derived state cleared.
#[derive(Debug, Error)]
pub enum DecryptError {
    /// A shared-library target was configured without a module name.
    #[error("shared-library targets require a non-empty module name")]
    Configuration,

    /// The target module could not be resolved.
    #[error(transparent)]
    Locate(#[from] LocateError),

    /// The module's on-disk image could not be opened or mapped.
    #[error("reading module image {}: {source}", path.display())]
    Io {
        /// Path of the image.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The tagged section could not be resolved in the on-disk image.
    #[error("resolving section {section:?} in {}: {source}", path.display())]
    Elf {
        /// Path of the image.
        path: PathBuf,
        /// Section that was looked for.
        section: &'static str,
        /// The resolver's error.
        #[source]
        source: ElfError,
    },

    /// The live range could not be made writable, or not restored.
    #[error(transparent)]
    Region(#[from] RegionError),
}
