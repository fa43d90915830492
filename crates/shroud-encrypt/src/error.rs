// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for the build-time encryptor.
use std::path::PathBuf;

use thiserror::Error;

use shroud_elf::ElfError;

/// Per-file errors from the batch encryptor.
#[derive(Debug, Error)]
pub enum EncryptError {
    /// The file vanished, could not be opened read-write, mapped or
    /// flushed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file being processed.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The file exists but holds no bytes to map.
    #[error("{}: file is empty", path.display())]
    EmptyFile {
        /// The file being processed.
        path: PathBuf,
    },

    /// The image is not a walkable 64-bit ELF or lacks a non-empty tagged
    /// section; nothing was written.
    #[error("{}: {source}", path.display())]
    Elf {
        /// The file being processed.
        path: PathBuf,
        /// The resolver's error.
        #[source]
        source: ElfError,
    },

    /// The file size changed across the transform, which the
    /// length-preserving cipher can never cause legitimately.
    #[error(
        "{}: file size changed, {before} -> {after} bytes",
        path.display()
    )]
    SizeMismatch {
        /// The file being processed.
        path: PathBuf,
        /// Size recorded before mapping.
        before: u64,
        /// Size observed after flushing.
        after: u64,
    },
}
