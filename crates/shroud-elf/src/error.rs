// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for shroud-elf.
use thiserror::Error;

/// Errors from walking an ELF image.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ElfError {
    /// The image does not start with the ELF magic bytes.
    #[error("not an ELF image")]
    NotElf,

    /// The image is ELF but not 64-bit little-endian.
    #[error("unsupported ELF format, only 64-bit little-endian is handled")]
    UnsupportedFormat,

    /// A header field points past the end of the image.
    #[error("image truncated or header out of bounds")]
    Truncated,

    /// The requested section is absent, zero-sized, or the image has no
    /// usable section header table.
    #[error("section absent or zero-sized")]
    SectionNotFound,
}
