// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! shroud_elf - Locates a named section inside an ELF64 image.
//!
//! Operates on a plain byte slice (a memory-mapped file or any other
//! addressable copy of the image); never touches the OS. The walk is the
//! same for shared objects, executables and relocatable objects — only the
//! caller's interpretation of the returned virtual address differs:
//!
//! - build-time tool: index the file by [`Section::offset`] directly,
//! - runtime tool: add [`Section::vaddr`] to the module's load base.
//!
//! Every multi-byte field is decoded explicitly as little-endian; nothing is
//! transmuted or pointer-cast out of the image.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(any(test, feature = "test-utils"))]
extern crate alloc;

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod fixture;
#[cfg(test)]
mod tests;

pub use error::ElfError;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const ELFCLASS64: u8 = 2;
const ELFDATA2LSB: u8 = 1;

const EI_CLASS: usize = 4;
const EI_DATA: usize = 5;

// Elf64_Ehdr field offsets.
const E_SHOFF: usize = 0x28;
const E_SHENTSIZE: usize = 0x3a;
const E_SHNUM: usize = 0x3c;
const E_SHSTRNDX: usize = 0x3e;

/// Size of an Elf64_Ehdr.
pub const EHDR_SIZE: usize = 64;
/// Size of an Elf64_Shdr.
pub const SHDR_SIZE: usize = 64;

// Elf64_Shdr field offsets.
const SH_NAME: usize = 0x00;
const SH_ADDR: usize = 0x10;
const SH_OFFSET: usize = 0x18;
const SH_SIZE: usize = 0x20;

/// Location of a section within an image.
///
/// `vaddr` is the section's declared virtual address relative to the
/// module's load base; `offset` and `size` address the section's bytes in
/// the on-disk image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// Declared virtual address (`sh_addr`).
    pub vaddr: u64,
    /// Byte size (`sh_size`), never zero for a returned section.
    pub size: u64,
    /// File offset of the section contents (`sh_offset`).
    pub offset: u64,
}

/// Verifies the ELF magic, class and data encoding of `image`.
///
/// Accepts only 64-bit little-endian images; everything else is an
/// unsupported format, not a walkable one.
pub fn validate_header(image: &[u8]) -> Result<(), ElfError> {
    if image.len() < EHDR_SIZE {
        return Err(ElfError::Truncated);
    }

    if image[..ELF_MAGIC.len()] != ELF_MAGIC {
        return Err(ElfError::NotElf);
    }

    if image[EI_CLASS] != ELFCLASS64 || image[EI_DATA] != ELFDATA2LSB {
        return Err(ElfError::UnsupportedFormat);
    }

    Ok(())
}

/// Finds the section named exactly `name` and returns its location.
///
/// Fails with [`ElfError::SectionNotFound`] when the section is absent,
/// zero-sized, or the image carries no usable section header table — a
/// zero-sized tagged section means "nothing to protect" and is treated as a
/// configuration error, never a silent success.
pub fn find_section(image: &[u8], name: &str) -> Result<Section, ElfError> {
    validate_header(image)?;

    let shoff = read_u64(image, E_SHOFF)? as usize;
    let shentsize = read_u16(image, E_SHENTSIZE)? as usize;
    let shnum = read_u16(image, E_SHNUM)? as usize;
    let shstrndx = read_u16(image, E_SHSTRNDX)? as usize;

    if shoff == 0 || shnum == 0 || shentsize < SHDR_SIZE || shstrndx >= shnum {
        return Err(ElfError::SectionNotFound);
    }

    let strtab = shdr_field(image, shoff, shentsize, shstrndx, SH_OFFSET)? as usize;

    for index in 0..shnum {
        let name_off = shdr_field(image, shoff, shentsize, index, SH_NAME)? as usize;

        let at = match strtab.checked_add(name_off) {
            Some(at) => at,
            None => continue,
        };
        if !name_matches(image, at, name) {
            continue;
        }

        let vaddr = shdr_field(image, shoff, shentsize, index, SH_ADDR)?;
        let offset = shdr_field(image, shoff, shentsize, index, SH_OFFSET)?;
        let size = shdr_field(image, shoff, shentsize, index, SH_SIZE)?;

        if size == 0 {
            return Err(ElfError::SectionNotFound);
        }

        // The contents must lie inside the image; a header pointing past
        // the end of the file is corruption, not a findable section.
        let end = offset
            .checked_add(size)
            .ok_or(ElfError::Truncated)?;
        if end > image.len() as u64 {
            return Err(ElfError::Truncated);
        }

        return Ok(Section {
            vaddr,
            size,
            offset,
        });
    }

    Err(ElfError::SectionNotFound)
}

/// Reads one u64 field of section header `index`.
fn shdr_field(
    image: &[u8],
    shoff: usize,
    shentsize: usize,
    index: usize,
    field: usize,
) -> Result<u64, ElfError> {
    let at = index
        .checked_mul(shentsize)
        .and_then(|o| o.checked_add(shoff))
        .and_then(|o| o.checked_add(field))
        .ok_or(ElfError::Truncated)?;

    if field == SH_NAME {
        Ok(read_u32(image, at)? as u64)
    } else {
        read_u64(image, at)
    }
}

/// True when the NUL-terminated string at `at` equals `want` exactly.
/// Out-of-bounds reads are treated as a mismatch, not an error, so one junk
/// header entry cannot abort the walk.
fn name_matches(image: &[u8], at: usize, want: &str) -> bool {
    let want = want.as_bytes();
    let Some(end) = at.checked_add(want.len()) else {
        return false;
    };
    if end >= image.len() {
        return false;
    }

    &image[at..end] == want && image[end] == 0
}

fn field_bytes(image: &[u8], at: usize, len: usize) -> Result<&[u8], ElfError> {
    at.checked_add(len)
        .and_then(|end| image.get(at..end))
        .ok_or(ElfError::Truncated)
}

fn read_u16(image: &[u8], at: usize) -> Result<u16, ElfError> {
    let bytes = field_bytes(image, at, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(image: &[u8], at: usize) -> Result<u32, ElfError> {
    let bytes = field_bytes(image, at, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u64(image: &[u8], at: usize) -> Result<u64, ElfError> {
    let bytes = field_bytes(image, at, 8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(raw))
}
