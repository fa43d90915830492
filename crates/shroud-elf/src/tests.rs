// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for the section resolver, driven by synthetic images.

use crate::fixture::{ImageBuilder, PAYLOAD_OFFSET};
use crate::{EHDR_SIZE, ElfError, Section, find_section, validate_header};

const TAG: &str = ".encrypt_text";

#[test]
fn test_finds_tagged_section() {
    let image = ImageBuilder::new(TAG)
        .payload(&[0xAA, 0xBB, 0xCC, 0xDD])
        .vaddr(0x2000)
        .build();

    let section = find_section(&image, TAG).expect("Failed to find_section()");

    assert_eq!(
        section,
        Section {
            vaddr: 0x2000,
            size: 4,
            offset: PAYLOAD_OFFSET,
        }
    );
}

#[test]
fn test_payload_lives_at_reported_offset() {
    let payload = [0x90u8, 0x90, 0xC3];
    let image = ImageBuilder::new(TAG).payload(&payload).build();

    let section = find_section(&image, TAG).expect("Failed to find_section()");
    let start = section.offset as usize;
    let end = start + section.size as usize;

    assert_eq!(&image[start..end], &payload);
}

#[test]
fn test_missing_section_is_reported() {
    let image = ImageBuilder::new(".other_text").payload(&[1, 2, 3]).build();

    let result = find_section(&image, TAG);

    assert_eq!(result, Err(ElfError::SectionNotFound));
}

#[test]
fn test_name_prefix_does_not_match() {
    // ".encrypt_text_v2" contains the tag as a prefix; the compare must be
    // exact, including the terminating NUL.
    let image = ImageBuilder::new(".encrypt_text_v2")
        .payload(&[1, 2, 3])
        .build();

    let result = find_section(&image, TAG);

    assert_eq!(result, Err(ElfError::SectionNotFound));
}

#[test]
fn test_zero_sized_section_is_reported_as_not_found() {
    let image = ImageBuilder::new(TAG)
        .payload(&[1, 2, 3])
        .declared_size(0)
        .build();

    let result = find_section(&image, TAG);

    assert_eq!(result, Err(ElfError::SectionNotFound));
}

#[test]
fn test_bad_magic_is_rejected() {
    let image = ImageBuilder::new(TAG).payload(&[1]).bad_magic().build();

    assert_eq!(validate_header(&image), Err(ElfError::NotElf));
    assert_eq!(find_section(&image, TAG), Err(ElfError::NotElf));
}

#[test]
fn test_32bit_class_is_rejected() {
    let image = ImageBuilder::new(TAG).payload(&[1]).class(1).build();

    assert_eq!(find_section(&image, TAG), Err(ElfError::UnsupportedFormat));
}

#[test]
fn test_image_shorter_than_header_is_truncated() {
    let image = ImageBuilder::new(TAG).payload(&[1]).build();

    let result = find_section(&image[..EHDR_SIZE - 1], TAG);

    assert_eq!(result, Err(ElfError::Truncated));
}

#[test]
fn test_cut_section_table_is_truncated() {
    let image = ImageBuilder::new(TAG).payload(&[1, 2, 3, 4]).build();

    // Keep the header intact but cut the section header table short.
    let result = find_section(&image[..image.len() - 8], TAG);

    assert_eq!(result, Err(ElfError::Truncated));
}

#[test]
fn test_section_contents_past_image_end_is_truncated() {
    let image = ImageBuilder::new(TAG)
        .payload(&[1, 2, 3, 4])
        .declared_size(1 << 20)
        .build();

    let result = find_section(&image, TAG);

    assert_eq!(result, Err(ElfError::Truncated));
}

#[test]
fn test_walk_is_identical_for_any_e_type() {
    // The resolver must not care whether the image is ET_REL, ET_DYN or
    // ET_EXEC; patch e_type and expect the same result.
    let mut image = ImageBuilder::new(TAG).payload(&[0xC3]).build();

    for e_type in [1u16, 2, 3] {
        image[16..18].copy_from_slice(&e_type.to_le_bytes());
        let section = find_section(&image, TAG).expect("Failed to find_section()");
        assert_eq!(section.size, 1);
    }
}
