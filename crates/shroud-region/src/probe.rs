// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Mapped-ness probe for candidate address ranges.
//!
//! A wrong load base plus a declared virtual address yields an arbitrary
//! pointer; dereferencing it to "test" it would fault the process (and is
//! undefined behavior besides). The kernel will instead report unmapped
//! pages through an address-taking syscall, so the probe asks rather than
//! touches.

/// Reports whether every page of `[page_start, page_start + page_len)` is
/// mapped in this process. Never dereferences the range.
///
/// `page_start` must be page-aligned and `page_len` a multiple of the page
/// size; [`PageWindow::open`](crate::PageWindow::open) guarantees both.
pub fn is_range_mapped(page_start: usize, page_len: usize) -> bool {
    if page_start == 0 || page_len == 0 {
        return false;
    }

    imp(page_start, page_len)
}

/// mincore(2) fails with ENOMEM when any page of the range is unmapped;
/// the residency vector itself is irrelevant here.
#[cfg(target_os = "linux")]
fn imp(page_start: usize, page_len: usize) -> bool {
    let pages = page_len / crate::page_size();
    let mut residency = vec![0u8; pages];

    let rc = unsafe {
        libc::mincore(
            page_start as *mut libc::c_void,
            page_len,
            residency.as_mut_ptr() as *mut libc::c_uchar,
        )
    };

    rc == 0
}

/// msync(2) with MS_ASYNC is a no-op on mapped pages and fails with ENOMEM
/// on unmapped ones.
#[cfg(all(unix, not(target_os = "linux")))]
fn imp(page_start: usize, page_len: usize) -> bool {
    let rc = unsafe {
        libc::msync(
            page_start as *mut libc::c_void,
            page_len,
            libc::MS_ASYNC,
        )
    };

    rc == 0
}
