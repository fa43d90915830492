// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for page windows, the mapped-ness probe and the flush entry point.

use serial_test::serial;

use crate::error::RegionError;
use crate::window::{PageWindow, page_size};
use crate::{flush_icache, is_range_mapped};

/// One anonymous read+execute page, the shape a protected text section has
/// at rest in a live process.
struct RxPage {
    ptr: *mut u8,
    len: usize,
}

impl RxPage {
    fn new() -> Self {
        let len = page_size();
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_EXEC,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        assert_ne!(ptr, libc::MAP_FAILED, "Failed to mmap()");

        Self {
            ptr: ptr as *mut u8,
            len,
        }
    }

    fn addr(&self) -> usize {
        self.ptr as usize
    }

    fn read(&self, at: usize, len: usize) -> Vec<u8> {
        unsafe { core::slice::from_raw_parts(self.ptr.add(at), len) }.to_vec()
    }
}

impl Drop for RxPage {
    fn drop(&mut self) {
        unsafe { libc::munmap(self.ptr as *mut libc::c_void, self.len) };
    }
}

// =============================================================================
// page_size()
// =============================================================================

#[test]
fn test_page_size_is_a_nonzero_power_of_two() {
    let page = page_size();

    assert!(page > 0);
    assert_eq!(page & (page - 1), 0);
}

// =============================================================================
// open / mutate / close
// =============================================================================

#[test]
#[serial(region)]
fn test_window_allows_writing_an_rx_page() {
    let page = RxPage::new();
    let target = page.addr() + 16;

    let mut window = PageWindow::open_at(target, 32).expect("Failed to open_at()");
    unsafe { window.as_mut_slice() }.fill(0xC3);
    window.close().expect("Failed to close()");

    assert_eq!(page.read(16, 32), vec![0xC3; 32]);
    // Bytes outside the target range stay untouched.
    assert_eq!(page.read(0, 16), vec![0; 16]);
    assert_eq!(page.read(48, 16), vec![0; 16]);
}

#[test]
#[serial(region)]
fn test_aligned_span_covers_the_target_range() {
    let page = RxPage::new();
    let target = page.addr() + 100;

    let window = PageWindow::open_at(target, 8).expect("Failed to open_at()");
    let (span_start, span_len) = window.page_span();

    assert_eq!(span_start, page.addr());
    assert_eq!(span_len, page_size());
    assert!(span_start <= window.addr());
    assert!(span_start + span_len >= window.addr() + window.len());

    window.close().expect("Failed to close()");
}

#[test]
#[serial(region)]
fn test_window_spanning_two_pages() {
    let len = page_size() * 2;
    let ptr = unsafe {
        libc::mmap(
            core::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_EXEC,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    assert_ne!(ptr, libc::MAP_FAILED, "Failed to mmap()");
    let base = ptr as usize;

    // Straddle the page boundary.
    let target = base + page_size() - 8;
    let mut window = PageWindow::open_at(target, 16).expect("Failed to open_at()");
    let (span_start, span_len) = window.page_span();

    assert_eq!(span_start, base);
    assert_eq!(span_len, len);

    unsafe { window.as_mut_slice() }.fill(0x90);
    window.close().expect("Failed to close()");

    let written = unsafe { core::slice::from_raw_parts((target) as *const u8, 16) };
    assert_eq!(written, &[0x90; 16]);

    unsafe { libc::munmap(ptr, len) };
}

#[test]
#[serial(region)]
fn test_closed_window_leaves_page_executable_readable() {
    let page = RxPage::new();

    let window = PageWindow::open_at(page.addr(), 4).expect("Failed to open_at()");
    window.close().expect("Failed to close()");

    // A read through the page must still work after restore.
    assert_eq!(page.read(0, 4), vec![0; 4]);
}

// =============================================================================
// failure paths
// =============================================================================

#[test]
fn test_null_address_is_inaccessible() {
    let result = PageWindow::open_at(0, 16);

    assert!(matches!(
        result,
        Err(RegionError::AddressInaccessible { .. })
    ));
}

#[test]
fn test_zero_length_is_inaccessible() {
    let page = RxPage::new();

    let result = PageWindow::open_at(page.addr(), 0);

    assert!(matches!(
        result,
        Err(RegionError::AddressInaccessible { .. })
    ));
}

#[test]
fn test_unmapped_low_address_is_inaccessible() {
    // Page zero is never mapped (mmap_min_addr).
    let result = PageWindow::open_at(0x8, 16);

    assert!(matches!(
        result,
        Err(RegionError::AddressInaccessible { .. })
    ));
}

// =============================================================================
// is_range_mapped()
// =============================================================================

#[test]
fn test_probe_accepts_a_live_page() {
    let page = RxPage::new();

    assert!(is_range_mapped(page.addr(), page.len));
}

#[test]
fn test_probe_rejects_page_zero_without_crashing() {
    assert!(!is_range_mapped(0, page_size()));
    assert!(!is_range_mapped(page_size(), 0));
}

// =============================================================================
// flush_icache()
// =============================================================================

#[test]
fn test_flush_tolerates_empty_range() {
    flush_icache(0, 0);
    flush_icache(0x1000, 0);
}

#[test]
#[serial(region)]
fn test_flush_over_freshly_written_page() {
    let page = RxPage::new();

    let mut window = PageWindow::open_at(page.addr(), 64).expect("Failed to open_at()");
    unsafe { window.as_mut_slice() }.fill(0xCC);
    flush_icache(window.addr(), window.len());
    window.close().expect("Failed to close()");

    assert_eq!(page.read(0, 64), vec![0xCC; 64]);
}
