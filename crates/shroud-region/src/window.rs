// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PageWindow - page-granular permission transitions around one live range.

use crate::error::RegionError;
use crate::probe::is_range_mapped;

/// Returns the OS page size.
pub fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

/// A page-aligned span of live memory, held writable+executable between
/// [`open`](PageWindow::open) and [`close`](PageWindow::close).
///
/// The aligned span always fully covers the unaligned target range, since
/// protection changes operate at page granularity only. Exactly one window
/// may be live over a given range at a time; the caller serializes.
#[derive(Debug)]
pub struct PageWindow {
    page_start: usize,
    page_len: usize,
    addr: usize,
    len: usize,
    restored: bool,
}

impl PageWindow {
    /// Opens a window over `len` bytes at `base + vaddr`.
    ///
    /// The translation is a direct addition: exact for shared libraries
    /// (the loader reports the relocation bias as the base) and for
    /// base-fixed executables; position-independent executables may carry
    /// a biased base, which the mapped-ness probe then rejects rather than
    /// letting the cipher run over the wrong span.
    pub fn open(base: usize, vaddr: u64, len: usize) -> Result<Self, RegionError> {
        let addr = base
            .checked_add(vaddr as usize)
            .ok_or(RegionError::AddressInaccessible { addr: base, len })?;
        Self::open_at(addr, len)
    }

    /// Opens a window over `len` bytes at the live address `addr`.
    pub fn open_at(addr: usize, len: usize) -> Result<Self, RegionError> {
        if addr == 0 || len == 0 {
            return Err(RegionError::AddressInaccessible { addr, len });
        }

        let page = page_size();
        let page_start = addr & !(page - 1);
        let page_end = addr
            .checked_add(len)
            .and_then(|end| end.checked_add(page - 1))
            .ok_or(RegionError::AddressInaccessible { addr, len })?
            & !(page - 1);
        let page_len = page_end - page_start;

        // Probe strictly before the first permission change; after a
        // successful probe no step in the sequence can fault.
        if !is_range_mapped(page_start, page_len) {
            return Err(RegionError::AddressInaccessible { addr, len });
        }

        protect(
            page_start,
            page_len,
            libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
        )
        .map_err(|source| RegionError::PermissionDenied { source })?;

        log::debug!(
            "opened rwx window {page_start:#x}+{page_len:#x} covering {addr:#x}+{len:#x}"
        );

        Ok(Self {
            page_start,
            page_len,
            addr,
            len,
            restored: false,
        })
    }

    /// The unaligned start of the target range.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// The target range's length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the window covers no bytes; never true for an open window.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The page-aligned span actually holding relaxed permissions.
    pub fn page_span(&self) -> (usize, usize) {
        (self.page_start, self.page_len)
    }

    /// Mutable view of the unaligned target range.
    ///
    /// # Safety
    ///
    /// The caller must be the only party reading or writing the range for
    /// the lifetime of the returned slice, and must not execute code from
    /// the range until after [`close`](PageWindow::close).
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.addr as *mut u8, self.len) }
    }

    /// Restores the span to read+execute and consumes the window.
    ///
    /// A failure here leaves the span writable and must be treated as a
    /// failed operation by the caller even if the bytes are already
    /// correct.
    pub fn close(mut self) -> Result<(), RegionError> {
        protect(
            self.page_start,
            self.page_len,
            libc::PROT_READ | libc::PROT_EXEC,
        )
        .map_err(|source| RegionError::RestoreFailed { source })?;

        self.restored = true;
        log::debug!(
            "restored rx on {:#x}+{:#x}",
            self.page_start,
            self.page_len
        );

        Ok(())
    }
}

impl Drop for PageWindow {
    fn drop(&mut self) {
        // A window must never outlive its sequence in the writable state.
        if !self.restored {
            log::warn!(
                "window {:#x}+{:#x} dropped while writable, restoring rx",
                self.page_start,
                self.page_len
            );
            let _ = protect(
                self.page_start,
                self.page_len,
                libc::PROT_READ | libc::PROT_EXEC,
            );
        }
    }
}

fn protect(start: usize, len: usize, prot: libc::c_int) -> std::io::Result<()> {
    let failed = unsafe { libc::mprotect(start as *mut libc::c_void, len, prot) } != 0;

    if failed {
        return Err(std::io::Error::last_os_error());
    }

    Ok(())
}
