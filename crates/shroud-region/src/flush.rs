// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Instruction-cache maintenance after self-modifying writes.
//!
//! Writing new machine code through a data pointer does not invalidate
//! instructions the CPU already fetched from the same range; executing the
//! range without a flush can run stale bytes. The required sequence differs
//! per architecture, so one entry point selects it at compile time.

use core::sync::atomic::{Ordering, fence};

const CACHE_LINE: usize = 64;

/// Makes the bytes in `[addr, addr + len)` visible to instruction fetch.
///
/// Must be called after mutating a range that will be executed and before
/// the permission window over it is closed. No-op on a null or empty range.
pub fn flush_icache(addr: usize, len: usize) {
    if addr == 0 || len == 0 {
        return;
    }

    imp(addr, len);
    fence(Ordering::SeqCst);
}

/// x86_64 keeps instruction fetch coherent with data writes; the flush
/// evicts already-cached lines and the fence orders the writes ahead of
/// any later fetch.
#[cfg(target_arch = "x86_64")]
fn imp(addr: usize, len: usize) {
    use core::arch::x86_64::{_mm_clflush, _mm_mfence};

    let end = addr.saturating_add(len);
    let mut line = addr & !(CACHE_LINE - 1);

    unsafe {
        while line < end {
            _mm_clflush(line as *const u8);
            line += CACHE_LINE;
        }
        _mm_mfence();
    }
}

/// aarch64 has split caches: clean the data cache to the point of
/// unification, then invalidate the instruction cache, with barriers
/// between and a final isb so this core refetches.
#[cfg(target_arch = "aarch64")]
fn imp(addr: usize, len: usize) {
    use core::arch::asm;

    let end = addr.saturating_add(len);
    let start = addr & !(CACHE_LINE - 1);

    unsafe {
        let mut line = start;
        while line < end {
            asm!("dc cvau, {p}", p = in(reg) line);
            line += CACHE_LINE;
        }
        asm!("dsb ish");

        let mut line = start;
        while line < end {
            asm!("ic ivau, {p}", p = in(reg) line);
            line += CACHE_LINE;
        }
        asm!("dsb ish");
        asm!("isb");
    }
}

/// Other targets rely on the caller's fence; there is no portable
/// instruction-cache maintenance primitive.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn imp(_addr: usize, _len: usize) {}
