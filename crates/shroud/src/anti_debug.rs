// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Anti-debug extension point, inert in the default build.

use core::sync::atomic::{Ordering, compiler_fence};

/// Called once per decrypt attempt, before any resolution or mutation.
///
/// Contract: no inputs, no outputs, no observable effect in the default
/// build. A hardened build replaces the body with a tracer check that
/// terminates the process on detection; callers must not depend on either
/// behavior. The fences keep the call site from being reordered or elided
/// around the decrypt sequence.
#[inline(never)]
pub fn anti_debug_check() {
    compiler_fence(Ordering::SeqCst);
    // Detection payload intentionally absent.
    compiler_fence(Ordering::SeqCst);
}
