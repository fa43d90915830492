// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide facade over one shared [`Decryptor`].
//!
//! Mirrors the classic static API: configure once, decrypt once, query
//! anywhere. One mutex serializes everything, so concurrent callers cannot
//! race the idempotence check or fight over the same permission window —
//! at most one decrypt sequence is in flight per process.

use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::decryptor::Decryptor;
use crate::error::DecryptError;
use crate::target::{Target, TargetKind};

/// The default target matches the original tooling: a shared library whose
/// name has not been configured yet, so `decrypt()` before `set_target()`
/// fails with a configuration error instead of guessing.
static GLOBAL: LazyLock<Mutex<Decryptor>> = LazyLock::new(|| {
    Mutex::new(Decryptor::new(Target {
        kind: TargetKind::SharedLibrary,
        name: None,
    }))
});

fn lock() -> MutexGuard<'static, Decryptor> {
    // A panic mid-decrypt leaves no torn state worth protecting: the state
    // flag only commits after full success.
    GLOBAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets the process-wide target, resetting the decryption state and all
/// derived state. Observable only through subsequent [`decrypt`] calls.
pub fn set_target(kind: TargetKind, name: Option<&str>) {
    lock().set_target(Target {
        kind,
        name: name.map(str::to_owned),
    });
}

/// Runs the process-wide decrypt sequence; idempotent after success.
pub fn decrypt() -> Result<(), DecryptError> {
    lock().decrypt()
}

/// True once the process-wide decrypt has succeeded. No side effects.
pub fn is_decrypted() -> bool {
    lock().is_decrypted()
}
