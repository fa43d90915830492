// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Decryptor - the one-shot runtime unlock sequence.

use std::fs::File;

use memmap2::Mmap;

use shroud_cipher::{Keystream, PROTECTED_SECTION};
use shroud_elf::Section;
use shroud_locate::ResolvedModule;
use shroud_region::{PageWindow, flush_icache};

use crate::anti_debug::anti_debug_check;
use crate::error::DecryptError;
use crate::target::{Target, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotDecrypted,
    Decrypted,
}

/// Context object owning one target's configuration and decryption state.
///
/// Success is terminal: further [`decrypt`](Decryptor::decrypt) calls
/// return immediately without re-running the sequence. Failure is
/// retryable: all derived state is cleared and the next call re-resolves
/// from scratch, so a corrected configuration can succeed.
///
/// Independent contexts are independent; nothing here is process-global.
/// The [`crate::global`] facade wraps one shared context for callers that
/// need the classic static API.
#[derive(Debug)]
pub struct Decryptor {
    target: Target,
    keystream: Keystream<'static>,
    state: State,
    resolved: Option<ResolvedModule>,
}

impl Decryptor {
    /// Creates a decryptor for `target` using the compiled-in key.
    pub fn new(target: Target) -> Self {
        Self::with_keystream(target, Keystream::default())
    }

    /// Creates a decryptor with an explicit keystream. The key must match
    /// the one the build-time encryptor used, or the "decrypted" bytes are
    /// garbage with no error raised.
    pub fn with_keystream(target: Target, keystream: Keystream<'static>) -> Self {
        Self {
            target,
            keystream,
            state: State::NotDecrypted,
            resolved: None,
        }
    }

    /// Replaces the target, resetting the decryption state and all derived
    /// state.
    pub fn set_target(&mut self, target: Target) {
        log::debug!("target set to {target:?}");
        self.target = target;
        self.state = State::NotDecrypted;
        self.resolved = None;
    }

    /// The configured target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// True once a decrypt sequence has fully succeeded. No side effects.
    pub fn is_decrypted(&self) -> bool {
        self.state == State::Decrypted
    }

    /// The module resolved by the last successful decrypt.
    pub fn resolved_module(&self) -> Option<&ResolvedModule> {
        self.resolved.as_ref()
    }

    /// Runs the unlock sequence: locate the module, resolve the tagged
    /// section from the on-disk image, open a writable window over the
    /// live range, apply the keystream, flush the instruction cache and
    /// restore read+execute.
    ///
    /// Idempotent after success. Any failure aborts the whole sequence
    /// before the cipher touches memory, except a restore failure, which
    /// is reported even though the bytes are already correct — execution
    /// safety is not guaranteed while the window is writable.
    pub fn decrypt(&mut self) -> Result<(), DecryptError> {
        anti_debug_check();

        if self.state == State::Decrypted {
            log::debug!("already decrypted, nothing to do");
            return Ok(());
        }

        self.resolved = None;

        let module = self.locate()?;
        log::info!(
            "resolved module {} at base {:#x}",
            module.path.display(),
            module.base
        );

        let section = resolve_section(&module)?;
        log::info!(
            "section {PROTECTED_SECTION:?}: vaddr {:#x}, {} bytes, file offset {:#x}",
            section.vaddr,
            section.size,
            section.offset
        );

        self.apply_in_place(&module, &section)?;

        self.resolved = Some(module);
        self.state = State::Decrypted;
        log::info!("decrypt complete");

        Ok(())
    }

    fn locate(&self) -> Result<ResolvedModule, DecryptError> {
        match self.target.kind {
            TargetKind::SharedLibrary => {
                let name = self
                    .target
                    .name
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .ok_or(DecryptError::Configuration)?;
                Ok(shroud_locate::find_shared_library(name)?)
            }
            TargetKind::SelfExecutable => Ok(shroud_locate::find_self_executable(
                self.target.name.as_deref(),
            )?),
        }
    }

    fn apply_in_place(
        &self,
        module: &ResolvedModule,
        section: &Section,
    ) -> Result<(), DecryptError> {
        let mut window = PageWindow::open(module.base, section.vaddr, section.size as usize)?;

        self.keystream.apply(unsafe { window.as_mut_slice() });
        flush_icache(window.addr(), window.len());

        window.close()?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_decrypted(&mut self) {
        self.state = State::Decrypted;
    }
}

/// Reads the tagged section's location from the module's on-disk image.
///
/// The mapping is dropped before any live-memory step; only the location
/// survives, the file's bytes are never what gets mutated.
fn resolve_section(module: &ResolvedModule) -> Result<Section, DecryptError> {
    let file = File::open(&module.path).map_err(|source| DecryptError::Io {
        path: module.path.clone(),
        source,
    })?;

    let image = unsafe { Mmap::map(&file) }.map_err(|source| DecryptError::Io {
        path: module.path.clone(),
        source,
    })?;

    shroud_elf::find_section(&image, PROTECTED_SECTION).map_err(|source| DecryptError::Elf {
        path: module.path.clone(),
        section: PROTECTED_SECTION,
        source,
    })
}
