// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! shroud_cipher - The contract shared by the build-time encryptor and the
//! runtime decryptor.
//!
//! Three things must agree byte-for-byte between the two tools or the round
//! trip corrupts machine code silently instead of failing loudly:
//!
//! - the tagged-section name ([`PROTECTED_SECTION`]),
//! - the compiled-in key ([`DEFAULT_KEY`]),
//! - the transform itself ([`Keystream::apply`]).
//!
//! All three live in this crate and nowhere else.
//!
//! # Tagging functions
//!
//! Routines to be protected are placed into the tagged section at compile
//! time; the attribute is metadata only and has no runtime behavior:
//!
//! ```ignore
//! #[unsafe(link_section = ".encrypt_text")]
//! #[inline(never)]
//! fn protected_routine() { /* ... */ }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]


/// Name of the section that receives protected routines.
///
/// Both tools locate the section by comparing against this exact string;
/// there is no wildcard or prefix matching.
pub const PROTECTED_SECTION: &str = ".encrypt_text";

/// Key compiled into both the encryptor and the decryptor.
///
/// No rotation, no per-file salt. Changing it requires rebuilding both tools
/// and re-encrypting every protected image.
pub const DEFAULT_KEY: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF];

/// Cyclic XOR keystream.
///
/// XOR is self-inverse, so the same [`apply`](Keystream::apply) call both
/// encrypts and decrypts; callers never need a separate decrypt variant.
/// The transform is length-preserving and has no side effects beyond the
/// buffer mutation.
#[derive(Debug, Clone, Copy)]
pub struct Keystream<'k> {
    key: &'k [u8],
}

impl<'k> Keystream<'k> {
    /// Creates a keystream over `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is empty; an empty key has no sensible cycle.
    pub fn new(key: &'k [u8]) -> Self {
        assert!(!key.is_empty(), "keystream key must not be empty");
        Self { key }
    }

    /// Transforms `buf` in place, XOR-ing byte `i` with `key[i % key_len]`.
    ///
    /// No-op on an empty buffer.
    pub fn apply(&self, buf: &mut [u8]) {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte ^= self.key[i % self.key.len()];
        }
    }

    /// The key bytes this stream cycles over.
    pub fn key(&self) -> &[u8] {
        self.key
    }
}

impl Default for Keystream<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_KEY)
    }
}
