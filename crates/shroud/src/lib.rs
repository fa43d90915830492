// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shroud keeps selected machine code encrypted at rest and decrypts it in
//! place, once per process, before the first protected call.
//!
//! Functions are tagged into a dedicated section at compile time, the
//! [`shroud-encrypt`] build tool XORs that section inside the compiled
//! image, and this crate reverses the transform against the live mapping:
//!
//! 1. resolve the target module's on-disk path and load base,
//! 2. read the tagged section's address and size from the file's section
//!    header table (the file is the ground truth, the mapping is not),
//! 3. open a page-aligned read+write+execute window over the live range,
//! 4. apply the keystream, flush the instruction cache, restore
//!    read+execute.
//!
//! The write-xor-execute violation is transient and always reverted before
//! `decrypt` returns, success or failure.
//!
//! # Usage
//!
//! ```no_run
//! use shroud::{Decryptor, Target};
//!
//! let mut decryptor = Decryptor::new(Target::shared_library("libpayload.so"));
//! decryptor.decrypt()?;
//! assert!(decryptor.is_decrypted());
//! # Ok::<(), shroud::DecryptError>(())
//! ```
//!
//! A process-wide facade mirrors the classic static API for callers that
//! cannot thread a context through ([`set_target`] / [`decrypt`] /
//! [`is_decrypted`]); it serializes concurrent callers internally so at
//! most one decrypt sequence is ever in flight.
//!
//! [`shroud-encrypt`]: https://github.com/memparanoid/shroud

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod anti_debug;
mod decryptor;
mod error;
mod global;
mod target;

pub use anti_debug::anti_debug_check;
pub use decryptor::Decryptor;
pub use error::DecryptError;
pub use global::{decrypt, is_decrypted, set_target};
pub use target::{Target, TargetKind};

pub use shroud_cipher::{DEFAULT_KEY, Keystream, PROTECTED_SECTION};
pub use shroud_elf::{ElfError, Section, find_section};
pub use shroud_locate::{LocateError, ResolvedModule};
pub use shroud_region::{PageWindow, RegionError, flush_icache, page_size};
