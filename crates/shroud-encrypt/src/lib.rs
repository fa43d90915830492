// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! shroud_encrypt - Encrypts the tagged section of compiled ELF objects in
//! place, once per build, before linking or packaging.
//!
//! The transform is the same keystream the runtime decryptor reverses; the
//! file is mapped writable, only the tagged section's bytes change, and the
//! file size must come out identical — a size delta means corruption and
//! fails the file.
//!
//! Files are processed strictly sequentially; one bad file fails the batch
//! result but never stops the remaining files.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use shroud_cipher::{Keystream, PROTECTED_SECTION};

pub use error::EncryptError;

/// Outcome of one successfully encrypted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedFile {
    /// File offset of the encrypted bytes.
    pub offset: u64,
    /// Number of bytes encrypted.
    pub size: u64,
    /// Total file size, unchanged by the transform.
    pub file_size: u64,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files picked up by the suffix filter.
    pub processed: usize,
    /// Files whose tagged section was encrypted and verified.
    pub succeeded: usize,
    /// Files that failed; the batch exit code reflects these.
    pub failed: usize,
}

impl BatchSummary {
    /// True when no file failed; an empty batch succeeds.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Encrypts the tagged section of one ELF object in place.
///
/// The image is validated before anything is written: a non-ELF or
/// non-64-bit file is rejected untouched, as is one without a non-empty
/// tagged section. After flushing, the file size is re-checked against the
/// size recorded before mapping.
pub fn encrypt_object_file(
    path: &Path,
    keystream: &Keystream<'_>,
) -> Result<EncryptedFile, EncryptError> {
    let io = |source| EncryptError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size_before = fs::metadata(path).map_err(io)?.len();
    if size_before == 0 {
        return Err(EncryptError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(io)?;
    let mut image = unsafe { MmapMut::map_mut(&file) }.map_err(io)?;

    // find_section validates the magic and class first, so a foreign file
    // is rejected here with nothing written.
    let section = shroud_elf::find_section(&image, PROTECTED_SECTION).map_err(|source| {
        EncryptError::Elf {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let start = section.offset as usize;
    let end = start + section.size as usize;
    log::info!(
        "{}: encrypting {PROTECTED_SECTION:?} at offset {:#x}, {} bytes",
        path.display(),
        section.offset,
        section.size
    );
    keystream.apply(&mut image[start..end]);

    image.flush().map_err(io)?;
    drop(image);
    drop(file);

    let size_after = fs::metadata(path).map_err(io)?.len();
    if size_after != size_before {
        return Err(EncryptError::SizeMismatch {
            path: path.to_path_buf(),
            before: size_before,
            after: size_after,
        });
    }

    Ok(EncryptedFile {
        offset: section.offset,
        size: section.size,
        file_size: size_after,
    })
}

/// Encrypts every regular `*.{suffix}` file directly under `dir`.
///
/// Returns the per-batch counts; IO errors enumerating the directory abort
/// the batch, per-file errors only mark that file failed.
pub fn batch_encrypt(
    dir: &Path,
    suffix: &str,
    keystream: &Keystream<'_>,
) -> std::io::Result<BatchSummary> {
    let files = list_object_files(dir, suffix)?;

    if files.is_empty() {
        log::warn!("no *.{suffix} files under {}", dir.display());
        return Ok(BatchSummary::default());
    }

    let mut summary = BatchSummary::default();
    for path in &files {
        summary.processed += 1;
        match encrypt_object_file(path, keystream) {
            Ok(encrypted) => {
                summary.succeeded += 1;
                log::info!(
                    "{}: ok, file size unchanged at {} bytes",
                    path.display(),
                    encrypted.file_size
                );
            }
            Err(error) => {
                summary.failed += 1;
                log::error!("{error}");
            }
        }
    }

    Ok(summary)
}

/// Regular files under `dir` with the given extension, sorted for a
/// deterministic processing order.
fn list_object_files(dir: &Path, suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(suffix) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Default object directory: `../lib` relative to this executable, the
/// layout the build tree uses when no directory is passed.
pub fn default_object_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .map(|dir| dir.join("../lib"))
        .unwrap_or_else(|| PathBuf::from("."))
}
