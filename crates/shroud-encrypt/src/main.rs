// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Command-line entry point for the batch encryptor.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use shroud_cipher::Keystream;
use shroud_encrypt::{batch_encrypt, default_object_dir};

/// Encrypts the tagged section of compiled ELF objects in place.
///
/// Run once per build, after compilation and before linking or packaging.
/// The runtime decryptor reverses the transform in the loaded image.
#[derive(Parser)]
#[command(name = "shroud-encrypt", version)]
struct Cli {
    /// Directory holding the objects to encrypt.
    ///
    /// Defaults to ../lib relative to this executable.
    dir: Option<PathBuf>,

    /// File extension of the objects to process.
    #[arg(long, default_value = "o")]
    suffix: String,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let dir = cli.dir.unwrap_or_else(default_object_dir);

    fs::create_dir_all(&dir)
        .with_context(|| format!("creating object directory {}", dir.display()))?;

    log::info!("object directory: {}", dir.display());

    let summary = batch_encrypt(&dir, &cli.suffix, &Keystream::default())
        .with_context(|| format!("scanning {}", dir.display()))?;

    log::info!(
        "processed {} files, {} succeeded, {} failed",
        summary.processed,
        summary.succeeded,
        summary.failed
    );

    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
