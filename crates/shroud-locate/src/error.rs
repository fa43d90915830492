// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for shroud-locate.
use thiserror::Error;

/// Errors from module resolution.
#[derive(Debug, Error)]
pub enum LocateError {
    /// No loaded module or mapping matched the requested target.
    #[error("no loaded module matches {0:?}")]
    ModuleNotFound(String),

    /// The process's own mapping table could not be read.
    #[error("reading the process mapping table: {0}")]
    Maps(#[from] std::io::Error),
}
