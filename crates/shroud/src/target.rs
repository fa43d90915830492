// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Target descriptors: what the decryptor should look for.

/// The kind of module carrying the protected section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A shared library, located through the dynamic loader by name.
    /// Requires a non-empty name.
    SharedLibrary,
    /// The running executable itself, located through the process's own
    /// mapping table. A name is optional and narrows the match.
    SelfExecutable,
}

/// A configured decryption target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Module kind.
    pub kind: TargetKind,
    /// Module name to match (substring). Mandatory for
    /// [`TargetKind::SharedLibrary`].
    pub name: Option<String>,
}

impl Target {
    /// A shared-library target matched by `name`.
    pub fn shared_library(name: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::SharedLibrary,
            name: Some(name.into()),
        }
    }

    /// The running executable, whatever its path.
    pub fn self_executable() -> Self {
        Self {
            kind: TargetKind::SelfExecutable,
            name: None,
        }
    }

    /// The running executable, requiring `name` in its path.
    pub fn self_executable_named(name: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::SelfExecutable,
            name: Some(name.into()),
        }
    }
}
