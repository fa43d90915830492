// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Executable discovery through the process's own mapping table.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::{LocateError, ResolvedModule};

/// Resolves the running executable from `/proc/self/maps`.
///
/// Takes the first read-and-execute mapping backed by a regular file path
/// (a leading `/`; `[stack]`-style pseudo entries have none) and, when
/// `name` is given, whose path contains it. The mapping's start address is
/// reported as the load base; see [`ResolvedModule::base`] for the
/// position-independent-executable caveat.
pub fn find_self_executable(name: Option<&str>) -> Result<ResolvedModule, LocateError> {
    let file = File::open("/proc/self/maps")?;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(module) = parse_maps_line(&line, name) {
            log::debug!("found executable {:?} at {:#x}", module.path, module.base);
            return Ok(module);
        }
    }

    Err(LocateError::ModuleNotFound(
        name.unwrap_or("<self>").into(),
    ))
}

/// Parses one `/proc/self/maps` line into a candidate module.
///
/// Layout: `start-end perms offset dev inode [path]`, whitespace-delimited.
/// Returns `None` for anything that is not an `r-xp` mapping of a matching
/// regular file.
pub(crate) fn parse_maps_line(line: &str, name: Option<&str>) -> Option<ResolvedModule> {
    let mut fields = line.split_whitespace();

    let range = fields.next()?;
    let perms = fields.next()?;
    if perms != "r-xp" {
        return None;
    }

    let _offset = fields.next()?;
    let _dev = fields.next()?;
    let _inode = fields.next()?;

    let path = fields.next()?;
    if !path.starts_with('/') {
        return None;
    }
    if let Some(needle) = name {
        if !path.contains(needle) {
            return None;
        }
    }

    let start = range.split('-').next()?;
    let base = usize::from_str_radix(start, 16).ok()?;
    if base == 0 {
        return None;
    }

    Some(ResolvedModule {
        path: PathBuf::from(path),
        base,
    })
}
