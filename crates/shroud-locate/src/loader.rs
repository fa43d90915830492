// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shared-library discovery through the dynamic loader.

use std::ffi::{CStr, CString, c_void};
use std::path::PathBuf;
use std::ptr;

use crate::{LocateError, ResolvedModule};

/// Resolves a loaded shared library whose name contains `name`.
///
/// Enumerates the loader's module list first; when nothing matches, asks
/// the loader to hand back an existing handle (`RTLD_NOLOAD`, so a library
/// that is not already resident is never pulled in) and introspects it.
pub fn find_shared_library(name: &str) -> Result<ResolvedModule, LocateError> {
    if let Some(module) = iterate_loaded_modules(name) {
        log::debug!(
            "found {:?} via dl_iterate_phdr at {:#x}",
            module.path,
            module.base
        );
        return Ok(module);
    }

    if let Some(module) = introspect_handle(name) {
        log::debug!(
            "found {:?} via dlopen handle at {:#x}",
            module.path,
            module.base
        );
        return Ok(module);
    }

    Err(LocateError::ModuleNotFound(name.into()))
}

struct Search<'a> {
    needle: &'a str,
    found: Option<ResolvedModule>,
}

fn iterate_loaded_modules(name: &str) -> Option<ResolvedModule> {
    let mut search = Search {
        needle: name,
        found: None,
    };

    unsafe {
        libc::dl_iterate_phdr(
            Some(phdr_callback),
            &mut search as *mut Search as *mut c_void,
        );
    }

    search.found
}

/// Stops iteration (returns 1) on the first module whose name contains the
/// needle and that reports a non-zero base.
unsafe extern "C" fn phdr_callback(
    info: *mut libc::dl_phdr_info,
    _size: libc::size_t,
    data: *mut c_void,
) -> libc::c_int {
    if info.is_null() || data.is_null() {
        return 0;
    }

    let search = unsafe { &mut *(data as *mut Search) };
    let info = unsafe { &*info };

    if info.dlpi_name.is_null() {
        return 0;
    }

    // The main program reports an empty name; skip it along with anything
    // whose name is not valid UTF-8.
    let name = unsafe { CStr::from_ptr(info.dlpi_name) };
    let Ok(name) = name.to_str() else {
        return 0;
    };
    if name.is_empty() || !name.contains(search.needle) {
        return 0;
    }
    if info.dlpi_addr == 0 {
        return 0;
    }

    search.found = Some(ResolvedModule {
        path: PathBuf::from(name),
        base: info.dlpi_addr as usize,
    });

    1
}

const RTLD_DI_LINKMAP: libc::c_int = 2;

/// glibc's handle representation; `dlinfo(RTLD_DI_LINKMAP)` fills a pointer
/// to the module's entry.
#[repr(C)]
struct LinkMap {
    l_addr: usize,
    l_name: *const libc::c_char,
    l_ld: *mut c_void,
    l_next: *mut LinkMap,
    l_prev: *mut LinkMap,
}

fn introspect_handle(name: &str) -> Option<ResolvedModule> {
    let cname = CString::new(name).ok()?;

    let handle = unsafe { libc::dlopen(cname.as_ptr(), libc::RTLD_LAZY | libc::RTLD_NOLOAD) };
    if handle.is_null() {
        return None;
    }

    let mut map: *mut LinkMap = ptr::null_mut();
    let rc = unsafe {
        libc::dlinfo(
            handle,
            RTLD_DI_LINKMAP,
            &mut map as *mut *mut LinkMap as *mut c_void,
        )
    };

    let mut resolved = None;
    if rc == 0 && !map.is_null() {
        let entry = unsafe { &*map };
        if !entry.l_name.is_null() {
            let path = unsafe { CStr::from_ptr(entry.l_name) };
            if let Ok(path) = path.to_str() {
                if !path.is_empty() {
                    resolved = Some(ResolvedModule {
                        path: PathBuf::from(path),
                        base: entry.l_addr,
                    });
                }
            }
        }
    }

    // The NOLOAD open still bumped the reference count.
    unsafe { libc::dlclose(handle) };

    resolved
}
