//! Exported symbols shadowing the toolkit's hook points
//!
//! With the probe preloaded, the dynamic linker binds the toolkit's lookups of
//! these names to the definitions below. Each forwards the event to the probe and
//! then calls the next definition in load order, so the toolkit's own bookkeeping
//! (and any other interposer) still runs.

#![allow(unsafe_code)] // exported C entry points

use libc::{c_char, c_int, c_void};
use log::{debug, error};
use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use super::chain::chain;
use super::{deliver, PROBE};
use crate::domain::{ExportError, LifecycleEvent, ObjectId};
use crate::probe::ProbeSlot;

/// The toolkit finished setting up its application object
#[no_mangle]
pub extern "C" fn qt_startup_hook() {
    let next = chain().startup;
    debug!("startup hook");
    deliver(LifecycleEvent::Startup);
    // SAFETY: resolved by dlsym(RTLD_NEXT) for this very hook
    unsafe { next() };
}

/// An object is being constructed
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn qt_addObject(object: *mut c_void) {
    let next = chain().object_added;
    if let Some(id) = ObjectId::from_ptr(object) {
        deliver(LifecycleEvent::ObjectAdded(id));
    }
    // SAFETY: as above, with the pointer the toolkit gave us
    unsafe { next(object) };
}

/// An object is being destroyed
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn qt_removeObject(object: *mut c_void) {
    let next = chain().object_removed;
    if let Some(id) = ObjectId::from_ptr(object) {
        deliver(LifecycleEvent::ObjectRemoved(id));
    }
    // SAFETY: as above
    unsafe { next(object) };
}

/// Write a JSON snapshot of the models to `path`, or to `OBJSCOPE_EXPORT` when
/// `path` is null. Returns 0 on success and -1 on failure.
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn objscope_export_snapshot(path: *const c_char) -> c_int {
    let path = if path.is_null() {
        None
    } else {
        // SAFETY: checked non-null above, validity is the caller's contract
        let bytes = unsafe { CStr::from_ptr(path) }.to_bytes();
        Some(PathBuf::from(OsStr::from_bytes(bytes)))
    };
    match export_snapshot(&PROBE, path) {
        Ok(_) => 0,
        Err(e) => {
            error!("snapshot export failed: {e}");
            -1
        }
    }
}

/// Snapshot the probe held by `slot` to `path` (or its configured export path)
///
/// # Errors
/// Fails if no probe is running, no path is known, or the file cannot be written
pub fn export_snapshot(slot: &ProbeSlot, path: Option<PathBuf>) -> Result<PathBuf, ExportError> {
    let probe = slot.get().ok_or(ExportError::ProbeNotRunning)?;
    let path = path
        .or_else(|| probe.config().export_path.clone())
        .ok_or(ExportError::NoExportPath)?;
    probe.snapshot().write_file(&path)?;
    Ok(path)
}
