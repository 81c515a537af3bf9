//! Next-in-chain resolution for the interposed hooks
//!
//! The probe shadows the toolkit's hook symbols. To keep the toolkit (and any
//! other interposer loaded after the probe) working, each hook forwards to the
//! next definition of the same symbol in load order, found with
//! `dlsym(RTLD_NEXT, …)`. All three are resolved together, once per process.

#![allow(unsafe_code)] // dlsym and pointer-to-function casts

use libc::c_void;
use log::debug;
use objscope_common::{
    ObjectHookFn, StartupHookFn, OBJECT_ADDED_HOOK_SYMBOL, OBJECT_REMOVED_HOOK_SYMBOL,
    STARTUP_HOOK_SYMBOL,
};
use std::ffi::CString;
use std::sync::OnceLock;

use super::fatal;
use crate::domain::ProbeError;

static CHAIN: OnceLock<HookChain> = OnceLock::new();

/// Next-in-chain implementations of the three hooks
#[derive(Clone, Copy)]
pub struct HookChain {
    pub startup: StartupHookFn,
    pub object_added: ObjectHookFn,
    pub object_removed: ObjectHookFn,
}

impl HookChain {
    /// Resolve against the modules loaded after the probe
    ///
    /// # Errors
    /// Returns [`ProbeError::ChainUnresolved`] naming the first missing symbol
    pub fn resolve() -> Result<Self, ProbeError> {
        Self::resolve_with(next_symbol)
    }

    /// Resolve through `lookup`, which returns a symbol's address or null
    ///
    /// # Errors
    /// Returns [`ProbeError::ChainUnresolved`] naming the first missing symbol
    pub fn resolve_with(lookup: impl Fn(&str) -> *mut c_void) -> Result<Self, ProbeError> {
        let startup = require(&lookup, STARTUP_HOOK_SYMBOL)?;
        let object_added = require(&lookup, OBJECT_ADDED_HOOK_SYMBOL)?;
        let object_removed = require(&lookup, OBJECT_REMOVED_HOOK_SYMBOL)?;

        // SAFETY: each address is non-null and names a definition of the hook with
        // the signature fixed by the toolkit's interposition convention.
        let chain = unsafe {
            Self {
                startup: std::mem::transmute::<*mut c_void, StartupHookFn>(startup),
                object_added: std::mem::transmute::<*mut c_void, ObjectHookFn>(object_added),
                object_removed: std::mem::transmute::<*mut c_void, ObjectHookFn>(object_removed),
            }
        };
        debug!(
            "hook chain resolved: startup={startup:p} add={object_added:p} remove={object_removed:p}"
        );
        Ok(chain)
    }
}

/// The process-wide chain, resolved on first use
///
/// Aborts the process if any hook cannot be resolved.
pub fn chain() -> &'static HookChain {
    CHAIN.get_or_init(|| HookChain::resolve().unwrap_or_else(|e| fatal(&e)))
}

fn require(
    lookup: &impl Fn(&str) -> *mut c_void,
    symbol: &'static str,
) -> Result<*mut c_void, ProbeError> {
    let address = lookup(symbol);
    if address.is_null() {
        Err(ProbeError::ChainUnresolved { symbol })
    } else {
        Ok(address)
    }
}

/// `dlsym(RTLD_NEXT, symbol)`
pub(crate) fn next_symbol(symbol: &str) -> *mut c_void {
    lookup_in(libc::RTLD_NEXT, symbol)
}

/// `dlsym(RTLD_DEFAULT, symbol)`
pub(crate) fn global_symbol(symbol: &str) -> *mut c_void {
    lookup_in(libc::RTLD_DEFAULT, symbol)
}

fn lookup_in(handle: *mut c_void, symbol: &str) -> *mut c_void {
    let Ok(name) = CString::new(symbol) else {
        return std::ptr::null_mut();
    };
    // SAFETY: `name` is a valid NUL-terminated string for the duration of the call
    unsafe { libc::dlsym(handle, name.as_ptr()) }
}
