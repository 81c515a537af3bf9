//! [`Host`] backed by the toolkit adapter's C function table

#![allow(unsafe_code)] // calls through the adapter's function pointers

use libc::c_void;
use objscope_common::{
    ConnectionCallbackFn, HostBridge, HostBridgeEntryFn, CALLBACK_CONNECT, CALLBACK_DISCONNECT,
    HOST_BRIDGE_ABI_VERSION, HOST_BRIDGE_SYMBOL,
};

use super::callbacks::{on_child_event, on_connect, on_disconnect, run_delayed_init};
use super::chain::global_symbol;
use crate::domain::{CallbackCategory, ObjectId, ProbeError};
use crate::probe::Host;

pub struct FfiHost {
    bridge: HostBridge,
}

impl FfiHost {
    /// Locate the adapter's bridge among the loaded modules
    ///
    /// # Errors
    /// Returns [`ProbeError::HostBridgeMissing`] if no module exports the bridge
    /// or it returns null, and [`ProbeError::HostBridgeAbiMismatch`] if it was
    /// built against another ABI version.
    pub fn resolve() -> Result<Self, ProbeError> {
        let missing = ProbeError::HostBridgeMissing { symbol: HOST_BRIDGE_SYMBOL };
        let entry = global_symbol(HOST_BRIDGE_SYMBOL);
        if entry.is_null() {
            return Err(missing);
        }
        // SAFETY: the adapter exports HOST_BRIDGE_SYMBOL with this signature
        let entry = unsafe { std::mem::transmute::<*mut c_void, HostBridgeEntryFn>(entry) };
        // SAFETY: the returned table is either null or valid for the process lifetime
        let bridge = unsafe { entry().as_ref() }.copied().ok_or(missing)?;
        Self::from_bridge(bridge)
    }

    /// Wrap an already obtained bridge after checking its ABI version
    ///
    /// # Errors
    /// Returns [`ProbeError::HostBridgeAbiMismatch`] on a version mismatch
    pub fn from_bridge(bridge: HostBridge) -> Result<Self, ProbeError> {
        if bridge.abi_version != HOST_BRIDGE_ABI_VERSION {
            return Err(ProbeError::HostBridgeAbiMismatch {
                expected: HOST_BRIDGE_ABI_VERSION,
                found: bridge.abi_version,
            });
        }
        Ok(Self { bridge })
    }
}

impl Host for FfiHost {
    fn register_callback(&self, category: CallbackCategory) -> Result<(), ProbeError> {
        let (code, callback): (u32, ConnectionCallbackFn) = match category {
            CallbackCategory::Connect => (CALLBACK_CONNECT, on_connect),
            CallbackCategory::Disconnect => (CALLBACK_DISCONNECT, on_disconnect),
        };
        // SAFETY: bridge functions are valid for the process lifetime
        if unsafe { (self.bridge.register_callback)(code, callback) } {
            Ok(())
        } else {
            Err(ProbeError::CallbackRegistration(category))
        }
    }

    fn install_child_observer(&self) -> Result<(), ProbeError> {
        // SAFETY: as above
        if unsafe { (self.bridge.install_child_filter)(on_child_event) } {
            Ok(())
        } else {
            Err(ProbeError::ObserverInstall)
        }
    }

    fn schedule_delayed_init(&self) {
        // SAFETY: as above
        unsafe { (self.bridge.post_deferred)(run_delayed_init) };
    }

    fn parent_of(&self, object: ObjectId) -> Option<ObjectId> {
        // SAFETY: as above; the adapter only reads the object's parent pointer
        ObjectId::from_ptr(unsafe { (self.bridge.parent_of)(object.as_ptr()) })
    }

    fn launch_presentation(&self) {
        match self.bridge.launch_presentation {
            // SAFETY: as above
            Some(launch) => unsafe { launch() },
            None => log::info!("toolkit adapter has no presentation surface"),
        }
    }
}
