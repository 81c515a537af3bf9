//! # Shared ABI (Toolkit Adapter ↔ Probe)
//!
//! Defines the symbol names, constants and `#[repr(C)]` structures shared between
//! the probe library and the toolkit-side adapter that exposes the host runtime's
//! capabilities. Everything here crosses a C ABI boundary, so layouts are fixed and
//! no Rust-only types appear in signatures.
//!
//! ## Key Types
//!
//! - [`HostBridge`] - Function table the adapter exports for the probe to consume
//! - [`ConnectionCallbackFn`] - Signature of the connect/disconnect callbacks
//! - [`ChildFilterFn`] - Signature of the structural (child added/removed) filter
//!
//! ## Argument Vectors
//!
//! The toolkit hands connection callbacks a `void **` whose slots follow a fixed
//! layout. The `CONNECT_SLOT_*` / `DISCONNECT_SLOT_*` constants name those slots.

#![no_std]

use core::ffi::{c_char, c_void};

// ============================================================================
// Interposed Hook Symbols
// ============================================================================

/// Called once by the toolkit when its application object has been set up.
pub const STARTUP_HOOK_SYMBOL: &str = "qt_startup_hook";

/// Called by the toolkit from every object constructor.
pub const OBJECT_ADDED_HOOK_SYMBOL: &str = "qt_addObject";

/// Called by the toolkit from every object destructor.
pub const OBJECT_REMOVED_HOOK_SYMBOL: &str = "qt_removeObject";

/// Symbol of the adapter function returning the [`HostBridge`] table.
pub const HOST_BRIDGE_SYMBOL: &str = "objscope_host_bridge";

/// Version of [`HostBridge`] this probe was built against.
///
/// Bumped whenever a field is added, removed or reordered.
pub const HOST_BRIDGE_ABI_VERSION: u32 = 1;

// ============================================================================
// Callback Categories
// ============================================================================

/// **On-connect**: fired whenever a signal/slot connection is established
///
/// Argument vector: `[sender, signal, receiver, method, *const ConnectionType]`
pub const CALLBACK_CONNECT: u32 = 0;

/// **On-disconnect**: fired whenever a connection is torn down
///
/// Argument vector: `[sender, signal, receiver, method]`
pub const CALLBACK_DISCONNECT: u32 = 1;

pub const CONNECT_SLOT_SENDER: usize = 0;
pub const CONNECT_SLOT_SIGNAL: usize = 1;
pub const CONNECT_SLOT_RECEIVER: usize = 2;
pub const CONNECT_SLOT_METHOD: usize = 3;
pub const CONNECT_SLOT_TYPE: usize = 4;
pub const CONNECT_SLOT_COUNT: usize = 5;

pub const DISCONNECT_SLOT_SENDER: usize = 0;
pub const DISCONNECT_SLOT_SIGNAL: usize = 1;
pub const DISCONNECT_SLOT_RECEIVER: usize = 2;
pub const DISCONNECT_SLOT_METHOD: usize = 3;
pub const DISCONNECT_SLOT_COUNT: usize = 4;

// ============================================================================
// Connection Type Tags
// ============================================================================

/// Dispatch decided at emit time (direct if same thread, queued otherwise)
pub const CONNECTION_AUTO: i32 = 0;
/// Slot invoked synchronously from the emitting thread
pub const CONNECTION_DIRECT: i32 = 1;
/// Slot invoked from the receiver's event loop
pub const CONNECTION_QUEUED: i32 = 2;
/// Legacy auto mode kept for source compatibility
pub const CONNECTION_AUTO_COMPAT: i32 = 3;
/// Queued, with the emitter blocking until the slot returns
pub const CONNECTION_BLOCKING_QUEUED: i32 = 4;
/// Flag OR-ed into any of the above: refuse duplicate connections
pub const CONNECTION_UNIQUE_FLAG: i32 = 0x80;

// ============================================================================
// Structural Events
// ============================================================================

/// A child object was attached to the event's receiver
pub const CHILD_EVENT_ADDED: u32 = 1;
/// A child object was detached from the event's receiver
pub const CHILD_EVENT_REMOVED: u32 = 2;

// ============================================================================
// Function Signatures
// ============================================================================

/// Connect/disconnect callback. Returns `true` if the event was handled, which
/// makes the toolkit skip the operation; an observer must return `false`.
pub type ConnectionCallbackFn = unsafe extern "C" fn(args: *mut *mut c_void) -> bool;

/// Structural event filter. Returns `true` to swallow the event.
pub type ChildFilterFn =
    unsafe extern "C" fn(kind: u32, parent: *mut c_void, child: *mut c_void) -> bool;

/// Deferred task run once from the toolkit's event loop.
pub type DeferredFn = unsafe extern "C" fn();

/// Signature of the startup hook and its next-in-chain.
pub type StartupHookFn = unsafe extern "C" fn();

/// Signature of the object add/remove hooks and their next-in-chain.
pub type ObjectHookFn = unsafe extern "C" fn(object: *mut c_void);

/// Signature of the [`HOST_BRIDGE_SYMBOL`] entry point.
pub type HostBridgeEntryFn = unsafe extern "C" fn() -> *const HostBridge;

/// Signature of the exported snapshot entry point (`objscope_export_snapshot`).
pub type ExportSnapshotFn = unsafe extern "C" fn(path: *const c_char) -> i32;

// ============================================================================
// Host Bridge
// ============================================================================

/// Toolkit capabilities consumed by the probe
///
/// Exported by the toolkit adapter through [`HOST_BRIDGE_SYMBOL`]. All functions
/// must be called from the thread running the toolkit's event loop.
///
/// **Memory Layout**: `#[repr(C)]`, field order is part of the ABI
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostBridge {
    /// Must equal [`HOST_BRIDGE_ABI_VERSION`]
    pub abi_version: u32,

    /// Register `callback` for [`CALLBACK_CONNECT`] or [`CALLBACK_DISCONNECT`].
    ///
    /// Returns `false` if the toolkit rejected the registration.
    pub register_callback:
        unsafe extern "C" fn(category: u32, callback: ConnectionCallbackFn) -> bool,

    /// Install `filter` as an application-wide event filter for child events.
    pub install_child_filter: unsafe extern "C" fn(filter: ChildFilterFn) -> bool,

    /// Queue `task` to run once on the next iteration of the event loop.
    pub post_deferred: unsafe extern "C" fn(task: DeferredFn),

    /// Current parent of `object`, or null for a top-level object.
    ///
    /// Must not construct or destroy objects.
    pub parent_of: unsafe extern "C" fn(object: *mut c_void) -> *mut c_void,

    /// Construct and show the probe's presentation surface, if the adapter has one.
    pub launch_presentation: Option<unsafe extern "C" fn()>,
}
