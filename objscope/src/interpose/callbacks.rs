//! # Toolkit Callbacks
//!
//! C entry points the toolkit calls back into: the connect/disconnect callbacks,
//! the structural event filter and the deferred init task.
//!
//! ## Argument Vectors
//!
//! | Slot | Connect                     | Disconnect |
//! |------|-----------------------------|------------|
//! | 0    | sender                      | sender     |
//! | 1    | signal (C string)           | signal     |
//! | 2    | receiver                    | receiver   |
//! | 3    | method (C string)           | method     |
//! | 4    | `*const` connection type    |            |
//!
//! The layout is fixed by the toolkit ABI and trusted as-is. Null slots become
//! `None`. Every callback reports "not handled" so the toolkit always carries out
//! the operation it is telling us about.

#![allow(unsafe_code)] // raw argument vectors from the toolkit

use libc::{c_char, c_int, c_void};
use log::{trace, warn};
use objscope_common::{
    CONNECTION_AUTO, CONNECT_SLOT_METHOD, CONNECT_SLOT_RECEIVER, CONNECT_SLOT_SENDER,
    CONNECT_SLOT_SIGNAL, CONNECT_SLOT_TYPE, DISCONNECT_SLOT_METHOD, DISCONNECT_SLOT_RECEIVER,
    DISCONNECT_SLOT_SENDER, DISCONNECT_SLOT_SIGNAL,
};
use std::ffi::CStr;

use super::PROBE;
use crate::domain::{
    ChildEvent, ChildEventKind, ConnectEvent, ConnectionType, Descriptor, DisconnectEvent, ObjectId,
};
use crate::probe::ProbeSlot;

/// Registered for the on-connect category
///
/// # Safety
/// Only called by the toolkit, with a connect argument vector.
pub unsafe extern "C" fn on_connect(args: *mut *mut c_void) -> bool {
    // SAFETY: the toolkit passes a connect vector
    unsafe { forward_connect(&PROBE, args) }
}

/// Registered for the on-disconnect category
///
/// # Safety
/// Only called by the toolkit, with a disconnect argument vector.
pub unsafe extern "C" fn on_disconnect(args: *mut *mut c_void) -> bool {
    // SAFETY: the toolkit passes a disconnect vector
    unsafe { forward_disconnect(&PROBE, args) }
}

/// Application-wide event filter for child added/removed events
///
/// # Safety
/// The pointers are only compared, never dereferenced.
pub unsafe extern "C" fn on_child_event(kind: u32, parent: *mut c_void, child: *mut c_void) -> bool {
    forward_child_event(&PROBE, kind, parent, child)
}

/// Posted once through the host's deferred invocation primitive
///
/// # Safety
/// Must run on the toolkit's event-loop thread.
pub unsafe extern "C" fn run_delayed_init() {
    match PROBE.get() {
        Some(probe) => probe.delayed_init(),
        None => warn!("delayed init fired without a probe"),
    }
}

/// Decode a connect vector and hand it to the probe in `slot`, if any
///
/// # Safety
/// `args` must point to a connect argument vector as laid out by the toolkit.
pub unsafe fn forward_connect(slot: &ProbeSlot, args: *mut *mut c_void) -> bool {
    if let Some(probe) = slot.get() {
        // SAFETY: forwarded from the caller
        let event = unsafe { decode_connect(args) };
        trace!("connect {event:?}");
        probe.connection_added(event);
    }
    false
}

/// Decode a disconnect vector and hand it to the probe in `slot`, if any
///
/// # Safety
/// `args` must point to a disconnect argument vector as laid out by the toolkit.
pub unsafe fn forward_disconnect(slot: &ProbeSlot, args: *mut *mut c_void) -> bool {
    if let Some(probe) = slot.get() {
        // SAFETY: forwarded from the caller
        let event = unsafe { decode_disconnect(args) };
        trace!("disconnect {event:?}");
        probe.connection_removed(&event);
    }
    false
}

/// Hand a structural event to the probe in `slot`; non-structural kinds and
/// null objects are ignored
pub fn forward_child_event(
    slot: &ProbeSlot,
    kind: u32,
    parent: *mut c_void,
    child: *mut c_void,
) -> bool {
    let (Some(kind), Some(parent), Some(child)) =
        (ChildEventKind::from_raw(kind), ObjectId::from_ptr(parent), ObjectId::from_ptr(child))
    else {
        return false;
    };
    if let Some(probe) = slot.get() {
        probe.child_event(ChildEvent { kind, parent, child });
    }
    false
}

/// # Safety
/// `args` must hold the connect slots; descriptor slots must be null or valid C
/// strings, the type slot null or a valid `int`.
pub unsafe fn decode_connect(args: *mut *mut c_void) -> ConnectEvent {
    // SAFETY: forwarded from the caller
    unsafe {
        let type_ptr = slot(args, CONNECT_SLOT_TYPE).cast::<c_int>();
        let raw_type = if type_ptr.is_null() { CONNECTION_AUTO } else { *type_ptr };
        ConnectEvent {
            sender: ObjectId::from_ptr(slot(args, CONNECT_SLOT_SENDER)),
            signal: descriptor(slot(args, CONNECT_SLOT_SIGNAL)),
            receiver: ObjectId::from_ptr(slot(args, CONNECT_SLOT_RECEIVER)),
            method: descriptor(slot(args, CONNECT_SLOT_METHOD)),
            connection_type: ConnectionType::from_raw(raw_type),
        }
    }
}

/// # Safety
/// `args` must hold the disconnect slots; descriptor slots must be null or valid
/// C strings.
pub unsafe fn decode_disconnect(args: *mut *mut c_void) -> DisconnectEvent {
    // SAFETY: forwarded from the caller
    unsafe {
        DisconnectEvent {
            sender: ObjectId::from_ptr(slot(args, DISCONNECT_SLOT_SENDER)),
            signal: descriptor(slot(args, DISCONNECT_SLOT_SIGNAL)),
            receiver: ObjectId::from_ptr(slot(args, DISCONNECT_SLOT_RECEIVER)),
            method: descriptor(slot(args, DISCONNECT_SLOT_METHOD)),
        }
    }
}

unsafe fn slot(args: *mut *mut c_void, index: usize) -> *mut c_void {
    // SAFETY: the caller guarantees `index` is within the vector
    unsafe { *args.add(index) }
}

unsafe fn descriptor(ptr: *mut c_void) -> Option<Descriptor> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null descriptor slots hold NUL-terminated strings
    let token = unsafe { CStr::from_ptr(ptr.cast::<c_char>()) };
    Some(Descriptor::new(token.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use objscope_common::{CONNECTION_QUEUED, CONNECTION_UNIQUE_FLAG};
    use std::ffi::CString;

    struct Vector {
        _strings: Vec<CString>,
        _type: Box<c_int>,
        slots: Vec<*mut c_void>,
    }

    fn connect_vector(sender: usize, receiver: usize, raw_type: Option<c_int>) -> Vector {
        let signal = CString::new("2clicked()").unwrap();
        let method = CString::new("1close()").unwrap();
        let mut connection_type = Box::new(raw_type.unwrap_or_default());
        let type_ptr = if raw_type.is_some() {
            std::ptr::from_mut(connection_type.as_mut()).cast::<c_void>()
        } else {
            std::ptr::null_mut()
        };
        let slots = vec![
            sender as *mut c_void,
            signal.as_ptr().cast_mut().cast::<c_void>(),
            receiver as *mut c_void,
            method.as_ptr().cast_mut().cast::<c_void>(),
            type_ptr,
        ];
        Vector { _strings: vec![signal, method], _type: connection_type, slots }
    }

    #[test]
    fn test_decode_connect() {
        let mut vector =
            connect_vector(0x10, 0x20, Some(CONNECTION_QUEUED | CONNECTION_UNIQUE_FLAG));
        let event = unsafe { decode_connect(vector.slots.as_mut_ptr()) };
        assert_eq!(event.sender, Some(ObjectId(0x10)));
        assert_eq!(event.receiver, Some(ObjectId(0x20)));
        assert_eq!(event.signal.as_ref().map(Descriptor::as_str), Some("2clicked()"));
        assert_eq!(event.method.as_ref().map(Descriptor::as_str), Some("1close()"));
        assert!(event.connection_type.unique);
    }

    #[test]
    fn test_decode_connect_null_slots() {
        let mut vector = connect_vector(0, 0, None);
        vector.slots[CONNECT_SLOT_SIGNAL] = std::ptr::null_mut();
        let event = unsafe { decode_connect(vector.slots.as_mut_ptr()) };
        assert_eq!(event.sender, None);
        assert_eq!(event.receiver, None);
        assert_eq!(event.signal, None);
        assert_eq!(event.connection_type, ConnectionType::default());
    }

    #[test]
    fn test_decode_disconnect_wildcards() {
        let mut slots = vec![0x30 as *mut c_void, std::ptr::null_mut(), std::ptr::null_mut(), std::ptr::null_mut()];
        let event = unsafe { decode_disconnect(slots.as_mut_ptr()) };
        assert_eq!(event, DisconnectEvent::all_from(ObjectId(0x30)));
    }

    #[test]
    fn test_callbacks_never_claim_the_event() {
        // No probe has been constructed in the test process; the callbacks must
        // still let the toolkit proceed.
        let mut vector = connect_vector(0x10, 0x20, Some(0));
        unsafe {
            assert!(!on_connect(vector.slots.as_mut_ptr()));
            assert!(!on_disconnect(vector.slots.as_mut_ptr()));
            assert!(!on_child_event(1, 0x10 as *mut c_void, 0x20 as *mut c_void));
        }
    }
}
