mod common;

use std::ffi::{c_int, c_void, CString};

use common::{id, RecordingHost};
use objscope::config::ProbeConfig;
use objscope::domain::{ConnectionType, Descriptor, DispatchKind};
use objscope::interpose::callbacks::{forward_child_event, forward_connect, forward_disconnect};
use objscope::probe::{Probe, ProbeSlot};
use objscope_common::{
    CHILD_EVENT_ADDED, CHILD_EVENT_REMOVED, CONNECTION_QUEUED, CONNECTION_UNIQUE_FLAG,
};

/// A toolkit argument vector together with the storage its slots point into
struct ArgVector {
    _strings: Vec<CString>,
    _connection_type: Option<Box<c_int>>,
    slots: Vec<*mut c_void>,
}

impl ArgVector {
    fn connect(
        sender: usize,
        signal: Option<&str>,
        receiver: usize,
        method: Option<&str>,
        raw_type: Option<c_int>,
    ) -> Self {
        let mut vector = Self::disconnect(sender, signal, receiver, method);
        let mut connection_type = raw_type.map(Box::new);
        let type_slot = connection_type
            .as_mut()
            .map_or(std::ptr::null_mut(), |raw| std::ptr::from_mut(raw.as_mut()).cast());
        vector.slots.push(type_slot);
        vector._connection_type = connection_type;
        vector
    }

    fn disconnect(sender: usize, signal: Option<&str>, receiver: usize, method: Option<&str>) -> Self {
        let mut strings = Vec::new();
        let mut text = |token: Option<&str>| match token {
            Some(token) => {
                let owned = CString::new(token).unwrap();
                let ptr = owned.as_ptr().cast_mut().cast::<c_void>();
                strings.push(owned);
                ptr
            }
            None => std::ptr::null_mut(),
        };
        let slots = vec![
            sender as *mut c_void,
            text(signal),
            receiver as *mut c_void,
            text(method),
        ];
        Self { _strings: strings, _connection_type: None, slots }
    }

    fn as_mut_ptr(&mut self) -> *mut *mut c_void {
        self.slots.as_mut_ptr()
    }
}

fn constructed_slot() -> (ProbeSlot, RecordingHost) {
    let slot = ProbeSlot::new();
    let host = RecordingHost::new();
    slot.get_or_construct(|| Probe::new(Box::new(host.clone()), ProbeConfig::default()));
    (slot, host)
}

fn active_slot() -> (ProbeSlot, RecordingHost) {
    let (slot, host) = constructed_slot();
    let probe = slot.get().unwrap();
    probe.startup();
    probe.delayed_init();
    (slot, host)
}

fn connection_count(slot: &ProbeSlot) -> usize {
    slot.get().unwrap().with_models(|m| m.connections().len())
}

#[test]
fn test_connect_reaches_registry_and_is_not_claimed() {
    let (slot, _host) = active_slot();
    let mut args = ArgVector::connect(
        0x10,
        Some("2clicked()"),
        0x20,
        Some("1close()"),
        Some(CONNECTION_QUEUED | CONNECTION_UNIQUE_FLAG),
    );

    assert!(!unsafe { forward_connect(&slot, args.as_mut_ptr()) });

    slot.get().unwrap().with_models(|m| {
        let record = m.connections().iter().next().expect("connection recorded");
        assert_eq!(record.sender, Some(id(0x10)));
        assert_eq!(record.signal, Some(Descriptor::from("2clicked()")));
        assert_eq!(record.receiver, Some(id(0x20)));
        assert_eq!(record.method, Some(Descriptor::from("1close()")));
        assert_eq!(record.connection_type, ConnectionType { kind: DispatchKind::Queued, unique: true });
    });
}

#[test]
fn test_null_slots_pass_through_unchanged() {
    let (slot, _host) = active_slot();
    let mut args = ArgVector::connect(0x10, Some("2destroyed()"), 0, None, None);

    assert!(!unsafe { forward_connect(&slot, args.as_mut_ptr()) });

    slot.get().unwrap().with_models(|m| {
        let record = m.connections().iter().next().expect("connection recorded");
        assert_eq!(record.receiver, None);
        assert_eq!(record.method, None);
        assert_eq!(record.connection_type, ConnectionType::default());
    });
}

#[test]
fn test_exact_disconnect_removes_its_connection() {
    let (slot, _host) = active_slot();
    let mut close = ArgVector::connect(0x10, Some("2clicked()"), 0x20, Some("1close()"), Some(0));
    let mut hide = ArgVector::connect(0x10, Some("2clicked()"), 0x20, Some("1hide()"), Some(0));
    unsafe {
        forward_connect(&slot, close.as_mut_ptr());
        forward_connect(&slot, hide.as_mut_ptr());
    }

    let mut args = ArgVector::disconnect(0x10, Some("2clicked()"), 0x20, Some("1close()"));
    assert!(!unsafe { forward_disconnect(&slot, args.as_mut_ptr()) });

    slot.get().unwrap().with_models(|m| {
        let left: Vec<_> = m.connections().iter().collect();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].method, Some(Descriptor::from("1hide()")));
    });
}

#[test]
fn test_null_disconnect_slots_are_wildcards() {
    let (slot, _host) = active_slot();
    for (receiver, method) in [(0x20, "1close()"), (0x30, "1hide()")] {
        let mut args = ArgVector::connect(0x10, Some("2clicked()"), receiver, Some(method), Some(0));
        unsafe { forward_connect(&slot, args.as_mut_ptr()) };
    }
    let mut other = ArgVector::connect(0x40, Some("2clicked()"), 0x20, Some("1close()"), Some(0));
    unsafe { forward_connect(&slot, other.as_mut_ptr()) };

    let mut args = ArgVector::disconnect(0x10, None, 0, None);
    assert!(!unsafe { forward_disconnect(&slot, args.as_mut_ptr()) });

    assert_eq!(connection_count(&slot), 1);
}

#[test]
fn test_connections_before_activation_are_not_claimed() {
    let (slot, _host) = constructed_slot();
    let mut args = ArgVector::connect(0x10, Some("2clicked()"), 0x20, Some("1close()"), Some(0));

    assert!(!unsafe { forward_connect(&slot, args.as_mut_ptr()) });
    assert!(!unsafe { forward_disconnect(&slot, args.as_mut_ptr()) });

    let probe = slot.get().unwrap();
    assert_eq!(probe.stats().connections_missed, 2);
    assert_eq!(connection_count(&slot), 0);
}

#[test]
fn test_child_events_reach_hierarchy() {
    let (slot, _host) = active_slot();
    let probe = slot.get().unwrap();
    probe.object_added(id(0x1));
    probe.object_added(id(0x2));
    let (parent, child) = (0x1 as *mut c_void, 0x2 as *mut c_void);

    assert!(!forward_child_event(&slot, CHILD_EVENT_ADDED, parent, child));
    probe.with_models(|m| assert_eq!(m.hierarchy().parent_of(id(0x2)), Some(id(0x1))));

    assert!(!forward_child_event(&slot, CHILD_EVENT_REMOVED, parent, child));
    probe.with_models(|m| assert_eq!(m.hierarchy().parent_of(id(0x2)), None));
}

#[test]
fn test_non_structural_child_events_are_ignored() {
    let (slot, _host) = active_slot();
    let probe = slot.get().unwrap();
    probe.object_added(id(0x1));
    probe.object_added(id(0x2));
    let (parent, child) = (0x1 as *mut c_void, 0x2 as *mut c_void);

    assert!(!forward_child_event(&slot, 99, parent, child));
    assert!(!forward_child_event(&slot, CHILD_EVENT_ADDED, std::ptr::null_mut(), child));
    assert!(!forward_child_event(&slot, CHILD_EVENT_ADDED, parent, std::ptr::null_mut()));

    probe.with_models(|m| {
        assert_eq!(m.hierarchy().parent_of(id(0x2)), None);
        assert_eq!(m.hierarchy().children_of(id(0x1)).count(), 0);
    });
}
