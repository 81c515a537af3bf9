//! Typed events produced at the toolkit boundary
//!
//! The callback layer decodes the toolkit's positional argument vectors into these
//! once; everything past the boundary works with named fields.

use super::types::{ConnectionType, Descriptor, ObjectId};
use objscope_common::{CHILD_EVENT_ADDED, CHILD_EVENT_REMOVED};

/// A signal/slot connection was established
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectEvent {
    pub sender: Option<ObjectId>,
    pub signal: Option<Descriptor>,
    pub receiver: Option<ObjectId>,
    pub method: Option<Descriptor>,
    pub connection_type: ConnectionType,
}

/// A signal/slot connection was torn down
///
/// `None` fields act as wildcards, matching what the toolkit's own disconnect does
/// with null arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisconnectEvent {
    pub sender: Option<ObjectId>,
    pub signal: Option<Descriptor>,
    pub receiver: Option<ObjectId>,
    pub method: Option<Descriptor>,
}

impl DisconnectEvent {
    /// Every connection where `object` is the sender
    #[must_use]
    pub fn all_from(object: ObjectId) -> Self {
        Self { sender: Some(object), ..Self::default() }
    }

    /// Every connection where `object` is the receiver
    #[must_use]
    pub fn all_to(object: ObjectId) -> Self {
        Self { receiver: Some(object), ..Self::default() }
    }
}

impl From<&ConnectEvent> for DisconnectEvent {
    /// The disconnect matching exactly this connection's tuple
    fn from(event: &ConnectEvent) -> Self {
        Self {
            sender: event.sender,
            signal: event.signal.clone(),
            receiver: event.receiver,
            method: event.method.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildEventKind {
    Added,
    Removed,
}

impl ChildEventKind {
    /// Decode the toolkit's event code; other event types are not structural
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            CHILD_EVENT_ADDED => Some(Self::Added),
            CHILD_EVENT_REMOVED => Some(Self::Removed),
            _ => None,
        }
    }
}

/// `child` gained or lost `parent` in the ownership hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEvent {
    pub kind: ChildEventKind,
    pub parent: ObjectId,
    pub child: ObjectId,
}

/// A call into one of the interposed lifecycle hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Startup,
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
}
