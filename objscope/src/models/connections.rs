//! Signal/slot wiring between tracked objects
//!
//! Records are keyed by their `(sender, signal, receiver, method)` tuple and kept
//! in insertion order. Per-object sender and receiver indexes serve role lookups
//! and the purge that follows an object's destruction.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{ConnectEvent, ConnectionType, Descriptor, DisconnectEvent, ObjectId};

/// One sender→receiver edge
///
/// Identified by `(sender, signal, receiver, method)`; `connection_type` is
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub sender: Option<ObjectId>,
    pub signal: Option<Descriptor>,
    pub receiver: Option<ObjectId>,
    pub method: Option<Descriptor>,
    pub connection_type: ConnectionType,
}

impl ConnectionRecord {
    /// Whether this record is covered by a (possibly wildcard) disconnect
    #[must_use]
    pub fn matches(&self, query: &DisconnectEvent) -> bool {
        fn slot<T: PartialEq>(wanted: Option<&T>, actual: Option<&T>) -> bool {
            wanted.is_none() || wanted == actual
        }
        slot(query.sender.as_ref(), self.sender.as_ref())
            && slot(query.signal.as_ref(), self.signal.as_ref())
            && slot(query.receiver.as_ref(), self.receiver.as_ref())
            && slot(query.method.as_ref(), self.method.as_ref())
    }

    /// Whether `object` appears as sender or receiver
    #[must_use]
    pub fn involves(&self, object: ObjectId) -> bool {
        self.sender == Some(object) || self.receiver == Some(object)
    }
}

impl From<ConnectEvent> for ConnectionRecord {
    fn from(event: ConnectEvent) -> Self {
        Self {
            sender: event.sender,
            signal: event.signal,
            receiver: event.receiver,
            method: event.method,
            connection_type: event.connection_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConnectionKey {
    sender: Option<ObjectId>,
    signal: Option<Descriptor>,
    receiver: Option<ObjectId>,
    method: Option<Descriptor>,
}

impl From<&ConnectionRecord> for ConnectionKey {
    fn from(record: &ConnectionRecord) -> Self {
        Self {
            sender: record.sender,
            signal: record.signal.clone(),
            receiver: record.receiver,
            method: record.method.clone(),
        }
    }
}

impl From<&DisconnectEvent> for ConnectionKey {
    fn from(query: &DisconnectEvent) -> Self {
        Self {
            sender: query.sender,
            signal: query.signal.clone(),
            receiver: query.receiver,
            method: query.method.clone(),
        }
    }
}

type RoleIndex = HashMap<ObjectId, IndexSet<ConnectionKey>>;

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    records: IndexMap<ConnectionKey, ConnectionRecord>,
    by_sender: RoleIndex,
    by_receiver: RoleIndex,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection
    ///
    /// A connection with the same tuple is updated in place rather than duplicated;
    /// the toolkit reconnecting an existing edge only changes its type.
    pub fn connection_added(&mut self, record: ConnectionRecord) {
        let key = ConnectionKey::from(&record);
        if let Some(existing) = self.records.get_mut(&key) {
            debug!(
                "reconnect {:?}::{:?} -> {:?}::{:?} as {}",
                record.sender, record.signal, record.receiver, record.method, record.connection_type
            );
            existing.connection_type = record.connection_type;
            return;
        }
        if let Some(sender) = key.sender {
            self.by_sender.entry(sender).or_default().insert(key.clone());
        }
        if let Some(receiver) = key.receiver {
            self.by_receiver.entry(receiver).or_default().insert(key.clone());
        }
        self.records.insert(key, record);
    }

    /// Drop the records matched by `query` and return how many were dropped
    ///
    /// A record whose tuple equals the query's, nulls included, is the only one
    /// removed. Otherwise `None` fields in the query match anything.
    pub fn connection_removed(&mut self, query: &DisconnectEvent) -> usize {
        if self.remove(&ConnectionKey::from(query)).is_some() {
            return 1;
        }
        let covered = self.covered_by(query);
        for key in &covered {
            self.remove(key);
        }
        if covered.is_empty() {
            trace!("disconnect matched no tracked connection: {query:?}");
        }
        covered.len()
    }

    /// Drop every record naming `object` as sender or as receiver
    ///
    /// Returns the number of outgoing and incoming records dropped; a connection from
    /// `object` to itself counts as outgoing.
    pub fn object_removed(&mut self, object: ObjectId) -> (usize, usize) {
        let outgoing = self.by_sender.remove(&object).unwrap_or_default();
        let outgoing = outgoing.iter().filter(|key| self.remove(key).is_some()).count();
        let incoming = self.by_receiver.remove(&object).unwrap_or_default();
        let incoming = incoming.iter().filter(|key| self.remove(key).is_some()).count();
        (outgoing, incoming)
    }

    /// Connections emitted by `sender`
    pub fn connections_from(&self, sender: ObjectId) -> impl Iterator<Item = &ConnectionRecord> {
        self.indexed(&self.by_sender, sender)
    }

    /// Connections delivered to `receiver`
    pub fn connections_to(&self, receiver: ObjectId) -> impl Iterator<Item = &ConnectionRecord> {
        self.indexed(&self.by_receiver, receiver)
    }

    /// Records in the order they were first connected
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionRecord> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn indexed<'a>(
        &'a self,
        index: &'a RoleIndex,
        object: ObjectId,
    ) -> impl Iterator<Item = &'a ConnectionRecord> {
        index.get(&object).into_iter().flatten().filter_map(move |key| self.records.get(key))
    }

    /// Keys of the records a wildcard `query` covers
    ///
    /// Narrowed through a role index when the query names a sender or receiver.
    fn covered_by(&self, query: &DisconnectEvent) -> Vec<ConnectionKey> {
        let covered =
            |key: &&ConnectionKey| self.records.get(*key).is_some_and(|r| r.matches(query));
        let index = match (query.sender, query.receiver) {
            (Some(sender), _) => self.by_sender.get(&sender),
            (None, Some(receiver)) => self.by_receiver.get(&receiver),
            (None, None) => return self.records.keys().filter(covered).cloned().collect(),
        };
        index.map_or_else(Vec::new, |keys| keys.iter().filter(covered).cloned().collect())
    }

    fn remove(&mut self, key: &ConnectionKey) -> Option<ConnectionRecord> {
        let record = self.records.shift_remove(key)?;
        if let Some(sender) = key.sender {
            unindex(&mut self.by_sender, sender, key);
        }
        if let Some(receiver) = key.receiver {
            unindex(&mut self.by_receiver, receiver, key);
        }
        Some(record)
    }
}

fn unindex(index: &mut RoleIndex, object: ObjectId, key: &ConnectionKey) {
    if let Some(keys) = index.get_mut(&object) {
        keys.shift_remove(key);
        if keys.is_empty() {
            index.remove(&object);
        }
    }
}
