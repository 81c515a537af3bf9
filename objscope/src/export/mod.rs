//! Snapshot export
//!
//! Serializes the three models into a single JSON document that the presentation
//! layer (or the `objscope` inspector) can load without the probe running.

pub mod snapshot;

pub use snapshot::{HierarchyEntry, Snapshot, SNAPSHOT_FORMAT_VERSION};
