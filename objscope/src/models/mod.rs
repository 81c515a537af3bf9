//! Bookkeeping models fed by the probe
//!
//! - [`ObjectRegistry`]: every live object, in construction order
//! - [`HierarchyTracker`]: the parent/child ownership tree
//! - [`ConnectionRegistry`]: signal/slot edges between objects
//!
//! The models are owned by the probe and only mutated through its entry points;
//! everything else gets shared references through [`Models`].

pub mod connections;
pub mod hierarchy;
pub mod object_registry;

pub use connections::{ConnectionRecord, ConnectionRegistry};
pub use hierarchy::HierarchyTracker;
pub use object_registry::ObjectRegistry;

/// The three models, owned together
#[derive(Debug, Default)]
pub struct Models {
    pub(crate) objects: ObjectRegistry,
    pub(crate) hierarchy: HierarchyTracker,
    pub(crate) connections: ConnectionRegistry,
}

impl Models {
    #[must_use]
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyTracker {
        &self.hierarchy
    }

    #[must_use]
    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }
}
