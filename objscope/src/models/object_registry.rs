//! Flat registry of every live object the probe has seen

use indexmap::IndexSet;
use log::trace;

use crate::domain::ObjectId;

/// Insertion-ordered set of live objects
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: IndexSet<ObjectId>,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `object`. Returns `false` if it was already tracked.
    pub fn object_added(&mut self, object: ObjectId) -> bool {
        self.objects.insert(object)
    }

    /// Stop tracking `object`. Unknown objects are ignored.
    pub fn object_removed(&mut self, object: ObjectId) -> bool {
        // shift_remove keeps the remaining objects in construction order
        let removed = self.objects.shift_remove(&object);
        if !removed {
            trace!("ignoring removal of untracked object {object}");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains(&object)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().copied()
    }
}
