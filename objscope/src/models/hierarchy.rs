//! Parent/child ownership tree of the observed application
//!
//! Every tracked object has at most one parent. A parent is just an identity: it
//! may itself be untracked (e.g. created before the probe could see it), in which
//! case its children are reported among the roots.
//!
//! Reparenting arrives as a child-removed / child-added pair. A child-removed is
//! only honoured when it names the child's current parent, so the pair is also
//! correct if the toolkit delivers the two halves out of order.

use indexmap::{IndexMap, IndexSet};
use log::trace;
use std::collections::HashMap;

use crate::domain::ObjectId;

#[derive(Debug, Default)]
pub struct HierarchyTracker {
    /// Tracked object -> its parent, in insertion order
    nodes: IndexMap<ObjectId, Option<ObjectId>>,
    /// Parent -> children, in attach order
    children: HashMap<ObjectId, IndexSet<ObjectId>>,
}

impl HierarchyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly constructed object under `parent`
    ///
    /// An object that is already tracked is moved instead.
    pub fn object_added(&mut self, object: ObjectId, parent: Option<ObjectId>) {
        self.detach(object);
        self.attach(object, parent);
    }

    /// Forget a destroyed object
    ///
    /// Its children stay tracked and become roots until their own removal or
    /// reparenting arrives.
    pub fn object_removed(&mut self, object: ObjectId) -> bool {
        let tracked = self.nodes.contains_key(&object);
        if tracked {
            self.detach(object);
            self.nodes.shift_remove(&object);
        } else {
            trace!("ignoring removal of untracked object {object}");
        }
        if let Some(orphans) = self.children.remove(&object) {
            for orphan in orphans {
                if let Some(parent) = self.nodes.get_mut(&orphan) {
                    *parent = None;
                }
            }
        }
        tracked
    }

    /// `child` was detached from `parent`
    pub fn child_removed(&mut self, parent: ObjectId, child: ObjectId) {
        match self.nodes.get(&child) {
            Some(Some(current)) if *current == parent => self.detach(child),
            Some(_) => trace!("stale child-removed: {child} is not under {parent}"),
            None => trace!("child-removed for untracked object {child}"),
        }
    }

    /// `child` was attached to `parent`
    pub fn child_added(&mut self, parent: ObjectId, child: ObjectId) {
        self.detach(child);
        self.attach(child, Some(parent));
    }

    #[must_use]
    pub fn contains(&self, object: ObjectId) -> bool {
        self.nodes.contains_key(&object)
    }

    /// Parent of a tracked object; `None` for roots and untracked objects
    #[must_use]
    pub fn parent_of(&self, object: ObjectId) -> Option<ObjectId> {
        self.nodes.get(&object).copied().flatten()
    }

    /// Children attached to `parent`, in attach order
    pub fn children_of(&self, parent: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        self.children.get(&parent).into_iter().flat_map(|set| set.iter().copied())
    }

    /// Tracked objects without a tracked parent
    pub fn roots(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.nodes.iter().filter_map(|(&object, parent)| match parent {
            Some(parent) if self.nodes.contains_key(parent) => None,
            _ => Some(object),
        })
    }

    /// Every tracked `(object, parent)` pair in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, Option<ObjectId>)> + '_ {
        self.nodes.iter().map(|(&object, &parent)| (object, parent))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn attach(&mut self, object: ObjectId, parent: Option<ObjectId>) {
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().insert(object);
        }
        self.nodes.insert(object, parent);
    }

    /// Make `object` parentless, keeping it (and its subtree) tracked
    fn detach(&mut self, object: ObjectId) {
        let Some(slot) = self.nodes.get_mut(&object) else {
            return;
        };
        if let Some(parent) = slot.take() {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.shift_remove(&object);
                if siblings.is_empty() {
                    self.children.remove(&parent);
                }
            }
        }
    }
}
