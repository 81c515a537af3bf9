//! Text views of a snapshot
//!
//! Every view returns a `String` so the binary only prints and the formatting
//! stays testable.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::domain::{Descriptor, ObjectId};
use crate::export::Snapshot;
use crate::models::ConnectionRecord;

const WILDCARD: &str = "*";

/// One-paragraph overview: counts and root objects
#[must_use]
pub fn summary(snapshot: &Snapshot) -> String {
    let roots = snapshot.roots();
    let mut out = String::new();
    let _ = writeln!(out, "objects:     {}", snapshot.objects.len());
    let _ = writeln!(out, "tree roots:  {}", roots.len());
    let _ = writeln!(out, "connections: {}", snapshot.connections.len());
    out
}

/// Ownership tree below `root`, or below every root of the snapshot
#[must_use]
pub fn tree(snapshot: &Snapshot, root: Option<ObjectId>) -> String {
    let children = snapshot.children_index();
    let roots = root.map_or_else(|| snapshot.roots(), |r| vec![r]);
    let mut out = String::new();
    let mut visited = HashSet::new();
    for root in roots {
        let _ = writeln!(out, "{root}");
        write_children(&mut out, &children, root, "", &mut visited);
    }
    out
}

fn write_children(
    out: &mut String,
    index: &HashMap<ObjectId, Vec<ObjectId>>,
    parent: ObjectId,
    prefix: &str,
    visited: &mut HashSet<ObjectId>,
) {
    // A hand-edited snapshot may contain a cycle
    if !visited.insert(parent) {
        return;
    }
    let Some(children) = index.get(&parent) else {
        return;
    };
    for (i, &child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        let _ = writeln!(out, "{prefix}{branch}{child}");
        write_children(out, index, child, &format!("{prefix}{indent}"), visited);
    }
}

/// Connection table, restricted to edges touching `object` when given
#[must_use]
pub fn connections(snapshot: &Snapshot, object: Option<ObjectId>) -> String {
    let mut out = String::new();
    let rows = snapshot
        .connections
        .iter()
        .filter(|record| object.map_or(true, |o| record.involves(o)));
    for record in rows {
        let _ = writeln!(out, "{}", connection_line(record));
    }
    if out.is_empty() {
        out.push_str("(no connections)\n");
    }
    out
}

/// `sender signal -> receiver method [type]`, `*` for unknown slots
#[must_use]
pub fn connection_line(record: &ConnectionRecord) -> String {
    format!(
        "{} {} -> {} {} [{}]",
        object_or_wildcard(record.sender),
        descriptor_or_wildcard(record.signal.as_ref()),
        object_or_wildcard(record.receiver),
        descriptor_or_wildcard(record.method.as_ref()),
        record.connection_type
    )
}

/// Parent and direct children of one object
#[must_use]
pub fn object_detail(snapshot: &Snapshot, object: ObjectId) -> String {
    let mut out = String::new();
    let Some(entry) = snapshot.hierarchy.iter().find(|e| e.object == object) else {
        let _ = writeln!(out, "{object}: not in snapshot");
        return out;
    };
    let _ = writeln!(out, "object: {object}");
    let _ = writeln!(
        out,
        "parent: {}",
        entry.parent.map_or_else(|| "(none)".to_string(), |p| p.to_string())
    );
    let children = snapshot.children_index().remove(&object).unwrap_or_default();
    let _ = writeln!(out, "children: {}", children.len());
    for child in children {
        let _ = writeln!(out, "  {child}");
    }
    out
}

fn object_or_wildcard(object: Option<ObjectId>) -> String {
    object.map_or_else(|| WILDCARD.to_string(), |o| o.to_string())
}

fn descriptor_or_wildcard(descriptor: Option<&Descriptor>) -> &str {
    descriptor.map_or(WILDCARD, Descriptor::as_str)
}
