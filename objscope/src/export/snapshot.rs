use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::domain::{ExportError, ObjectId};
use crate::models::{ConnectionRecord, Models};

/// Bumped when the document layout changes incompatibly
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// One node of the ownership tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub object: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<ObjectId>,
}

/// Point-in-time copy of the probe's models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Live objects in construction order
    pub objects: Vec<ObjectId>,
    /// Ownership tree, one entry per tracked object
    pub hierarchy: Vec<HierarchyEntry>,
    pub connections: Vec<ConnectionRecord>,
}

impl Snapshot {
    #[must_use]
    pub fn capture(models: &Models) -> Self {
        Self {
            version: SNAPSHOT_FORMAT_VERSION,
            objects: models.objects().iter().collect(),
            hierarchy: models
                .hierarchy()
                .iter()
                .map(|(object, parent)| HierarchyEntry { object, parent })
                .collect(),
            connections: models.connections().iter().cloned().collect(),
        }
    }

    /// Write as pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying writer fails
    pub fn write_to(&self, mut writer: impl Write) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write to `path`, replacing any existing file
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        self.write_to(BufWriter::new(File::create(path)?))?;
        info!(
            "snapshot written to {}: {} objects, {} connections",
            path.display(),
            self.objects.len(),
            self.connections.len()
        );
        Ok(())
    }

    /// Parse a snapshot document
    ///
    /// # Errors
    /// Returns an error for malformed JSON or an unsupported format version
    pub fn from_reader(reader: impl Read) -> Result<Self, ExportError> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        if snapshot.version != SNAPSHOT_FORMAT_VERSION {
            return Err(ExportError::InvalidSnapshot(format!(
                "unsupported format version {} (expected {SNAPSHOT_FORMAT_VERSION})",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    /// Load a snapshot written by [`Snapshot::write_file`]
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Objects whose parent is absent or not part of the snapshot
    #[must_use]
    pub fn roots(&self) -> Vec<ObjectId> {
        let tracked: HashSet<ObjectId> =
            self.hierarchy.iter().map(|entry| entry.object).collect();
        self.hierarchy
            .iter()
            .filter(|entry| !matches!(entry.parent, Some(parent) if tracked.contains(&parent)))
            .map(|entry| entry.object)
            .collect()
    }

    /// Parent → children index, children in snapshot order
    #[must_use]
    pub fn children_index(&self) -> HashMap<ObjectId, Vec<ObjectId>> {
        let mut index: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
        for entry in &self.hierarchy {
            if let Some(parent) = entry.parent {
                index.entry(parent).or_default().push(entry.object);
            }
        }
        index
    }
}
