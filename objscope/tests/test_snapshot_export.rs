mod common;

use std::io::Cursor;
use std::path::PathBuf;

use common::{active_probe, id, RecordingHost};
use objscope::config::ProbeConfig;
use objscope::domain::{ConnectEvent, ConnectionType, Descriptor, ExportError};
use objscope::export::{Snapshot, SNAPSHOT_FORMAT_VERSION};
use objscope::interpose::export_snapshot;
use objscope::probe::{Probe, ProbeSlot};

fn populated_probe() -> Probe {
    let (probe, host) = active_probe();
    probe.object_added(id(0x1));
    host.set_parent(0x2, 0x1);
    probe.object_added(id(0x2));
    probe.connection_added(ConnectEvent {
        sender: Some(id(0x2)),
        signal: Some(Descriptor::from("2destroyed()")),
        receiver: Some(id(0x1)),
        method: Some(Descriptor::from("1cleanup()")),
        connection_type: ConnectionType::from_raw(0x82),
    });
    probe
}

#[test]
fn test_snapshot_file_round_trip() {
    let probe = populated_probe();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("app.json");

    probe.snapshot().write_file(&path).expect("Failed to write snapshot");
    let loaded = Snapshot::from_file(&path).expect("Failed to read snapshot");

    assert_eq!(loaded, probe.snapshot());
    assert_eq!(loaded.roots(), vec![id(0x1)]);
    assert_eq!(loaded.children_index()[&id(0x1)], vec![id(0x2)]);
    assert!(loaded.connections[0].connection_type.unique);
}

#[test]
fn test_snapshot_json_layout() {
    let mut buffer = Vec::new();
    populated_probe().snapshot().write_to(&mut buffer).expect("Failed to export snapshot");

    let parsed: serde_json::Value = serde_json::from_slice(&buffer).expect("Invalid JSON");
    assert_eq!(parsed["version"], SNAPSHOT_FORMAT_VERSION);
    assert_eq!(parsed["objects"], serde_json::json!([1, 2]));
    // Roots carry no parent field
    assert!(parsed["hierarchy"][0].get("parent").is_none());
    assert_eq!(parsed["hierarchy"][1]["parent"], 1);
    assert_eq!(parsed["connections"][0]["signal"], "2destroyed()");
    assert_eq!(parsed["connections"][0]["connection_type"]["kind"], "queued");
}

#[test]
fn test_unsupported_version_is_rejected() {
    let mut document: serde_json::Value =
        serde_json::to_value(populated_probe().snapshot()).expect("Failed to serialize");
    document["version"] = serde_json::json!(SNAPSHOT_FORMAT_VERSION + 1);
    let bytes = serde_json::to_vec(&document).expect("Failed to serialize");

    let err = Snapshot::from_reader(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, ExportError::InvalidSnapshot(_)));
}

#[test]
fn test_malformed_document_is_rejected() {
    let err = Snapshot::from_reader(Cursor::new(b"{\"version\": 1".to_vec())).unwrap_err();
    assert!(matches!(err, ExportError::Json(_)));
}

#[test]
fn test_export_without_probe() {
    let slot = ProbeSlot::new();
    let err = export_snapshot(&slot, Some(PathBuf::from("/nonexistent"))).unwrap_err();
    assert!(matches!(err, ExportError::ProbeNotRunning));
}

#[test]
fn test_export_needs_a_path() {
    let slot = ProbeSlot::new();
    slot.get_or_construct(|| Probe::new(Box::new(RecordingHost::new()), ProbeConfig::default()));
    let err = export_snapshot(&slot, None).unwrap_err();
    assert!(matches!(err, ExportError::NoExportPath));
}

#[test]
fn test_export_falls_back_to_configured_path() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let configured = dir.path().join("configured.json");
    let config = ProbeConfig { export_path: Some(configured.clone()), ..ProbeConfig::default() };

    let slot = ProbeSlot::new();
    let probe = slot
        .get_or_construct(|| Probe::new(Box::new(RecordingHost::new()), config))
        .expect("constructed outside of construction");
    probe.startup();
    probe.delayed_init();
    probe.object_added(id(0x9));

    let written = export_snapshot(&slot, None).expect("Failed to export");
    assert_eq!(written, configured);
    let loaded = Snapshot::from_file(&configured).expect("Failed to read snapshot");
    assert_eq!(loaded.objects, vec![id(0x9)]);

    let explicit = dir.path().join("explicit.json");
    assert_eq!(export_snapshot(&slot, Some(explicit.clone())).unwrap(), explicit);
    assert!(explicit.exists());
}
