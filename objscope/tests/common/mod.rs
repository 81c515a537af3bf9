//! In-memory toolkit used to drive the probe from integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use objscope::config::ProbeConfig;
use objscope::domain::{CallbackCategory, ObjectId, ProbeError};
use objscope::probe::{Host, Probe};

/// Everything the probe asked of the toolkit
#[derive(Debug, Default)]
pub struct HostLog {
    pub registered: Vec<CallbackCategory>,
    pub observer_installed: usize,
    pub deferred_posted: usize,
    pub presentations: usize,
    pub parent_lookups: Vec<ObjectId>,
    /// Current parent of each object, as the toolkit would report it
    pub parents: HashMap<ObjectId, ObjectId>,
    pub reject_registration: bool,
}

/// A [`Host`] that records calls; clones share the same log
#[derive(Clone, Default)]
pub struct RecordingHost {
    log: Arc<Mutex<HostLog>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, HostLog> {
        self.log.lock().unwrap()
    }

    pub fn set_parent(&self, child: usize, parent: usize) {
        self.log().parents.insert(ObjectId(child), ObjectId(parent));
    }

    pub fn clear_parent(&self, child: usize) {
        self.log().parents.remove(&ObjectId(child));
    }
}

impl Host for RecordingHost {
    fn register_callback(&self, category: CallbackCategory) -> Result<(), ProbeError> {
        let mut log = self.log();
        if log.reject_registration {
            return Err(ProbeError::CallbackRegistration(category));
        }
        log.registered.push(category);
        Ok(())
    }

    fn install_child_observer(&self) -> Result<(), ProbeError> {
        self.log().observer_installed += 1;
        Ok(())
    }

    fn schedule_delayed_init(&self) {
        self.log().deferred_posted += 1;
    }

    fn parent_of(&self, object: ObjectId) -> Option<ObjectId> {
        let mut log = self.log();
        log.parent_lookups.push(object);
        log.parents.get(&object).copied()
    }

    fn launch_presentation(&self) {
        self.log().presentations += 1;
    }
}

/// A constructed probe over a fresh recording host
pub fn probe() -> (Probe, RecordingHost) {
    probe_with(ProbeConfig::default())
}

pub fn probe_with(config: ProbeConfig) -> (Probe, RecordingHost) {
    let host = RecordingHost::new();
    let probe = Probe::new(Box::new(host.clone()), config);
    probe.register_callbacks();
    (probe, host)
}

/// A probe that has already gone through startup and delayed init
pub fn active_probe() -> (Probe, RecordingHost) {
    let (probe, host) = probe();
    probe.startup();
    probe.delayed_init();
    (probe, host)
}

pub fn id(raw: usize) -> ObjectId {
    ObjectId(raw)
}

pub fn objects(probe: &Probe) -> Vec<usize> {
    probe.with_models(|m| m.objects().iter().map(|o| o.0).collect())
}
