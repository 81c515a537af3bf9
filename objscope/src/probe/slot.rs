//! Latched global handle to the one probe instance
//!
//! Construction may call into the toolkit (the host bridge lookup runs adapter
//! code), and the toolkit may answer by firing a lifecycle hook on the same
//! thread. Such a hook must not wait for the construction it is nested in. While
//! construction is in progress the slot queues the hook's event instead and
//! replays the queue, in arrival order, as soon as the instance is latched.

use log::{debug, trace};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use super::context::Probe;
use crate::domain::LifecycleEvent;

/// Hook calls seen while the probe was being constructed
struct Construction {
    in_progress: bool,
    early: Vec<LifecycleEvent>,
}

/// Holds at most one [`Probe`] for the life of the process
pub struct ProbeSlot {
    cell: OnceLock<Probe>,
    construction: Mutex<Construction>,
}

impl ProbeSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            construction: Mutex::new(Construction { in_progress: false, early: Vec::new() }),
        }
    }

    /// The probe, if it has been constructed
    pub fn get(&self) -> Option<&Probe> {
        self.cell.get()
    }

    /// The probe, constructing it with `construct` on first use
    ///
    /// Returns `None` when called from inside `construct`: the instance does not
    /// exist yet and waiting for it would never return.
    pub fn get_or_construct(&self, construct: impl FnOnce() -> Probe) -> Option<&Probe> {
        self.enter(None, construct)
    }

    /// Hand `event` to the probe, constructing it with `construct` on first use
    ///
    /// An event arriving from inside `construct` is queued and delivered right
    /// after the instance is latched; `None` is returned in that case.
    pub fn deliver(
        &self,
        event: LifecycleEvent,
        construct: impl FnOnce() -> Probe,
    ) -> Option<&Probe> {
        self.enter(Some(event), construct)
    }

    fn enter(
        &self,
        event: Option<LifecycleEvent>,
        construct: impl FnOnce() -> Probe,
    ) -> Option<&Probe> {
        if let Some(probe) = self.cell.get() {
            return Some(Self::apply(probe, event));
        }

        {
            let mut construction = self.construction();
            if construction.in_progress {
                if let Some(event) = event {
                    trace!("probe under construction, queueing {event:?}");
                    construction.early.push(event);
                }
                return None;
            }
            // Construction may have finished between the check above and the lock
            if let Some(probe) = self.cell.get() {
                drop(construction);
                return Some(Self::apply(probe, event));
            }
            construction.in_progress = true;
        }

        // Only this call can reach the initializer: every other one sees
        // `in_progress` and queues.
        let probe = self.cell.get_or_init(construct);
        debug!("probe constructed");
        Self::apply(probe, event);

        // Taken under the same lock that clears the flag, so no queued event is lost
        let early = {
            let mut construction = self.construction();
            construction.in_progress = false;
            std::mem::take(&mut construction.early)
        };
        if !early.is_empty() {
            debug!("replaying {} hook calls made during construction", early.len());
        }
        for event in early {
            probe.lifecycle_event(event);
        }

        probe.register_callbacks();
        Some(probe)
    }

    fn apply(probe: &Probe, event: Option<LifecycleEvent>) -> &Probe {
        if let Some(event) = event {
            probe.lifecycle_event(event);
        }
        probe
    }

    fn construction(&self) -> MutexGuard<'_, Construction> {
        self.construction.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProbeSlot {
    fn default() -> Self {
        Self::new()
    }
}
