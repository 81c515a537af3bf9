//! # Probe Context
//!
//! The coordinator between the toolkit's hooks and the bookkeeping models.
//!
//! ## Lifecycle
//!
//! ```text
//!   (empty slot) ──accessor──▶ Constructed ──startup()──▶ InitScheduled
//!                                   │                          │
//!                                   └──────delayed_init()──────┴──▶ Active
//! ```
//!
//! - **Constructed**: models and buffer exist, callbacks registered. Objects are
//!   buffered, connection events are dropped.
//! - **InitScheduled**: the structural observer is installed and `delayed_init` is
//!   queued on the host event loop. Still buffering.
//! - **Active**: the buffer has been replayed; every event is applied to the
//!   models synchronously. Terminal.
//!
//! ## Locking
//!
//! All mutable state sits behind one mutex. The only host call made with it held is
//! [`Host::parent_of`]; registration, scheduling and presentation launch happen
//! with the state unlocked, so the toolkit can re-enter the probe from them.

use log::{debug, error, info, trace};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::host::Host;
use super::pending::PendingObjects;
use crate::config::ProbeConfig;
use crate::domain::{
    CallbackCategory, ChildEvent, ChildEventKind, ConnectEvent, DisconnectEvent, LifecycleEvent,
    ObjectId,
};
use crate::export::Snapshot;
use crate::models::Models;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    InitScheduled,
    Active,
}

/// Counters for the probe's own diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub objects_added: usize,
    pub objects_removed: usize,
    /// Objects pushed into the pending buffer; a gross count, see `objects_excised`
    pub objects_buffered: usize,
    /// Pending entries dropped again because the object died before activation
    pub objects_excised: usize,
    pub objects_replayed: usize,
    /// Connect/disconnect events dropped because the probe was not active yet
    pub connections_missed: usize,
}

struct ProbeState {
    phase: Phase,
    pending: PendingObjects,
    models: Models,
    stats: ProbeStats,
}

/// Process-wide introspection context
pub struct Probe {
    host: Box<dyn Host>,
    config: ProbeConfig,
    state: Mutex<ProbeState>,
}

impl Probe {
    /// Allocate the probe without touching the toolkit
    #[must_use]
    pub fn new(host: Box<dyn Host>, config: ProbeConfig) -> Self {
        Self {
            host,
            config,
            state: Mutex::new(ProbeState {
                phase: Phase::Constructed,
                pending: PendingObjects::new(),
                models: Models::default(),
                stats: ProbeStats::default(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    #[must_use]
    pub fn stats(&self) -> ProbeStats {
        self.state().stats
    }

    /// Objects waiting for replay
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state().pending.len()
    }

    /// Register the connect/disconnect callbacks with the toolkit
    ///
    /// Called by [`super::ProbeSlot`] right after the instance is latched.
    /// A refused registration is logged; object tracking carries on without it.
    pub fn register_callbacks(&self) {
        for category in [CallbackCategory::Connect, CallbackCategory::Disconnect] {
            match self.host.register_callback(category) {
                Ok(()) => debug!("registered {category} callback"),
                Err(e) => error!("{e}, connections will not be tracked"),
            }
        }
    }

    /// The toolkit finished its own startup
    ///
    /// Installs the structural observer and queues [`Probe::delayed_init`]. Only
    /// the first call has an effect.
    pub fn startup(&self) {
        {
            let mut state = self.state();
            if state.phase != Phase::Constructed {
                debug!("startup already handled ({:?})", state.phase);
                return;
            }
            state.phase = Phase::InitScheduled;
        }

        if let Err(e) = self.host.install_child_observer() {
            error!("{e}, reparenting will not be tracked");
        }
        self.host.schedule_delayed_init();
        debug!("delayed init scheduled");
    }

    /// Deferred part of initialization, run from the host event loop
    ///
    /// Switches to [`Phase::Active`] and replays the pending buffer in arrival order
    /// under one lock, then launches the presentation surface. Later calls are
    /// no-ops.
    pub fn delayed_init(&self) {
        {
            let mut state = self.state();
            if state.phase == Phase::Active {
                debug!("delayed init already ran");
                return;
            }
            state.phase = Phase::Active;

            let ProbeState { pending, models, stats, .. } = &mut *state;
            let replay = pending.drain().unwrap_or_default();
            stats.objects_replayed = replay.len();
            for object in replay {
                self.add_to_models(models, object);
            }
            info!(
                "probe active: {} objects replayed, {} connection events missed before activation",
                stats.objects_replayed, stats.connections_missed
            );
        }

        if self.config.launch_presentation {
            self.host.launch_presentation();
        } else {
            debug!("presentation disabled by configuration");
        }
    }

    /// Dispatch one hook call to the matching entry point
    pub fn lifecycle_event(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Startup => self.startup(),
            LifecycleEvent::ObjectAdded(object) => self.object_added(object),
            LifecycleEvent::ObjectRemoved(object) => self.object_removed(object),
        }
    }

    /// The toolkit constructed `object`
    pub fn object_added(&self, object: ObjectId) {
        let mut state = self.state();
        if state.phase == Phase::Active {
            let ProbeState { models, stats, .. } = &mut *state;
            stats.objects_added += 1;
            self.add_to_models(models, object);
        } else if state.pending.push(object) {
            state.stats.objects_buffered += 1;
        }
    }

    /// The toolkit is destroying `object`
    ///
    /// Removes it from every model, including each connection naming it as sender or
    /// as receiver. Before activation it is excised from the pending buffer instead.
    pub fn object_removed(&self, object: ObjectId) {
        let mut state = self.state();
        if state.phase != Phase::Active {
            let excised = state.pending.excise(object);
            state.stats.objects_excised += excised;
            trace!("excised {object} from pending buffer ({excised} entries)");
            return;
        }

        let ProbeState { models, stats, .. } = &mut *state;
        stats.objects_removed += 1;
        models.objects.object_removed(object);
        models.hierarchy.object_removed(object);
        let (as_sender, as_receiver) = models.connections.object_removed(object);
        if as_sender + as_receiver > 0 {
            trace!("purged {as_sender} outgoing, {as_receiver} incoming connections of {object}");
        }
    }

    /// A connection was established
    pub fn connection_added(&self, event: ConnectEvent) {
        let mut state = self.state();
        if state.phase != Phase::Active {
            state.stats.connections_missed += 1;
            return;
        }
        state.models.connections.connection_added(event.into());
    }

    /// A connection was torn down; `None` fields are wildcards
    pub fn connection_removed(&self, event: &DisconnectEvent) {
        let mut state = self.state();
        if state.phase != Phase::Active {
            state.stats.connections_missed += 1;
            return;
        }
        state.models.connections.connection_removed(event);
    }

    /// A child was attached to or detached from a parent
    pub fn child_event(&self, event: ChildEvent) {
        let mut state = self.state();
        if state.phase != Phase::Active {
            return;
        }
        let hierarchy = &mut state.models.hierarchy;
        match event.kind {
            ChildEventKind::Removed => hierarchy.child_removed(event.parent, event.child),
            ChildEventKind::Added => hierarchy.child_added(event.parent, event.child),
        }
    }

    /// Read access to the models
    ///
    /// The state stays locked for the duration of `read`, which must not call back
    /// into the probe.
    pub fn with_models<R>(&self, read: impl FnOnce(&Models) -> R) -> R {
        read(&self.state().models)
    }

    /// Serializable copy of the current models
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.with_models(Snapshot::capture)
    }

    fn add_to_models(&self, models: &mut Models, object: ObjectId) {
        let parent = self.host.parent_of(object);
        models.objects.object_added(object);
        models.hierarchy.object_added(object, parent);
    }

    fn state(&self) -> MutexGuard<'_, ProbeState> {
        // Poisoning is ignored: a panicking reader leaves the models untouched
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
