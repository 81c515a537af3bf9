//! Toolkit capabilities the probe consumes
//!
//! In the preloaded library this is backed by the adapter's C function table
//! ([`crate::interpose::FfiHost`]); tests drive the probe with an in-memory host.

use crate::domain::{CallbackCategory, ObjectId, ProbeError};

/// The host toolkit, as seen from the probe
///
/// Every method is called on the event-loop thread. [`Host::parent_of`] is called
/// while the probe's state is locked and must not construct or destroy objects;
/// the other methods are only called with the state unlocked and may re-enter the
/// probe.
pub trait Host: Send + Sync {
    /// Register the probe's callback for `category` with the connection machinery
    ///
    /// # Errors
    /// Returns [`ProbeError::CallbackRegistration`] if the toolkit refuses it.
    fn register_callback(&self, category: CallbackCategory) -> Result<(), ProbeError>;

    /// Install the application-wide filter delivering child added/removed events
    ///
    /// # Errors
    /// Returns [`ProbeError::ObserverInstall`] if no filter could be installed.
    fn install_child_observer(&self) -> Result<(), ProbeError>;

    /// Queue [`crate::probe::Probe::delayed_init`] for the next event-loop turn
    fn schedule_delayed_init(&self);

    /// Current parent of `object`
    fn parent_of(&self, object: ObjectId) -> Option<ObjectId>;

    /// Construct and show the presentation surface
    fn launch_presentation(&self);
}
