//! Probe core and singleton lifecycle
//!
//! - `context`: the [`Probe`] context object and its phase machine
//! - `slot`: the latched process-wide handle ([`ProbeSlot`])
//! - `pending`: objects seen before activation ([`PendingObjects`])
//! - `host`: the toolkit capabilities the probe consumes ([`Host`])

pub mod context;
pub mod host;
pub mod pending;
pub mod slot;

pub use context::{Phase, Probe, ProbeStats};
pub use host::Host;
pub use pending::PendingObjects;
pub use slot::ProbeSlot;
