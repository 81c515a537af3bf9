//! Interposition layer: everything the toolkit calls directly
//!
//! - `hooks`: exported `qt_*` symbols shadowing the toolkit's hook points
//! - `chain`: next-in-chain resolution for those hooks (`dlsym(RTLD_NEXT)`)
//! - `callbacks`: connect/disconnect callbacks, child filter, deferred init
//! - `bridge`: [`FfiHost`], the toolkit adapter's function table as a [`crate::probe::Host`]
//!
//! The single process-wide probe lives in [`PROBE`]; hooks reach it through
//! [`deliver`].

pub mod bridge;
pub mod callbacks;
pub mod chain;
pub mod hooks;

pub use bridge::FfiHost;
pub use chain::HookChain;
pub use hooks::export_snapshot;

use log::{error, info};

use crate::config::ProbeConfig;
use crate::domain::{LifecycleEvent, ProbeError};
use crate::logging;
use crate::probe::{Probe, ProbeSlot};

/// The probe instance of this process
///
/// Every entry point is expected on the toolkit's event-loop thread.
pub static PROBE: ProbeSlot = ProbeSlot::new();

/// Hand a hook call to the process-wide probe, constructing it on first use
///
/// A hook fired by the toolkit while the probe is still being constructed is
/// queued by [`PROBE`] and applied once construction completes.
pub fn deliver(event: LifecycleEvent) {
    PROBE.deliver(event, construct);
}

/// Build the probe from the environment and the adapter's bridge
///
/// Aborts if the toolkit adapter cannot be found.
fn construct() -> Probe {
    let config = ProbeConfig::from_env();
    logging::init(&config);
    let host = FfiHost::resolve().unwrap_or_else(|e| fatal(&e));
    info!("objscope {} attached to pid {}", env!("CARGO_PKG_VERSION"), std::process::id());
    Probe::new(Box::new(host), config)
}

/// Report an unrecoverable initialization error and stop the process
///
/// Unwinding out of a hook would cross the C ABI, so this aborts instead.
pub(crate) fn fatal(err: &ProbeError) -> ! {
    error!("fatal: {err}");
    eprintln!("objscope: fatal: {err}");
    std::process::abort()
}
