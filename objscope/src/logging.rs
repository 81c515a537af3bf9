//! Logger setup for the in-process probe

use log::debug;

use crate::config::ProbeConfig;

/// Install `env_logger` with the configured filter
///
/// The host application may already own the global logger; in that case the
/// probe logs through it and this is a no-op.
pub fn init(config: &ProbeConfig) {
    let installed = env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .format_timestamp_millis()
        .try_init();
    if installed.is_err() {
        debug!("logger already installed, keeping the application's");
    }
}
