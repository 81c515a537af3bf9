//! Probe configuration
//!
//! The probe runs inside someone else's process and has no command line, so it is
//! configured through environment variables read once at construction:
//!
//! | Variable          | Effect                                           | Default |
//! |-------------------|--------------------------------------------------|---------|
//! | `OBJSCOPE_LOG`    | `env_logger` filter for the probe's own logging  | `info`  |
//! | `OBJSCOPE_NO_UI`  | Skip launching the presentation surface          | unset   |
//! | `OBJSCOPE_EXPORT` | Snapshot path used when no explicit path is given | unset   |

use std::path::PathBuf;

pub const ENV_LOG: &str = "OBJSCOPE_LOG";
pub const ENV_NO_UI: &str = "OBJSCOPE_NO_UI";
pub const ENV_EXPORT: &str = "OBJSCOPE_EXPORT";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Filter directives passed to `env_logger`
    pub log_filter: String,
    /// Whether delayed init constructs and shows the presentation surface
    pub launch_presentation: bool,
    /// Where `objscope_export_snapshot(NULL)` writes
    pub export_path: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            launch_presentation: true,
            export_path: None,
        }
    }
}

impl ProbeConfig {
    /// Read the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_filter = lookup(ENV_LOG)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_filter);

        let launch_presentation = !lookup(ENV_NO_UI).as_deref().is_some_and(is_truthy);

        let export_path = lookup(ENV_EXPORT).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        Self { log_filter, launch_presentation, export_path }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
