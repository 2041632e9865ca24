//! Environment overrides.
//!
//! Only the launched command lines can be overridden. Empty or
//! whitespace-only values are ignored.

use super::Config;

/// Environment variable names.
pub mod keys {
    /// Command line for the terminal action.
    pub const TERMINAL: &str = "STACKWM_TERMINAL";
    /// Command line for the browser action.
    pub const BROWSER: &str = "STACKWM_BROWSER";
    /// Command line for the launcher action.
    pub const LAUNCHER: &str = "STACKWM_LAUNCHER";
    /// Extra colon-separated directories searched for launched binaries.
    pub const EXTRA_PATHS: &str = "STACKWM_EXTRA_PATHS";
}

/// Applies overrides read through `lookup` and returns how many were applied.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> usize {
    let mut applied = 0;
    let targets = [
        (keys::TERMINAL, &mut config.commands.terminal),
        (keys::BROWSER, &mut config.commands.browser),
        (keys::LAUNCHER, &mut config.commands.launcher),
    ];

    for (key, slot) in targets {
        let Some(value) = lookup(key) else { continue };
        let value = value.trim();
        if value.is_empty() {
            tracing::debug!(key, "config: ignoring empty override");
            continue;
        }
        tracing::debug!(key, value, "config: override");
        *slot = value.to_string();
        applied += 1;
    }

    applied
}
