//! Configuration for stackwm.
//!
//! There is no configuration file. The defaults below are the configuration;
//! the launched command lines can be overridden from the environment at
//! startup (see [`env`]). Nothing changes once the session is running.

pub mod env;

use std::collections::BTreeMap;

use crate::modules::wm::actions::Action;
use crate::modules::wm::keys::Modifier;

/// Command lines started by the launch actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommands {
    pub terminal: String,
    pub browser: String,
    pub launcher: String,
}

impl Default for LaunchCommands {
    fn default() -> Self {
        Self {
            terminal: "stterm".to_string(),
            browser: "firefox".to_string(),
            launcher: "dmenu_run".to_string(),
        }
    }
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Modifier that must be held for every binding.
    pub modifier: Modifier,

    /// Key name to action. Ordered by key name.
    pub keybindings: BTreeMap<String, Action>,

    pub commands: LaunchCommands,
}

impl Default for Config {
    fn default() -> Self {
        let keybindings = [
            ("q", Action::Quit),
            ("w", Action::CloseWindow),
            ("x", Action::SwapStackHead),
            ("c", Action::StartTerminal),
            ("b", Action::StartBrowser),
            ("p", Action::StartLauncher),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), action))
        .collect();

        Self {
            modifier: Modifier::Mod4,
            keybindings,
            commands: LaunchCommands::default(),
        }
    }
}

impl Config {
    /// Returns the defaults with environment overrides applied.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        let applied = env::apply_overrides(&mut config, |key| std::env::var(key).ok());
        if applied > 0 {
            tracing::info!(overrides = applied, "config: applied environment overrides");
        }
        config
    }

    /// The key name bound to `action`, if any.
    #[must_use]
    pub fn key_for(&self, action: Action) -> Option<&str> {
        self.keybindings
            .iter()
            .find_map(|(key, &bound)| (bound == action).then_some(key.as_str()))
    }
}
