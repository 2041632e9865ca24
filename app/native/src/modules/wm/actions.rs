//! Actions that key bindings trigger.

use std::fmt;

use crate::error::WmResult;
use crate::modules::wm::display::DisplayServer;
use crate::modules::wm::session::Session;

/// Everything a key binding can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Stop the event loop and close the display connection.
    Quit,
    /// Kill the client that owns the focused window.
    CloseWindow,
    /// Swap the two frontmost windows and refocus.
    SwapStackHead,
    /// Launch the configured terminal.
    StartTerminal,
    /// Launch the configured browser.
    StartBrowser,
    /// Launch the configured application launcher.
    StartLauncher,
}

impl Action {
    pub const ALL: [Self; 6] = [
        Self::Quit,
        Self::CloseWindow,
        Self::SwapStackHead,
        Self::StartTerminal,
        Self::StartBrowser,
        Self::StartLauncher,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::CloseWindow => "close-window",
            Self::SwapStackHead => "swap-stack-head",
            Self::StartTerminal => "start-terminal",
            Self::StartBrowser => "start-browser",
            Self::StartLauncher => "start-launcher",
        }
    }

    /// Runs the action against `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the display connection fails while issuing requests.
    pub fn execute<D: DisplayServer>(self, session: &mut Session<D>) -> WmResult<()> {
        tracing::debug!(action = self.name(), "action: executing");
        match self {
            Self::Quit => {
                session.request_shutdown();
                Ok(())
            }
            Self::CloseWindow => session.close_focused_window(),
            Self::SwapStackHead => session.swap_stack_head(),
            Self::StartTerminal => {
                let command = session.commands().terminal.clone();
                session.launch(&command);
                Ok(())
            }
            Self::StartBrowser => {
                let command = session.commands().browser.clone();
                session.launch(&command);
                Ok(())
            }
            Self::StartLauncher => {
                let command = session.commands().launcher.clone();
                session.launch(&command);
                Ok(())
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_are_unique() {
        let mut names: Vec<&str> = Action::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Action::ALL.len());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::SwapStackHead.to_string(), "swap-stack-head");
        assert_eq!(format!("{}", Action::Quit), "quit");
    }
}
