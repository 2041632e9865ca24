//! The window manager session and its event loop.
//!
//! A [`Session`] owns everything the window manager knows: the display
//! connection, the screen geometry captured at startup, the window stack and
//! the key binding table. Events are processed one at a time, each to
//! completion, on the calling thread.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► init_keys() ──► run() ──┬── quit action ──► Ok(())
//!                                   └── protocol / connection error ──► Err
//! ```
//!
//! Dropping the session closes the display connection.

pub mod handlers;

use crate::config::{Config, LaunchCommands};
use crate::error::{WmError, WmResult};
use crate::modules::wm::display::{DisplayServer, ScreenGeometry, WindowId};
use crate::modules::wm::events::DisplayEvent;
use crate::modules::wm::focus;
use crate::modules::wm::keys::KeyBindings;
use crate::modules::wm::stack::WindowStack;
use crate::utils::command::Launcher;

/// Window manager state for one display connection.
pub struct Session<D: DisplayServer> {
    display: D,
    root: WindowId,
    geometry: ScreenGeometry,
    stack: WindowStack,
    bindings: KeyBindings,
    commands: LaunchCommands,
    launcher: Box<dyn Launcher>,
    shutdown_requested: bool,
}

impl<D: DisplayServer> Session<D> {
    /// Creates a session with an empty stack. Key bindings are built but not
    /// grabbed until [`Self::init_keys`].
    pub fn new(display: D, config: &Config, launcher: Box<dyn Launcher>) -> Self {
        let root = display.root();
        let geometry = display.screen_geometry();
        tracing::debug!(root, width = geometry.width, height = geometry.height, "session: created");

        Self {
            display,
            root,
            geometry,
            stack: WindowStack::new(),
            bindings: KeyBindings::new(config.modifier, &config.keybindings),
            commands: config.commands.clone(),
            launcher,
            shutdown_requested: false,
        }
    }

    /// Resolves every binding against the current keyboard mapping and
    /// replaces all key grabs with them.
    ///
    /// # Errors
    ///
    /// Returns an error if the display connection fails.
    pub fn init_keys(&mut self) -> WmResult<()> {
        tracing::info!("grabbing keys");
        let resolved = self.bindings.resolve(&self.display);
        self.bindings.grab(&mut self.display)?;
        tracing::info!(resolved, total = self.bindings.len(), "grabbed keys");
        Ok(())
    }

    /// Runs the event loop until the quit action or a fatal error.
    ///
    /// # Errors
    ///
    /// Returns the first protocol error the server reports, or any connection
    /// failure.
    pub fn run(&mut self) -> WmResult<()> {
        while !self.shutdown_requested {
            self.display.sync()?;
            let event = self.display.next_event()?;
            self.handle_event(event)?;
        }
        tracing::info!("session: shutdown requested, leaving event loop");
        Ok(())
    }

    /// Reacts to a single event.
    ///
    /// # Errors
    ///
    /// Returns an error for [`DisplayEvent::Error`] and for connection failures
    /// while reacting.
    pub fn handle_event(&mut self, event: DisplayEvent) -> WmResult<()> {
        if event == DisplayEvent::Other {
            tracing::trace!("session: ignoring unhandled event");
            return Ok(());
        }

        let kind = event.kind();
        let _span = tracing::debug_span!("event", kind).entered();
        tracing::debug!("starting {kind}");

        match event {
            DisplayEvent::KeyPress { keycode, .. } => handlers::on_key_press(self, keycode)?,
            DisplayEvent::ConfigureRequest(request) => {
                handlers::on_configure_request(self, &request)?;
            }
            DisplayEvent::MapRequest { window } => handlers::on_map_request(self, window)?,
            DisplayEvent::UnmapNotify { window } => handlers::on_unmap_notify(self, window)?,
            DisplayEvent::DestroyNotify { window } => handlers::on_destroy_notify(self, window)?,
            DisplayEvent::MappingNotify { request } => handlers::on_mapping_notify(self, request)?,
            DisplayEvent::Error(error) => return Err(WmError::Protocol(error)),
            DisplayEvent::Other => {}
        }

        tracing::debug!("finished {kind}");
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub const fn root(&self) -> WindowId { self.root }

    #[must_use]
    pub const fn geometry(&self) -> ScreenGeometry { self.geometry }

    #[must_use]
    pub const fn stack(&self) -> &WindowStack { &self.stack }

    #[must_use]
    pub const fn bindings(&self) -> &KeyBindings { &self.bindings }

    #[must_use]
    pub const fn commands(&self) -> &LaunchCommands { &self.commands }

    #[must_use]
    pub const fn display(&self) -> &D { &self.display }

    pub const fn display_mut(&mut self) -> &mut D { &mut self.display }

    #[must_use]
    pub const fn is_shutdown_requested(&self) -> bool { self.shutdown_requested }

    /// Consumes the session, returning the display connection.
    pub fn into_display(self) -> D { self.display }

    // ========================================================================
    // Operations used by actions
    // ========================================================================

    /// Stops the loop after the current event.
    pub(crate) fn request_shutdown(&mut self) { self.shutdown_requested = true; }

    /// Kills the client owning the front window. No-op on an empty stack.
    ///
    /// The stack is left alone; the window leaves it when the server reports
    /// the unmap or destroy.
    pub(crate) fn close_focused_window(&mut self) -> WmResult<()> {
        let Some(window) = self.stack.front() else {
            tracing::debug!("session: close requested with no window");
            return Ok(());
        };
        tracing::info!(window, "session: killing client");
        self.display.kill_client(window)
    }

    /// Swaps the two front windows and shows the new front.
    pub(crate) fn swap_stack_head(&mut self) -> WmResult<()> {
        if !self.stack.swap_top_two() {
            tracing::debug!(windows = self.stack.len(), "session: nothing to swap");
            return Ok(());
        }
        self.refocus()
    }

    pub(crate) fn launch(&mut self, command_line: &str) { self.launcher.launch(command_line); }

    /// Re-applies the focus policy to the current stack.
    fn refocus(&mut self) -> WmResult<()> {
        focus::apply_focus(&mut self.display, &self.stack, self.geometry)?;
        Ok(())
    }
}
