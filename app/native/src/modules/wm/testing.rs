//! Test doubles for the display server and the launcher.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use x11rb::errors::ConnectionError;

use crate::error::{WmError, WmResult};
use crate::modules::wm::display::{
    ConfigureRequest, DisplayServer, FocusRevert, Keycode, Keysym, Rect, ScreenGeometry, WindowId,
};
use crate::modules::wm::events::DisplayEvent;
use crate::utils::command::Launcher;

pub const ROOT: WindowId = 0x100;

/// A request the window manager sent to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GrabKey(u16, Keycode),
    UngrabAllKeys,
    Map(WindowId),
    Configure(ConfigureRequest),
    Raise(WindowId),
    MoveResize(WindowId, Rect),
    SetFocus(WindowId, FocusRevert),
    KillClient(WindowId),
    RefreshKeyboardMapping,
}

impl Command {
    /// The window this command acts on, if any.
    pub const fn target(&self) -> Option<WindowId> {
        match self {
            Self::Map(w)
            | Self::Raise(w)
            | Self::MoveResize(w, _)
            | Self::SetFocus(w, _)
            | Self::KillClient(w) => Some(*w),
            Self::Configure(request) => Some(request.window),
            Self::GrabKey(..) | Self::UngrabAllKeys | Self::RefreshKeyboardMapping => None,
        }
    }
}

/// Display that records every command and replays scripted events.
///
/// Once the scripted events run out, [`DisplayServer::next_event`] fails as if
/// the connection dropped, so a running loop always terminates.
pub struct RecordingDisplay {
    pub geometry: ScreenGeometry,
    pub commands: Vec<Command>,
    pub events: VecDeque<DisplayEvent>,
    pub keymap: HashMap<Keysym, Keycode>,
    /// Keymap installed by the next `refresh_keyboard_mapping`.
    pub pending_keymap: Option<HashMap<Keysym, Keycode>>,
    pub syncs: usize,
}

impl RecordingDisplay {
    pub fn new(geometry: ScreenGeometry) -> Self {
        Self {
            geometry,
            commands: Vec::new(),
            events: VecDeque::new(),
            keymap: us_keymap(),
            pending_keymap: None,
            syncs: 0,
        }
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = DisplayEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn clear(&mut self) { self.commands.clear(); }

    pub fn grabs(&self) -> Vec<(u16, Keycode)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::GrabKey(mods, code) => Some((*mods, *code)),
                _ => None,
            })
            .collect()
    }
}

/// Keycodes of a common evdev US layout for the keys the default bindings use.
pub fn us_keymap() -> HashMap<Keysym, Keycode> {
    HashMap::from([
        (u32::from(b'q'), 24),
        (u32::from(b'w'), 25),
        (u32::from(b'c'), 54),
        (u32::from(b'x'), 53),
        (u32::from(b'b'), 56),
        (u32::from(b'p'), 33),
    ])
}

impl DisplayServer for RecordingDisplay {
    fn root(&self) -> WindowId { ROOT }

    fn screen_geometry(&self) -> ScreenGeometry { self.geometry }

    fn keysym_to_keycode(&self, keysym: Keysym) -> Option<Keycode> {
        self.keymap.get(&keysym).copied()
    }

    fn grab_key(&mut self, modifiers: u16, keycode: Keycode) -> WmResult<()> {
        self.commands.push(Command::GrabKey(modifiers, keycode));
        Ok(())
    }

    fn ungrab_all_keys(&mut self) -> WmResult<()> {
        self.commands.push(Command::UngrabAllKeys);
        Ok(())
    }

    fn map_window(&mut self, window: WindowId) -> WmResult<()> {
        self.commands.push(Command::Map(window));
        Ok(())
    }

    fn configure_window(&mut self, request: &ConfigureRequest) -> WmResult<()> {
        self.commands.push(Command::Configure(*request));
        Ok(())
    }

    fn raise_window(&mut self, window: WindowId) -> WmResult<()> {
        self.commands.push(Command::Raise(window));
        Ok(())
    }

    fn move_resize_window(&mut self, window: WindowId, frame: Rect) -> WmResult<()> {
        self.commands.push(Command::MoveResize(window, frame));
        Ok(())
    }

    fn set_input_focus(&mut self, window: WindowId, revert: FocusRevert) -> WmResult<()> {
        self.commands.push(Command::SetFocus(window, revert));
        Ok(())
    }

    fn kill_client(&mut self, window: WindowId) -> WmResult<()> {
        self.commands.push(Command::KillClient(window));
        Ok(())
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        self.commands.push(Command::RefreshKeyboardMapping);
        if let Some(keymap) = self.pending_keymap.take() {
            self.keymap = keymap;
        }
        Ok(())
    }

    fn sync(&mut self) -> WmResult<()> {
        self.syncs += 1;
        Ok(())
    }

    fn next_event(&mut self) -> WmResult<DisplayEvent> {
        self.events
            .pop_front()
            .ok_or(WmError::Connection(ConnectionError::UnknownError))
    }
}

/// Launcher that only remembers what it was asked to start.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub launched: Rc<RefCell<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn launched(&self) -> Vec<String> { self.launched.borrow().clone() }
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, command_line: &str) {
        self.launched.borrow_mut().push(command_line.to_string());
    }
}
