//! The display server as seen by the window manager.
//!
//! [`DisplayServer`] is the complete command surface the core consumes. The
//! production implementation talks X11 through `x11rb`
//! ([`X11Display`](super::x11::X11Display)); tests substitute a recorder.

use crate::error::WmResult;
use crate::modules::wm::events::DisplayEvent;

/// Server-assigned window handle.
pub type WindowId = u32;

/// Physical key code as reported by the server.
pub type Keycode = u8;

/// Symbolic key value (see `X11/keysymdef.h`).
pub type Keysym = u32;

/// Size of the single managed screen, captured once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub width: u16,
    pub height: u16,
}

impl ScreenGeometry {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self { Self { width, height } }

    /// The frame every managed window is forced into: the whole screen at the origin.
    #[must_use]
    pub const fn fullscreen_frame(self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width as u32,
            height: self.height as u32,
        }
    }
}

/// A window frame in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Stacking mode requested alongside a configure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMode {
    Above,
    Below,
    TopIf,
    BottomIf,
    Opposite,
}

/// A client's request to change its own geometry or stacking.
///
/// Only the fields the client flagged in its value mask are `Some`; the rest
/// must not be sent back to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: WindowId,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub sibling: Option<WindowId>,
    pub stack_mode: Option<StackMode>,
}

impl ConfigureRequest {
    /// Number of fields the client asked to change.
    #[must_use]
    pub fn field_count(&self) -> usize {
        [
            self.x.is_some(),
            self.y.is_some(),
            self.width.is_some(),
            self.height.is_some(),
            self.border_width.is_some(),
            self.sibling.is_some(),
            self.stack_mode.is_some(),
        ]
        .into_iter()
        .filter(|flagged| *flagged)
        .count()
    }
}

/// Where input focus goes if the focused window disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRevert {
    None,
    PointerRoot,
    Parent,
}

/// The display-server operations the window manager issues.
///
/// Commands are fire-and-forget: a request the server rejects is reported
/// later as [`DisplayEvent::Error`], not as the return value of the call.
/// The `Err` path of these methods is reserved for a broken connection.
pub trait DisplayServer {
    /// The root window of the managed screen.
    fn root(&self) -> WindowId;

    /// Dimensions of the managed screen.
    fn screen_geometry(&self) -> ScreenGeometry;

    /// Translates a keysym into the keycode that currently produces it.
    fn keysym_to_keycode(&self, keysym: Keysym) -> Option<Keycode>;

    /// Grabs `keycode` with exactly `modifiers` held, globally on the root window.
    fn grab_key(&mut self, modifiers: u16, keycode: Keycode) -> WmResult<()>;

    /// Releases every key grab on the root window.
    fn ungrab_all_keys(&mut self) -> WmResult<()>;

    fn map_window(&mut self, window: WindowId) -> WmResult<()>;

    /// Applies the flagged fields of a client configure request verbatim.
    fn configure_window(&mut self, request: &ConfigureRequest) -> WmResult<()>;

    /// Raises `window` above all its siblings.
    fn raise_window(&mut self, window: WindowId) -> WmResult<()>;

    fn move_resize_window(&mut self, window: WindowId, frame: Rect) -> WmResult<()>;

    fn set_input_focus(&mut self, window: WindowId, revert: FocusRevert) -> WmResult<()>;

    /// Destroys the client that owns `window`.
    fn kill_client(&mut self, window: WindowId) -> WmResult<()>;

    /// Re-reads the server keyboard mapping used by [`Self::keysym_to_keycode`].
    fn refresh_keyboard_mapping(&mut self) -> WmResult<()>;

    /// Flushes outstanding requests and waits until the server has processed them.
    fn sync(&mut self) -> WmResult<()>;

    /// Blocks until the next event arrives.
    fn next_event(&mut self) -> WmResult<DisplayEvent>;
}
