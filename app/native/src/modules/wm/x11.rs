//! X11 backend built on `x11rb`.
//!
//! Requests are sent unchecked. When the server rejects one, the error comes
//! back through the event queue and surfaces as [`DisplayEvent::Error`] on the
//! next read, so the session sees it at an iteration boundary.

use x11rb::CURRENT_TIME;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ReplyError};
use x11rb::protocol::xproto::{
    self, ChangeWindowAttributesAux, ConfigWindow, ConfigureRequestEvent, ConfigureWindowAux,
    ConnectionExt as _, EventMask, Grab, GrabMode, InputFocus, Mapping, ModMask,
};
use x11rb::protocol::{ErrorKind, Event};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::error::{ProtocolError, WmError, WmResult};
use crate::modules::wm::display::{
    ConfigureRequest, DisplayServer, FocusRevert, Keycode, Keysym, Rect, ScreenGeometry, StackMode,
    WindowId,
};
use crate::modules::wm::events::{DisplayEvent, MappingRequest};

/// Display server reached over an X11 connection.
pub struct X11Display<C: Connection = RustConnection> {
    conn: C,
    root: WindowId,
    geometry: ScreenGeometry,
    keymap: KeyboardMapping,
}

impl X11Display<RustConnection> {
    /// Connects to the display named by `$DISPLAY` and takes over window
    /// management on its default screen.
    ///
    /// # Errors
    ///
    /// Fails if the display cannot be opened or another window manager is
    /// already running.
    pub fn connect() -> WmResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        tracing::info!(screen = screen_num, "x11: connected");
        Self::with_connection(conn, screen_num)
    }
}

impl<C: Connection> X11Display<C> {
    /// Takes over window management on `screen_num` of an open connection.
    ///
    /// Selects substructure redirect and notify on the root window, which the
    /// server grants to one client only.
    ///
    /// # Errors
    ///
    /// Returns [`WmError::AnotherWmRunning`] if the redirect is refused, or a
    /// connection error.
    pub fn with_connection(conn: C, screen_num: usize) -> WmResult<Self> {
        let (root, geometry) = {
            let screen = conn
                .setup()
                .roots
                .get(screen_num)
                .ok_or(WmError::Connect(ConnectError::InvalidScreen))?;
            (
                screen.root,
                ScreenGeometry::new(screen.width_in_pixels, screen.height_in_pixels),
            )
        };

        let attributes = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);
        match conn.change_window_attributes(root, &attributes)?.check() {
            Ok(()) => {}
            Err(ReplyError::X11Error(err)) if err.error_kind == ErrorKind::Access => {
                return Err(WmError::AnotherWmRunning);
            }
            Err(err) => return Err(err.into()),
        }

        let keymap = KeyboardMapping::fetch(&conn)?;
        tracing::debug!(
            root,
            width = geometry.width,
            height = geometry.height,
            "x11: managing root window"
        );

        Ok(Self { conn, root, geometry, keymap })
    }
}

impl<C: Connection> DisplayServer for X11Display<C> {
    fn root(&self) -> WindowId { self.root }

    fn screen_geometry(&self) -> ScreenGeometry { self.geometry }

    fn keysym_to_keycode(&self, keysym: Keysym) -> Option<Keycode> { self.keymap.keycode_of(keysym) }

    fn grab_key(&mut self, modifiers: u16, keycode: Keycode) -> WmResult<()> {
        self.conn.grab_key(
            true,
            self.root,
            ModMask::from(modifiers),
            keycode,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
        )?;
        Ok(())
    }

    fn ungrab_all_keys(&mut self) -> WmResult<()> {
        self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY)?;
        Ok(())
    }

    fn map_window(&mut self, window: WindowId) -> WmResult<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn configure_window(&mut self, request: &ConfigureRequest) -> WmResult<()> {
        let mut aux = ConfigureWindowAux::new();
        aux.x = request.x;
        aux.y = request.y;
        aux.width = request.width;
        aux.height = request.height;
        aux.border_width = request.border_width;
        aux.sibling = request.sibling;
        aux.stack_mode = request.stack_mode.map(to_x_stack_mode);
        self.conn.configure_window(request.window, &aux)?;
        Ok(())
    }

    fn raise_window(&mut self, window: WindowId) -> WmResult<()> {
        let aux = ConfigureWindowAux::new().stack_mode(xproto::StackMode::ABOVE);
        self.conn.configure_window(window, &aux)?;
        Ok(())
    }

    fn move_resize_window(&mut self, window: WindowId, frame: Rect) -> WmResult<()> {
        let aux = ConfigureWindowAux::new()
            .x(frame.x)
            .y(frame.y)
            .width(frame.width)
            .height(frame.height);
        self.conn.configure_window(window, &aux)?;
        Ok(())
    }

    fn set_input_focus(&mut self, window: WindowId, revert: FocusRevert) -> WmResult<()> {
        let revert_to = match revert {
            FocusRevert::None => InputFocus::NONE,
            FocusRevert::PointerRoot => InputFocus::POINTER_ROOT,
            FocusRevert::Parent => InputFocus::PARENT,
        };
        self.conn.set_input_focus(revert_to, window, CURRENT_TIME)?;
        Ok(())
    }

    fn kill_client(&mut self, window: WindowId) -> WmResult<()> {
        self.conn.kill_client(window)?;
        Ok(())
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        self.keymap = KeyboardMapping::fetch(&self.conn)?;
        tracing::debug!("x11: keyboard mapping refreshed");
        Ok(())
    }

    fn sync(&mut self) -> WmResult<()> {
        self.conn.sync()?;
        Ok(())
    }

    fn next_event(&mut self) -> WmResult<DisplayEvent> {
        let event = self.conn.wait_for_event()?;
        Ok(translate_event(event))
    }
}

// ============================================================================
// Keyboard mapping
// ============================================================================

/// Snapshot of the server's keycode → keysyms table.
#[derive(Debug, Clone, Default)]
struct KeyboardMapping {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl KeyboardMapping {
    fn fetch<C: Connection>(conn: &C) -> WmResult<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode.saturating_sub(min_keycode).saturating_add(1);
        let reply = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;

        Ok(Self {
            min_keycode,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }

    /// Lowest keycode whose row lists `keysym` in any column.
    fn keycode_of(&self, keysym: Keysym) -> Option<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return None;
        }
        let row = self
            .keysyms
            .chunks(usize::from(self.keysyms_per_keycode))
            .position(|row| row.contains(&keysym))?;
        u8::try_from(row).ok()?.checked_add(self.min_keycode)
    }
}

// ============================================================================
// Event translation
// ============================================================================

fn translate_event(event: Event) -> DisplayEvent {
    match event {
        Event::KeyPress(e) => DisplayEvent::KeyPress {
            keycode: e.detail,
            state: u16::from(e.state),
        },
        Event::ConfigureRequest(e) => DisplayEvent::ConfigureRequest(configure_request(&e)),
        Event::MapRequest(e) => DisplayEvent::MapRequest { window: e.window },
        Event::UnmapNotify(e) => DisplayEvent::UnmapNotify { window: e.window },
        Event::DestroyNotify(e) => DisplayEvent::DestroyNotify { window: e.window },
        Event::MappingNotify(e) => DisplayEvent::MappingNotify {
            request: if e.request == Mapping::KEYBOARD {
                MappingRequest::Keyboard
            } else if e.request == Mapping::MODIFIER {
                MappingRequest::Modifier
            } else {
                MappingRequest::Pointer
            },
        },
        Event::Error(err) => DisplayEvent::Error(ProtocolError::from(&err)),
        _ => DisplayEvent::Other,
    }
}

/// Keeps only the fields the client flagged in its value mask.
fn configure_request(e: &ConfigureRequestEvent) -> ConfigureRequest {
    let mask = u16::from(e.value_mask);
    let flagged = |flag: ConfigWindow| mask & u16::from(flag) != 0;

    ConfigureRequest {
        window: e.window,
        x: flagged(ConfigWindow::X).then(|| i32::from(e.x)),
        y: flagged(ConfigWindow::Y).then(|| i32::from(e.y)),
        width: flagged(ConfigWindow::WIDTH).then(|| u32::from(e.width)),
        height: flagged(ConfigWindow::HEIGHT).then(|| u32::from(e.height)),
        border_width: flagged(ConfigWindow::BORDER_WIDTH).then(|| u32::from(e.border_width)),
        sibling: flagged(ConfigWindow::SIBLING).then_some(e.sibling),
        stack_mode: flagged(ConfigWindow::STACK_MODE).then(|| from_x_stack_mode(e.stack_mode)),
    }
}

fn from_x_stack_mode(mode: xproto::StackMode) -> StackMode {
    if mode == xproto::StackMode::BELOW {
        StackMode::Below
    } else if mode == xproto::StackMode::TOP_IF {
        StackMode::TopIf
    } else if mode == xproto::StackMode::BOTTOM_IF {
        StackMode::BottomIf
    } else if mode == xproto::StackMode::OPPOSITE {
        StackMode::Opposite
    } else {
        StackMode::Above
    }
}

const fn to_x_stack_mode(mode: StackMode) -> xproto::StackMode {
    match mode {
        StackMode::Above => xproto::StackMode::ABOVE,
        StackMode::Below => xproto::StackMode::BELOW,
        StackMode::TopIf => xproto::StackMode::TOP_IF,
        StackMode::BottomIf => xproto::StackMode::BOTTOM_IF,
        StackMode::Opposite => xproto::StackMode::OPPOSITE,
    }
}

#[cfg(test)]
mod tests {
    use x11rb::protocol::xproto::{
        DestroyNotifyEvent, MapRequestEvent, MappingNotifyEvent, UnmapNotifyEvent,
    };

    use super::*;

    fn mapping() -> KeyboardMapping {
        // Three keycodes starting at 8, two columns each.
        KeyboardMapping {
            min_keycode: 8,
            keysyms_per_keycode: 2,
            keysyms: vec![0x71, 0x51, 0x77, 0x57, 0xff0d, 0],
        }
    }

    #[test]
    fn test_keycode_lookup_searches_every_column() {
        let keymap = mapping();
        assert_eq!(keymap.keycode_of(0x71), Some(8));
        assert_eq!(keymap.keycode_of(0x57), Some(9));
        assert_eq!(keymap.keycode_of(0xff0d), Some(10));
        assert_eq!(keymap.keycode_of(0x78), None);
    }

    #[test]
    fn test_keycode_lookup_on_empty_mapping() {
        assert_eq!(KeyboardMapping::default().keycode_of(0x71), None);
    }

    #[test]
    fn test_configure_request_keeps_flagged_fields_only() {
        let event = ConfigureRequestEvent {
            window: 0x20,
            x: -5,
            y: 40,
            width: 640,
            height: 480,
            border_width: 1,
            sibling: 0x30,
            stack_mode: xproto::StackMode::TOP_IF,
            value_mask: ConfigWindow::Y | ConfigWindow::WIDTH | ConfigWindow::STACK_MODE,
            ..ConfigureRequestEvent::default()
        };

        let request = configure_request(&event);

        assert_eq!(request, ConfigureRequest {
            window: 0x20,
            y: Some(40),
            width: Some(640),
            stack_mode: Some(StackMode::TopIf),
            ..ConfigureRequest::default()
        });
    }

    #[test]
    fn test_stack_mode_conversion_is_symmetric() {
        for mode in [
            StackMode::Above,
            StackMode::Below,
            StackMode::TopIf,
            StackMode::BottomIf,
            StackMode::Opposite,
        ] {
            assert_eq!(from_x_stack_mode(to_x_stack_mode(mode)), mode);
        }
    }

    #[test]
    fn test_structural_events_translate() {
        let map = MapRequestEvent { window: 1, ..MapRequestEvent::default() };
        assert_eq!(translate_event(Event::MapRequest(map)), DisplayEvent::MapRequest { window: 1 });

        let unmap = UnmapNotifyEvent { window: 2, ..UnmapNotifyEvent::default() };
        assert_eq!(
            translate_event(Event::UnmapNotify(unmap)),
            DisplayEvent::UnmapNotify { window: 2 }
        );

        let destroy = DestroyNotifyEvent { window: 3, ..DestroyNotifyEvent::default() };
        assert_eq!(
            translate_event(Event::DestroyNotify(destroy)),
            DisplayEvent::DestroyNotify { window: 3 }
        );
    }

    #[test]
    fn test_mapping_notify_kinds() {
        let notify = |request| {
            translate_event(Event::MappingNotify(MappingNotifyEvent {
                request,
                ..MappingNotifyEvent::default()
            }))
        };

        assert_eq!(notify(Mapping::KEYBOARD), DisplayEvent::MappingNotify {
            request: MappingRequest::Keyboard
        });
        assert_eq!(notify(Mapping::MODIFIER), DisplayEvent::MappingNotify {
            request: MappingRequest::Modifier
        });
        assert_eq!(notify(Mapping::POINTER), DisplayEvent::MappingNotify {
            request: MappingRequest::Pointer
        });
    }
}
