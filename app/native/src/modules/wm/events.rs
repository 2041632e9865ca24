//! Events delivered by the display server.
//!
//! Only the kinds the window manager reacts to are modelled; everything else
//! arrives as [`DisplayEvent::Other`] and is ignored by the session.

use crate::error::ProtocolError;
use crate::modules::wm::display::{ConfigureRequest, Keycode, WindowId};

/// Which part of the input mapping a mapping notify refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingRequest {
    Modifier,
    Keyboard,
    Pointer,
}

/// An event read from the display connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A grabbed key was pressed.
    KeyPress { keycode: Keycode, state: u16 },

    /// A client asked to change its own geometry or stacking.
    ConfigureRequest(ConfigureRequest),

    /// A client window wants to become visible.
    MapRequest { window: WindowId },

    /// A window was unmapped.
    UnmapNotify { window: WindowId },

    /// A window was destroyed.
    DestroyNotify { window: WindowId },

    /// The keyboard, modifier or pointer mapping changed.
    MappingNotify { request: MappingRequest },

    /// The server rejected one of our requests.
    Error(ProtocolError),

    /// Any event kind the window manager does not handle.
    Other,
}

impl DisplayEvent {
    /// Short name used in logs and tracing spans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::KeyPress { .. } => "KeyPress",
            Self::ConfigureRequest(_) => "ConfigureRequest",
            Self::MapRequest { .. } => "MapRequest",
            Self::UnmapNotify { .. } => "UnmapNotify",
            Self::DestroyNotify { .. } => "DestroyNotify",
            Self::MappingNotify { .. } => "MappingNotify",
            Self::Error(_) => "Error",
            Self::Other => "Other",
        }
    }
}
