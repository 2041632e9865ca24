//! Focus policy.
//!
//! Exactly one window is visible at a time: the front of the stack, raised,
//! stretched over the whole screen and holding input focus. [`apply_focus`]
//! runs after every structural change to the stack and is the only place
//! that brings the server's view in line with the stack.

use crate::error::WmResult;
use crate::modules::wm::display::{DisplayServer, FocusRevert, ScreenGeometry, WindowId};
use crate::modules::wm::stack::WindowStack;

/// Shows the front window fullscreen and gives it input focus.
///
/// Issues nothing for an empty stack. Returns the window that was focused.
///
/// # Errors
///
/// Returns an error if the display connection fails while sending the requests.
pub fn apply_focus<D: DisplayServer + ?Sized>(
    display: &mut D,
    stack: &WindowStack,
    geometry: ScreenGeometry,
) -> WmResult<Option<WindowId>> {
    let Some(window) = stack.front() else {
        tracing::trace!("focus: stack empty, nothing to focus");
        return Ok(None);
    };

    display.raise_window(window)?;
    display.move_resize_window(window, geometry.fullscreen_frame())?;
    // PointerRoot keeps focus from sticking to a window that is about to vanish.
    display.set_input_focus(window, FocusRevert::PointerRoot)?;

    tracing::debug!(window, "focus: focused front window");
    Ok(Some(window))
}
