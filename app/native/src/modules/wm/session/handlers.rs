//! Per-event handlers.
//!
//! Each handler reacts to one event kind. The structural handlers (map,
//! unmap, destroy) end by re-applying focus so the server always shows the
//! front of the stack.

use crate::error::WmResult;
use crate::modules::wm::display::{ConfigureRequest, DisplayServer, Keycode, WindowId};
use crate::modules::wm::events::MappingRequest;
use crate::modules::wm::session::Session;

/// Fires every action bound to `keycode`, in key-name order.
///
/// # Errors
///
/// Returns an error if an action fails to reach the display.
pub fn on_key_press<D: DisplayServer>(session: &mut Session<D>, keycode: Keycode) -> WmResult<()> {
    let actions = session.bindings.actions_for(keycode);
    if actions.is_empty() {
        tracing::debug!(keycode, "keypress: no binding");
        return Ok(());
    }

    for action in actions {
        action.execute(session)?;
    }
    Ok(())
}

/// Forwards a client's configure request unchanged.
///
/// Geometry is not enforced here; the focus policy overrides it once the
/// window is mapped and at the front.
///
/// # Errors
///
/// Returns an error if the display connection fails.
pub fn on_configure_request<D: DisplayServer>(
    session: &mut Session<D>,
    request: &ConfigureRequest,
) -> WmResult<()> {
    tracing::trace!(
        window = request.window,
        fields = request.field_count(),
        "configure: passthrough"
    );
    session.display.configure_window(request)
}

/// Maps the window, puts it at the front of the stack and focuses it.
///
/// # Errors
///
/// Returns an error if the display connection fails.
pub fn on_map_request<D: DisplayServer>(session: &mut Session<D>, window: WindowId) -> WmResult<()> {
    session.display.map_window(window)?;
    if session.stack.push(window) {
        tracing::info!(window, managed = session.stack.len(), "map: managing window");
    } else {
        tracing::debug!(window, "map: window already managed");
    }
    session.refocus()
}

/// Forgets the window and focuses whatever is now at the front.
///
/// # Errors
///
/// Returns an error if the display connection fails.
pub fn on_unmap_notify<D: DisplayServer>(session: &mut Session<D>, window: WindowId) -> WmResult<()> {
    forget(session, window, "unmap")
}

/// Forgets the window and focuses whatever is now at the front.
///
/// # Errors
///
/// Returns an error if the display connection fails.
pub fn on_destroy_notify<D: DisplayServer>(
    session: &mut Session<D>,
    window: WindowId,
) -> WmResult<()> {
    forget(session, window, "destroy")
}

fn forget<D: DisplayServer>(
    session: &mut Session<D>,
    window: WindowId,
    reason: &'static str,
) -> WmResult<()> {
    if session.stack.pop(window) {
        tracing::info!(window, reason, managed = session.stack.len(), "stack: released window");
    }
    session.refocus()
}

/// Refreshes the keyboard mapping; for keyboard changes also re-resolves and
/// re-grabs every binding.
///
/// # Errors
///
/// Returns an error if the display connection fails.
pub fn on_mapping_notify<D: DisplayServer>(
    session: &mut Session<D>,
    request: MappingRequest,
) -> WmResult<()> {
    session.display.refresh_keyboard_mapping()?;
    if request == MappingRequest::Keyboard {
        session.init_keys()?;
    }
    Ok(())
}
