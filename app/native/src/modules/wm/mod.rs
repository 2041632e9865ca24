//! Stacking window manager.
//!
//! Every managed window is shown full screen. Windows are kept in a stack
//! ordered by recency and the front of the stack is always raised, resized
//! and focused.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      X11 server                              │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ x11rb events and errors
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   DisplayServer (x11)                        │
//! │  - Translates wire events into DisplayEvent                 │
//! │  - Caches the keyboard mapping                              │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ next_event()
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Session                               │
//! │  - Owns the window stack and key bindings                   │
//! │  - Dispatches each event to its handler                     │
//! │  - Key presses run bound actions                            │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ after every stack change
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Focus policy                            │
//! │  - Raise, fill the screen and focus the front window        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod actions;
pub mod display;
pub mod events;
pub mod focus;
pub mod keys;
pub mod session;
pub mod stack;
pub mod x11;

#[cfg(test)]
mod testing;

pub use actions::Action;
pub use display::DisplayServer;
pub use session::Session;
pub use x11::X11Display;
