//! Stackwm - a minimal stacking window manager for X11.
//!
//! Every managed window fills the screen. The most recently mapped window sits
//! at the front of the stack and owns the input focus; keyboard shortcuts
//! close it, swap it with the one behind it, or launch programs.

pub mod config;
pub mod error;
pub mod modules;
pub mod utils;

use crate::config::Config;
use crate::error::WmResult;
use crate::modules::wm::{DisplayServer, Session, X11Display};
use crate::utils::command::ProcessLauncher;

/// Connects to the display and runs the window manager until it quits.
///
/// # Errors
///
/// Returns an error if the display cannot be opened, another window manager
/// owns the screen, the server reports a protocol error, or the connection is
/// lost.
pub fn run() -> WmResult<()> {
    let config = Config::load();
    let display = X11Display::connect()?;

    let mut session = Session::new(display, &config, Box::new(ProcessLauncher));
    session.init_keys()?;
    session.display_mut().sync()?;
    tracing::info!("setup complete");

    session.run()?;
    tracing::info!("display connection closed");
    Ok(())
}
