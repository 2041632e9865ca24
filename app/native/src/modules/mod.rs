//! Feature modules.
//!
//! - [`wm`] - The stacking window manager

pub mod wm;
