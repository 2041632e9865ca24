//! The window stack.
//!
//! Front-to-back order of every managed window. The front element is the one
//! the focus policy shows fullscreen. Membership changes only through the
//! session's map, unmap and destroy handlers; order changes only through
//! [`WindowStack::swap_top_two`].

use std::collections::VecDeque;

use crate::modules::wm::display::WindowId;

/// Ordered set of managed windows, front first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowStack {
    windows: VecDeque<WindowId>,
}

impl WindowStack {
    #[must_use]
    pub const fn new() -> Self { Self { windows: VecDeque::new() } }

    /// Inserts `window` at the front.
    ///
    /// Returns `false` and leaves the stack untouched if the window is already
    /// managed.
    pub fn push(&mut self, window: WindowId) -> bool {
        if self.contains(window) {
            return false;
        }
        self.windows.push_front(window);
        true
    }

    /// Removes `window` from wherever it is. Returns whether it was present.
    pub fn pop(&mut self, window: WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|&w| w != window);
        self.windows.len() != before
    }

    /// The window that should be visible and focused.
    #[must_use]
    pub fn front(&self) -> Option<WindowId> { self.windows.front().copied() }

    /// Exchanges the first two windows. No-op with fewer than two.
    pub fn swap_top_two(&mut self) -> bool {
        if self.windows.len() < 2 {
            return false;
        }
        self.windows.swap(0, 1);
        true
    }

    #[must_use]
    pub fn contains(&self, window: WindowId) -> bool { self.windows.contains(&window) }

    #[must_use]
    pub fn len(&self) -> usize { self.windows.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.windows.is_empty() }

    /// Windows front to back.
    pub fn iter(&self) -> impl Iterator<Item = WindowId> + '_ { self.windows.iter().copied() }
}
