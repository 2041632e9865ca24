//! Key bindings.
//!
//! Bindings are configured by key name (`"q"`, `"Return"`, `"F4"`) and
//! dispatched by keycode. Names are translated to keysyms once; keysyms are
//! translated to keycodes through the server's keyboard mapping, and that
//! step is repeated whenever the keyboard mapping changes.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::error::WmResult;
use crate::modules::wm::actions::Action;
use crate::modules::wm::display::{DisplayServer, Keycode, Keysym};

// Core protocol modifier bits (KeyButMask).
const SHIFT_MASK: u16 = 1 << 0;
const LOCK_MASK: u16 = 1 << 1;
const CONTROL_MASK: u16 = 1 << 2;
const MOD1_MASK: u16 = 1 << 3;
const MOD2_MASK: u16 = 1 << 4;
const MOD3_MASK: u16 = 1 << 5;
const MOD4_MASK: u16 = 1 << 6;
const MOD5_MASK: u16 = 1 << 7;

/// Lock states a grab must tolerate: none, Caps Lock, Num Lock (Mod2), both.
const LOCK_VARIANTS: [u16; 4] = [0, LOCK_MASK, MOD2_MASK, LOCK_MASK | MOD2_MASK];

/// The modifier held down for every binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Control,
    /// Usually Alt.
    Mod1,
    Mod3,
    /// Usually Super / the Windows key.
    #[default]
    Mod4,
    Mod5,
}

impl Modifier {
    /// The modifier's bit in a key event state.
    #[must_use]
    pub const fn mask(self) -> u16 {
        match self {
            Self::Shift => SHIFT_MASK,
            Self::Control => CONTROL_MASK,
            Self::Mod1 => MOD1_MASK,
            Self::Mod3 => MOD3_MASK,
            Self::Mod4 => MOD4_MASK,
            Self::Mod5 => MOD5_MASK,
        }
    }
}

/// Translates an X keysym name into its keysym value.
///
/// Accepts single printable Latin-1 characters and the common named keys from
/// `X11/keysymdef.h`.
#[must_use]
pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let code = u32::from(c);
        // Latin-1 keysyms equal their code point.
        return ((0x20..=0x7e).contains(&code) || (0xa0..=0xff).contains(&code)).then_some(code);
    }

    let keysym = match name {
        "space" => 0x0020,
        "exclam" => 0x0021,
        "apostrophe" => 0x0027,
        "comma" => 0x002c,
        "minus" => 0x002d,
        "period" => 0x002e,
        "slash" => 0x002f,
        "semicolon" => 0x003b,
        "equal" => 0x003d,
        "bracketleft" => 0x005b,
        "backslash" => 0x005c,
        "bracketright" => 0x005d,
        "grave" => 0x0060,
        "BackSpace" => 0xff08,
        "Tab" => 0xff09,
        "Return" => 0xff0d,
        "Pause" => 0xff13,
        "Escape" => 0xff1b,
        "Home" => 0xff50,
        "Left" => 0xff51,
        "Up" => 0xff52,
        "Right" => 0xff53,
        "Down" => 0xff54,
        "Page_Up" | "Prior" => 0xff55,
        "Page_Down" | "Next" => 0xff56,
        "End" => 0xff57,
        "Print" => 0xff61,
        "Insert" => 0xff63,
        "Menu" => 0xff67,
        "Delete" => 0xffff,
        _ => return function_key(name),
    };
    Some(keysym)
}

/// `F1` through `F12`.
fn function_key(name: &str) -> Option<Keysym> {
    let n: u32 = name.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&n).then(|| 0xffbe + n - 1)
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    keysym: Option<Keysym>,
    keycode: Option<Keycode>,
    action: Action,
}

/// The key binding table.
///
/// Entries are kept in lexicographic key-name order, which is also the order
/// in which actions fire when several names share a keycode.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    modifier: Modifier,
    bindings: Vec<Binding>,
}

impl KeyBindings {
    /// Builds the table. Names that are not valid keysym names are kept but
    /// never resolve.
    #[must_use]
    pub fn new(modifier: Modifier, keybindings: &BTreeMap<String, Action>) -> Self {
        let bindings = keybindings
            .iter()
            .map(|(name, &action)| {
                let keysym = keysym_from_name(name);
                if keysym.is_none() {
                    tracing::warn!(key = %name, %action, "keys: unknown key name");
                }
                Binding {
                    name: name.clone(),
                    keysym,
                    keycode: None,
                    action,
                }
            })
            .collect();

        Self { modifier, bindings }
    }

    #[must_use]
    pub const fn modifier(&self) -> Modifier { self.modifier }

    #[must_use]
    pub fn len(&self) -> usize { self.bindings.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }

    /// Recomputes every keycode from the display's current keyboard mapping.
    ///
    /// Returns the number of bindings that resolved.
    pub fn resolve<D: DisplayServer + ?Sized>(&mut self, display: &D) -> usize {
        let mut resolved = 0;
        for binding in &mut self.bindings {
            binding.keycode = binding.keysym.and_then(|keysym| display.keysym_to_keycode(keysym));
            match binding.keycode {
                Some(keycode) => {
                    tracing::trace!(key = %binding.name, keycode, "keys: resolved");
                    resolved += 1;
                }
                None => {
                    tracing::warn!(key = %binding.name, "keys: no keycode produces this key");
                }
            }
        }
        resolved
    }

    /// Replaces every grab on the root window with the resolved bindings.
    ///
    /// Each keycode is grabbed with the binding modifier under every lock
    /// variant so Caps Lock and Num Lock do not disable the bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if the display connection fails.
    pub fn grab<D: DisplayServer + ?Sized>(&self, display: &mut D) -> WmResult<()> {
        display.ungrab_all_keys()?;
        for keycode in self.bindings.iter().filter_map(|b| b.keycode) {
            for lock in LOCK_VARIANTS {
                display.grab_key(self.modifier.mask() | lock, keycode)?;
            }
        }
        Ok(())
    }

    /// Actions bound to `keycode`, in key-name order.
    #[must_use]
    pub fn actions_for(&self, keycode: Keycode) -> SmallVec<[Action; 2]> {
        self.bindings
            .iter()
            .filter(|b| b.keycode == Some(keycode))
            .map(|b| b.action)
            .collect()
    }

    /// The keycode `name` currently resolves to.
    #[must_use]
    pub fn keycode_of(&self, name: &str) -> Option<Keycode> {
        self.bindings.iter().find(|b| b.name == name).and_then(|b| b.keycode)
    }
}
