use super::keysyms::Keysym;
use crate::bar::ClickRegion;
use crate::client::TagMask;
use crate::layout::LayoutKind;
use serde::Deserialize;
use x11rb::protocol::xproto::{ButtonIndex, KeyButMask, ModMask};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum KeyAction {
    Spawn,
    KillClient,
    FocusStack,
    FocusNth,
    IncNMaster,
    SetMFact,
    Zoom,
    View,
    ToggleView,
    Tag,
    ToggleTag,
    SetLayout,
    ToggleFloating,
    ToggleFullScreen,
    ToggleBar,
    FocusMonitor,
    TagMonitor,
    WinView,
    MoveMouse,
    ResizeMouse,
    Quit,
    Restart,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    None,
    Int(i32),
    Float(f32),
    Tags(TagMask),
    Layout(LayoutKind),
    Str(String),
    Array(Vec<String>),
}

impl Arg {
    pub const fn none() -> Self {
        Arg::None
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Arg::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Arg::Float(value) => Some(*value),
            Arg::Int(value) => Some(*value as f32),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<TagMask> {
        match self {
            Arg::Tags(mask) => Some(*mask),
            _ => None,
        }
    }

    pub fn as_layout(&self) -> Option<LayoutKind> {
        match self {
            Arg::Layout(layout) => Some(*layout),
            _ => None,
        }
    }

    /// Command line for `Spawn`: a bare string goes through `sh -c`.
    pub fn as_command(&self) -> Option<Vec<String>> {
        match self {
            Arg::Str(command) => Some(vec!["sh".into(), "-c".into(), command.clone()]),
            Arg::Array(argv) if !argv.is_empty() => Some(argv.clone()),
            _ => None,
        }
    }
}

pub fn modifiers_to_mask(modifiers: &[KeyButMask]) -> u16 {
    modifiers
        .iter()
        .fold(0u16, |acc, &modifier| acc | u16::from(modifier))
}

/// Strips lock modifiers and anything that is not a real modifier key, so
/// bindings match regardless of Caps Lock and Num Lock.
pub fn clean_mask(state: u16, numlock: u16) -> u16 {
    let real_modifiers = u16::from(
        ModMask::SHIFT
            | ModMask::CONTROL
            | ModMask::M1
            | ModMask::M2
            | ModMask::M3
            | ModMask::M4
            | ModMask::M5,
    );
    state & !(numlock | u16::from(ModMask::LOCK)) & real_modifiers
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub modifiers: u16,
    pub keysym: Keysym,
    pub action: KeyAction,
    pub arg: Arg,
}

impl KeyBinding {
    pub fn new(modifiers: &[KeyButMask], keysym: Keysym, action: KeyAction, arg: Arg) -> Self {
        Self {
            modifiers: modifiers_to_mask(modifiers),
            keysym,
            action,
            arg,
        }
    }

    pub fn matches(&self, keysym: Keysym, state: u16, numlock: u16) -> bool {
        self.keysym == keysym && clean_mask(self.modifiers, numlock) == clean_mask(state, numlock)
    }
}

#[derive(Debug, Clone)]
pub struct ButtonBinding {
    pub click: ClickRegion,
    pub modifiers: u16,
    pub button: u8,
    pub action: KeyAction,
    pub arg: Arg,
}

impl ButtonBinding {
    pub fn new(
        click: ClickRegion,
        modifiers: &[KeyButMask],
        button: ButtonIndex,
        action: KeyAction,
        arg: Arg,
    ) -> Self {
        Self {
            click,
            modifiers: modifiers_to_mask(modifiers),
            button: u8::from(button),
            action,
            arg,
        }
    }

    pub fn matches(&self, click: ClickRegion, button: u8, state: u16, numlock: u16) -> bool {
        self.click == click
            && self.button == button
            && clean_mask(self.modifiers, numlock) == clean_mask(state, numlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keysyms;

    const NUMLOCK: u16 = 1 << 4;

    #[test]
    fn test_clean_mask_drops_locks() {
        let state = u16::from(KeyButMask::MOD4 | KeyButMask::LOCK) | NUMLOCK;
        assert_eq!(clean_mask(state, NUMLOCK), u16::from(KeyButMask::MOD4));
    }

    #[test]
    fn test_clean_mask_drops_pointer_buttons() {
        let state = u16::from(KeyButMask::SHIFT | KeyButMask::BUTTON1);
        assert_eq!(clean_mask(state, NUMLOCK), u16::from(KeyButMask::SHIFT));
    }

    #[test]
    fn test_key_binding_requires_exact_modifiers() {
        let binding = KeyBinding::new(
            &[KeyButMask::MOD4],
            keysyms::XK_J,
            KeyAction::FocusStack,
            Arg::Int(1),
        );
        let mod4 = u16::from(KeyButMask::MOD4);
        let mod4_shift = u16::from(KeyButMask::MOD4 | KeyButMask::SHIFT);

        assert!(binding.matches(keysyms::XK_J, mod4, NUMLOCK));
        assert!(binding.matches(keysyms::XK_J, mod4 | NUMLOCK, NUMLOCK));
        assert!(!binding.matches(keysyms::XK_J, mod4_shift, NUMLOCK));
        assert!(!binding.matches(keysyms::XK_K, mod4, NUMLOCK));
    }

    #[test]
    fn test_spawn_argument_forms() {
        assert_eq!(
            Arg::Str("dmenu_run".into()).as_command(),
            Some(vec!["sh".into(), "-c".into(), "dmenu_run".into()])
        );
        assert_eq!(
            Arg::Array(vec!["st".into()]).as_command(),
            Some(vec!["st".into()])
        );
        assert_eq!(Arg::Array(vec![]).as_command(), None);
        assert_eq!(Arg::None.as_command(), None);
    }
}
