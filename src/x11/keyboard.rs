use crate::errors::WmResult;
use crate::keyboard::keysyms::{self, Keysym};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, GetKeyboardMappingReply, GetModifierMappingReply, Keycode};

/// Keysym table of the server, indexed by keycode.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMapping {
    min_keycode: Keycode,
    keysyms_per_keycode: usize,
    keysyms: Vec<Keysym>,
    numlock_mask: u16,
}

impl KeyboardMapping {
    pub fn query<C: Connection>(connection: &C) -> WmResult<Self> {
        let setup = connection.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;

        let mapping = connection.get_keyboard_mapping(min_keycode, count)?.reply()?;
        let modifiers = connection.get_modifier_mapping()?.reply()?;
        Ok(Self::from_replies(min_keycode, &mapping, &modifiers))
    }

    fn from_replies(
        min_keycode: Keycode,
        mapping: &GetKeyboardMappingReply,
        modifiers: &GetModifierMappingReply,
    ) -> Self {
        let mut keyboard = Self {
            min_keycode,
            keysyms_per_keycode: mapping.keysyms_per_keycode as usize,
            keysyms: mapping.keysyms.clone(),
            numlock_mask: 0,
        };
        keyboard.numlock_mask = keyboard.find_numlock_mask(&modifiers.keycodes);
        keyboard
    }

    /// First keysym of the keycode, ignoring shift levels.
    pub fn keysym(&self, keycode: Keycode) -> Keysym {
        if self.keysyms_per_keycode == 0 || keycode < self.min_keycode {
            return 0;
        }
        let index = (keycode - self.min_keycode) as usize * self.keysyms_per_keycode;
        self.keysyms.get(index).copied().unwrap_or(0)
    }

    /// Every keycode that produces `keysym` on any level.
    pub fn keycodes(&self, keysym: Keysym) -> Vec<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return Vec::new();
        }
        self.keysyms
            .chunks(self.keysyms_per_keycode)
            .enumerate()
            .filter(|(_, syms)| syms.contains(&keysym))
            .map(|(index, _)| self.min_keycode + index as Keycode)
            .collect()
    }

    pub fn numlock_mask(&self) -> u16 {
        self.numlock_mask
    }

    /// `keycodes` lists eight modifiers with an equal number of keycodes each.
    fn find_numlock_mask(&self, keycodes: &[Keycode]) -> u16 {
        let numlock = self.keycodes(keysyms::XK_NUM_LOCK);
        let per_modifier = keycodes.len() / 8;
        if per_modifier == 0 {
            return 0;
        }

        keycodes
            .chunks(per_modifier)
            .position(|codes| codes.iter().any(|code| *code != 0 && numlock.contains(code)))
            .map_or(0, |modifier| 1 << modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> KeyboardMapping {
        let mapping = GetKeyboardMappingReply {
            sequence: 0,
            keysyms_per_keycode: 2,
            keysyms: vec![
                keysyms::XK_J, 0x004a,
                keysyms::XK_RETURN, 0,
                keysyms::XK_NUM_LOCK, 0,
            ],
        };
        let mut keycodes = vec![0; 16];
        // Num Lock on Mod2.
        keycodes[8] = 10;
        let modifiers = GetModifierMappingReply {
            sequence: 0,
            length: 0,
            keycodes,
        };
        KeyboardMapping::from_replies(8, &mapping, &modifiers)
    }

    #[test]
    fn test_keycode_to_keysym() {
        let keyboard = mapping();
        assert_eq!(keyboard.keysym(8), keysyms::XK_J);
        assert_eq!(keyboard.keysym(9), keysyms::XK_RETURN);
        assert_eq!(keyboard.keysym(42), 0);
        assert_eq!(keyboard.keysym(3), 0);
    }

    #[test]
    fn test_keysym_to_keycodes() {
        let keyboard = mapping();
        assert_eq!(keyboard.keycodes(keysyms::XK_RETURN), vec![9]);
        assert!(keyboard.keycodes(keysyms::XK_K).is_empty());
    }

    #[test]
    fn test_numlock_detection() {
        assert_eq!(mapping().numlock_mask(), 1 << 4);
    }
}
