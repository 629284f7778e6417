pub mod bar;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod keyboard;
pub mod layout;
pub mod monitor;
pub mod rules;
pub mod size_hints;
pub mod state;
pub mod window_manager;
pub mod window_system;
pub mod x11;

pub mod prelude {
    pub use crate::bar::ClickRegion;
    pub use crate::keyboard::{Arg, ButtonBinding, KeyAction, KeyBinding, keysyms};
    pub use crate::layout::LayoutKind;
    pub use crate::rules::Rule;
    pub use crate::{ColorScheme, Config, TagConfig};
    pub use x11rb::protocol::xproto::{ButtonIndex, KeyButMask};
}

use crate::keyboard::{ButtonBinding, KeyBinding};
use crate::layout::LayoutKind;
use crate::rules::Rule;

#[derive(Debug, Clone)]
pub struct Config {
    // Appearance
    pub border_width: u32,
    pub border_focused: u32,
    pub border_unfocused: u32,
    pub border_urgent: u32,
    pub font: String,

    // Bar
    pub show_bar: bool,
    pub top_bar: bool,
    /// Bar height in pixels, 0 derives it from the font.
    pub bar_height: i32,
    pub scheme_normal: ColorScheme,
    pub scheme_selected: ColorScheme,
    pub scheme_urgent: ColorScheme,

    // Layout
    pub master_factor: f32,
    pub master_count: u32,
    pub resize_hints: bool,
    pub snap: u32,
    pub center_dialogs: bool,

    // Tags
    pub tags: Vec<TagConfig>,
    /// Layout pair used while every tag is in view.
    pub all_tags_layouts: [LayoutKind; 2],

    pub rules: Vec<Rule>,
    pub keybindings: Vec<KeyBinding>,
    pub buttons: Vec<ButtonBinding>,
    pub autostart: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: u32,
    pub background: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagConfig {
    pub name: String,
    pub layout: LayoutKind,
}

impl TagConfig {
    pub fn new(name: &str, layout: LayoutKind) -> Self {
        Self {
            name: name.to_string(),
            layout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        use crate::bar::ClickRegion;
        use crate::keyboard::{Arg, KeyAction, keysyms};
        use x11rb::protocol::xproto::{ButtonIndex, KeyButMask};

        const MODKEY: KeyButMask = KeyButMask::MOD4;
        const SHIFT: KeyButMask = KeyButMask::SHIFT;
        const CONTROL: KeyButMask = KeyButMask::CONTROL;

        const TERMINAL: &str = "st";
        let terminal = || Arg::Array(vec![TERMINAL.to_string()]);

        let mut keybindings = vec![
            KeyBinding::new(&[MODKEY], keysyms::XK_R, KeyAction::Spawn, Arg::Str("dmenu_run".to_string())),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_RETURN, KeyAction::Spawn, terminal()),
            KeyBinding::new(&[MODKEY], keysyms::XK_B, KeyAction::ToggleBar, Arg::None),
            KeyBinding::new(&[MODKEY], keysyms::XK_J, KeyAction::FocusStack, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], keysyms::XK_K, KeyAction::FocusStack, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], keysyms::XK_I, KeyAction::IncNMaster, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], keysyms::XK_D, KeyAction::IncNMaster, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_H, KeyAction::SetMFact, Arg::Float(-0.01)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_L, KeyAction::SetMFact, Arg::Float(0.01)),
            KeyBinding::new(&[MODKEY], keysyms::XK_RETURN, KeyAction::Zoom, Arg::None),
            KeyBinding::new(&[MODKEY], keysyms::XK_TAB, KeyAction::View, Arg::None),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_C, KeyAction::KillClient, Arg::None),
            KeyBinding::new(&[MODKEY], keysyms::XK_T, KeyAction::SetLayout, Arg::Layout(LayoutKind::Tile)),
            KeyBinding::new(&[MODKEY], keysyms::XK_F, KeyAction::SetLayout, Arg::Layout(LayoutKind::Floating)),
            KeyBinding::new(&[MODKEY], keysyms::XK_M, KeyAction::SetLayout, Arg::Layout(LayoutKind::Monocle)),
            KeyBinding::new(&[MODKEY], keysyms::XK_S, KeyAction::SetLayout, Arg::Layout(LayoutKind::BottomStack)),
            KeyBinding::new(
                &[MODKEY],
                keysyms::XK_H,
                KeyAction::SetLayout,
                Arg::Layout(LayoutKind::BottomStackHorizontal),
            ),
            KeyBinding::new(&[MODKEY], keysyms::XK_G, KeyAction::SetLayout, Arg::Layout(LayoutKind::GaplessGrid)),
            KeyBinding::new(&[MODKEY], keysyms::XK_SPACE, KeyAction::SetLayout, Arg::None),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_SPACE, KeyAction::ToggleFloating, Arg::None),
            KeyBinding::new(&[MODKEY], keysyms::XK_0, KeyAction::View, Arg::Tags(!0)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_0, KeyAction::Tag, Arg::Tags(!0)),
            KeyBinding::new(&[MODKEY], keysyms::XK_O, KeyAction::WinView, Arg::None),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_F, KeyAction::ToggleFullScreen, Arg::None),
            KeyBinding::new(&[MODKEY], keysyms::XK_COMMA, KeyAction::FocusMonitor, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], keysyms::XK_PERIOD, KeyAction::FocusMonitor, Arg::Int(1)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_COMMA, KeyAction::TagMonitor, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_PERIOD, KeyAction::TagMonitor, Arg::Int(1)),
            KeyBinding::new(&[MODKEY, SHIFT], keysyms::XK_Q, KeyAction::Quit, Arg::None),
            KeyBinding::new(&[MODKEY, CONTROL, SHIFT], keysyms::XK_Q, KeyAction::Restart, Arg::None),
        ];

        for (index, keysym) in (keysyms::XK_F1..=keysyms::XK_F9).enumerate() {
            keybindings.push(KeyBinding::new(
                &[MODKEY],
                keysym,
                KeyAction::FocusNth,
                Arg::Int(index as i32 + 1),
            ));
        }

        for (index, keysym) in (keysyms::XK_1..=keysyms::XK_9).enumerate() {
            let mask = Arg::Tags(1 << index);
            keybindings.extend([
                KeyBinding::new(&[MODKEY], keysym, KeyAction::View, mask.clone()),
                KeyBinding::new(&[MODKEY, CONTROL], keysym, KeyAction::ToggleView, mask.clone()),
                KeyBinding::new(&[MODKEY, SHIFT], keysym, KeyAction::Tag, mask.clone()),
                KeyBinding::new(&[MODKEY, CONTROL, SHIFT], keysym, KeyAction::ToggleTag, mask),
            ]);
        }

        let buttons = vec![
            ButtonBinding::new(ClickRegion::LayoutSymbol, &[], ButtonIndex::M1, KeyAction::SetLayout, Arg::None),
            ButtonBinding::new(
                ClickRegion::LayoutSymbol,
                &[],
                ButtonIndex::M3,
                KeyAction::SetLayout,
                Arg::Layout(LayoutKind::Monocle),
            ),
            ButtonBinding::new(ClickRegion::WindowTitle, &[], ButtonIndex::M2, KeyAction::Zoom, Arg::None),
            ButtonBinding::new(ClickRegion::StatusText, &[], ButtonIndex::M2, KeyAction::Spawn, terminal()),
            ButtonBinding::new(ClickRegion::ClientWindow, &[MODKEY], ButtonIndex::M1, KeyAction::MoveMouse, Arg::None),
            ButtonBinding::new(
                ClickRegion::ClientWindow,
                &[MODKEY],
                ButtonIndex::M2,
                KeyAction::ToggleFloating,
                Arg::None,
            ),
            ButtonBinding::new(
                ClickRegion::ClientWindow,
                &[MODKEY],
                ButtonIndex::M3,
                KeyAction::ResizeMouse,
                Arg::None,
            ),
            ButtonBinding::new(ClickRegion::TagBar, &[], ButtonIndex::M1, KeyAction::View, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[], ButtonIndex::M3, KeyAction::ToggleView, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[MODKEY], ButtonIndex::M1, KeyAction::Tag, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[MODKEY], ButtonIndex::M3, KeyAction::ToggleTag, Arg::None),
        ];

        let tags = (1..=9)
            .map(|num| {
                let layout = match num {
                    1 | 9 => LayoutKind::Monocle,
                    3 => LayoutKind::GaplessGrid,
                    _ => LayoutKind::Tile,
                };
                TagConfig::new(&num.to_string(), layout)
            })
            .collect();

        Self {
            border_width: 2,
            border_focused: 0x6dade3,
            border_unfocused: 0x444444,
            border_urgent: 0xff0000,
            font: "fixed".to_string(),
            show_bar: true,
            top_bar: false,
            bar_height: 0,
            scheme_normal: ColorScheme {
                foreground: 0xbbbbbb,
                background: 0x1a1b26,
            },
            scheme_selected: ColorScheme {
                foreground: 0xeeeeee,
                background: 0x005577,
            },
            scheme_urgent: ColorScheme {
                foreground: 0x1a1b26,
                background: 0xff0000,
            },
            master_factor: 0.55,
            master_count: 1,
            resize_hints: false,
            snap: 32,
            center_dialogs: false,
            tags,
            all_tags_layouts: [LayoutKind::GaplessGrid, LayoutKind::Monocle],
            rules: vec![Rule {
                class: Some("Gimp".to_string()),
                is_floating: true,
                ..Rule::default()
            }],
            keybindings,
            buttons,
            autostart: vec![],
        }
    }
}
