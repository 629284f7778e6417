use crate::bar::ClickRegion;
use crate::client::TagMask;
use crate::errors::ConfigError;
use crate::keyboard::keysyms::{self, Keysym};
use crate::keyboard::handlers::modifiers_to_mask;
use crate::keyboard::{Arg, ButtonBinding, KeyAction, KeyBinding};
use crate::layout::LayoutKind;
use crate::rules::Rule;
use crate::{ColorScheme, Config, TagConfig};
use serde::Deserialize;
use std::collections::HashMap;
use x11rb::protocol::xproto::KeyButMask;

pub const MAX_TAGS: usize = 31;
pub const MASTER_FACTOR_RANGE: std::ops::RangeInclusive<f32> = 0.05..=0.95;

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ModKey {
    Mod,
    Mod1,
    Mod2,
    Mod3,
    Mod4,
    Mod5,
    Shift,
    Control,
}

impl ModKey {
    /// `Mod` stands for the configured modkey.
    fn to_keybut_mask(self, modkey: KeyButMask) -> KeyButMask {
        match self {
            ModKey::Mod => modkey,
            ModKey::Mod1 => KeyButMask::MOD1,
            ModKey::Mod2 => KeyButMask::MOD2,
            ModKey::Mod3 => KeyButMask::MOD3,
            ModKey::Mod4 => KeyButMask::MOD4,
            ModKey::Mod5 => KeyButMask::MOD5,
            ModKey::Shift => KeyButMask::SHIFT,
            ModKey::Control => KeyButMask::CONTROL,
        }
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum KeyData {
    Return,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Semicolon,
    Apostrophe,
    Grave,
    Backslash,
    Comma,
    Period,
    Slash,
    Print,
    AudioRaiseVolume,
    AudioLowerVolume,
    AudioMute,
    MonBrightnessUp,
    MonBrightnessDown,
}

impl KeyData {
    fn to_keysym(self) -> Keysym {
        match self {
            KeyData::Return => keysyms::XK_RETURN,
            KeyData::Escape => keysyms::XK_ESCAPE,
            KeyData::Space => keysyms::XK_SPACE,
            KeyData::Tab => keysyms::XK_TAB,
            KeyData::Backspace => keysyms::XK_BACKSPACE,
            KeyData::Delete => keysyms::XK_DELETE,
            KeyData::F1 => keysyms::XK_F1,
            KeyData::F2 => keysyms::XK_F2,
            KeyData::F3 => keysyms::XK_F3,
            KeyData::F4 => keysyms::XK_F4,
            KeyData::F5 => keysyms::XK_F5,
            KeyData::F6 => keysyms::XK_F6,
            KeyData::F7 => keysyms::XK_F7,
            KeyData::F8 => keysyms::XK_F8,
            KeyData::F9 => keysyms::XK_F9,
            KeyData::F10 => keysyms::XK_F10,
            KeyData::F11 => keysyms::XK_F11,
            KeyData::F12 => keysyms::XK_F12,
            KeyData::A => keysyms::XK_A,
            KeyData::B => keysyms::XK_B,
            KeyData::C => keysyms::XK_C,
            KeyData::D => keysyms::XK_D,
            KeyData::E => keysyms::XK_E,
            KeyData::F => keysyms::XK_F,
            KeyData::G => keysyms::XK_G,
            KeyData::H => keysyms::XK_H,
            KeyData::I => keysyms::XK_I,
            KeyData::J => keysyms::XK_J,
            KeyData::K => keysyms::XK_K,
            KeyData::L => keysyms::XK_L,
            KeyData::M => keysyms::XK_M,
            KeyData::N => keysyms::XK_N,
            KeyData::O => keysyms::XK_O,
            KeyData::P => keysyms::XK_P,
            KeyData::Q => keysyms::XK_Q,
            KeyData::R => keysyms::XK_R,
            KeyData::S => keysyms::XK_S,
            KeyData::T => keysyms::XK_T,
            KeyData::U => keysyms::XK_U,
            KeyData::V => keysyms::XK_V,
            KeyData::W => keysyms::XK_W,
            KeyData::X => keysyms::XK_X,
            KeyData::Y => keysyms::XK_Y,
            KeyData::Z => keysyms::XK_Z,
            KeyData::Key0 => keysyms::XK_0,
            KeyData::Key1 => keysyms::XK_1,
            KeyData::Key2 => keysyms::XK_2,
            KeyData::Key3 => keysyms::XK_3,
            KeyData::Key4 => keysyms::XK_4,
            KeyData::Key5 => keysyms::XK_5,
            KeyData::Key6 => keysyms::XK_6,
            KeyData::Key7 => keysyms::XK_7,
            KeyData::Key8 => keysyms::XK_8,
            KeyData::Key9 => keysyms::XK_9,
            KeyData::Left => keysyms::XK_LEFT,
            KeyData::Right => keysyms::XK_RIGHT,
            KeyData::Up => keysyms::XK_UP,
            KeyData::Down => keysyms::XK_DOWN,
            KeyData::Home => keysyms::XK_HOME,
            KeyData::End => keysyms::XK_END,
            KeyData::PageUp => keysyms::XK_PAGE_UP,
            KeyData::PageDown => keysyms::XK_PAGE_DOWN,
            KeyData::Insert => keysyms::XK_INSERT,
            KeyData::Minus => keysyms::XK_MINUS,
            KeyData::Equal => keysyms::XK_EQUAL,
            KeyData::BracketLeft => keysyms::XK_LEFT_BRACKET,
            KeyData::BracketRight => keysyms::XK_RIGHT_BRACKET,
            KeyData::Semicolon => keysyms::XK_SEMICOLON,
            KeyData::Apostrophe => keysyms::XK_APOSTROPHE,
            KeyData::Grave => keysyms::XK_GRAVE,
            KeyData::Backslash => keysyms::XK_BACKSLASH,
            KeyData::Comma => keysyms::XK_COMMA,
            KeyData::Period => keysyms::XK_PERIOD,
            KeyData::Slash => keysyms::XK_SLASH,
            KeyData::Print => keysyms::XK_PRINT,
            KeyData::AudioRaiseVolume => keysyms::XF86_AUDIO_RAISE_VOLUME,
            KeyData::AudioLowerVolume => keysyms::XF86_AUDIO_LOWER_VOLUME,
            KeyData::AudioMute => keysyms::XF86_AUDIO_MUTE,
            KeyData::MonBrightnessUp => keysyms::XF86_MON_BRIGHTNESS_UP,
            KeyData::MonBrightnessDown => keysyms::XF86_MON_BRIGHTNESS_DOWN,
        }
    }
}

/// Replaces `$name` references with the values of earlier
/// `#DEFINE $name = value` lines.
fn preprocess_variables(input: &str) -> Result<String, ConfigError> {
    let mut variables: HashMap<String, String> = HashMap::new();
    let mut result = String::new();

    for line in input.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("#DEFINE") {
            let Some((var_name, value)) = rest.split_once('=') else {
                return Err(ConfigError::InvalidDefine(trimmed.to_string()));
            };
            let var_name = var_name.trim();
            let value = value.trim().trim_end_matches(',');

            if !var_name.starts_with('$') {
                return Err(ConfigError::InvalidVariableName(var_name.to_string()));
            }

            variables.insert(var_name.to_string(), value.to_string());
            result.push('\n');
        } else {
            let mut processed_line = line.to_string();
            // Longest names first so `$term` does not eat into `$terminal`.
            let mut names: Vec<_> = variables.keys().collect();
            names.sort_by_key(|name| std::cmp::Reverse(name.len()));
            for var_name in names {
                processed_line = processed_line.replace(var_name.as_str(), &variables[var_name]);
            }
            result.push_str(&processed_line);
            result.push('\n');
        }
    }

    for line in result.lines() {
        if let Some(var_start) = line.find('$') {
            let rest = &line[var_start..];
            let var_end = rest[1..]
                .find(|c: char| !c.is_alphanumeric() && c != '_')
                .unwrap_or(rest.len() - 1)
                + 1;
            let undefined_var = &rest[..var_end];
            return Err(ConfigError::UndefinedVariable(undefined_var.to_string()));
        }
    }
    Ok(result)
}

/// Parses a RON configuration. Sections left out keep their default value;
/// sections present replace the default entirely.
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let preprocessed = preprocess_variables(input)?;
    let config_data: ConfigData = ron::from_str(&preprocessed)?;
    config_data_to_config(config_data)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigData {
    border_width: Option<u32>,
    border_focused: Option<u32>,
    border_unfocused: Option<u32>,
    border_urgent: Option<u32>,
    font: Option<String>,

    show_bar: Option<bool>,
    top_bar: Option<bool>,
    bar_height: Option<i32>,
    scheme_normal: Option<ColorSchemeData>,
    scheme_selected: Option<ColorSchemeData>,
    scheme_urgent: Option<ColorSchemeData>,

    master_factor: Option<f32>,
    master_count: Option<u32>,
    resize_hints: Option<bool>,
    snap: Option<u32>,
    center_dialogs: Option<bool>,

    modkey: Option<ModKey>,
    tags: Option<Vec<TagData>>,
    all_tags_layouts: Option<[LayoutKind; 2]>,
    rules: Option<Vec<Rule>>,
    keybindings: Option<Vec<KeybindingData>>,
    buttons: Option<Vec<ButtonData>>,
    autostart: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TagData {
    name: String,
    #[serde(default)]
    layout: Option<LayoutKind>,
}

#[derive(Debug, Deserialize)]
struct KeybindingData {
    #[serde(default)]
    modifiers: Vec<ModKey>,
    key: KeyData,
    action: KeyAction,
    #[serde(default)]
    arg: ArgData,
}

#[derive(Debug, Deserialize)]
struct ButtonData {
    click: ClickRegion,
    #[serde(default)]
    modifiers: Vec<ModKey>,
    button: u8,
    action: KeyAction,
    #[serde(default)]
    arg: ArgData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum ArgData {
    #[default]
    None,
    Int(i32),
    Float(f32),
    String(String),
    Array(Vec<String>),
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ColorSchemeData {
    foreground: u32,
    background: u32,
}

impl From<ColorSchemeData> for ColorScheme {
    fn from(data: ColorSchemeData) -> Self {
        ColorScheme {
            foreground: data.foreground,
            background: data.background,
        }
    }
}

fn config_data_to_config(data: ConfigData) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let modkey = data.modkey.unwrap_or(ModKey::Mod4).to_keybut_mask(KeyButMask::MOD4);

    macro_rules! take {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(value) = data.$field {
                    config.$field = value.into();
                }
            )*
        };
    }
    take!(
        border_width,
        border_focused,
        border_unfocused,
        border_urgent,
        font,
        show_bar,
        top_bar,
        bar_height,
        scheme_normal,
        scheme_selected,
        scheme_urgent,
        master_factor,
        master_count,
        resize_hints,
        snap,
        center_dialogs,
        all_tags_layouts,
        rules,
        autostart,
    );

    if let Some(tags) = data.tags {
        config.tags = tags
            .into_iter()
            .map(|tag| TagConfig {
                name: tag.name,
                layout: tag.layout.unwrap_or(LayoutKind::Tile),
            })
            .collect();
    }

    if config.tags.is_empty() {
        return Err(ConfigError::NoTags);
    }
    if config.tags.len() > MAX_TAGS {
        return Err(ConfigError::TooManyTags(config.tags.len()));
    }
    if !MASTER_FACTOR_RANGE.contains(&config.master_factor) {
        return Err(ConfigError::ValidationError(format!(
            "master_factor {} is outside [0.05, 0.95]",
            config.master_factor
        )));
    }

    let tag_mask: TagMask = (1 << config.tags.len()) - 1;
    if let Some(rule) = config.rules.iter().find(|rule| rule.tags & !tag_mask != 0) {
        return Err(ConfigError::InvalidRuleTags(rule.tags));
    }

    let resolve = |modifiers: &[ModKey]| -> Vec<KeyButMask> {
        modifiers
            .iter()
            .map(|modifier| modifier.to_keybut_mask(modkey))
            .collect()
    };

    if let Some(keybindings) = data.keybindings {
        config.keybindings = keybindings
            .into_iter()
            .map(|binding| {
                let arg = arg_data_to_arg(binding.action, binding.arg, tag_mask)?;
                Ok(KeyBinding::new(
                    &resolve(&binding.modifiers),
                    binding.key.to_keysym(),
                    binding.action,
                    arg,
                ))
            })
            .collect::<Result<_, ConfigError>>()?;
    }

    if let Some(buttons) = data.buttons {
        config.buttons = buttons
            .into_iter()
            .map(|binding| {
                let arg = arg_data_to_arg(binding.action, binding.arg, tag_mask)?;
                Ok(ButtonBinding {
                    click: binding.click,
                    modifiers: modifiers_to_mask(&resolve(&binding.modifiers)),
                    button: binding.button,
                    action: binding.action,
                    arg,
                })
            })
            .collect::<Result<_, ConfigError>>()?;
    }

    Ok(config)
}

/// Interprets an argument for the action it is bound to. Tag actions take a
/// 1-based tag number, 0 meaning every tag; layouts are given by name.
fn arg_data_to_arg(action: KeyAction, data: ArgData, tag_mask: TagMask) -> Result<Arg, ConfigError> {
    let invalid = |data: &ArgData| {
        ConfigError::ValidationError(format!("invalid argument {:?} for {:?}", data, action))
    };

    let arg = match (action, data) {
        (_, ArgData::None) => Arg::None,
        (KeyAction::View | KeyAction::ToggleView | KeyAction::Tag | KeyAction::ToggleTag, ArgData::Int(0)) => {
            Arg::Tags(tag_mask)
        }
        (KeyAction::View | KeyAction::ToggleView | KeyAction::Tag | KeyAction::ToggleTag, ArgData::Int(num)) => {
            let mask = 1u32.checked_shl((num - 1) as u32).unwrap_or(0);
            if num < 0 || mask & tag_mask == 0 {
                return Err(invalid(&ArgData::Int(num)));
            }
            Arg::Tags(mask)
        }
        (KeyAction::SetLayout, ArgData::String(name)) => {
            Arg::Layout(LayoutKind::from_str(&name).map_err(ConfigError::ValidationError)?)
        }
        (KeyAction::SetMFact, ArgData::Float(value)) => Arg::Float(value),
        (KeyAction::SetMFact, ArgData::Int(value)) => Arg::Float(value as f32),
        (KeyAction::Spawn, ArgData::String(command)) => Arg::Str(command),
        (KeyAction::Spawn, ArgData::Array(argv)) => Arg::Array(argv),
        (_, ArgData::Int(value)) => Arg::Int(value),
        (_, data) => return Err(invalid(&data)),
    };
    Ok(arg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_keeps_defaults() {
        let config = parse_config("()").unwrap();
        let defaults = Config::default();

        assert_eq!(config.border_width, defaults.border_width);
        assert_eq!(config.tags, defaults.tags);
        assert_eq!(config.keybindings.len(), defaults.keybindings.len());
        assert_eq!(config.buttons.len(), defaults.buttons.len());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = parse_config(
            r#"(
                border_width: Some(4),
                top_bar: Some(true),
                scheme_selected: Some((foreground: 0xffffff, background: 0x000000)),
                tags: Some([
                    (name: "www", layout: Some(Monocle)),
                    (name: "dev"),
                ]),
                autostart: Some(["picom"]),
            )"#,
        )
        .unwrap();

        assert_eq!(config.border_width, 4);
        assert!(config.top_bar);
        assert_eq!(config.scheme_selected.foreground, 0xffffff);
        assert_eq!(
            config.tags,
            vec![
                TagConfig::new("www", LayoutKind::Monocle),
                TagConfig::new("dev", LayoutKind::Tile),
            ]
        );
        assert_eq!(config.autostart, vec!["picom".to_string()]);
    }

    #[test]
    fn test_keybindings_resolve_modkey_and_arguments() {
        let config = parse_config(
            r#"(
                modkey: Some(Mod1),
                keybindings: Some([
                    (modifiers: [Mod, Shift], key: Return, action: Spawn, arg: ["st"]),
                    (modifiers: [Mod], key: Key2, action: View, arg: 2),
                    (modifiers: [Mod], key: Key0, action: View, arg: 0),
                    (modifiers: [Mod], key: M, action: SetLayout, arg: "monocle"),
                    (modifiers: [Mod], key: L, action: SetMFact, arg: 0.05),
                    (modifiers: [Mod], key: J, action: FocusStack, arg: 1),
                ]),
            )"#,
        )
        .unwrap();

        let bindings = &config.keybindings;
        assert_eq!(bindings.len(), 6);
        assert_eq!(bindings[0].modifiers, u16::from(KeyButMask::MOD1 | KeyButMask::SHIFT));
        assert_eq!(bindings[0].keysym, keysyms::XK_RETURN);
        assert_eq!(bindings[0].arg, Arg::Array(vec!["st".to_string()]));
        assert_eq!(bindings[1].arg, Arg::Tags(1 << 1));
        assert_eq!(bindings[2].arg, Arg::Tags(0x1ff));
        assert_eq!(bindings[3].arg, Arg::Layout(LayoutKind::Monocle));
        assert_eq!(bindings[4].arg, Arg::Float(0.05));
        assert_eq!(bindings[5].arg, Arg::Int(1));
    }

    #[test]
    fn test_buttons() {
        let config = parse_config(
            r#"(
                buttons: Some([
                    (click: ClientWindow, modifiers: [Mod], button: 1, action: MoveMouse),
                    (click: TagBar, button: 3, action: ToggleView),
                ]),
            )"#,
        )
        .unwrap();

        assert_eq!(config.buttons.len(), 2);
        assert_eq!(config.buttons[0].click, ClickRegion::ClientWindow);
        assert_eq!(config.buttons[0].modifiers, u16::from(KeyButMask::MOD4));
        assert_eq!(config.buttons[1].button, 3);
        assert_eq!(config.buttons[1].arg, Arg::None);
    }

    #[test]
    fn test_tag_count_is_validated() {
        assert!(matches!(parse_config("(tags: Some([]))"), Err(ConfigError::NoTags)));

        let tags: Vec<String> = (0..32).map(|num| format!("(name: \"{}\")", num)).collect();
        let input = format!("(tags: Some([{}]))", tags.join(", "));
        assert!(matches!(parse_config(&input), Err(ConfigError::TooManyTags(32))));
    }

    #[test]
    fn test_master_factor_is_validated() {
        assert!(parse_config("(master_factor: Some(0.95))").is_ok());
        assert!(matches!(
            parse_config("(master_factor: Some(0.99))"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rule_tags_must_exist() {
        let input = r#"(rules: Some([(class: Some("Gimp"), tags: 1024)]))"#;
        assert!(matches!(parse_config(input), Err(ConfigError::InvalidRuleTags(1024))));
    }

    #[test]
    fn test_tag_argument_out_of_range() {
        let input = r#"(keybindings: Some([(modifiers: [Mod], key: Key1, action: View, arg: 12)]))"#;
        assert!(matches!(parse_config(input), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_defines_are_substituted() {
        let input = r#"
            #DEFINE $border = 5
            #DEFINE $border_color = 0x123456
            (
                border_width: Some($border),
                border_focused: Some($border_color),
            )
        "#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.border_width, 5);
        assert_eq!(config.border_focused, 0x123456);
    }

    #[test]
    fn test_define_errors() {
        assert!(matches!(
            preprocess_variables("#DEFINE border = 2"),
            Err(ConfigError::InvalidVariableName(_))
        ));
        assert!(matches!(
            preprocess_variables("#DEFINE $border"),
            Err(ConfigError::InvalidDefine(_))
        ));
        assert!(matches!(
            preprocess_variables("(border_width: Some($missing))"),
            Err(ConfigError::UndefinedVariable(name)) if name == "$missing"
        ));
    }

    #[test]
    fn test_bundled_template_parses() {
        let config = parse_config(include_str!("../../templates/config.ron")).unwrap();
        assert_eq!(config.tags.len(), 9);
        assert!(!config.keybindings.is_empty());
    }
}
