use crate::keyboard::keysyms::Keysym;
use x11rb::protocol::xproto::Window;

/// Fields of a ConfigureRequest; only those whose bit is set in `value_mask`
/// were asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: Window,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub border_width: i32,
    pub sibling: Window,
    pub stack_mode: u8,
    pub value_mask: u16,
}

pub mod config_mask {
    pub const X: u16 = 1 << 0;
    pub const Y: u16 = 1 << 1;
    pub const WIDTH: u16 = 1 << 2;
    pub const HEIGHT: u16 = 1 << 3;
    pub const BORDER_WIDTH: u16 = 1 << 4;
    pub const SIBLING: u16 = 1 << 5;
    pub const STACK_MODE: u16 = 1 << 6;
}

impl ConfigureRequest {
    pub fn has(&self, flag: u16) -> bool {
        self.value_mask & flag != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    RootName,
    TransientFor,
    NormalHints,
    WmHints,
    Title,
    WindowType,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Remove,
    Add,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Fullscreen(FullscreenAction),
    ActivateWindow,
    Other,
}

/// Display server notifications the window manager reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum WmEvent {
    ButtonPress {
        window: Window,
        button: u8,
        state: u16,
        x: i32,
        root_x: i32,
        root_y: i32,
    },
    ButtonRelease,
    ClientMessage {
        window: Window,
        message: ClientMessage,
    },
    ConfigureRequest(ConfigureRequest),
    ConfigureNotify {
        window: Window,
        width: i32,
        height: i32,
    },
    DestroyNotify {
        window: Window,
    },
    EnterNotify {
        window: Window,
        /// Normal crossing into the window itself, not from an inferior.
        is_normal: bool,
    },
    Expose {
        window: Window,
        count: u16,
    },
    FocusIn {
        window: Window,
    },
    KeyPress {
        keysym: Keysym,
        state: u16,
    },
    MappingNotify {
        keyboard: bool,
    },
    MapRequest {
        window: Window,
    },
    MotionNotify {
        window: Window,
        root_x: i32,
        root_y: i32,
    },
    PropertyNotify {
        window: Window,
        property: PropertyKind,
        deleted: bool,
    },
    UnmapNotify {
        window: Window,
        synthetic: bool,
    },
    Ignored,
}

impl WmEvent {
    /// Events serviced while an interactive move or resize is in progress.
    pub fn is_serviced_during_drag(&self) -> bool {
        matches!(
            self,
            WmEvent::ConfigureRequest(_) | WmEvent::Expose { .. } | WmEvent::MapRequest { .. }
        )
    }
}
