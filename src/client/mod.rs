pub mod registry;

use crate::geometry::Rect;
use crate::size_hints::SizeHints;
use x11rb::protocol::xproto::Window;

pub use registry::{ClientId, ClientRegistry};

pub type TagMask = u32;

#[derive(Debug, Clone)]
pub struct Client {
    pub name: String,
    pub geometry: Rect,
    pub old_geometry: Rect,
    pub hints: SizeHints,
    pub border_width: i32,
    pub old_border_width: i32,
    pub tags: TagMask,
    pub is_fixed: bool,
    pub is_floating: bool,
    pub is_centered: bool,
    pub is_urgent: bool,
    pub never_focus: bool,
    pub old_state: bool,
    pub is_fullscreen: bool,
    pub monitor_index: usize,
    pub window: Window,
    pub(crate) next: Option<ClientId>,
    pub(crate) stack_next: Option<ClientId>,
    pub(crate) in_client_list: bool,
    pub(crate) in_stack_list: bool,
}

impl Client {
    pub fn new(window: Window, monitor_index: usize, tags: TagMask) -> Self {
        Self {
            name: String::new(),
            geometry: Rect::default(),
            old_geometry: Rect::default(),
            hints: SizeHints::default(),
            border_width: 0,
            old_border_width: 0,
            tags,
            is_fixed: false,
            is_floating: false,
            is_centered: false,
            is_urgent: false,
            never_focus: false,
            old_state: false,
            is_fullscreen: false,
            monitor_index,
            window,
            next: None,
            stack_next: None,
            in_client_list: false,
            in_stack_list: false,
        }
    }

    pub fn width_with_border(&self) -> i32 {
        self.geometry.width + 2 * self.border_width
    }

    pub fn height_with_border(&self) -> i32 {
        self.geometry.height + 2 * self.border_width
    }

    pub fn is_visible_on(&self, active_tags: TagMask) -> bool {
        self.tags & active_tags != 0
    }

    pub fn update_size_hints(&mut self, hints: SizeHints) {
        self.is_fixed = hints.is_fixed();
        self.hints = hints;
    }
}
