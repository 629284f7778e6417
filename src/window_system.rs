use crate::bar::BarContent;
use crate::errors::WmResult;
use crate::events::{ConfigureRequest, WmEvent};
use crate::geometry::Rect;
use crate::keyboard::{ButtonBinding, KeyBinding};
use crate::size_hints::SizeHints;
use x11rb::protocol::xproto::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub geometry: Rect,
    pub border_width: i32,
    pub override_redirect: bool,
    pub viewable: bool,
    pub iconic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowClass {
    pub class: Option<String>,
    pub instance: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WmHints {
    pub urgent: bool,
    /// `Some(false)` when the client explicitly refuses input focus.
    pub accepts_input: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowType {
    pub fullscreen: bool,
    pub dialog: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderColor {
    Normal,
    Focused,
    Urgent,
}

/// ICCCM `WM_STATE` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ClientState {
    Withdrawn = 0,
    Normal = 1,
    Iconic = 3,
}

/// Process-level request to stop, delivered outside the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownRequest {
    Quit,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Normal,
    Move,
    Resize,
}

/// The display server as seen by the window manager core. Queries about
/// windows that vanished return empty values rather than errors.
pub trait WindowSystem {
    fn root(&self) -> Window;
    fn screen_size(&self) -> (i32, i32);
    fn bar_height(&self) -> i32;
    fn text_width(&self, text: &str) -> i32;
    fn numlock_mask(&self) -> u16;

    fn next_event(&mut self) -> WmResult<WmEvent>;
    fn flush(&mut self) -> WmResult<()>;
    fn discard_enter_events(&mut self) -> WmResult<()>;
    /// Quit or restart asked for by a signal since the last call.
    fn take_shutdown_request(&mut self) -> Option<ShutdownRequest>;

    fn query_monitors(&mut self) -> WmResult<Vec<Rect>>;
    fn query_tree(&mut self) -> WmResult<Vec<Window>>;
    fn window_attributes(&mut self, window: Window) -> WmResult<Option<WindowAttributes>>;
    fn window_class(&mut self, window: Window) -> WmResult<WindowClass>;
    fn title(&mut self, window: Window) -> WmResult<Option<String>>;
    fn size_hints(&mut self, window: Window) -> WmResult<SizeHints>;
    fn wm_hints(&mut self, window: Window) -> WmResult<WmHints>;
    fn transient_for(&mut self, window: Window) -> WmResult<Option<Window>>;
    fn window_type(&mut self, window: Window) -> WmResult<WindowType>;
    fn root_name(&mut self) -> WmResult<Option<String>>;
    fn pointer_position(&mut self) -> WmResult<Option<(i32, i32)>>;
    fn focused_toplevel(&mut self) -> WmResult<Option<Window>>;

    fn configure_window(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()>;
    fn configure_unmanaged(&mut self, request: &ConfigureRequest) -> WmResult<()>;
    fn send_configure_notify(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()>;
    fn move_window(&mut self, window: Window, x: i32, y: i32) -> WmResult<()>;
    fn set_border_width(&mut self, window: Window, border_width: i32) -> WmResult<()>;
    fn set_border_color(&mut self, window: Window, color: BorderColor) -> WmResult<()>;
    fn map_window(&mut self, window: Window) -> WmResult<()>;
    fn raise_window(&mut self, window: Window) -> WmResult<()>;
    fn stack_below(&mut self, window: Window, sibling: Window) -> WmResult<()>;
    fn select_client_events(&mut self, window: Window) -> WmResult<()>;

    fn grab_buttons(&mut self, window: Window, focused: bool, buttons: &[ButtonBinding]) -> WmResult<()>;
    fn ungrab_buttons(&mut self, window: Window) -> WmResult<()>;
    fn grab_keys(&mut self, keys: &[KeyBinding]) -> WmResult<()>;
    fn refresh_keyboard_mapping(&mut self) -> WmResult<()>;

    /// Gives input focus to `window`, or back to the root when `None`, and
    /// keeps `_NET_ACTIVE_WINDOW` in sync.
    fn set_input_focus(&mut self, window: Option<Window>) -> WmResult<()>;
    /// Sends `WM_TAKE_FOCUS` if the client supports it.
    fn send_take_focus(&mut self, window: Window) -> WmResult<bool>;
    /// Asks the client to close through `WM_DELETE_WINDOW`, or kills it.
    fn close_window(&mut self, window: Window) -> WmResult<()>;
    fn set_client_state(&mut self, window: Window, state: ClientState) -> WmResult<()>;
    fn set_fullscreen_state(&mut self, window: Window, fullscreen: bool) -> WmResult<()>;
    fn clear_urgency(&mut self, window: Window) -> WmResult<()>;
    fn set_client_list(&mut self, windows: &[Window]) -> WmResult<()>;

    fn grab_server(&mut self) -> WmResult<()>;
    fn ungrab_server(&mut self) -> WmResult<()>;
    fn grab_pointer(&mut self, cursor: CursorKind) -> WmResult<bool>;
    fn ungrab_pointer(&mut self) -> WmResult<()>;
    fn warp_pointer(&mut self, window: Window, x: i32, y: i32) -> WmResult<()>;

    fn create_bar(&mut self, geometry: Rect) -> WmResult<Window>;
    fn move_bar(&mut self, bar: Window, geometry: Rect) -> WmResult<()>;
    fn destroy_bar(&mut self, bar: Window) -> WmResult<()>;
    fn draw_bar(&mut self, bar: Window, width: i32, content: &BarContent) -> WmResult<()>;
}
