use crate::bar::BarContent;
use crate::errors::{WmResult, X11Error};
use crate::events::{ConfigureRequest, WmEvent};
use crate::geometry::Rect;
use crate::keyboard::{ButtonBinding, KeyBinding};
use crate::size_hints::SizeHints;
use crate::window_system::{
    BorderColor, ClientState, CursorKind, ShutdownRequest, WindowAttributes, WindowClass,
    WindowSystem, WindowType, WmHints,
};
use std::collections::{HashMap, VecDeque};
use x11rb::protocol::xproto::Window;

pub const ROOT: Window = 1;

/// Requests the window manager sent, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Configure(Window, Rect, i32),
    ConfigureUnmanaged(Window),
    ConfigureNotify(Window, Rect, i32),
    Move(Window, i32, i32),
    BorderWidth(Window, i32),
    BorderColor(Window, BorderColor),
    Map(Window),
    Raise(Window),
    StackBelow(Window, Window),
    InputFocus(Option<Window>),
    Close(Window),
    State(Window, ClientState),
    Fullscreen(Window, bool),
    ClientList(Vec<Window>),
    GrabPointer(CursorKind),
    UngrabPointer,
    Warp(Window, i32, i32),
    DrawBar(Window),
}

#[derive(Debug, Clone, Default)]
pub struct MockWindow {
    pub attributes: Option<WindowAttributes>,
    pub class: WindowClass,
    pub title: Option<String>,
    pub hints: SizeHints,
    pub wm_hints: WmHints,
    pub transient_for: Option<Window>,
    pub window_type: WindowType,
}

/// In-memory display server. `next_event` fails once the queue runs dry so
/// the event loop stops.
#[derive(Debug)]
pub struct MockWindowSystem {
    pub screens: Vec<Rect>,
    pub windows: HashMap<Window, MockWindow>,
    pub tree: Vec<Window>,
    pub events: VecDeque<WmEvent>,
    pub requests: Vec<Request>,
    pub pointer: (i32, i32),
    pub root_name: Option<String>,
    pub focused: Option<Window>,
    pub bars: Vec<(Window, Rect)>,
    pub last_bar: Option<BarContent>,
    pub shutdown: Option<ShutdownRequest>,
    next_bar: Window,
}

impl MockWindowSystem {
    pub fn new(screens: Vec<Rect>) -> Self {
        Self {
            screens,
            windows: HashMap::new(),
            tree: Vec::new(),
            events: VecDeque::new(),
            requests: Vec::new(),
            pointer: (10, 10),
            root_name: None,
            focused: None,
            bars: Vec::new(),
            last_bar: None,
            shutdown: None,
            next_bar: 1000,
        }
    }

    pub fn add_window(&mut self, window: Window, geometry: Rect) -> &mut MockWindow {
        self.tree.push(window);
        let entry = self.windows.entry(window).or_default();
        entry.attributes = Some(WindowAttributes {
            geometry,
            border_width: 0,
            override_redirect: false,
            viewable: true,
            iconic: false,
        });
        entry.title = Some(format!("window {}", window));
        entry
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Last geometry and border the window was configured with.
    pub fn last_configure(&self, window: Window) -> Option<(Rect, i32)> {
        self.requests.iter().rev().find_map(|request| match request {
            Request::Configure(target, geometry, border) if *target == window => {
                Some((*geometry, *border))
            }
            _ => None,
        })
    }

    pub fn last_move(&self, window: Window) -> Option<(i32, i32)> {
        self.requests.iter().rev().find_map(|request| match request {
            Request::Move(target, x, y) if *target == window => Some((*x, *y)),
            _ => None,
        })
    }

    fn window(&self, window: Window) -> Option<&MockWindow> {
        self.windows.get(&window)
    }
}

impl WindowSystem for MockWindowSystem {
    fn root(&self) -> Window {
        ROOT
    }

    fn screen_size(&self) -> (i32, i32) {
        let width = self.screens.iter().map(Rect::right).max().unwrap_or(0);
        let height = self.screens.iter().map(Rect::bottom).max().unwrap_or(0);
        (width, height)
    }

    fn bar_height(&self) -> i32 {
        20
    }

    fn text_width(&self, text: &str) -> i32 {
        text.len() as i32 * 10
    }

    fn numlock_mask(&self) -> u16 {
        1 << 4
    }

    fn next_event(&mut self) -> WmResult<WmEvent> {
        self.events.pop_front().ok_or_else(|| {
            X11Error::Protocol {
                error_code: 0,
                major_opcode: 0,
                minor_opcode: 0,
            }
            .into()
        })
    }

    fn flush(&mut self) -> WmResult<()> {
        Ok(())
    }

    fn discard_enter_events(&mut self) -> WmResult<()> {
        self.events
            .retain(|event| !matches!(event, WmEvent::EnterNotify { .. }));
        Ok(())
    }

    fn query_monitors(&mut self) -> WmResult<Vec<Rect>> {
        Ok(self.screens.clone())
    }

    fn query_tree(&mut self) -> WmResult<Vec<Window>> {
        Ok(self.tree.clone())
    }

    fn window_attributes(&mut self, window: Window) -> WmResult<Option<WindowAttributes>> {
        Ok(self.window(window).and_then(|entry| entry.attributes))
    }

    fn window_class(&mut self, window: Window) -> WmResult<WindowClass> {
        Ok(self
            .window(window)
            .map(|entry| entry.class.clone())
            .unwrap_or_default())
    }

    fn title(&mut self, window: Window) -> WmResult<Option<String>> {
        Ok(self.window(window).and_then(|entry| entry.title.clone()))
    }

    fn size_hints(&mut self, window: Window) -> WmResult<SizeHints> {
        Ok(self.window(window).map(|entry| entry.hints).unwrap_or_default())
    }

    fn wm_hints(&mut self, window: Window) -> WmResult<WmHints> {
        Ok(self.window(window).map(|entry| entry.wm_hints).unwrap_or_default())
    }

    fn transient_for(&mut self, window: Window) -> WmResult<Option<Window>> {
        Ok(self.window(window).and_then(|entry| entry.transient_for))
    }

    fn window_type(&mut self, window: Window) -> WmResult<WindowType> {
        Ok(self
            .window(window)
            .map(|entry| entry.window_type)
            .unwrap_or_default())
    }

    fn root_name(&mut self) -> WmResult<Option<String>> {
        Ok(self.root_name.clone())
    }

    fn pointer_position(&mut self) -> WmResult<Option<(i32, i32)>> {
        Ok(Some(self.pointer))
    }

    fn focused_toplevel(&mut self) -> WmResult<Option<Window>> {
        Ok(self.focused)
    }

    fn configure_window(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        self.requests
            .push(Request::Configure(window, geometry, border_width));
        Ok(())
    }

    fn configure_unmanaged(&mut self, request: &ConfigureRequest) -> WmResult<()> {
        self.requests
            .push(Request::ConfigureUnmanaged(request.window));
        Ok(())
    }

    fn send_configure_notify(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        self.requests
            .push(Request::ConfigureNotify(window, geometry, border_width));
        Ok(())
    }

    fn move_window(&mut self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.requests.push(Request::Move(window, x, y));
        Ok(())
    }

    fn set_border_width(&mut self, window: Window, border_width: i32) -> WmResult<()> {
        self.requests
            .push(Request::BorderWidth(window, border_width));
        Ok(())
    }

    fn set_border_color(&mut self, window: Window, color: BorderColor) -> WmResult<()> {
        self.requests.push(Request::BorderColor(window, color));
        Ok(())
    }

    fn map_window(&mut self, window: Window) -> WmResult<()> {
        self.requests.push(Request::Map(window));
        Ok(())
    }

    fn raise_window(&mut self, window: Window) -> WmResult<()> {
        self.requests.push(Request::Raise(window));
        Ok(())
    }

    fn stack_below(&mut self, window: Window, sibling: Window) -> WmResult<()> {
        self.requests.push(Request::StackBelow(window, sibling));
        Ok(())
    }

    fn select_client_events(&mut self, _window: Window) -> WmResult<()> {
        Ok(())
    }

    fn grab_buttons(&mut self, _window: Window, _focused: bool, _buttons: &[ButtonBinding]) -> WmResult<()> {
        Ok(())
    }

    fn ungrab_buttons(&mut self, _window: Window) -> WmResult<()> {
        Ok(())
    }

    fn grab_keys(&mut self, _keys: &[KeyBinding]) -> WmResult<()> {
        Ok(())
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        Ok(())
    }

    fn set_input_focus(&mut self, window: Option<Window>) -> WmResult<()> {
        self.focused = window;
        self.requests.push(Request::InputFocus(window));
        Ok(())
    }

    fn send_take_focus(&mut self, _window: Window) -> WmResult<bool> {
        Ok(false)
    }

    fn close_window(&mut self, window: Window) -> WmResult<()> {
        self.requests.push(Request::Close(window));
        Ok(())
    }

    fn set_client_state(&mut self, window: Window, state: ClientState) -> WmResult<()> {
        self.requests.push(Request::State(window, state));
        Ok(())
    }

    fn set_fullscreen_state(&mut self, window: Window, fullscreen: bool) -> WmResult<()> {
        self.requests
            .push(Request::Fullscreen(window, fullscreen));
        Ok(())
    }

    fn clear_urgency(&mut self, _window: Window) -> WmResult<()> {
        Ok(())
    }

    fn set_client_list(&mut self, windows: &[Window]) -> WmResult<()> {
        self.requests
            .push(Request::ClientList(windows.to_vec()));
        Ok(())
    }

    fn take_shutdown_request(&mut self) -> Option<ShutdownRequest> {
        self.shutdown.take()
    }

    fn grab_server(&mut self) -> WmResult<()> {
        Ok(())
    }

    fn ungrab_server(&mut self) -> WmResult<()> {
        Ok(())
    }

    fn grab_pointer(&mut self, cursor: CursorKind) -> WmResult<bool> {
        self.requests.push(Request::GrabPointer(cursor));
        Ok(true)
    }

    fn ungrab_pointer(&mut self) -> WmResult<()> {
        self.requests.push(Request::UngrabPointer);
        Ok(())
    }

    fn warp_pointer(&mut self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.requests.push(Request::Warp(window, x, y));
        Ok(())
    }

    fn create_bar(&mut self, geometry: Rect) -> WmResult<Window> {
        self.next_bar += 1;
        self.bars.push((self.next_bar, geometry));
        Ok(self.next_bar)
    }

    fn move_bar(&mut self, bar: Window, geometry: Rect) -> WmResult<()> {
        if let Some(entry) = self.bars.iter_mut().find(|(window, _)| *window == bar) {
            entry.1 = geometry;
        }
        Ok(())
    }

    fn destroy_bar(&mut self, bar: Window) -> WmResult<()> {
        self.bars.retain(|(window, _)| *window != bar);
        Ok(())
    }

    fn draw_bar(&mut self, bar: Window, _width: i32, content: &BarContent) -> WmResult<()> {
        self.last_bar = Some(content.clone());
        self.requests.push(Request::DrawBar(bar));
        Ok(())
    }
}
