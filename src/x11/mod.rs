mod atoms;
mod bar;
mod events;
mod keyboard;
mod monitors;
mod signals;

use self::atoms::Atoms;
use self::bar::{BarColors, BarFont, BarPainter, BarSurface};
use self::keyboard::KeyboardMapping;
use crate::Config;
use crate::bar::{BarContent, ClickRegion};
use crate::errors::{WmError, WmResult, X11Error, is_ignorable_protocol_error};
use crate::events::{ConfigureRequest, WmEvent, config_mask};
use crate::geometry::Rect;
use crate::keyboard::{ButtonBinding, KeyBinding};
use crate::size_hints::SizeHints;
use crate::window_system::{
    BorderColor, ClientState, CursorKind, ShutdownRequest, WindowAttributes, WindowClass,
    WindowSystem, WindowType, WmHints,
};
use log::{debug, error, info};
use std::collections::{HashMap, VecDeque};
use x11rb::connection::Connection;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT};
use x11rb::cursor::Handle as CursorHandle;
use x11rb::errors::ReplyError;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{self, *};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

const WM_NAME: &str = "tagwm";

/// `WM_HINTS` flag bits.
mod wm_hints {
    pub const INPUT: u32 = 1 << 0;
    pub const URGENCY: u32 = 1 << 8;
}

struct Cursors {
    normal: Cursor,
    moving: Cursor,
    resizing: Cursor,
}

/// The X server behind the `WindowSystem` seam.
pub struct X11Connection {
    connection: RustConnection,
    screen: Screen,
    atoms: Atoms,
    cursors: Cursors,
    keyboard: KeyboardMapping,
    font: BarFont,
    gc: Gcontext,
    colors: BarColors,
    border_colors: [u32; 3],
    bar_height: i32,
    bars: HashMap<Window, BarSurface>,
    check_window: Window,
    pending: VecDeque<Event>,
}

impl X11Connection {
    /// Connects to `$DISPLAY` and becomes its window manager.
    pub fn connect(config: &Config) -> WmResult<Self> {
        let (connection, screen_number) = x11rb::connect(None)?;
        let screen = connection.setup().roots[screen_number].clone();
        let root = screen.root;

        let redirect = connection.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new().event_mask(EventMask::SUBSTRUCTURE_REDIRECT),
        )?;
        match redirect.check() {
            Ok(()) => {}
            Err(ReplyError::X11Error(_)) => return Err(WmError::OtherWmRunning),
            Err(error) => return Err(error.into()),
        }

        let atoms = Atoms::new(&connection)?.reply()?;

        let resource_db = x11rb::resource_manager::new_from_default(&connection)?;
        let cursor_handle = CursorHandle::new(&connection, screen_number, &resource_db)?.reply()?;
        let cursors = Cursors {
            normal: cursor_handle.load_cursor(&connection, "left_ptr")?,
            moving: cursor_handle.load_cursor(&connection, "fleur")?,
            resizing: cursor_handle.load_cursor(&connection, "sizing")?,
        };

        let font = BarFont::open(&connection, &config.font)?;
        let gc = bar::create_gc(&connection, &screen, &font)?;
        let bar_height = if config.bar_height > 0 {
            config.bar_height
        } else {
            font.height + 2
        };
        let keyboard = KeyboardMapping::query(&connection)?;
        signals::install()?;
        let check_window = connection.generate_id()?;

        let x11 = Self {
            connection,
            screen,
            atoms,
            cursors,
            keyboard,
            font,
            gc,
            colors: BarColors {
                normal: config.scheme_normal,
                selected: config.scheme_selected,
                urgent: config.scheme_urgent,
            },
            border_colors: [config.border_unfocused, config.border_focused, config.border_urgent],
            bar_height,
            bars: HashMap::new(),
            check_window,
            pending: VecDeque::new(),
        };
        x11.advertise()?;
        x11.connection.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new()
                .cursor(x11.cursors.normal)
                .event_mask(
                    EventMask::SUBSTRUCTURE_REDIRECT
                        | EventMask::SUBSTRUCTURE_NOTIFY
                        | EventMask::BUTTON_PRESS
                        | EventMask::POINTER_MOTION
                        | EventMask::ENTER_WINDOW
                        | EventMask::LEAVE_WINDOW
                        | EventMask::STRUCTURE_NOTIFY
                        | EventMask::PROPERTY_CHANGE,
                ),
        )?;
        x11.connection.flush()?;

        info!(
            "connected to screen {} ({}x{})",
            screen_number, x11.screen.width_in_pixels, x11.screen.height_in_pixels
        );
        Ok(x11)
    }

    /// EWMH supporting window and `_NET_SUPPORTED`.
    fn advertise(&self) -> WmResult<()> {
        let root = self.screen.root;
        self.connection.create_window(
            COPY_DEPTH_FROM_PARENT,
            self.check_window,
            root,
            0,
            0,
            1,
            1,
            0,
            xproto::WindowClass::INPUT_OUTPUT,
            COPY_FROM_PARENT,
            &CreateWindowAux::new(),
        )?;
        for window in [self.check_window, root] {
            self.connection.change_property32(
                PropMode::REPLACE,
                window,
                self.atoms._NET_SUPPORTING_WM_CHECK,
                AtomEnum::WINDOW,
                &[self.check_window],
            )?;
        }
        self.connection.change_property8(
            PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            WM_NAME.as_bytes(),
        )?;
        self.connection.change_property32(
            PropMode::REPLACE,
            root,
            self.atoms._NET_SUPPORTED,
            AtomEnum::ATOM,
            &self.atoms.supported(),
        )?;
        self.connection
            .delete_property(root, self.atoms._NET_CLIENT_LIST)?;
        Ok(())
    }

    fn painter(&self) -> BarPainter<'_> {
        BarPainter {
            connection: &self.connection,
            gc: self.gc,
            font: &self.font,
            colors: self.colors,
            padding: self.font.height,
        }
    }

    /// Replies for windows that vanished come back as `None`.
    fn optional_reply<T>(result: Result<T, ReplyError>) -> WmResult<Option<T>> {
        match result {
            Ok(reply) => Ok(Some(reply)),
            Err(ReplyError::X11Error(error)) => {
                debug!("request failed: {:?}", error.error_kind);
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn property(
        &self,
        window: Window,
        property: impl Into<Atom>,
        kind: impl Into<Atom>,
        length: u32,
    ) -> WmResult<Option<GetPropertyReply>> {
        let cookie = self
            .connection
            .get_property(false, window, property, kind, 0, length)?;
        Self::optional_reply(cookie.reply())
    }

    fn property32(&self, window: Window, property: impl Into<Atom>, kind: impl Into<Atom>) -> WmResult<Vec<u32>> {
        let reply = self.property(window, property, kind, 32)?;
        Ok(reply
            .and_then(|reply| reply.value32().map(|values| values.collect()))
            .unwrap_or_default())
    }

    fn text_property(&self, window: Window, property: impl Into<Atom>) -> WmResult<Option<String>> {
        let reply = self.property(window, property, AtomEnum::ANY, 256)?;
        Ok(reply
            .filter(|reply| reply.format == 8 && !reply.value.is_empty())
            .map(|reply| {
                if reply.type_ == self.atoms.UTF8_STRING {
                    String::from_utf8_lossy(&reply.value).into_owned()
                } else {
                    reply.value.iter().map(|&byte| byte as char).collect()
                }
            }))
    }

    fn supports_protocol(&self, window: Window, protocol: Atom) -> WmResult<bool> {
        let protocols = self.property32(window, self.atoms.WM_PROTOCOLS, AtomEnum::ATOM)?;
        Ok(protocols.contains(&protocol))
    }

    fn send_protocol(&self, window: Window, protocol: Atom) -> WmResult<bool> {
        if !self.supports_protocol(window, protocol)? {
            return Ok(false);
        }

        let event = ClientMessageEvent::new(
            32,
            window,
            self.atoms.WM_PROTOCOLS,
            [protocol, x11rb::CURRENT_TIME, 0, 0, 0],
        );
        self.connection
            .send_event(false, window, EventMask::NO_EVENT, event)?;
        Ok(true)
    }

    fn button_grab(&self, window: Window, button: ButtonIndex, modifiers: u16) -> WmResult<()> {
        self.connection.grab_button(
            false,
            window,
            EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
            x11rb::NONE,
            x11rb::NONE,
            button,
            ModMask::from(modifiers),
        )?;
        Ok(())
    }

    /// Modifier combinations a binding is grabbed under, so Caps Lock and
    /// Num Lock do not get in the way.
    fn lock_variants(&self) -> [u16; 4] {
        let numlock = self.keyboard.numlock_mask();
        let lock = u16::from(ModMask::LOCK);
        [0, lock, numlock, numlock | lock]
    }
}

impl WindowSystem for X11Connection {
    fn root(&self) -> Window {
        self.screen.root
    }

    fn screen_size(&self) -> (i32, i32) {
        (
            self.screen.width_in_pixels as i32,
            self.screen.height_in_pixels as i32,
        )
    }

    fn bar_height(&self) -> i32 {
        self.bar_height
    }

    fn text_width(&self, text: &str) -> i32 {
        self.painter().element_width(text)
    }

    fn numlock_mask(&self) -> u16 {
        self.keyboard.numlock_mask()
    }

    fn next_event(&mut self) -> WmResult<WmEvent> {
        loop {
            let event = match self.pending.pop_front() {
                Some(event) => event,
                None => {
                    self.connection.flush()?;
                    self.connection.wait_for_event()?
                }
            };

            if let Event::Error(error) = event {
                if is_ignorable_protocol_error(error.error_code, error.major_opcode) {
                    debug!(
                        "ignoring {:?} from request {}.{}",
                        error.error_kind, error.major_opcode, error.minor_opcode
                    );
                    continue;
                }
                error!(
                    "fatal protocol error {} from request {}.{}",
                    error.error_code, error.major_opcode, error.minor_opcode
                );
                return Err(X11Error::Protocol {
                    error_code: error.error_code,
                    major_opcode: error.major_opcode,
                    minor_opcode: error.minor_opcode,
                }
                .into());
            }
            return Ok(self.translate(event));
        }
    }

    fn flush(&mut self) -> WmResult<()> {
        self.connection.flush()?;
        Ok(())
    }

    fn discard_enter_events(&mut self) -> WmResult<()> {
        self.connection.sync()?;
        while let Some(event) = self.connection.poll_for_event()? {
            if !matches!(event, Event::EnterNotify(_)) {
                self.pending.push_back(event);
            }
        }
        self.pending
            .retain(|event| !matches!(event, Event::EnterNotify(_)));
        Ok(())
    }

    fn take_shutdown_request(&mut self) -> Option<ShutdownRequest> {
        signals::take_request()
    }

    fn query_monitors(&mut self) -> WmResult<Vec<Rect>> {
        Ok(monitors::detect_monitors(&self.connection, &self.screen))
    }

    fn query_tree(&mut self) -> WmResult<Vec<Window>> {
        let tree = self.connection.query_tree(self.screen.root)?.reply()?;
        Ok(tree.children)
    }

    fn window_attributes(&mut self, window: Window) -> WmResult<Option<WindowAttributes>> {
        let attributes = Self::optional_reply(self.connection.get_window_attributes(window)?.reply())?;
        let geometry = Self::optional_reply(self.connection.get_geometry(window)?.reply())?;
        let (Some(attributes), Some(geometry)) = (attributes, geometry) else {
            return Ok(None);
        };

        let wm_state = self.property32(window, self.atoms.WM_STATE, self.atoms.WM_STATE)?;
        Ok(Some(WindowAttributes {
            geometry: Rect::new(
                geometry.x as i32,
                geometry.y as i32,
                geometry.width as i32,
                geometry.height as i32,
            ),
            border_width: geometry.border_width as i32,
            override_redirect: attributes.override_redirect,
            viewable: attributes.map_state == MapState::VIEWABLE,
            iconic: wm_state.first() == Some(&(ClientState::Iconic as u32)),
        }))
    }

    fn window_class(&mut self, window: Window) -> WmResult<WindowClass> {
        let mut class = WindowClass::default();
        if let Some(reply) = self.property(window, AtomEnum::WM_CLASS, AtomEnum::STRING, 256)? {
            let mut parts = reply
                .value
                .split(|&byte| byte == 0)
                .map(|part| String::from_utf8_lossy(part).into_owned());
            class.instance = parts.next().filter(|part| !part.is_empty());
            class.class = parts.next().filter(|part| !part.is_empty());
        }
        class.role = self.text_property(window, self.atoms.WM_WINDOW_ROLE)?;
        Ok(class)
    }

    fn title(&mut self, window: Window) -> WmResult<Option<String>> {
        match self.text_property(window, self.atoms._NET_WM_NAME)? {
            Some(title) => Ok(Some(title)),
            None => self.text_property(window, AtomEnum::WM_NAME),
        }
    }

    fn size_hints(&mut self, window: Window) -> WmResult<SizeHints> {
        let words = self.property32(window, AtomEnum::WM_NORMAL_HINTS, AtomEnum::WM_SIZE_HINTS)?;
        Ok(SizeHints::from_words(&words))
    }

    fn wm_hints(&mut self, window: Window) -> WmResult<WmHints> {
        let words = self.property32(window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS)?;
        let Some(&flags) = words.first() else {
            return Ok(WmHints::default());
        };
        Ok(WmHints {
            urgent: flags & wm_hints::URGENCY != 0,
            accepts_input: (flags & wm_hints::INPUT != 0)
                .then(|| words.get(1).is_some_and(|&input| input != 0)),
        })
    }

    fn transient_for(&mut self, window: Window) -> WmResult<Option<Window>> {
        let words = self.property32(window, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW)?;
        Ok(words.first().copied().filter(|&parent| parent != x11rb::NONE))
    }

    fn window_type(&mut self, window: Window) -> WmResult<WindowType> {
        let state = self.property32(window, self.atoms._NET_WM_STATE, AtomEnum::ATOM)?;
        let types = self.property32(window, self.atoms._NET_WM_WINDOW_TYPE, AtomEnum::ATOM)?;
        Ok(WindowType {
            fullscreen: state.contains(&self.atoms._NET_WM_STATE_FULLSCREEN),
            dialog: types.contains(&self.atoms._NET_WM_WINDOW_TYPE_DIALOG),
        })
    }

    fn root_name(&mut self) -> WmResult<Option<String>> {
        self.text_property(self.screen.root, AtomEnum::WM_NAME)
    }

    fn pointer_position(&mut self) -> WmResult<Option<(i32, i32)>> {
        let reply = Self::optional_reply(self.connection.query_pointer(self.screen.root)?.reply())?;
        Ok(reply
            .filter(|reply| reply.same_screen)
            .map(|reply| (reply.root_x as i32, reply.root_y as i32)))
    }

    fn focused_toplevel(&mut self) -> WmResult<Option<Window>> {
        let root = self.screen.root;
        let mut window = self.connection.get_input_focus()?.reply()?.focus;
        loop {
            if window == root || window == x11rb::NONE || window == u32::from(InputFocus::POINTER_ROOT) {
                return Ok(None);
            }
            let Some(tree) = Self::optional_reply(self.connection.query_tree(window)?.reply())? else {
                return Ok(None);
            };
            if tree.parent == root {
                return Ok(Some(window));
            }
            window = tree.parent;
        }
    }

    fn configure_window(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        self.connection.configure_window(
            window,
            &ConfigureWindowAux::new()
                .x(geometry.x)
                .y(geometry.y)
                .width(geometry.width.max(1) as u32)
                .height(geometry.height.max(1) as u32)
                .border_width(border_width.max(0) as u32),
        )?;
        Ok(())
    }

    fn configure_unmanaged(&mut self, request: &ConfigureRequest) -> WmResult<()> {
        let mut aux = ConfigureWindowAux::new();
        if request.has(config_mask::X) {
            aux = aux.x(request.x);
        }
        if request.has(config_mask::Y) {
            aux = aux.y(request.y);
        }
        if request.has(config_mask::WIDTH) {
            aux = aux.width(request.width as u32);
        }
        if request.has(config_mask::HEIGHT) {
            aux = aux.height(request.height as u32);
        }
        if request.has(config_mask::BORDER_WIDTH) {
            aux = aux.border_width(request.border_width as u32);
        }
        if request.has(config_mask::SIBLING) {
            aux = aux.sibling(request.sibling);
        }
        if request.has(config_mask::STACK_MODE) {
            aux = aux.stack_mode(StackMode::from(request.stack_mode));
        }
        self.connection.configure_window(request.window, &aux)?;
        Ok(())
    }

    fn send_configure_notify(&mut self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            above_sibling: x11rb::NONE,
            x: geometry.x as i16,
            y: geometry.y as i16,
            width: geometry.width as u16,
            height: geometry.height as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };
        self.connection
            .send_event(false, window, EventMask::STRUCTURE_NOTIFY, event)?;
        Ok(())
    }

    fn move_window(&mut self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.connection
            .configure_window(window, &ConfigureWindowAux::new().x(x).y(y))?;
        Ok(())
    }

    fn set_border_width(&mut self, window: Window, border_width: i32) -> WmResult<()> {
        self.connection.configure_window(
            window,
            &ConfigureWindowAux::new().border_width(border_width.max(0) as u32),
        )?;
        Ok(())
    }

    fn set_border_color(&mut self, window: Window, color: BorderColor) -> WmResult<()> {
        let pixel = match color {
            BorderColor::Normal => self.border_colors[0],
            BorderColor::Focused => self.border_colors[1],
            BorderColor::Urgent => self.border_colors[2],
        };
        self.connection
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().border_pixel(pixel))?;
        Ok(())
    }

    fn map_window(&mut self, window: Window) -> WmResult<()> {
        self.connection.map_window(window)?;
        Ok(())
    }

    fn raise_window(&mut self, window: Window) -> WmResult<()> {
        self.connection
            .configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        Ok(())
    }

    fn stack_below(&mut self, window: Window, sibling: Window) -> WmResult<()> {
        self.connection.configure_window(
            window,
            &ConfigureWindowAux::new()
                .sibling(sibling)
                .stack_mode(StackMode::BELOW),
        )?;
        Ok(())
    }

    fn select_client_events(&mut self, window: Window) -> WmResult<()> {
        self.connection.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::new().event_mask(
                EventMask::ENTER_WINDOW
                    | EventMask::FOCUS_CHANGE
                    | EventMask::PROPERTY_CHANGE
                    | EventMask::STRUCTURE_NOTIFY,
            ),
        )?;
        Ok(())
    }

    fn grab_buttons(&mut self, window: Window, focused: bool, buttons: &[ButtonBinding]) -> WmResult<()> {
        self.connection
            .ungrab_button(ButtonIndex::ANY, window, ModMask::ANY)?;
        if !focused {
            self.button_grab(window, ButtonIndex::ANY, u16::from(ModMask::ANY))?;
        }

        for binding in buttons.iter().filter(|binding| binding.click == ClickRegion::ClientWindow) {
            for lock in self.lock_variants() {
                self.button_grab(window, ButtonIndex::from(binding.button), binding.modifiers | lock)?;
            }
        }
        Ok(())
    }

    fn ungrab_buttons(&mut self, window: Window) -> WmResult<()> {
        self.connection
            .ungrab_button(ButtonIndex::ANY, window, ModMask::ANY)?;
        Ok(())
    }

    fn grab_keys(&mut self, keys: &[KeyBinding]) -> WmResult<()> {
        let root = self.screen.root;
        self.connection.ungrab_key(Grab::ANY, root, ModMask::ANY)?;

        for binding in keys {
            for keycode in self.keyboard.keycodes(binding.keysym) {
                for lock in self.lock_variants() {
                    self.connection.grab_key(
                        true,
                        root,
                        ModMask::from(binding.modifiers | lock),
                        keycode,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?;
                }
            }
        }
        debug!("grabbed {} key binding(s)", keys.len());
        Ok(())
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        self.keyboard = KeyboardMapping::query(&self.connection)?;
        Ok(())
    }

    fn set_input_focus(&mut self, window: Option<Window>) -> WmResult<()> {
        let root = self.screen.root;
        match window {
            Some(window) => {
                self.connection
                    .set_input_focus(InputFocus::POINTER_ROOT, window, x11rb::CURRENT_TIME)?;
                self.connection.change_property32(
                    PropMode::REPLACE,
                    root,
                    self.atoms._NET_ACTIVE_WINDOW,
                    AtomEnum::WINDOW,
                    &[window],
                )?;
            }
            None => {
                self.connection
                    .set_input_focus(InputFocus::POINTER_ROOT, root, x11rb::CURRENT_TIME)?;
                self.connection
                    .delete_property(root, self.atoms._NET_ACTIVE_WINDOW)?;
            }
        }
        Ok(())
    }

    fn send_take_focus(&mut self, window: Window) -> WmResult<bool> {
        self.send_protocol(window, self.atoms.WM_TAKE_FOCUS)
    }

    fn close_window(&mut self, window: Window) -> WmResult<()> {
        if self.send_protocol(window, self.atoms.WM_DELETE_WINDOW)? {
            return Ok(());
        }

        debug!("{:#x} does not support WM_DELETE_WINDOW, killing it", window);
        self.connection.grab_server()?;
        self.connection.set_close_down_mode(CloseDown::DESTROY_ALL)?;
        self.connection.kill_client(window)?;
        self.connection.ungrab_server()?;
        Ok(())
    }

    fn set_client_state(&mut self, window: Window, state: ClientState) -> WmResult<()> {
        self.connection.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.WM_STATE,
            &[state as u32, x11rb::NONE],
        )?;
        Ok(())
    }

    fn set_fullscreen_state(&mut self, window: Window, fullscreen: bool) -> WmResult<()> {
        let state: &[u32] = if fullscreen {
            &[self.atoms._NET_WM_STATE_FULLSCREEN]
        } else {
            &[]
        };
        self.connection.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms._NET_WM_STATE,
            AtomEnum::ATOM,
            state,
        )?;
        Ok(())
    }

    fn clear_urgency(&mut self, window: Window) -> WmResult<()> {
        let mut words = self.property32(window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS)?;
        let Some(flags) = words.first_mut() else {
            return Ok(());
        };
        *flags &= !wm_hints::URGENCY;
        self.connection.change_property32(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_HINTS,
            AtomEnum::WM_HINTS,
            &words,
        )?;
        Ok(())
    }

    fn set_client_list(&mut self, windows: &[Window]) -> WmResult<()> {
        self.connection.change_property32(
            PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_CLIENT_LIST,
            AtomEnum::WINDOW,
            windows,
        )?;
        Ok(())
    }

    fn grab_server(&mut self) -> WmResult<()> {
        self.connection.grab_server()?;
        Ok(())
    }

    fn ungrab_server(&mut self) -> WmResult<()> {
        self.connection.ungrab_server()?;
        Ok(())
    }

    fn grab_pointer(&mut self, cursor: CursorKind) -> WmResult<bool> {
        let cursor = match cursor {
            CursorKind::Normal => self.cursors.normal,
            CursorKind::Move => self.cursors.moving,
            CursorKind::Resize => self.cursors.resizing,
        };
        let reply = self
            .connection
            .grab_pointer(
                false,
                self.screen.root,
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                x11rb::CURRENT_TIME,
            )?
            .reply()?;
        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&mut self) -> WmResult<()> {
        self.connection.ungrab_pointer(x11rb::CURRENT_TIME)?;
        Ok(())
    }

    fn warp_pointer(&mut self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.connection
            .warp_pointer(x11rb::NONE, window, 0, 0, 0, 0, x as i16, y as i16)?;
        Ok(())
    }

    fn create_bar(&mut self, geometry: Rect) -> WmResult<Window> {
        let surface = BarSurface::create(
            &self.connection,
            &self.screen,
            geometry,
            self.colors.normal.background,
            self.cursors.normal,
        )?;
        let window = surface.window;
        self.raise_window(window)?;
        self.bars.insert(window, surface);
        Ok(window)
    }

    fn move_bar(&mut self, bar: Window, geometry: Rect) -> WmResult<()> {
        self.configure_window(bar, geometry, 0)?;
        if let Some(surface) = self.bars.get_mut(&bar) {
            surface.resize(&self.connection, &self.screen, geometry)?;
        }
        Ok(())
    }

    fn destroy_bar(&mut self, bar: Window) -> WmResult<()> {
        if let Some(surface) = self.bars.remove(&bar) {
            self.connection.unmap_window(bar)?;
            surface.destroy(&self.connection)?;
        }
        Ok(())
    }

    fn draw_bar(&mut self, bar: Window, width: i32, content: &BarContent) -> WmResult<()> {
        let Some(surface) = self.bars.get(&bar) else {
            return Ok(());
        };
        self.painter().paint(surface, width, content)
    }
}

impl Drop for X11Connection {
    fn drop(&mut self) {
        let _ = self.connection.destroy_window(self.check_window);
        let _ = self
            .connection
            .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW);
        let _ = self.connection.free_gc(self.gc);
        let _ = self.connection.close_font(self.font.id);
        for cursor in [self.cursors.normal, self.cursors.moving, self.cursors.resizing] {
            let _ = self.connection.free_cursor(cursor);
        }
        let _ = self.connection.flush();
    }
}
