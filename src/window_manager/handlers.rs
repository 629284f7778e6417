use super::WindowManager;
use crate::bar::{BarContent, ClickRegion};
use crate::errors::WmResult;
use crate::events::{ClientMessage, ConfigureRequest, FullscreenAction, PropertyKind, WmEvent, config_mask};
use crate::geometry::Rect;
use crate::keyboard::Arg;
use crate::keyboard::keysyms::Keysym;
use crate::rules::BROKEN;
use crate::window_system::{BorderColor, ClientState, WindowSystem};
use log::{debug, trace};
use x11rb::protocol::xproto::Window;

impl<X: WindowSystem> WindowManager<X> {
    pub(super) fn handle_event(&mut self, event: WmEvent) -> WmResult<()> {
        trace!("event: {:?}", event);
        match event {
            WmEvent::ButtonPress {
                window,
                button,
                state,
                x,
                ..
            } => self.on_button_press(window, button, state, x),
            WmEvent::ButtonRelease | WmEvent::Ignored => Ok(()),
            WmEvent::ClientMessage { window, message } => self.on_client_message(window, message),
            WmEvent::ConfigureRequest(request) => self.on_configure_request(&request),
            WmEvent::ConfigureNotify {
                window,
                width,
                height,
            } => self.on_configure_notify(window, width, height),
            WmEvent::DestroyNotify { window } => match self.state.window_to_client(window) {
                Some(id) => self.unmanage(id, true),
                None => Ok(()),
            },
            WmEvent::EnterNotify { window, is_normal } => self.on_enter(window, is_normal),
            WmEvent::Expose { window, count } => {
                if count == 0 {
                    let monitor_index = self.window_to_monitor(window)?;
                    self.draw_bar(monitor_index)?;
                }
                Ok(())
            }
            WmEvent::FocusIn { window } => match self.state.selected_client() {
                Some(id) if self.state.client(id).window != window => self.set_focus(id),
                _ => Ok(()),
            },
            WmEvent::KeyPress { keysym, state } => self.on_key_press(keysym, state),
            WmEvent::MappingNotify { keyboard } => {
                self.x.refresh_keyboard_mapping()?;
                if keyboard {
                    self.x.grab_keys(&self.config.keybindings)?;
                }
                Ok(())
            }
            WmEvent::MapRequest { window } => self.on_map_request(window),
            WmEvent::MotionNotify {
                window,
                root_x,
                root_y,
            } => self.on_motion(window, root_x, root_y),
            WmEvent::PropertyNotify {
                window,
                property,
                deleted,
            } => self.on_property(window, property, deleted),
            WmEvent::UnmapNotify { window, synthetic } => match self.state.window_to_client(window) {
                Some(_) if synthetic => self.x.set_client_state(window, ClientState::Withdrawn),
                Some(id) => self.unmanage(id, false),
                None => Ok(()),
            },
        }
    }

    fn on_button_press(&mut self, window: Window, button: u8, state: u16, x: i32) -> WmResult<()> {
        let monitor_index = self.window_to_monitor(window)?;
        if monitor_index != self.state.selected_monitor {
            if let Some(selected) = self.state.selected_client() {
                self.unfocus(selected, true)?;
            }
            self.state.selected_monitor = monitor_index;
            self.focus(None)?;
        }

        let mut click = ClickRegion::RootWindow;
        let mut clicked_tags = None;
        let monitor_index = self.state.selected_monitor;
        if self.state.monitors[monitor_index].bar_window == Some(window) {
            let content = BarContent::build(&self.state, monitor_index, &self.tag_names);
            let bar_width = self.state.monitors[monitor_index].work.width;
            let (region, tags) = content.click_region(x, bar_width, |text| self.x.text_width(text));
            click = region;
            clicked_tags = tags;
        } else if let Some(id) = self.state.window_to_client(window) {
            self.focus(Some(id))?;
            click = ClickRegion::ClientWindow;
        }

        let numlock = self.x.numlock_mask();
        let matching: Vec<_> = self
            .config
            .buttons
            .iter()
            .filter(|binding| binding.matches(click, button, state, numlock))
            .map(|binding| {
                let arg = match (click, &binding.arg, clicked_tags) {
                    (ClickRegion::TagBar, Arg::None, Some(tags)) => Arg::Tags(tags),
                    _ => binding.arg.clone(),
                };
                (binding.action, arg)
            })
            .collect();

        for (action, arg) in matching {
            self.run_action(action, &arg)?;
        }
        Ok(())
    }

    fn on_client_message(&mut self, window: Window, message: ClientMessage) -> WmResult<()> {
        let Some(id) = self.state.window_to_client(window) else {
            return Ok(());
        };

        match message {
            ClientMessage::Fullscreen(action) => {
                let fullscreen = match action {
                    FullscreenAction::Add => true,
                    FullscreenAction::Remove => false,
                    FullscreenAction::Toggle => !self.state.client(id).is_fullscreen,
                };
                self.set_fullscreen(id, fullscreen)
            }
            ClientMessage::ActivateWindow => {
                if !self.state.is_visible(id) {
                    let client = self.state.client(id);
                    let (monitor_index, tags) = (client.monitor_index, client.tags);
                    self.view_on(monitor_index, tags)?;
                }
                self.pop(id)
            }
            ClientMessage::Other => Ok(()),
        }
    }

    fn on_configure_request(&mut self, request: &ConfigureRequest) -> WmResult<()> {
        let Some(id) = self.state.window_to_client(request.window) else {
            return self.x.configure_unmanaged(request);
        };

        let client = self.state.client(id);
        let floating_layout = !self.state.selected_monitor().layout().arranges();

        if request.has(config_mask::BORDER_WIDTH) {
            self.state.client_mut(id).border_width = request.border_width;
        } else if client.is_floating || floating_layout {
            let screen = self.state.monitors[client.monitor_index].screen;
            let client = self.state.client_mut(id);
            let mut geometry = client.geometry;
            client.old_geometry = geometry;

            if request.has(config_mask::X) {
                geometry.x = screen.x + request.x;
            }
            if request.has(config_mask::Y) {
                geometry.y = screen.y + request.y;
            }
            if request.has(config_mask::WIDTH) {
                geometry.width = request.width;
            }
            if request.has(config_mask::HEIGHT) {
                geometry.height = request.height;
            }

            let outer_width = geometry.width + 2 * client.border_width;
            let outer_height = geometry.height + 2 * client.border_width;
            if geometry.right() > screen.right() && client.is_floating {
                geometry.x = screen.x + (screen.width / 2 - outer_width / 2);
            }
            if geometry.bottom() > screen.bottom() && client.is_floating {
                geometry.y = screen.y + (screen.height / 2 - outer_height / 2);
            }
            client.geometry = geometry;
            let (window, border_width) = (client.window, client.border_width);

            let moved = request.has(config_mask::X) || request.has(config_mask::Y);
            let resized = request.has(config_mask::WIDTH) || request.has(config_mask::HEIGHT);
            if moved && !resized {
                self.x.send_configure_notify(window, geometry, border_width)?;
            }
            if self.state.is_visible(id) {
                self.x.configure_window(window, geometry, border_width)?;
            }
        } else {
            let (window, geometry, border_width) = (client.window, client.geometry, client.border_width);
            self.x.send_configure_notify(window, geometry, border_width)?;
        }
        Ok(())
    }

    fn on_configure_notify(&mut self, window: Window, width: i32, height: i32) -> WmResult<()> {
        if window != self.x.root() {
            return Ok(());
        }

        let resized = self.screen_size.0 != width;
        self.screen_size = (width, height);
        if self.update_geometry()? || resized {
            self.update_bars()?;
            let fullscreen: Vec<_> = self
                .state
                .clients
                .ids()
                .filter(|&id| self.state.client(id).is_fullscreen)
                .collect();
            for id in fullscreen {
                let screen = self.state.monitor_of(id).screen;
                self.resize_client(id, screen)?;
            }
            self.focus(None)?;
            self.arrange(None)?;
        }
        Ok(())
    }

    /// Focus follows the pointer across clients and monitors.
    fn on_enter(&mut self, window: Window, is_normal: bool) -> WmResult<()> {
        if !is_normal && window != self.x.root() {
            return Ok(());
        }

        let client = self.state.window_to_client(window);
        let monitor_index = match client {
            Some(id) => self.state.client(id).monitor_index,
            None => self.window_to_monitor(window)?,
        };

        if monitor_index != self.state.selected_monitor {
            if let Some(selected) = self.state.selected_client() {
                self.unfocus(selected, true)?;
            }
            self.state.selected_monitor = monitor_index;
        } else if client.is_none() || client == self.state.selected_client() {
            return Ok(());
        }
        self.focus(client)
    }

    fn on_key_press(&mut self, keysym: Keysym, state: u16) -> WmResult<()> {
        let numlock = self.x.numlock_mask();
        let matching: Vec<_> = self
            .config
            .keybindings
            .iter()
            .filter(|binding| binding.matches(keysym, state, numlock))
            .map(|binding| (binding.action, binding.arg.clone()))
            .collect();

        for (action, arg) in matching {
            debug!("key binding: {:?} {:?}", action, arg);
            self.run_action(action, &arg)?;
        }
        Ok(())
    }

    fn on_map_request(&mut self, window: Window) -> WmResult<()> {
        let Some(attributes) = self.x.window_attributes(window)? else {
            return Ok(());
        };
        if attributes.override_redirect || self.state.window_to_client(window).is_some() {
            return Ok(());
        }
        self.manage(window, &attributes)
    }

    /// Pointer motion over the root switches the selected monitor.
    fn on_motion(&mut self, window: Window, root_x: i32, root_y: i32) -> WmResult<()> {
        if window != self.x.root() {
            return Ok(());
        }

        let monitor_index = self.state.rect_to_monitor(&Rect::new(root_x, root_y, 1, 1));
        if let Some(previous) = self.motion_monitor
            && previous != monitor_index
        {
            if let Some(selected) = self.state.selected_client() {
                self.unfocus(selected, true)?;
            }
            self.state.selected_monitor = monitor_index;
            self.focus(None)?;
        }
        self.motion_monitor = Some(monitor_index);
        Ok(())
    }

    fn on_property(&mut self, window: Window, property: PropertyKind, deleted: bool) -> WmResult<()> {
        if window == self.x.root() && property == PropertyKind::RootName {
            return self.update_status();
        }
        if deleted {
            return Ok(());
        }
        let Some(id) = self.state.window_to_client(window) else {
            return Ok(());
        };

        match property {
            PropertyKind::TransientFor => {
                if !self.state.client(id).is_floating
                    && let Some(parent) = self.x.transient_for(window)?
                    && self.state.window_to_client(parent).is_some()
                {
                    self.state.client_mut(id).is_floating = true;
                    self.arrange(Some(self.state.client(id).monitor_index))?;
                }
            }
            PropertyKind::NormalHints => {
                let hints = self.x.size_hints(window)?;
                self.state.client_mut(id).update_size_hints(hints);
            }
            PropertyKind::WmHints => {
                let hints = self.x.wm_hints(window)?;
                if hints.urgent && self.state.selected_client() == Some(id) {
                    self.x.clear_urgency(window)?;
                } else {
                    self.state.client_mut(id).is_urgent = hints.urgent;
                }
                self.state.client_mut(id).never_focus = hints.accepts_input == Some(false);
                self.draw_bars()?;
                if self.state.client(id).is_urgent {
                    self.x.set_border_color(window, BorderColor::Urgent)?;
                }
            }
            PropertyKind::Title => {
                let title = self.x.title(window)?;
                let client = self.state.client_mut(id);
                client.name = title.unwrap_or_else(|| BROKEN.to_string());
                let monitor_index = client.monitor_index;
                if self.state.monitors[monitor_index].selected == Some(id) {
                    self.draw_bar(monitor_index)?;
                }
            }
            PropertyKind::WindowType => {
                let window_type = self.x.window_type(window)?;
                if window_type.fullscreen {
                    self.set_fullscreen(id, true)?;
                }
                if window_type.dialog {
                    let client = self.state.client_mut(id);
                    client.is_centered = self.config.center_dialogs;
                    client.is_floating = true;
                }
            }
            PropertyKind::RootName | PropertyKind::Other => {}
        }
        Ok(())
    }
}
