use super::WindowManager;
use crate::client::{Client, ClientId};
use crate::errors::WmResult;
use crate::geometry::Rect;
use crate::rules::{BROKEN, WindowIdentity, apply_rules};
use crate::window_system::{BorderColor, ClientState, WindowAttributes, WindowSystem};
use log::{debug, info};
use x11rb::protocol::xproto::Window;

impl<X: WindowSystem> WindowManager<X> {
    /// Takes over a newly mapped top-level window.
    pub(super) fn manage(&mut self, window: Window, attributes: &WindowAttributes) -> WmResult<()> {
        let title = self.x.title(window)?.unwrap_or_else(|| BROKEN.to_string());
        let transient_for = self.x.transient_for(window)?;
        let parent = transient_for.and_then(|parent| self.state.window_to_client(parent));

        let mut client = match parent {
            Some(parent) => {
                let parent = self.state.client(parent);
                Client::new(window, parent.monitor_index, parent.tags)
            }
            None => {
                let class = self.x.window_class(window)?;
                let identity = WindowIdentity::new(&title, class.class, class.instance, class.role);
                let outcome = apply_rules(
                    &self.config.rules,
                    &identity,
                    &self.state.monitors,
                    self.state.selected_monitor,
                );
                let mut client = Client::new(window, outcome.monitor_index, outcome.tags);
                client.is_floating = outcome.is_floating;
                client.is_centered = outcome.is_centered;
                client
            }
        };
        client.name = title;
        client.geometry = attributes.geometry;
        client.old_geometry = attributes.geometry;
        client.old_border_width = attributes.border_width;
        client.border_width = self.config.border_width as i32;

        let monitor = &self.state.monitors[client.monitor_index];
        client.geometry = place_on_monitor(
            client.geometry,
            client.border_width,
            monitor.screen,
            monitor.work,
            monitor.show_bar && monitor.top_bar,
        );
        let screen = monitor.screen;
        let floating_layout = !monitor.layout().arranges();

        self.x.set_border_width(window, client.border_width)?;
        self.x.set_border_color(window, BorderColor::Normal)?;
        self.x
            .send_configure_notify(window, client.geometry, client.border_width)?;

        let window_type = self.x.window_type(window)?;
        if window_type.dialog {
            client.is_floating = true;
            client.is_centered = self.config.center_dialogs;
        }

        client.update_size_hints(self.x.size_hints(window)?);
        let hints = self.x.wm_hints(window)?;
        client.is_urgent = hints.urgent;
        client.never_focus = hints.accepts_input == Some(false);

        if client.is_centered || floating_layout {
            client.geometry.x = screen.x + (screen.width - client.width_with_border()) / 2;
            client.geometry.y = screen.y + (screen.height - client.height_with_border()) / 2;
        }

        self.x.select_client_events(window)?;
        self.x.grab_buttons(window, false, &self.config.buttons)?;

        if !client.is_floating {
            client.is_floating = transient_for.is_some() || client.is_fixed;
            client.old_state = client.is_floating;
        }
        if client.is_floating {
            self.x.raise_window(window)?;
        }

        let monitor_index = client.monitor_index;
        let geometry = client.geometry;
        let id = self.state.clients.insert(client);
        self.state.attach(id);
        self.state.attach_stack(id);
        self.update_client_list()?;

        let parked = Rect::new(geometry.x + 2 * self.screen_size.0, geometry.y, geometry.width, geometry.height);
        self.x
            .configure_window(window, parked, self.state.client(id).border_width)?;
        self.x.set_client_state(window, ClientState::Normal)?;

        if monitor_index == self.state.selected_monitor
            && let Some(previous) = self.state.selected_client()
        {
            self.unfocus(previous, false)?;
        }
        self.state.monitors[monitor_index].selected = Some(id);

        if window_type.fullscreen {
            self.set_fullscreen(id, true)?;
        }

        info!(
            "managing {:#x} \"{}\" on monitor {} tags {:#b}",
            window,
            self.state.client(id).name,
            monitor_index,
            self.state.client(id).tags
        );

        self.arrange(Some(monitor_index))?;
        self.x.map_window(window)?;
        self.focus(None)
    }

    /// Forgets a client. Windows that still exist get their original border
    /// back and are marked withdrawn.
    pub(super) fn unmanage(&mut self, id: ClientId, destroyed: bool) -> WmResult<()> {
        let monitor_index = self.state.client(id).monitor_index;
        self.state.detach(id);
        self.state.detach_stack(id);

        if !destroyed {
            let client = self.state.client(id);
            let window = client.window;
            let border_width = client.old_border_width;
            self.x.grab_server()?;
            self.x.set_border_width(window, border_width)?;
            self.x.ungrab_buttons(window)?;
            self.x.set_client_state(window, ClientState::Withdrawn)?;
            self.x.flush()?;
            self.x.ungrab_server()?;
        }

        if let Some(client) = self.state.clients.remove(id) {
            info!("unmanaged {:#x} (destroyed: {})", client.window, destroyed);
        }
        self.focus(None)?;
        self.update_client_list()?;
        self.arrange(Some(monitor_index))
    }

    /// Adopts windows that already exist, transients after their parents.
    pub(super) fn scan(&mut self) -> WmResult<()> {
        let windows = self.x.query_tree()?;
        let mut transients = Vec::new();

        for window in windows {
            let Some(attributes) = self.x.window_attributes(window)? else {
                continue;
            };
            if attributes.override_redirect || !(attributes.viewable || attributes.iconic) {
                continue;
            }
            if self.x.transient_for(window)?.is_some() {
                transients.push((window, attributes));
                continue;
            }
            self.manage(window, &attributes)?;
        }

        for (window, attributes) in transients {
            self.manage(window, &attributes)?;
        }
        debug!("scan adopted {} window(s)", self.state.clients.len());
        Ok(())
    }

    /// Hands every window back in view and with its original border.
    pub(super) fn cleanup(&mut self) -> WmResult<()> {
        let ids: Vec<ClientId> = self.state.clients.ids().collect();
        for id in ids {
            let client = self.state.client(id);
            let window = client.window;
            let geometry = client.geometry;
            let border_width = client.old_border_width;
            self.x.configure_window(window, geometry, border_width)?;
            self.x.ungrab_buttons(window)?;
            self.x.set_client_state(window, ClientState::Withdrawn)?;
        }

        for index in 0..self.state.monitors.len() {
            if let Some(bar) = self.state.monitors[index].bar_window.take() {
                self.x.destroy_bar(bar)?;
            }
        }

        self.x.set_input_focus(None)?;
        self.x.flush()
    }
}

/// Pulls a new window inside its monitor and keeps its center off a top bar.
fn place_on_monitor(mut geometry: Rect, border_width: i32, screen: Rect, work: Rect, top_bar: bool) -> Rect {
    let outer_width = geometry.width + 2 * border_width;
    let outer_height = geometry.height + 2 * border_width;

    if geometry.x + outer_width > screen.right() {
        geometry.x = screen.right() - outer_width;
    }
    if geometry.y + outer_height > screen.bottom() {
        geometry.y = screen.bottom() - outer_height;
    }
    geometry.x = geometry.x.max(screen.x);

    let center = geometry.x + geometry.width / 2;
    let covers_bar = top_bar && center >= work.x && center < work.right();
    geometry.y = geometry.y.max(if covers_bar { work.y } else { screen.y });
    geometry
}
