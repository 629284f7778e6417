use super::WindowManager;
use crate::bar::BarContent;
use crate::client::ClientId;
use crate::errors::WmResult;
use crate::geometry::Rect;
use crate::layout::{LayoutKind, LayoutParams};
use crate::size_hints::{PlacementBounds, apply_size_hints};
use crate::window_system::WindowSystem;

impl<X: WindowSystem> WindowManager<X> {
    /// Re-tiles one monitor, or all of them when `None`.
    pub(super) fn arrange(&mut self, monitor_index: Option<usize>) -> WmResult<()> {
        let targets: Vec<usize> = match monitor_index {
            Some(index) => vec![index],
            None => (0..self.state.monitors.len()).collect(),
        };

        for &index in &targets {
            self.show_hide(index)?;
        }
        for &index in &targets {
            self.arrange_monitor(index)?;
            self.restack(index)?;
        }
        Ok(())
    }

    /// Parks hidden clients left of the screen, bottom of the stack first,
    /// then brings visible ones back from the top.
    fn show_hide(&mut self, monitor_index: usize) -> WmResult<()> {
        let stack: Vec<ClientId> = self.state.stack_of(monitor_index).collect();
        let floating_layout = !self.state.monitors[monitor_index].layout().arranges();

        for &id in stack.iter().rev() {
            if !self.state.is_visible(id) {
                let client = self.state.client(id);
                let x = -2 * client.width_with_border();
                self.x.move_window(client.window, x, client.geometry.y)?;
            }
        }

        for &id in &stack {
            if !self.state.is_visible(id) {
                continue;
            }
            let client = self.state.client(id);
            let geometry = client.geometry;
            self.x
                .move_window(client.window, geometry.x, geometry.y)?;
            if (floating_layout || client.is_floating) && !client.is_fullscreen {
                self.resize(id, geometry, false)?;
            }
        }
        Ok(())
    }

    fn arrange_monitor(&mut self, monitor_index: usize) -> WmResult<()> {
        let monitor = &mut self.state.monitors[monitor_index];
        let layout = monitor.layout();
        monitor.layout_symbol = layout.symbol().to_string();

        let tiled = self.state.tiled_clients(monitor_index);
        if layout.arranges() && (layout == LayoutKind::Monocle || tiled.len() <= 1) {
            return self.monocle(monitor_index, &tiled);
        }

        let border_width = self.config.border_width as i32;
        for id in self.state.visible_clients(monitor_index) {
            let client = self.state.client(id);
            let takes_border = !layout.arranges() || !client.is_floating;
            if takes_border && !client.is_fullscreen && client.border_width != border_width {
                let geometry = client.geometry;
                self.state.client_mut(id).border_width = border_width;
                self.resize_client(id, geometry)?;
            }
        }

        let monitor = &self.state.monitors[monitor_index];
        let params = LayoutParams {
            work_area: monitor.work,
            master_count: monitor.master_count,
            master_factor: monitor.master_factor,
        };
        if let Some(cells) = layout.arrange(tiled.len(), &params) {
            for (id, cell) in tiled.into_iter().zip(cells) {
                let border_width = self.state.client(id).border_width;
                self.resize(id, cell.inset_border(border_width), false)?;
            }
        }
        Ok(())
    }

    /// Every tiled client covers the whole work area without a border.
    fn monocle(&mut self, monitor_index: usize, tiled: &[ClientId]) -> WmResult<()> {
        let work = self.state.monitors[monitor_index].work;
        for &id in tiled {
            let border_width = self.state.client(id).border_width;
            self.resize(id, work.inset_border(border_width), false)?;
            if self.state.client(id).border_width != 0 {
                self.state.client_mut(id).border_width = 0;
                self.resize_client(id, work)?;
            }
        }
        Ok(())
    }

    /// Applies size hints and placement bounds before configuring the
    /// client. Nothing is sent when the geometry does not change.
    pub(super) fn resize(&mut self, id: ClientId, requested: Rect, interactive: bool) -> WmResult<()> {
        let client = self.state.client(id);
        let monitor = &self.state.monitors[client.monitor_index];
        let bounds = PlacementBounds {
            screen_width: self.screen_size.0,
            screen_height: self.screen_size.1,
            work_area: monitor.work,
            bar_height: self.x.bar_height(),
            respect_hints: self.config.resize_hints || !monitor.layout().arranges(),
        };

        match apply_size_hints(client, requested, interactive, &bounds) {
            Some(geometry) => self.resize_client(id, geometry),
            None => Ok(()),
        }
    }

    pub(super) fn resize_client(&mut self, id: ClientId, geometry: Rect) -> WmResult<()> {
        let border_width = self.effective_border(id);
        let client = self.state.client_mut(id);
        client.old_geometry = client.geometry;
        client.geometry = geometry;
        let window = client.window;

        self.x.configure_window(window, geometry, border_width)?;
        self.x.send_configure_notify(window, geometry, border_width)
    }

    /// Border actually drawn: tiled clients lose it under monocle or when they
    /// are alone on their monitor.
    fn effective_border(&self, id: ClientId) -> i32 {
        let client = self.state.client(id);
        if client.is_floating || client.is_fullscreen {
            return client.border_width;
        }
        let monitor_index = client.monitor_index;
        let layout = self.state.monitors[monitor_index].layout();
        if layout == LayoutKind::Monocle || self.state.tiled_clients(monitor_index).len() == 1 {
            0
        } else {
            client.border_width
        }
    }

    /// Raises a floating selection, keeps tiled clients under the bar in
    /// focus order and drops the crossing events this produces.
    pub(super) fn restack(&mut self, monitor_index: usize) -> WmResult<()> {
        self.draw_bar(monitor_index)?;

        let monitor = &self.state.monitors[monitor_index];
        let Some(selected) = monitor.selected else {
            return Ok(());
        };
        let arranges = monitor.layout().arranges();
        let bar_window = monitor.bar_window;

        let selected = self.state.client(selected);
        if selected.is_floating || !arranges {
            self.x.raise_window(selected.window)?;
        }

        if arranges && let Some(mut sibling) = bar_window {
            let tiled: Vec<_> = self
                .state
                .stack_of(monitor_index)
                .filter(|&id| !self.state.client(id).is_floating && self.state.is_visible(id))
                .map(|id| self.state.client(id).window)
                .collect();
            for window in tiled {
                self.x.stack_below(window, sibling)?;
                sibling = window;
            }
        }

        self.x.flush()?;
        self.x.discard_enter_events()
    }

    pub(super) fn draw_bar(&mut self, monitor_index: usize) -> WmResult<()> {
        let content = BarContent::build(&self.state, monitor_index, &self.tag_names);
        let monitor = &mut self.state.monitors[monitor_index];
        monitor.layout_symbol = content.layout_symbol.clone();

        match monitor.bar_window {
            Some(bar) if monitor.show_bar => {
                let width = monitor.work.width;
                self.x.draw_bar(bar, width, &content)
            }
            _ => Ok(()),
        }
    }

    pub(super) fn draw_bars(&mut self) -> WmResult<()> {
        for index in 0..self.state.monitors.len() {
            self.draw_bar(index)?;
        }
        Ok(())
    }
}
