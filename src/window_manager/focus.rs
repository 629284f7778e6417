use super::WindowManager;
use crate::client::ClientId;
use crate::errors::WmResult;
use crate::window_system::{BorderColor, WindowSystem};
use log::debug;

impl<X: WindowSystem> WindowManager<X> {
    /// Focuses `target`, or the most recently focused visible client of the
    /// selected monitor when `target` is missing or hidden.
    pub(super) fn focus(&mut self, target: Option<ClientId>) -> WmResult<()> {
        let target = target
            .filter(|&id| self.state.is_visible(id))
            .or_else(|| self.state.first_visible_in_stack(self.state.selected_monitor));

        if let Some(previous) = self.state.selected_client()
            && Some(previous) != target
        {
            self.unfocus(previous, false)?;
        }

        match target {
            Some(id) => {
                let monitor_index = self.state.client(id).monitor_index;
                if monitor_index != self.state.selected_monitor {
                    self.state.selected_monitor = monitor_index;
                }
                if self.state.client(id).is_urgent {
                    self.clear_urgent(id)?;
                }

                self.state.detach_stack(id);
                self.state.attach_stack(id);

                let window = self.state.client(id).window;
                self.x.grab_buttons(window, true, &self.config.buttons)?;
                self.x.set_border_color(window, BorderColor::Focused)?;
                self.set_focus(id)?;
            }
            None => self.x.set_input_focus(None)?,
        }

        self.state.selected_monitor_mut().selected = target;
        self.draw_bars()
    }

    pub(super) fn unfocus(&mut self, id: ClientId, revert_input: bool) -> WmResult<()> {
        let window = self.state.client(id).window;
        self.x.grab_buttons(window, false, &self.config.buttons)?;
        self.x.set_border_color(window, BorderColor::Normal)?;
        if revert_input {
            self.x.set_input_focus(None)?;
        }
        Ok(())
    }

    pub(super) fn set_focus(&mut self, id: ClientId) -> WmResult<()> {
        let client = self.state.client(id);
        let window = client.window;
        if !client.never_focus {
            self.x.set_input_focus(Some(window))?;
        }
        if self.x.send_take_focus(window)? {
            debug!("sent WM_TAKE_FOCUS to {:#x}", window);
        }
        Ok(())
    }

    pub(super) fn clear_urgent(&mut self, id: ClientId) -> WmResult<()> {
        let client = self.state.client_mut(id);
        client.is_urgent = false;
        let window = client.window;
        self.x.clear_urgency(window)
    }

    /// Moves focus to the next (`direction > 0`) or previous visible client in
    /// list order, wrapping at the ends.
    pub(super) fn focus_stack(&mut self, direction: i32) -> WmResult<()> {
        let Some(selected) = self.state.selected_client() else {
            return Ok(());
        };
        let visible = self.state.visible_clients(self.state.selected_monitor);
        let Some(position) = visible.iter().position(|&id| id == selected) else {
            return Ok(());
        };

        let count = visible.len();
        let next = if direction > 0 {
            (position + 1) % count
        } else {
            (position + count - 1) % count
        };

        self.focus(Some(visible[next]))?;
        self.restack(self.state.selected_monitor)
    }

    /// Focuses the `n`th visible client (1-based); indices past the end wrap.
    pub(super) fn focus_nth(&mut self, n: i32) -> WmResult<()> {
        if self.state.selected_client().is_none() {
            return Ok(());
        }
        let visible = self.state.visible_clients(self.state.selected_monitor);
        if visible.is_empty() || n < 1 {
            return Ok(());
        }
        let index = (n as usize - 1) % visible.len();
        self.focus(Some(visible[index]))?;
        self.restack(self.state.selected_monitor)
    }

    pub(super) fn focus_monitor(&mut self, direction: i32) -> WmResult<()> {
        if self.state.monitors.len() < 2 {
            return Ok(());
        }
        let target = self.state.direction_to_monitor(direction);
        if target == self.state.selected_monitor {
            return Ok(());
        }

        if let Some(selected) = self.state.selected_client() {
            self.unfocus(selected, true)?;
        }
        self.state.selected_monitor = target;
        self.focus(None)
    }

    /// Swaps the selected tiled client into the master area. The current
    /// master trades places with the next tiled client instead.
    pub(super) fn zoom(&mut self) -> WmResult<()> {
        let monitor = self.state.selected_monitor();
        let selected = monitor.selected;
        if !monitor.layout().arranges()
            || selected.is_some_and(|id| self.state.client(id).is_floating)
        {
            return Ok(());
        }

        let Some(mut target) = selected else {
            return Ok(());
        };
        if Some(target) == self.state.next_tiled(monitor.clients) {
            match self.state.next_tiled(self.state.client(target).next) {
                Some(next) => target = next,
                None => return Ok(()),
            }
        }
        self.pop(target)
    }

    /// Moves a client to the head of its monitor's list and focuses it.
    pub(super) fn pop(&mut self, id: ClientId) -> WmResult<()> {
        self.state.detach(id);
        self.state.attach(id);
        self.focus(Some(id))?;
        self.arrange(Some(self.state.client(id).monitor_index))
    }
}
