use crate::Config;
use crate::client::{Client, ClientId, ClientRegistry};
use crate::geometry::Rect;
use crate::monitor::Monitor;
use x11rb::protocol::xproto::Window;

/// Everything the window manager knows about clients and monitors.
#[derive(Debug)]
pub struct WmState {
    pub clients: ClientRegistry,
    pub monitors: Vec<Monitor>,
    pub selected_monitor: usize,
    pub status_text: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct MonitorChanges {
    pub dirty: bool,
    pub removed_bars: Vec<Window>,
}

/// Walks one of a monitor's client lists, yielding ids in list order.
pub struct ClientIter<'a> {
    clients: &'a ClientRegistry,
    next: Option<ClientId>,
    stack_order: bool,
}

impl Iterator for ClientIter<'_> {
    type Item = ClientId;

    fn next(&mut self) -> Option<ClientId> {
        let id = self.next?;
        let client = &self.clients[id];
        self.next = if self.stack_order {
            client.stack_next
        } else {
            client.next
        };
        Some(id)
    }
}

impl WmState {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            clients: ClientRegistry::new(),
            monitors,
            selected_monitor: 0,
            status_text: String::new(),
        }
    }

    pub fn selected_monitor(&self) -> &Monitor {
        &self.monitors[self.selected_monitor]
    }

    pub fn selected_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.selected_monitor]
    }

    pub fn selected_client(&self) -> Option<ClientId> {
        self.selected_monitor().selected
    }

    pub fn client(&self, id: ClientId) -> &Client {
        &self.clients[id]
    }

    pub fn client_mut(&mut self, id: ClientId) -> &mut Client {
        &mut self.clients[id]
    }

    pub fn monitor_of(&self, id: ClientId) -> &Monitor {
        &self.monitors[self.clients[id].monitor_index]
    }

    pub fn is_visible(&self, id: ClientId) -> bool {
        let client = &self.clients[id];
        client.is_visible_on(self.monitors[client.monitor_index].active_tags())
    }

    pub fn window_to_client(&self, window: Window) -> Option<ClientId> {
        self.clients.find_by_window(window)
    }

    /// Clients of a monitor in insertion (tiling) order.
    pub fn clients_of(&self, monitor_index: usize) -> ClientIter<'_> {
        ClientIter {
            clients: &self.clients,
            next: self.monitors[monitor_index].clients,
            stack_order: false,
        }
    }

    /// Clients of a monitor from most to least recently focused.
    pub fn stack_of(&self, monitor_index: usize) -> ClientIter<'_> {
        ClientIter {
            clients: &self.clients,
            next: self.monitors[monitor_index].stack,
            stack_order: true,
        }
    }

    pub fn attach(&mut self, id: ClientId) {
        let monitor_index = self.clients[id].monitor_index;
        let head = self.monitors[monitor_index].clients;
        let client = &mut self.clients[id];
        debug_assert!(!client.in_client_list, "client attached twice");
        client.next = head;
        client.in_client_list = true;
        self.monitors[monitor_index].clients = Some(id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        let monitor_index = self.clients[id].monitor_index;
        let head = self.monitors[monitor_index].stack;
        let client = &mut self.clients[id];
        debug_assert!(!client.in_stack_list, "client attached to stack twice");
        client.stack_next = head;
        client.in_stack_list = true;
        self.monitors[monitor_index].stack = Some(id);
    }

    pub fn detach(&mut self, id: ClientId) {
        let monitor_index = self.clients[id].monitor_index;
        let next = self.clients[id].next;

        if self.monitors[monitor_index].clients == Some(id) {
            self.monitors[monitor_index].clients = next;
        } else {
            let previous = self
                .clients_of(monitor_index)
                .find(|&candidate| self.clients[candidate].next == Some(id));
            if let Some(previous) = previous {
                self.clients[previous].next = next;
            }
        }

        let client = &mut self.clients[id];
        client.next = None;
        client.in_client_list = false;
    }

    /// Removes a client from the focus history. If it was the monitor's
    /// selection, the most recently focused visible client takes over.
    pub fn detach_stack(&mut self, id: ClientId) {
        let monitor_index = self.clients[id].monitor_index;
        let next = self.clients[id].stack_next;

        if self.monitors[monitor_index].stack == Some(id) {
            self.monitors[monitor_index].stack = next;
        } else {
            let previous = self
                .stack_of(monitor_index)
                .find(|&candidate| self.clients[candidate].stack_next == Some(id));
            if let Some(previous) = previous {
                self.clients[previous].stack_next = next;
            }
        }

        let client = &mut self.clients[id];
        client.stack_next = None;
        client.in_stack_list = false;

        if self.monitors[monitor_index].selected == Some(id) {
            self.monitors[monitor_index].selected = self.first_visible_in_stack(monitor_index);
        }
    }

    pub fn first_visible_in_stack(&self, monitor_index: usize) -> Option<ClientId> {
        self.stack_of(monitor_index).find(|&id| self.is_visible(id))
    }

    /// First tiled, visible client at or after `from` in the client list.
    pub fn next_tiled(&self, from: Option<ClientId>) -> Option<ClientId> {
        let mut current = from;
        while let Some(id) = current {
            let client = &self.clients[id];
            if !client.is_floating && self.is_visible(id) {
                return Some(id);
            }
            current = client.next;
        }
        None
    }

    pub fn tiled_clients(&self, monitor_index: usize) -> Vec<ClientId> {
        let mut tiled = Vec::new();
        let mut current = self.next_tiled(self.monitors[monitor_index].clients);
        while let Some(id) = current {
            tiled.push(id);
            current = self.next_tiled(self.clients[id].next);
        }
        tiled
    }

    pub fn visible_clients(&self, monitor_index: usize) -> Vec<ClientId> {
        self.clients_of(monitor_index)
            .filter(|&id| self.is_visible(id))
            .collect()
    }

    /// Reassigns a client to another monitor, keeping its tags.
    pub fn move_to_monitor(&mut self, id: ClientId, target: usize) {
        self.detach(id);
        self.detach_stack(id);
        self.clients[id].monitor_index = target;
        self.attach(id);
        self.attach_stack(id);
    }

    /// Monitor whose work area overlaps `rect` the most; the selected monitor
    /// when none does.
    pub fn rect_to_monitor(&self, rect: &Rect) -> usize {
        let mut best = self.selected_monitor;
        let mut best_area = 0;
        for (index, monitor) in self.monitors.iter().enumerate() {
            let area = rect.intersection_area(&monitor.work);
            if area > best_area {
                best_area = area;
                best = index;
            }
        }
        best
    }

    pub fn direction_to_monitor(&self, direction: i32) -> usize {
        let count = self.monitors.len();
        if direction > 0 {
            (self.selected_monitor + 1) % count
        } else if self.selected_monitor == 0 {
            count - 1
        } else {
            self.selected_monitor - 1
        }
    }

    pub fn bar_to_monitor(&self, window: Window) -> Option<usize> {
        self.monitors
            .iter()
            .position(|monitor| monitor.bar_window == Some(window))
    }

    /// Windows of all managed clients, monitor by monitor in list order.
    pub fn client_windows(&self) -> Vec<Window> {
        (0..self.monitors.len())
            .flat_map(|index| self.clients_of(index).map(|id| self.clients[id].window))
            .collect()
    }

    /// Matches the monitor list to the current set of screen rectangles.
    /// Monitors beyond the new count are dropped and their clients move to
    /// the first monitor.
    pub fn reconcile_monitors(
        &mut self,
        screens: &[Rect],
        config: &Config,
        bar_height: i32,
    ) -> MonitorChanges {
        let mut changes = MonitorChanges::default();
        if screens.is_empty() {
            return changes;
        }

        for (num, screen) in screens.iter().enumerate() {
            match self.monitors.get_mut(num) {
                Some(monitor) if monitor.screen == *screen => {}
                Some(monitor) => {
                    monitor.num = num;
                    monitor.set_screen(*screen, bar_height);
                    changes.dirty = true;
                }
                None => {
                    self.monitors
                        .push(Monitor::new(num, *screen, config, bar_height));
                    changes.dirty = true;
                }
            }
        }

        while self.monitors.len() > screens.len() {
            let removed = self.monitors.len() - 1;
            while let Some(id) = self.monitors[removed].clients {
                self.move_to_monitor(id, 0);
                changes.dirty = true;
            }
            if self.selected_monitor == removed {
                self.selected_monitor = 0;
            }
            if let Some(monitor) = self.monitors.pop()
                && let Some(bar) = monitor.bar_window
            {
                changes.removed_bars.push(bar);
            }
        }

        if changes.dirty {
            self.selected_monitor = 0;
        }
        changes
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn state_with_monitors(count: usize) -> WmState {
        let config = Config::default();
        let monitors = (0..count)
            .map(|num| Monitor::new(num, Rect::new(num as i32 * 1000, 0, 1000, 800), &config, 20))
            .collect();
        WmState::new(monitors)
    }

    pub(crate) fn add_client(state: &mut WmState, window: Window, monitor: usize, tags: u32) -> ClientId {
        let id = state.clients.insert(Client::new(window, monitor, tags));
        state.attach(id);
        state.attach_stack(id);
        id
    }

    #[test]
    fn test_attach_inserts_at_head() {
        let mut state = state_with_monitors(1);
        let first = add_client(&mut state, 1, 0, 1);
        let second = add_client(&mut state, 2, 0, 1);
        assert_eq!(state.clients_of(0).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(state.stack_of(0).collect::<Vec<_>>(), vec![second, first]);
    }

    #[test]
    fn test_detach_from_middle() {
        let mut state = state_with_monitors(1);
        let first = add_client(&mut state, 1, 0, 1);
        let second = add_client(&mut state, 2, 0, 1);
        let third = add_client(&mut state, 3, 0, 1);

        state.detach(second);
        state.detach_stack(second);
        assert_eq!(state.clients_of(0).collect::<Vec<_>>(), vec![third, first]);
        assert_eq!(state.stack_of(0).collect::<Vec<_>>(), vec![third, first]);
    }

    #[test]
    fn test_detach_stack_reselects_first_visible() {
        let mut state = state_with_monitors(1);
        let visible = add_client(&mut state, 1, 0, 1);
        let hidden = add_client(&mut state, 2, 0, 1 << 4);
        let selected = add_client(&mut state, 3, 0, 1);
        state.monitors[0].selected = Some(selected);

        state.detach_stack(selected);
        assert_eq!(state.monitors[0].selected, Some(visible));
        assert!(!state.is_visible(hidden));
    }

    #[test]
    fn test_detach_stack_of_last_visible_clears_selection() {
        let mut state = state_with_monitors(1);
        let only = add_client(&mut state, 1, 0, 1);
        add_client(&mut state, 2, 0, 1 << 2);
        state.monitors[0].selected = Some(only);

        state.detach_stack(only);
        assert_eq!(state.monitors[0].selected, None);
    }

    #[test]
    fn test_next_tiled_skips_floating_and_hidden() {
        let mut state = state_with_monitors(1);
        let tiled = add_client(&mut state, 1, 0, 1);
        let hidden = add_client(&mut state, 2, 0, 1 << 3);
        let floating = add_client(&mut state, 3, 0, 1);
        state.client_mut(floating).is_floating = true;

        assert_eq!(state.next_tiled(state.monitors[0].clients), Some(tiled));
        assert_eq!(state.tiled_clients(0), vec![tiled]);
        assert_eq!(state.next_tiled(Some(hidden)), Some(tiled));
    }

    #[test]
    fn test_visibility_follows_view() {
        let mut state = state_with_monitors(1);
        let on_first = add_client(&mut state, 1, 0, 1);
        let on_third = add_client(&mut state, 2, 0, 1 << 2);

        state.monitors[0].view(1 << 2);
        assert!(!state.is_visible(on_first));
        assert!(state.is_visible(on_third));

        state.monitors[0].toggle_view(1);
        assert!(state.is_visible(on_first));
        assert!(state.is_visible(on_third));
    }

    #[test]
    fn test_rect_to_monitor_picks_largest_overlap() {
        let state = state_with_monitors(2);
        assert_eq!(state.rect_to_monitor(&Rect::new(900, 0, 300, 100)), 1);
        assert_eq!(state.rect_to_monitor(&Rect::new(700, 0, 400, 100)), 0);
        assert_eq!(state.rect_to_monitor(&Rect::new(-500, -500, 10, 10)), 0);
    }

    #[test]
    fn test_direction_to_monitor_wraps() {
        let mut state = state_with_monitors(3);
        assert_eq!(state.direction_to_monitor(-1), 2);
        assert_eq!(state.direction_to_monitor(1), 1);
        state.selected_monitor = 2;
        assert_eq!(state.direction_to_monitor(1), 0);
    }

    #[test]
    fn test_removed_monitor_clients_migrate_to_first() {
        let mut state = state_with_monitors(2);
        let stays = add_client(&mut state, 1, 0, 1);
        let moves = add_client(&mut state, 2, 1, 1);
        state.monitors[1].bar_window = Some(99);
        state.selected_monitor = 1;

        let changes = state.reconcile_monitors(&[Rect::new(0, 0, 1000, 800)], &Config::default(), 20);

        assert!(changes.dirty);
        assert_eq!(changes.removed_bars, vec![99]);
        assert_eq!(state.monitors.len(), 1);
        assert_eq!(state.selected_monitor, 0);
        assert_eq!(state.client(moves).monitor_index, 0);
        assert_eq!(state.clients_of(0).collect::<Vec<_>>(), vec![moves, stays]);
    }

    #[test]
    fn test_new_screen_adds_monitor() {
        let mut state = state_with_monitors(1);
        let screens = [Rect::new(0, 0, 1000, 800), Rect::new(1000, 0, 1280, 1024)];
        let changes = state.reconcile_monitors(&screens, &Config::default(), 20);
        assert!(changes.dirty);
        assert_eq!(state.monitors.len(), 2);
        assert_eq!(state.monitors[1].screen, screens[1]);

        let unchanged = state.reconcile_monitors(&screens, &Config::default(), 20);
        assert!(!unchanged.dirty);
    }
}
