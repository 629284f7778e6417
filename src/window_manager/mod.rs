mod actions;
mod arrange;
mod drag;
mod focus;
mod handlers;
mod manage;

#[cfg(test)]
mod mock;

pub use drag::DragState;

use crate::Config;
use crate::errors::WmResult;
use crate::events::WmEvent;
use crate::geometry::Rect;
use crate::state::WmState;
use crate::window_system::{ShutdownRequest, WindowSystem};
use crate::x11::X11Connection;
use log::{debug, info};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use std::collections::VecDeque;

pub struct WindowManager<X: WindowSystem> {
    x: X,
    config: Config,
    state: WmState,
    tag_names: Vec<String>,
    screen_size: (i32, i32),
    drag: DragState,
    deferred: VecDeque<WmEvent>,
    motion_monitor: Option<usize>,
    running: bool,
    restart: bool,
}

impl WindowManager<X11Connection> {
    pub fn connect(config: Config) -> WmResult<Self> {
        let connection = X11Connection::connect(&config)?;
        Self::new(connection, config)
    }
}

impl<X: WindowSystem> WindowManager<X> {
    pub fn new(x: X, config: Config) -> WmResult<Self> {
        let screen_size = x.screen_size();
        let tag_names = config.tags.iter().map(|tag| tag.name.clone()).collect();

        let mut window_manager = Self {
            x,
            config,
            state: WmState::new(Vec::new()),
            tag_names,
            screen_size,
            drag: DragState::Idle,
            deferred: VecDeque::new(),
            motion_monitor: None,
            running: true,
            restart: false,
        };

        window_manager.update_geometry()?;
        window_manager.update_bars()?;
        window_manager.update_status()?;
        window_manager
            .x
            .grab_keys(&window_manager.config.keybindings)?;
        window_manager.x.set_client_list(&[])?;
        window_manager.focus(None)?;
        window_manager.x.flush()?;

        Ok(window_manager)
    }

    pub fn state(&self) -> &WmState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Adopts existing windows, then dispatches events until asked to quit.
    /// Returns true when the process should re-exec itself.
    pub fn run(&mut self) -> WmResult<bool> {
        info!("tagwm {} started", env!("CARGO_PKG_VERSION"));

        self.scan()?;
        for command in self.config.autostart.clone() {
            self.spawn(&["sh".to_string(), "-c".to_string(), command]);
        }
        self.x.flush()?;

        while self.running {
            self.reap_children();
            if let Some(request) = self.x.take_shutdown_request() {
                self.quit(request == ShutdownRequest::Restart);
                continue;
            }
            let event = match self.deferred.pop_front() {
                Some(event) => event,
                None => self.x.next_event()?,
            };
            self.handle_event(event)?;
            self.x.flush()?;
        }

        self.cleanup()?;
        Ok(self.restart)
    }

    /// Collects every child that has exited since the last call, without
    /// blocking.
    fn reap_children(&self) {
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) | Err(_) => break,
                Ok(status) => debug!("reaped child: {:?}", status),
            }
        }
    }

    fn pointer_monitor(&mut self) -> WmResult<usize> {
        Ok(match self.x.pointer_position()? {
            Some((x, y)) => self.state.rect_to_monitor(&Rect::new(x, y, 1, 1)),
            None => self.state.selected_monitor,
        })
    }

    /// Monitor a window belongs to: the pointer's monitor for the root, the
    /// owning monitor for bars and clients, the selected one otherwise.
    fn window_to_monitor(&mut self, window: u32) -> WmResult<usize> {
        if window == self.x.root() {
            return self.pointer_monitor();
        }
        if let Some(monitor) = self.state.bar_to_monitor(window) {
            return Ok(monitor);
        }
        if let Some(id) = self.state.window_to_client(window) {
            return Ok(self.state.client(id).monitor_index);
        }
        Ok(self.state.selected_monitor)
    }

    fn update_geometry(&mut self) -> WmResult<bool> {
        let screens = self.x.query_monitors()?;
        let bar_height = self.x.bar_height();
        let changes = self
            .state
            .reconcile_monitors(&screens, &self.config, bar_height);

        for bar in changes.removed_bars {
            self.x.destroy_bar(bar)?;
        }
        if changes.dirty {
            info!("monitor layout changed: {} monitor(s)", self.state.monitors.len());
            self.state.selected_monitor = self.pointer_monitor()?;
        }
        Ok(changes.dirty)
    }

    fn update_bars(&mut self) -> WmResult<()> {
        let bar_height = self.x.bar_height();
        for index in 0..self.state.monitors.len() {
            let geometry = self.state.monitors[index].bar_rect(bar_height);
            match self.state.monitors[index].bar_window {
                Some(bar) => self.x.move_bar(bar, geometry)?,
                None => {
                    let bar = self.x.create_bar(geometry)?;
                    self.state.monitors[index].bar_window = Some(bar);
                }
            }
        }
        Ok(())
    }

    fn update_status(&mut self) -> WmResult<()> {
        self.state.status_text = self
            .x
            .root_name()?
            .unwrap_or_else(|| format!("tagwm-{}", env!("CARGO_PKG_VERSION")));
        self.draw_bar(self.state.selected_monitor)
    }

    fn update_client_list(&mut self) -> WmResult<()> {
        let windows = self.state.client_windows();
        self.x.set_client_list(&windows)
    }
}
