use super::WindowManager;
use crate::client::{ClientId, TagMask};
use crate::errors::WmResult;
use crate::keyboard::{Arg, KeyAction};
use crate::layout::LayoutKind;
use crate::window_system::WindowSystem;
use log::{debug, info, warn};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

impl<X: WindowSystem> WindowManager<X> {
    pub(super) fn run_action(&mut self, action: KeyAction, arg: &Arg) -> WmResult<()> {
        match action {
            KeyAction::Spawn => {
                if let Some(argv) = arg.as_command() {
                    self.spawn(&argv);
                }
                Ok(())
            }
            KeyAction::KillClient => self.kill_client(),
            KeyAction::FocusStack => self.focus_stack(arg.as_int().unwrap_or(1)),
            KeyAction::FocusNth => self.focus_nth(arg.as_int().unwrap_or(1)),
            KeyAction::IncNMaster => self.inc_nmaster(arg.as_int().unwrap_or(1)),
            KeyAction::SetMFact => match arg.as_float() {
                Some(value) => self.set_mfact(value),
                None => Ok(()),
            },
            KeyAction::Zoom => self.zoom(),
            KeyAction::View => self.view(arg.as_tags().unwrap_or(0)),
            KeyAction::ToggleView => match arg.as_tags() {
                Some(mask) => self.toggle_view(mask),
                None => Ok(()),
            },
            KeyAction::Tag => match arg.as_tags() {
                Some(mask) => self.tag(mask),
                None => Ok(()),
            },
            KeyAction::ToggleTag => match arg.as_tags() {
                Some(mask) => self.toggle_tag(mask),
                None => Ok(()),
            },
            KeyAction::SetLayout => self.set_layout(arg.as_layout()),
            KeyAction::ToggleFloating => self.toggle_floating(),
            KeyAction::ToggleFullScreen => match self.state.selected_client() {
                Some(id) => {
                    let fullscreen = !self.state.client(id).is_fullscreen;
                    self.set_fullscreen(id, fullscreen)
                }
                None => Ok(()),
            },
            KeyAction::ToggleBar => self.toggle_bar(),
            KeyAction::FocusMonitor => self.focus_monitor(arg.as_int().unwrap_or(1)),
            KeyAction::TagMonitor => self.tag_monitor(arg.as_int().unwrap_or(1)),
            KeyAction::WinView => self.win_view(),
            KeyAction::MoveMouse => self.move_mouse(),
            KeyAction::ResizeMouse => self.resize_mouse(),
            KeyAction::Quit => {
                self.quit(false);
                Ok(())
            }
            KeyAction::Restart => {
                self.quit(true);
                Ok(())
            }
            KeyAction::None => Ok(()),
        }
    }

    /// Starts `argv` detached in its own session. Children are reaped by the
    /// event loop.
    pub(super) fn spawn(&self, argv: &[String]) {
        let Some((program, args)) = argv.split_first() else {
            return;
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid().map_err(std::io::Error::from)?;
                Ok(())
            });
        }

        match command.spawn() {
            Ok(child) => debug!("spawned {:?} as pid {}", argv, child.id()),
            Err(error) => warn!("failed to spawn {:?}: {}", argv, error),
        }
    }

    /// Switches `monitor_index` to `mask`, moving its bar when the restored
    /// per-tag settings change its visibility.
    pub(super) fn view_on(&mut self, monitor_index: usize, mask: TagMask) -> WmResult<()> {
        let monitor = &mut self.state.monitors[monitor_index];
        let bar_was_shown = monitor.show_bar;
        if !monitor.view(mask) {
            return Ok(());
        }
        if monitor.show_bar != bar_was_shown {
            self.reposition_bar(monitor_index)?;
        }
        self.focus(None)?;
        self.arrange(Some(monitor_index))
    }

    pub(super) fn view(&mut self, mask: TagMask) -> WmResult<()> {
        self.view_on(self.state.selected_monitor, mask)
    }

    pub(super) fn toggle_view(&mut self, mask: TagMask) -> WmResult<()> {
        let monitor_index = self.state.selected_monitor;
        let monitor = &mut self.state.monitors[monitor_index];
        let bar_was_shown = monitor.show_bar;
        if !monitor.toggle_view(mask) {
            return Ok(());
        }
        if monitor.show_bar != bar_was_shown {
            self.reposition_bar(monitor_index)?;
        }
        self.focus(None)?;
        self.arrange(Some(monitor_index))
    }

    pub(super) fn tag(&mut self, mask: TagMask) -> WmResult<()> {
        let Some(id) = self.state.selected_client() else {
            return Ok(());
        };
        let mask = mask & self.state.selected_monitor().tag_mask();
        if mask == 0 {
            return Ok(());
        }
        self.state.client_mut(id).tags = mask;
        self.focus(None)?;
        self.arrange(Some(self.state.selected_monitor))
    }

    pub(super) fn toggle_tag(&mut self, mask: TagMask) -> WmResult<()> {
        let Some(id) = self.state.selected_client() else {
            return Ok(());
        };
        let mask = mask & self.state.selected_monitor().tag_mask();
        let tags = self.state.client(id).tags ^ mask;
        if tags == 0 {
            return Ok(());
        }
        self.state.client_mut(id).tags = tags;
        self.focus(None)?;
        self.arrange(Some(self.state.selected_monitor))
    }

    pub(super) fn set_layout(&mut self, layout: Option<LayoutKind>) -> WmResult<()> {
        let monitor_index = self.state.selected_monitor;
        self.state.monitors[monitor_index].set_layout(layout);
        debug!(
            "monitor {} layout is now {}",
            monitor_index,
            self.state.monitors[monitor_index].layout().as_str()
        );

        if self.state.selected_client().is_some() {
            self.arrange(Some(monitor_index))
        } else {
            self.draw_bar(monitor_index)
        }
    }

    pub(super) fn set_mfact(&mut self, value: f32) -> WmResult<()> {
        let monitor_index = self.state.selected_monitor;
        if self.state.monitors[monitor_index].set_master_factor(value) {
            self.arrange(Some(monitor_index))
        } else {
            Ok(())
        }
    }

    pub(super) fn inc_nmaster(&mut self, delta: i32) -> WmResult<()> {
        let monitor_index = self.state.selected_monitor;
        self.state.monitors[monitor_index].inc_master_count(delta);
        self.arrange(Some(monitor_index))
    }

    pub(super) fn toggle_floating(&mut self) -> WmResult<()> {
        match self.state.selected_client() {
            Some(id) => self.toggle_floating_client(id),
            None => Ok(()),
        }
    }

    pub(super) fn toggle_floating_client(&mut self, id: ClientId) -> WmResult<()> {
        let border_width = self.config.border_width as i32;

        let client = self.state.client_mut(id);
        if client.is_fullscreen {
            return Ok(());
        }
        client.is_floating = !client.is_floating || client.is_fixed;
        let monitor_index = client.monitor_index;
        if client.is_floating {
            client.border_width = border_width;
            let geometry = client.geometry.inset_border(client.border_width);
            self.resize(id, geometry, false)?;
        }
        self.arrange(Some(monitor_index))
    }

    /// Covers the whole monitor without a border, or puts the client back the
    /// way it was before.
    pub(super) fn set_fullscreen(&mut self, id: ClientId, fullscreen: bool) -> WmResult<()> {
        let client = self.state.client(id);
        if client.is_fullscreen == fullscreen {
            return Ok(());
        }
        let window = client.window;
        let monitor_index = client.monitor_index;
        self.x.set_fullscreen_state(window, fullscreen)?;

        if fullscreen {
            let screen = self.state.monitors[monitor_index].screen;
            let client = self.state.client_mut(id);
            client.is_fullscreen = true;
            client.old_state = client.is_floating;
            client.old_border_width = client.border_width;
            client.border_width = 0;
            client.is_floating = true;
            self.resize_client(id, screen)?;
            self.x.raise_window(window)
        } else {
            let client = self.state.client_mut(id);
            client.is_fullscreen = false;
            client.is_floating = client.old_state;
            client.border_width = client.old_border_width;
            let geometry = client.old_geometry;
            self.resize_client(id, geometry)?;
            self.arrange(Some(monitor_index))
        }
    }

    pub(super) fn toggle_bar(&mut self) -> WmResult<()> {
        let monitor_index = self.state.selected_monitor;
        let bar_height = self.x.bar_height();
        self.state.monitors[monitor_index].toggle_bar(bar_height);
        self.reposition_bar(monitor_index)?;
        self.arrange(Some(monitor_index))
    }

    fn reposition_bar(&mut self, monitor_index: usize) -> WmResult<()> {
        let bar_height = self.x.bar_height();
        let monitor = &mut self.state.monitors[monitor_index];
        monitor.update_bar_position(bar_height);
        match monitor.bar_window {
            Some(bar) => self.x.move_bar(bar, monitor.bar_rect(bar_height)),
            None => Ok(()),
        }
    }

    pub(super) fn tag_monitor(&mut self, direction: i32) -> WmResult<()> {
        let Some(id) = self.state.selected_client() else {
            return Ok(());
        };
        if self.state.monitors.len() < 2 {
            return Ok(());
        }
        let target = self.state.direction_to_monitor(direction);
        self.send_to_monitor(id, target)
    }

    /// Moves a client to another monitor where it takes that monitor's
    /// current tags.
    pub(super) fn send_to_monitor(&mut self, id: ClientId, target: usize) -> WmResult<()> {
        if self.state.client(id).monitor_index == target {
            return Ok(());
        }

        self.unfocus(id, true)?;
        self.state.detach(id);
        self.state.detach_stack(id);

        let tags = self.state.monitors[target].active_tags();
        let client = self.state.client_mut(id);
        client.monitor_index = target;
        client.tags = tags;

        self.state.attach(id);
        self.state.attach_stack(id);
        self.focus(None)?;
        self.arrange(None)
    }

    /// Views the tags of whatever client holds input focus.
    pub(super) fn win_view(&mut self) -> WmResult<()> {
        let Some(window) = self.x.focused_toplevel()? else {
            return Ok(());
        };
        match self.state.window_to_client(window) {
            Some(id) => self.view(self.state.client(id).tags),
            None => Ok(()),
        }
    }

    pub(super) fn kill_client(&mut self) -> WmResult<()> {
        match self.state.selected_client() {
            Some(id) => {
                let window = self.state.client(id).window;
                self.x.close_window(window)
            }
            None => Ok(()),
        }
    }

    pub(super) fn quit(&mut self, restart: bool) {
        info!("{} requested", if restart { "restart" } else { "quit" });
        self.restart = restart;
        self.running = false;
    }
}
