use super::WindowManager;
use crate::client::ClientId;
use crate::errors::WmResult;
use crate::events::WmEvent;
use crate::geometry::Rect;
use crate::window_system::{CursorKind, WindowSystem};
use log::debug;

/// Interactive pointer operation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Moving {
        client: ClientId,
        origin: Rect,
        pointer: (i32, i32),
    },
    Resizing {
        client: ClientId,
        origin: Rect,
    },
}

impl<X: WindowSystem> WindowManager<X> {
    pub(super) fn move_mouse(&mut self) -> WmResult<()> {
        let Some(id) = self.state.selected_client() else {
            return Ok(());
        };
        if self.state.client(id).is_fullscreen {
            return Ok(());
        }
        self.restack(self.state.selected_monitor)?;

        let origin = self.state.client(id).geometry;
        if !self.x.grab_pointer(CursorKind::Move)? {
            return Ok(());
        }
        let Some(pointer) = self.x.pointer_position()? else {
            self.x.ungrab_pointer()?;
            return Ok(());
        };

        self.drag = DragState::Moving {
            client: id,
            origin,
            pointer,
        };
        self.drag_loop()?;
        self.x.ungrab_pointer()?;
        self.finish_drag(id)
    }

    pub(super) fn resize_mouse(&mut self) -> WmResult<()> {
        let Some(id) = self.state.selected_client() else {
            return Ok(());
        };
        if self.state.client(id).is_fullscreen {
            return Ok(());
        }
        self.restack(self.state.selected_monitor)?;

        let origin = self.state.client(id).geometry;
        if !self.x.grab_pointer(CursorKind::Resize)? {
            return Ok(());
        }
        self.warp_to_corner(id)?;

        self.drag = DragState::Resizing { client: id, origin };
        self.drag_loop()?;
        self.warp_to_corner(id)?;
        self.x.ungrab_pointer()?;
        self.x.discard_enter_events()?;
        self.finish_drag(id)
    }

    fn warp_to_corner(&mut self, id: ClientId) -> WmResult<()> {
        let client = self.state.client(id);
        let x = client.geometry.width + client.border_width - 1;
        let y = client.geometry.height + client.border_width - 1;
        self.x.warp_pointer(client.window, x, y)
    }

    /// Runs until the button is released. Only requests that cannot wait are
    /// handled meanwhile; the rest is queued for the main loop.
    fn drag_loop(&mut self) -> WmResult<()> {
        loop {
            match self.x.next_event()? {
                WmEvent::ButtonRelease => break,
                WmEvent::MotionNotify { root_x, root_y, .. } => self.drag_motion(root_x, root_y)?,
                WmEvent::EnterNotify { .. } | WmEvent::Ignored => {}
                event if event.is_serviced_during_drag() => self.handle_event(event)?,
                event => self.deferred.push_back(event),
            }
        }
        debug!("drag finished, {} event(s) deferred", self.deferred.len());
        self.drag = DragState::Idle;
        Ok(())
    }

    fn drag_motion(&mut self, root_x: i32, root_y: i32) -> WmResult<()> {
        let (id, requested) = match self.drag {
            DragState::Idle => return Ok(()),
            DragState::Moving {
                client,
                origin,
                pointer,
            } => {
                let x = origin.x + (root_x - pointer.0);
                let y = origin.y + (root_y - pointer.1);
                let (x, y) = self.snap_position(client, x, y)?;
                let current = self.state.client(client).geometry;
                (client, Rect::new(x, y, current.width, current.height))
            }
            DragState::Resizing { client, origin } => {
                let border_width = self.state.client(client).border_width;
                let width = (root_x - origin.x - 2 * border_width + 1).max(1);
                let height = (root_y - origin.y - 2 * border_width + 1).max(1);
                let work = self.state.selected_monitor().work;
                let current = self.state.client(client).geometry;
                if width <= work.width && height <= work.height {
                    self.float_past_snap(
                        client,
                        (width - current.width).abs(),
                        (height - current.height).abs(),
                    )?;
                }
                (client, Rect::new(current.x, current.y, width, height))
            }
        };

        let floating_layout = !self.state.selected_monitor().layout().arranges();
        if floating_layout || self.state.client(id).is_floating {
            self.resize(id, requested, true)?;
        }
        Ok(())
    }

    /// Snaps a moved window to the work area edges and lets a tiled window
    /// float once it was dragged far enough.
    fn snap_position(&mut self, id: ClientId, mut x: i32, mut y: i32) -> WmResult<(i32, i32)> {
        let work = self.state.selected_monitor().work;
        let snap = self.config.snap as i32;
        let client = self.state.client(id);
        let (outer_width, outer_height) = (client.width_with_border(), client.height_with_border());
        let current = client.geometry;

        if x >= work.x && x <= work.right() && y >= work.y && y <= work.bottom() {
            if (work.x - x).abs() < snap {
                x = work.x;
            } else if (work.right() - (x + outer_width)).abs() < snap {
                x = work.right() - outer_width;
            }
            if (work.y - y).abs() < snap {
                y = work.y;
            } else if (work.bottom() - (y + outer_height)).abs() < snap {
                y = work.bottom() - outer_height;
            }
            self.float_past_snap(id, (x - current.x).abs(), (y - current.y).abs())?;
        }
        Ok((x, y))
    }

    fn float_past_snap(&mut self, id: ClientId, dx: i32, dy: i32) -> WmResult<()> {
        let snap = self.config.snap as i32;
        let arranges = self.state.selected_monitor().layout().arranges();
        if !self.state.client(id).is_floating && arranges && (dx > snap || dy > snap) {
            self.toggle_floating_client(id)?;
        }
        Ok(())
    }

    /// A window dropped onto another monitor moves there.
    fn finish_drag(&mut self, id: ClientId) -> WmResult<()> {
        let Some(client) = self.state.clients.get(id) else {
            return Ok(());
        };
        let target = self.state.rect_to_monitor(&client.geometry);
        if target != self.state.selected_monitor {
            self.send_to_monitor(id, target)?;
            self.state.selected_monitor = target;
            self.focus(None)?;
        }
        Ok(())
    }
}
