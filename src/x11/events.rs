use super::X11Connection;
use crate::events::{ClientMessage, ConfigureRequest, FullscreenAction, PropertyKind, WmEvent};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{Atom, AtomEnum, Mapping, NotifyDetail, NotifyMode, Property};

/// `_NET_WM_STATE` client message actions.
fn fullscreen_action(action: u32) -> Option<FullscreenAction> {
    match action {
        0 => Some(FullscreenAction::Remove),
        1 => Some(FullscreenAction::Add),
        2 => Some(FullscreenAction::Toggle),
        _ => None,
    }
}

impl X11Connection {
    pub(super) fn translate(&mut self, event: Event) -> WmEvent {
        match event {
            Event::ButtonPress(event) => WmEvent::ButtonPress {
                window: event.event,
                button: event.detail,
                state: u16::from(event.state),
                x: event.event_x as i32,
                root_x: event.root_x as i32,
                root_y: event.root_y as i32,
            },
            Event::ButtonRelease(_) => WmEvent::ButtonRelease,
            Event::ClientMessage(event) => {
                let data = event.data.as_data32();
                let message = if event.type_ == self.atoms._NET_WM_STATE
                    && (data[1] == self.atoms._NET_WM_STATE_FULLSCREEN
                        || data[2] == self.atoms._NET_WM_STATE_FULLSCREEN)
                {
                    fullscreen_action(data[0]).map_or(ClientMessage::Other, ClientMessage::Fullscreen)
                } else if event.type_ == self.atoms._NET_ACTIVE_WINDOW {
                    ClientMessage::ActivateWindow
                } else {
                    ClientMessage::Other
                };
                WmEvent::ClientMessage {
                    window: event.window,
                    message,
                }
            }
            Event::ConfigureRequest(event) => WmEvent::ConfigureRequest(ConfigureRequest {
                window: event.window,
                x: event.x as i32,
                y: event.y as i32,
                width: event.width as i32,
                height: event.height as i32,
                border_width: event.border_width as i32,
                sibling: event.sibling,
                stack_mode: u32::from(event.stack_mode) as u8,
                value_mask: u16::from(event.value_mask),
            }),
            Event::ConfigureNotify(event) => {
                if event.window == self.screen.root {
                    self.screen.width_in_pixels = event.width;
                    self.screen.height_in_pixels = event.height;
                }
                WmEvent::ConfigureNotify {
                    window: event.window,
                    width: event.width as i32,
                    height: event.height as i32,
                }
            }
            Event::DestroyNotify(event) => WmEvent::DestroyNotify {
                window: event.window,
            },
            Event::EnterNotify(event) => WmEvent::EnterNotify {
                window: event.event,
                is_normal: event.mode == NotifyMode::NORMAL && event.detail != NotifyDetail::INFERIOR,
            },
            Event::Expose(event) => WmEvent::Expose {
                window: event.window,
                count: event.count,
            },
            Event::FocusIn(event) => WmEvent::FocusIn {
                window: event.event,
            },
            Event::KeyPress(event) => WmEvent::KeyPress {
                keysym: self.keyboard.keysym(event.detail),
                state: u16::from(event.state),
            },
            Event::MappingNotify(event) => WmEvent::MappingNotify {
                keyboard: event.request == Mapping::KEYBOARD,
            },
            Event::MapRequest(event) => WmEvent::MapRequest {
                window: event.window,
            },
            Event::MotionNotify(event) => WmEvent::MotionNotify {
                window: event.event,
                root_x: event.root_x as i32,
                root_y: event.root_y as i32,
            },
            Event::PropertyNotify(event) => WmEvent::PropertyNotify {
                window: event.window,
                property: property_kind(
                    event.atom,
                    event.window == self.screen.root,
                    self.atoms._NET_WM_NAME,
                    self.atoms._NET_WM_WINDOW_TYPE,
                ),
                deleted: event.state == Property::DELETE,
            },
            Event::UnmapNotify(event) => WmEvent::UnmapNotify {
                window: event.window,
                synthetic: event.response_type & 0x80 != 0,
            },
            _ => WmEvent::Ignored,
        }
    }
}

/// The status text lives in the root's `WM_NAME` only.
fn property_kind(atom: Atom, on_root: bool, net_wm_name: Atom, net_wm_window_type: Atom) -> PropertyKind {
    let wm_name = atom == u32::from(AtomEnum::WM_NAME);
    if on_root {
        return if wm_name {
            PropertyKind::RootName
        } else {
            PropertyKind::Other
        };
    }

    match atom {
        _ if wm_name || atom == net_wm_name => PropertyKind::Title,
        _ if atom == u32::from(AtomEnum::WM_TRANSIENT_FOR) => PropertyKind::TransientFor,
        _ if atom == u32::from(AtomEnum::WM_NORMAL_HINTS) => PropertyKind::NormalHints,
        _ if atom == u32::from(AtomEnum::WM_HINTS) => PropertyKind::WmHints,
        _ if atom == net_wm_window_type => PropertyKind::WindowType,
        _ => PropertyKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_actions() {
        assert_eq!(fullscreen_action(0), Some(FullscreenAction::Remove));
        assert_eq!(fullscreen_action(1), Some(FullscreenAction::Add));
        assert_eq!(fullscreen_action(2), Some(FullscreenAction::Toggle));
        assert_eq!(fullscreen_action(3), None);
    }

    #[test]
    fn test_root_status_comes_from_wm_name_only() {
        const NET_WM_NAME: Atom = 300;
        const NET_WM_WINDOW_TYPE: Atom = 301;
        let kind = |atom, on_root| property_kind(atom, on_root, NET_WM_NAME, NET_WM_WINDOW_TYPE);

        let wm_name = u32::from(AtomEnum::WM_NAME);
        assert_eq!(kind(wm_name, true), PropertyKind::RootName);
        assert_eq!(kind(NET_WM_NAME, true), PropertyKind::Other);
        assert_eq!(kind(wm_name, false), PropertyKind::Title);
        assert_eq!(kind(NET_WM_NAME, false), PropertyKind::Title);
        assert_eq!(kind(NET_WM_WINDOW_TYPE, false), PropertyKind::WindowType);
        assert_eq!(kind(u32::from(AtomEnum::WM_HINTS), false), PropertyKind::WmHints);
    }
}
