use crate::geometry::Rect;
use log::debug;
use x11rb::protocol::xinerama::ConnectionExt as _;
use x11rb::protocol::xproto::Screen;
use x11rb::rust_connection::RustConnection;

/// Physical screens from Xinerama, or the whole root window when Xinerama is
/// inactive or unavailable.
pub fn detect_monitors(connection: &RustConnection, screen: &Screen) -> Vec<Rect> {
    let fallback_monitors = || {
        vec![Rect::new(
            0,
            0,
            screen.width_in_pixels as i32,
            screen.height_in_pixels as i32,
        )]
    };

    let xinerama_active = connection
        .xinerama_is_active()
        .ok()
        .and_then(|cookie| cookie.reply().ok())
        .is_some_and(|reply| reply.state != 0);

    if !xinerama_active {
        return fallback_monitors();
    }

    let Some(reply) = connection
        .xinerama_query_screens()
        .ok()
        .and_then(|cookie| cookie.reply().ok())
    else {
        return fallback_monitors();
    };

    let screens = reply.screen_info.iter().map(|info| {
        Rect::new(
            info.x_org as i32,
            info.y_org as i32,
            info.width as i32,
            info.height as i32,
        )
    });
    let monitors = unique_screens(screens);
    debug!("xinerama reports {} unique screen(s)", monitors.len());

    if monitors.is_empty() {
        fallback_monitors()
    } else {
        monitors
    }
}

/// Drops empty and duplicate (cloned output) screens, keeping the first.
fn unique_screens(screens: impl Iterator<Item = Rect>) -> Vec<Rect> {
    let mut monitors = Vec::<Rect>::new();
    for screen in screens {
        let has_valid_dimensions = screen.width > 0 && screen.height > 0;
        if has_valid_dimensions && !monitors.contains(&screen) {
            monitors.push(screen);
        }
    }
    monitors
}
