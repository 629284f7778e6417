use crate::ColorScheme;
use crate::bar::BarContent;
use crate::errors::{WmResult, X11Error};
use crate::geometry::Rect;
use log::warn;
use x11rb::COPY_DEPTH_FROM_PARENT;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ChangeGCAux, Charinfo, ConnectionExt, CreateGCAux, CreateWindowAux, Cursor, EventMask, Font, Gcontext,
    Pixmap, QueryFontReply, Rectangle, Screen, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;

/// Core X font with the metrics needed to lay out bar text.
pub struct BarFont {
    pub id: Font,
    pub ascent: i32,
    pub height: i32,
    min_char: u16,
    char_infos: Vec<Charinfo>,
    default_width: i32,
}

impl BarFont {
    /// Opens `name`, falling back to `fixed` when it cannot be loaded.
    pub fn open(connection: &RustConnection, name: &str) -> WmResult<Self> {
        match Self::open_exact(connection, name) {
            Ok(font) => Ok(font),
            Err(error) if name != "fixed" => {
                warn!("font '{}' unavailable ({}), using 'fixed'", name, error);
                Self::open_exact(connection, "fixed")
            }
            Err(error) => Err(error),
        }
    }

    fn open_exact(connection: &RustConnection, name: &str) -> WmResult<Self> {
        let id = connection.generate_id()?;
        connection
            .open_font(id, name.as_bytes())?
            .check()
            .map_err(|_| X11Error::FontLoadFailed(name.to_string()))?;
        let reply = connection.query_font(id)?.reply()?;
        Ok(Self::from_reply(id, &reply))
    }

    fn from_reply(id: Font, reply: &QueryFontReply) -> Self {
        Self {
            id,
            ascent: reply.font_ascent as i32,
            height: reply.font_ascent as i32 + reply.font_descent as i32,
            min_char: reply.min_char_or_byte2,
            char_infos: reply.char_infos.clone(),
            default_width: reply.max_bounds.character_width as i32,
        }
    }

    /// Width of `text` as drawn, without padding.
    pub fn text_width(&self, text: &str) -> i32 {
        encode(text)
            .iter()
            .map(|&byte| {
                (byte as u16)
                    .checked_sub(self.min_char)
                    .and_then(|index| self.char_infos.get(index as usize))
                    .map_or(self.default_width, |info| info.character_width as i32)
            })
            .sum()
    }
}

/// Core fonts take Latin-1; anything outside of it is shown as `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}

/// Off-screen buffer of one bar window, copied to the window after drawing.
pub struct BarSurface {
    pub window: Window,
    pixmap: Pixmap,
    width: i32,
    height: i32,
}

impl BarSurface {
    pub fn create(
        connection: &RustConnection,
        screen: &Screen,
        geometry: Rect,
        background: u32,
        cursor: Cursor,
    ) -> WmResult<Self> {
        let window = connection.generate_id()?;
        connection.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            screen.root,
            geometry.x as i16,
            geometry.y as i16,
            geometry.width as u16,
            geometry.height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            screen.root_visual,
            &CreateWindowAux::new()
                .background_pixel(background)
                .event_mask(EventMask::EXPOSURE | EventMask::BUTTON_PRESS)
                .override_redirect(1)
                .cursor(cursor),
        )?;
        connection.map_window(window)?;

        let pixmap = Self::create_pixmap(connection, screen, window, geometry)?;
        Ok(Self {
            window,
            pixmap,
            width: geometry.width,
            height: geometry.height,
        })
    }

    fn create_pixmap(
        connection: &RustConnection,
        screen: &Screen,
        window: Window,
        geometry: Rect,
    ) -> WmResult<Pixmap> {
        let pixmap = connection.generate_id()?;
        connection.create_pixmap(
            screen.root_depth,
            pixmap,
            window,
            geometry.width.max(1) as u16,
            geometry.height.max(1) as u16,
        )?;
        Ok(pixmap)
    }

    pub fn resize(&mut self, connection: &RustConnection, screen: &Screen, geometry: Rect) -> WmResult<()> {
        if geometry.width != self.width || geometry.height != self.height {
            connection.free_pixmap(self.pixmap)?;
            self.pixmap = Self::create_pixmap(connection, screen, self.window, geometry)?;
            self.width = geometry.width;
            self.height = geometry.height;
        }
        Ok(())
    }

    pub fn destroy(self, connection: &RustConnection) -> WmResult<()> {
        connection.free_pixmap(self.pixmap)?;
        connection.destroy_window(self.window)?;
        Ok(())
    }
}

/// Color schemes the bar is painted with.
#[derive(Debug, Clone, Copy)]
pub struct BarColors {
    pub normal: ColorScheme,
    pub selected: ColorScheme,
    pub urgent: ColorScheme,
}

/// Paints bar content left to right: tags, layout symbol, title, and the
/// status text flush right. Every element is `font.text_width + padding` wide,
/// the same measure click handling uses.
pub struct BarPainter<'a> {
    pub connection: &'a RustConnection,
    pub gc: Gcontext,
    pub font: &'a BarFont,
    pub colors: BarColors,
    pub padding: i32,
}

impl BarPainter<'_> {
    pub fn element_width(&self, text: &str) -> i32 {
        self.font.text_width(text) + self.padding
    }

    pub fn paint(&self, surface: &BarSurface, width: i32, content: &BarContent) -> WmResult<()> {
        let height = surface.height;
        let box_size = self.font.height / 6 + 2;
        let box_offset = self.font.height / 9;
        let mut x = 0;

        for cell in &content.tags {
            let cell_width = self.element_width(&cell.name);
            let scheme = if cell.urgent {
                self.colors.urgent
            } else if cell.selected {
                self.colors.selected
            } else {
                self.colors.normal
            };
            self.text(surface, x, cell_width, &cell.name, scheme)?;
            if cell.occupied {
                let marker = Rect::new(x + box_offset, box_offset, box_size, box_size);
                self.marker(surface, marker, cell.holds_focused_client, scheme)?;
            }
            x += cell_width;
        }

        let symbol_width = self.element_width(&content.layout_symbol);
        self.text(surface, x, symbol_width, &content.layout_symbol, self.colors.normal)?;
        x += symbol_width;

        let status_width = match &content.status {
            Some(status) => {
                let status_width = self.element_width(status).min(width - x);
                self.text(surface, width - status_width, status_width, status, self.colors.normal)?;
                status_width
            }
            None => 0,
        };

        let title_width = width - x - status_width;
        if title_width > 0 {
            match &content.title {
                Some(title) => {
                    let scheme = if content.is_selected_monitor {
                        self.colors.selected
                    } else {
                        self.colors.normal
                    };
                    self.text(surface, x, title_width, &title.text, scheme)?;
                    if title.is_floating {
                        let marker = Rect::new(x + box_offset, box_offset, box_size, box_size);
                        self.marker(surface, marker, title.is_fixed, scheme)?;
                    }
                }
                None => self.fill(surface, Rect::new(x, 0, title_width, height), self.colors.normal.background)?,
            }
        }

        self.connection.copy_area(
            surface.pixmap,
            surface.window,
            self.gc,
            0,
            0,
            0,
            0,
            width as u16,
            height as u16,
        )?;
        Ok(())
    }

    fn fill(&self, surface: &BarSurface, area: Rect, color: u32) -> WmResult<()> {
        self.connection
            .change_gc(self.gc, &ChangeGCAux::new().foreground(color))?;
        self.connection
            .poly_fill_rectangle(surface.pixmap, self.gc, &[rectangle(area)])?;
        Ok(())
    }

    fn text(&self, surface: &BarSurface, x: i32, width: i32, text: &str, scheme: ColorScheme) -> WmResult<()> {
        self.fill(surface, Rect::new(x, 0, width, surface.height), scheme.background)?;

        let mut bytes = encode(text);
        let available = width - self.padding;
        while !bytes.is_empty() && self.font.text_width(&decode(&bytes)) > available {
            bytes.pop();
        }
        bytes.truncate(255);
        if bytes.is_empty() {
            return Ok(());
        }

        self.connection.change_gc(
            self.gc,
            &ChangeGCAux::new()
                .foreground(scheme.foreground)
                .background(scheme.background),
        )?;
        let baseline = (surface.height - self.font.height) / 2 + self.font.ascent;
        self.connection.image_text8(
            surface.pixmap,
            self.gc,
            (x + self.padding / 2) as i16,
            baseline as i16,
            &bytes,
        )?;
        Ok(())
    }

    fn marker(&self, surface: &BarSurface, area: Rect, filled: bool, scheme: ColorScheme) -> WmResult<()> {
        self.connection.change_gc(
            self.gc,
            &ChangeGCAux::new().foreground(scheme.foreground),
        )?;
        if filled {
            self.connection
                .poly_fill_rectangle(surface.pixmap, self.gc, &[rectangle(area)])?;
        } else {
            let outline = Rect::new(area.x, area.y, area.width - 1, area.height - 1);
            self.connection
                .poly_rectangle(surface.pixmap, self.gc, &[rectangle(outline)])?;
        }
        Ok(())
    }
}

pub fn create_gc(connection: &RustConnection, screen: &Screen, font: &BarFont) -> WmResult<Gcontext> {
    let gc = connection.generate_id()?;
    connection.create_gc(
        gc,
        screen.root,
        &CreateGCAux::new().font(font.id).graphics_exposures(0),
    )?;
    Ok(gc)
}

fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}

fn rectangle(area: Rect) -> Rectangle {
    Rectangle {
        x: area.x as i16,
        y: area.y as i16,
        width: area.width.max(0) as u16,
        height: area.height.max(0) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_encoded_as_latin1() {
        assert_eq!(encode("tag é"), b"tag \xe9".to_vec());
        assert_eq!(encode("→x"), b"?x".to_vec());
        assert_eq!(decode(&encode("caf\u{e9}")), "caf\u{e9}");
    }
}
