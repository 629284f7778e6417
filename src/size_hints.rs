use crate::client::Client;
use crate::geometry::Rect;

pub mod flags {
    pub const P_MIN_SIZE: u32 = 1 << 4;
    pub const P_MAX_SIZE: u32 = 1 << 5;
    pub const P_RESIZE_INC: u32 = 1 << 6;
    pub const P_ASPECT: u32 = 1 << 7;
    pub const P_BASE_SIZE: u32 = 1 << 8;
}

pub mod offset {
    pub const FLAGS: usize = 0;
    pub const MIN_WIDTH: usize = 5;
    pub const MIN_HEIGHT: usize = 6;
    pub const MAX_WIDTH: usize = 7;
    pub const MAX_HEIGHT: usize = 8;
    pub const WIDTH_INC: usize = 9;
    pub const HEIGHT_INC: usize = 10;
    pub const MIN_ASPECT_X: usize = 11;
    pub const MIN_ASPECT_Y: usize = 12;
    pub const MAX_ASPECT_X: usize = 13;
    pub const MAX_ASPECT_Y: usize = 14;
    pub const BASE_WIDTH: usize = 15;
    pub const BASE_HEIGHT: usize = 16;
}

/// Size constraints advertised by a client through `WM_NORMAL_HINTS`.
/// Zero means "unconstrained" for every field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHints {
    pub base_width: i32,
    pub base_height: i32,
    pub increment_width: i32,
    pub increment_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl SizeHints {
    /// Decodes the raw 32-bit words of a `WM_SIZE_HINTS` property.
    pub fn from_words(words: &[u32]) -> Self {
        let word = |index: usize| words.get(index).copied().unwrap_or(0) as i32;
        let Some(&hint_flags) = words.get(offset::FLAGS) else {
            return Self::default();
        };
        let has = |flag: u32| hint_flags & flag != 0;

        let mut hints = Self::default();

        if has(flags::P_BASE_SIZE) {
            hints.base_width = word(offset::BASE_WIDTH);
            hints.base_height = word(offset::BASE_HEIGHT);
        } else if has(flags::P_MIN_SIZE) {
            hints.base_width = word(offset::MIN_WIDTH);
            hints.base_height = word(offset::MIN_HEIGHT);
        }

        if has(flags::P_RESIZE_INC) {
            hints.increment_width = word(offset::WIDTH_INC);
            hints.increment_height = word(offset::HEIGHT_INC);
        }

        if has(flags::P_MAX_SIZE) {
            hints.max_width = word(offset::MAX_WIDTH);
            hints.max_height = word(offset::MAX_HEIGHT);
        }

        if has(flags::P_MIN_SIZE) {
            hints.min_width = word(offset::MIN_WIDTH);
            hints.min_height = word(offset::MIN_HEIGHT);
        } else if has(flags::P_BASE_SIZE) {
            hints.min_width = word(offset::BASE_WIDTH);
            hints.min_height = word(offset::BASE_HEIGHT);
        }

        if has(flags::P_ASPECT) {
            let min_x = word(offset::MIN_ASPECT_X);
            let min_y = word(offset::MIN_ASPECT_Y);
            let max_x = word(offset::MAX_ASPECT_X);
            let max_y = word(offset::MAX_ASPECT_Y);
            if min_x != 0 {
                hints.min_aspect = min_y as f32 / min_x as f32;
            }
            if max_y != 0 {
                hints.max_aspect = max_x as f32 / max_y as f32;
            }
        }

        hints
    }

    pub fn is_fixed(&self) -> bool {
        self.max_width != 0
            && self.max_height != 0
            && self.max_width == self.min_width
            && self.max_height == self.min_height
    }
}

/// Everything outside the client that bounds where it may be placed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementBounds {
    pub screen_width: i32,
    pub screen_height: i32,
    pub work_area: Rect,
    pub bar_height: i32,
    pub respect_hints: bool,
}

/// Resolves a requested client rectangle (inner size, border excluded) into a
/// legal one. Returns `None` when the result equals the client's current
/// geometry, so callers can skip the configure round trip.
pub fn apply_size_hints(
    client: &Client,
    requested: Rect,
    interactive: bool,
    bounds: &PlacementBounds,
) -> Option<Rect> {
    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = requested;
    let outer_width = |width: i32| width + 2 * client.border_width;
    let outer_height = |height: i32| height + 2 * client.border_width;

    width = width.max(1);
    height = height.max(1);

    if interactive {
        if x > bounds.screen_width {
            x = bounds.screen_width - outer_width(client.geometry.width);
        }
        if y > bounds.screen_height {
            y = bounds.screen_height - outer_height(client.geometry.height);
        }
        if x + outer_width(width) < 0 {
            x = 0;
        }
        if y + outer_height(height) < 0 {
            y = 0;
        }
    } else {
        let work = bounds.work_area;
        if x >= work.right() {
            x = work.right() - outer_width(client.geometry.width);
        }
        if y >= work.bottom() {
            y = work.bottom() - outer_height(client.geometry.height);
        }
        if x + outer_width(width) <= work.x {
            x = work.x;
        }
        if y + outer_height(height) <= work.y {
            y = work.y;
        }
    }

    height = height.max(bounds.bar_height);
    width = width.max(bounds.bar_height);

    if bounds.respect_hints || client.is_floating {
        let hints = &client.hints;
        let base_is_min =
            hints.base_width == hints.min_width && hints.base_height == hints.min_height;

        if !base_is_min {
            width -= hints.base_width;
            height -= hints.base_height;
        }

        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            if hints.max_aspect < width as f32 / height as f32 {
                width = (height as f32 * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < height as f32 / width as f32 {
                height = (width as f32 * hints.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            width -= hints.base_width;
            height -= hints.base_height;
        }

        if hints.increment_width > 0 {
            width -= width % hints.increment_width;
        }
        if hints.increment_height > 0 {
            height -= height % hints.increment_height;
        }

        width = (width + hints.base_width).max(hints.min_width);
        height = (height + hints.base_height).max(hints.min_height);

        if hints.max_width > 0 {
            width = width.min(hints.max_width);
        }
        if hints.max_height > 0 {
            height = height.min(hints.max_height);
        }
    }

    let resolved = Rect::new(x, y, width, height);
    (resolved != client.geometry).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bounds(respect_hints: bool) -> PlacementBounds {
        PlacementBounds {
            screen_width: 1920,
            screen_height: 1080,
            work_area: Rect::new(0, 0, 1920, 1060),
            bar_height: 20,
            respect_hints,
        }
    }

    fn client_with_hints(hints: SizeHints) -> Client {
        let mut client = Client::new(1, 0, 1);
        client.geometry = Rect::new(0, 0, 100, 100);
        client.border_width = 2;
        client.hints = hints;
        client
    }

    #[test]
    fn test_unchanged_geometry_returns_none() {
        let client = client_with_hints(SizeHints::default());
        assert_eq!(
            apply_size_hints(&client, client.geometry, false, &bounds(false)),
            None
        );
    }

    #[test]
    fn test_dimensions_are_at_least_bar_height() {
        let client = client_with_hints(SizeHints::default());
        let resolved = apply_size_hints(&client, Rect::new(10, 10, 0, 5), false, &bounds(false));
        assert_eq!(resolved, Some(Rect::new(10, 10, 20, 20)));
    }

    #[test]
    fn test_hints_ignored_for_tiled_clients_without_resize_hints() {
        let client = client_with_hints(SizeHints {
            increment_width: 10,
            increment_height: 10,
            ..SizeHints::default()
        });
        let resolved = apply_size_hints(&client, Rect::new(0, 0, 355, 205), false, &bounds(false));
        assert_eq!(resolved, Some(Rect::new(0, 0, 355, 205)));
    }

    #[test]
    fn test_increments_and_base_size() {
        let client = client_with_hints(SizeHints {
            base_width: 4,
            base_height: 4,
            increment_width: 10,
            increment_height: 20,
            ..SizeHints::default()
        });
        let resolved = apply_size_hints(&client, Rect::new(0, 0, 357, 205), false, &bounds(true));
        assert_eq!(resolved, Some(Rect::new(0, 0, 354, 204)));
    }

    #[test]
    fn test_min_and_max_size_clamp() {
        let client = client_with_hints(SizeHints {
            min_width: 300,
            min_height: 300,
            max_width: 400,
            max_height: 400,
            ..SizeHints::default()
        });
        let small = apply_size_hints(&client, Rect::new(0, 0, 50, 50), false, &bounds(true));
        assert_eq!(small, Some(Rect::new(0, 0, 300, 300)));
        let large = apply_size_hints(&client, Rect::new(0, 0, 900, 900), false, &bounds(true));
        assert_eq!(large, Some(Rect::new(0, 0, 400, 400)));
    }

    #[test]
    fn test_aspect_ratio_limits_width() {
        let client = client_with_hints(SizeHints {
            min_aspect: 1.0,
            max_aspect: 1.0,
            ..SizeHints::default()
        });
        let resolved = apply_size_hints(&client, Rect::new(0, 0, 400, 200), false, &bounds(true));
        assert_eq!(resolved, Some(Rect::new(0, 0, 200, 200)));
    }

    #[test]
    fn test_floating_client_respects_hints_without_global_flag() {
        let mut client = client_with_hints(SizeHints {
            max_width: 150,
            max_height: 150,
            ..SizeHints::default()
        });
        client.is_floating = true;
        let resolved = apply_size_hints(&client, Rect::new(0, 0, 500, 500), false, &bounds(false));
        assert_eq!(resolved, Some(Rect::new(0, 0, 150, 150)));
    }

    #[test]
    fn test_window_pushed_back_into_work_area() {
        let client = client_with_hints(SizeHints::default());
        let resolved = apply_size_hints(&client, Rect::new(5000, 50, 100, 100), false, &bounds(false));
        assert_eq!(resolved, Some(Rect::new(1920 - 104, 50, 100, 100)));
    }

    #[test]
    fn test_interactive_uses_screen_bounds() {
        let client = client_with_hints(SizeHints::default());
        let resolved = apply_size_hints(&client, Rect::new(-300, 50, 100, 100), true, &bounds(false));
        assert_eq!(resolved, Some(Rect::new(0, 50, 100, 100)));
    }

    #[test]
    fn test_decode_normal_hints_falls_back_between_base_and_min() {
        let mut words = vec![0u32; 18];
        words[offset::FLAGS] = flags::P_MIN_SIZE | flags::P_MAX_SIZE;
        words[offset::MIN_WIDTH] = 200;
        words[offset::MIN_HEIGHT] = 100;
        words[offset::MAX_WIDTH] = 200;
        words[offset::MAX_HEIGHT] = 100;

        let hints = SizeHints::from_words(&words);
        assert_eq!(hints.base_width, 200);
        assert_eq!(hints.base_height, 100);
        assert!(hints.is_fixed());
    }

    #[test]
    fn test_decode_aspect() {
        let mut words = vec![0u32; 18];
        words[offset::FLAGS] = flags::P_ASPECT;
        words[offset::MIN_ASPECT_X] = 4;
        words[offset::MIN_ASPECT_Y] = 3;
        words[offset::MAX_ASPECT_X] = 16;
        words[offset::MAX_ASPECT_Y] = 9;

        let hints = SizeHints::from_words(&words);
        assert_eq!(hints.min_aspect, 0.75);
        assert!((hints.max_aspect - 16.0 / 9.0).abs() < f32::EPSILON);
        assert!(!hints.is_fixed());
    }

    #[test]
    fn test_decode_empty_property() {
        assert_eq!(SizeHints::from_words(&[]), SizeHints::default());
    }
}
