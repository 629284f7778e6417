pub mod bstack;
pub mod floating;
pub mod grid;
pub mod monocle;
pub mod tiling;

use crate::geometry::Rect;
use serde::Deserialize;

/// Parameters a layout needs besides the number of clients.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub work_area: Rect,
    pub master_count: u32,
    pub master_factor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum LayoutKind {
    Tile,
    Floating,
    Monocle,
    BottomStack,
    BottomStackHorizontal,
    GaplessGrid,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        Self::Tile,
        Self::Floating,
        Self::Monocle,
        Self::BottomStack,
        Self::BottomStackHorizontal,
        Self::GaplessGrid,
    ];

    /// Outer rectangles (border included) for `client_count` tiled clients, in
    /// client-list order. `None` means the layout does not arrange at all.
    pub fn arrange(&self, client_count: usize, params: &LayoutParams) -> Option<Vec<Rect>> {
        let cells = match self {
            Self::Tile => tiling::arrange(client_count, params),
            Self::BottomStack => bstack::arrange(client_count, params),
            Self::BottomStackHorizontal => bstack::arrange_horizontal(client_count, params),
            Self::GaplessGrid => grid::arrange(client_count, params),
            Self::Monocle => monocle::arrange(client_count, params),
            Self::Floating => return floating::arrange(client_count, params),
        };
        Some(cells)
    }

    pub fn arranges(&self) -> bool {
        !matches!(self, Self::Floating)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Tile => tiling::SYMBOL,
            Self::Floating => floating::SYMBOL,
            Self::Monocle => monocle::SYMBOL,
            Self::BottomStack => bstack::SYMBOL,
            Self::BottomStackHorizontal => bstack::HORIZONTAL_SYMBOL,
            Self::GaplessGrid => grid::SYMBOL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tile => "tile",
            Self::Floating => "floating",
            Self::Monocle => "monocle",
            Self::BottomStack => "bstack",
            Self::BottomStackHorizontal => "bstackhoriz",
            Self::GaplessGrid => "gaplessgrid",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "tile" | "tiling" => Ok(Self::Tile),
            "floating" | "normie" => Ok(Self::Floating),
            "monocle" => Ok(Self::Monocle),
            "bstack" => Ok(Self::BottomStack),
            "bstackhoriz" => Ok(Self::BottomStackHorizontal),
            "gaplessgrid" | "grid" => Ok(Self::GaplessGrid),
            _ => Err(format!("Invalid Layout Type: {}", s)),
        }
    }
}

/// Splits `total` into `parts` consecutive spans along one axis; every span
/// takes an equal share of what is still left, so rounding error lands on the
/// last span.
pub(crate) fn split_evenly(start: i32, total: i32, parts: usize) -> Vec<(i32, i32)> {
    let mut spans = Vec::with_capacity(parts);
    let mut used = 0;
    for index in 0..parts {
        let size = (total - used) / (parts - index) as i32;
        spans.push((start + used, size));
        used += size;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_evenly_puts_remainder_last() {
        assert_eq!(split_evenly(0, 10, 3), vec![(0, 3), (3, 3), (6, 4)]);
        assert_eq!(split_evenly(5, 100, 1), vec![(5, 100)]);
        assert!(split_evenly(0, 10, 0).is_empty());
    }

    #[test]
    fn test_only_floating_skips_arrangement() {
        for layout in LayoutKind::ALL {
            assert_eq!(layout.arranges(), layout != LayoutKind::Floating);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for layout in LayoutKind::ALL {
            assert_eq!(LayoutKind::from_str(layout.as_str()), Ok(layout));
        }
        assert!(LayoutKind::from_str("spiral").is_err());
    }
}
