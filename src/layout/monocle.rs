use super::LayoutParams;
use crate::geometry::Rect;

pub const SYMBOL: &str = "[1/1]";

/// Every client covers the whole work area; only the focused one is seen.
pub fn arrange(client_count: usize, params: &LayoutParams) -> Vec<Rect> {
    vec![params.work_area; client_count]
}
