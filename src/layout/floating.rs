use super::LayoutParams;
use crate::geometry::Rect;

pub const SYMBOL: &str = "<1/1>";

// No arrangement at all: clients keep whatever geometry they asked for.
pub fn arrange(_client_count: usize, _params: &LayoutParams) -> Option<Vec<Rect>> {
    None
}
