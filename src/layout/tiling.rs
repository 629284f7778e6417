use super::{LayoutParams, split_evenly};
use crate::geometry::Rect;

pub const SYMBOL: &str = "[]=";

/// Master column on the left, remaining clients stacked in a right column.
pub fn arrange(client_count: usize, params: &LayoutParams) -> Vec<Rect> {
    if client_count == 0 {
        return Vec::new();
    }

    let area = params.work_area;
    let master_count = params.master_count as usize;

    let master_width = if client_count > master_count {
        if master_count > 0 {
            (area.width as f32 * params.master_factor) as i32
        } else {
            0
        }
    } else {
        area.width
    };

    let masters = client_count.min(master_count);
    let stacked = client_count - masters;

    let mut geometries = Vec::with_capacity(client_count);
    for (y, height) in split_evenly(area.y, area.height, masters) {
        geometries.push(Rect::new(area.x, y, master_width, height));
    }
    for (y, height) in split_evenly(area.y, area.height, stacked) {
        geometries.push(Rect::new(
            area.x + master_width,
            y,
            area.width - master_width,
            height,
        ));
    }
    geometries
}
