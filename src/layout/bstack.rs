use super::{LayoutParams, split_evenly};
use crate::geometry::Rect;

pub const SYMBOL: &str = "TTT";
pub const HORIZONTAL_SYMBOL: &str = "===";

struct Rows {
    master_height: i32,
    stack_y: i32,
    stacked: usize,
}

fn rows(client_count: usize, params: &LayoutParams) -> Rows {
    let area = params.work_area;
    let master_count = params.master_count as usize;

    if client_count > master_count {
        let master_height = if master_count > 0 {
            (params.master_factor * area.height as f32) as i32
        } else {
            0
        };
        Rows {
            master_height,
            stack_y: area.y + master_height,
            stacked: client_count - master_count,
        }
    } else {
        Rows {
            master_height: area.height,
            stack_y: area.y,
            stacked: 0,
        }
    }
}

fn masters(client_count: usize, params: &LayoutParams, master_height: i32) -> Vec<Rect> {
    let area = params.work_area;
    let masters = client_count.min(params.master_count as usize);
    split_evenly(area.x, area.width, masters)
        .into_iter()
        .map(|(x, width)| Rect::new(x, area.y, width, master_height))
        .collect()
}

/// Master row on top, remaining clients side by side underneath.
pub fn arrange(client_count: usize, params: &LayoutParams) -> Vec<Rect> {
    if client_count == 0 {
        return Vec::new();
    }

    let area = params.work_area;
    let Rows {
        master_height,
        stack_y,
        stacked,
    } = rows(client_count, params);

    let mut geometries = masters(client_count, params, master_height);
    if stacked > 0 {
        let stack_width = area.width / stacked as i32;
        let stack_height = area.height - master_height;
        geometries.extend((0..stacked).map(|index| {
            Rect::new(
                area.x + index as i32 * stack_width,
                stack_y,
                stack_width,
                stack_height,
            )
        }));
    }
    geometries
}

/// Master row on top, remaining clients as full-width rows underneath.
pub fn arrange_horizontal(client_count: usize, params: &LayoutParams) -> Vec<Rect> {
    if client_count == 0 {
        return Vec::new();
    }

    let area = params.work_area;
    let Rows {
        master_height,
        stack_y,
        stacked,
    } = rows(client_count, params);

    let mut geometries = masters(client_count, params, master_height);
    if stacked > 0 {
        let stack_height = (area.height - master_height) / stacked as i32;
        geometries.extend((0..stacked).map(|index| {
            Rect::new(
                area.x,
                stack_y + index as i32 * stack_height,
                area.width,
                stack_height,
            )
        }));
    }
    geometries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(master_count: u32) -> LayoutParams {
        LayoutParams {
            work_area: Rect::new(0, 0, 900, 600),
            master_count,
            master_factor: 0.5,
        }
    }

    #[test]
    fn test_bottom_stack_columns() {
        assert_eq!(
            arrange(4, &params(1)),
            vec![
                Rect::new(0, 0, 900, 300),
                Rect::new(0, 300, 300, 300),
                Rect::new(300, 300, 300, 300),
                Rect::new(600, 300, 300, 300),
            ]
        );
    }

    #[test]
    fn test_bottom_stack_horizontal_rows() {
        assert_eq!(
            arrange_horizontal(3, &params(1)),
            vec![
                Rect::new(0, 0, 900, 300),
                Rect::new(0, 300, 900, 150),
                Rect::new(0, 450, 900, 150),
            ]
        );
    }

    #[test]
    fn test_masters_only_fill_height() {
        assert_eq!(
            arrange(2, &params(2)),
            vec![Rect::new(0, 0, 450, 600), Rect::new(450, 0, 450, 600)]
        );
    }

    #[test]
    fn test_no_masters() {
        assert_eq!(
            arrange_horizontal(2, &params(0)),
            vec![Rect::new(0, 0, 900, 300), Rect::new(0, 300, 900, 300)]
        );
    }
}
