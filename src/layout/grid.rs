use super::LayoutParams;
use crate::geometry::Rect;

pub const SYMBOL: &str = "###";

fn column_count(client_count: usize) -> usize {
    // Five windows read better as 2 + 3 than as 1 + 2 + 2.
    if client_count == 5 {
        return 2;
    }
    let mut columns = 0;
    while columns <= client_count / 2 {
        if columns * columns >= client_count {
            break;
        }
        columns += 1;
    }
    columns
}

/// Grid without empty cells: trailing columns take one extra row when the
/// clients do not divide evenly. Filled column by column.
pub fn arrange(client_count: usize, params: &LayoutParams) -> Vec<Rect> {
    if client_count == 0 {
        return Vec::new();
    }

    let area = params.work_area;
    let columns = column_count(client_count);
    let mut rows = client_count / columns;
    let cell_width = area.width / columns as i32;

    let mut geometries = Vec::with_capacity(client_count);
    let mut column: i32 = 0;
    let mut row = 0;
    for index in 0..client_count {
        if index / rows + 1 > columns - client_count % columns {
            rows = client_count / columns + 1;
        }
        let cell_height = area.height / rows as i32;
        geometries.push(Rect::new(
            area.x + column * cell_width,
            area.y + row as i32 * cell_height,
            cell_width,
            cell_height,
        ));

        row += 1;
        if row >= rows {
            row = 0;
            column += 1;
        }
    }
    geometries
}
