#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Area of the overlap with `other`, zero when they do not touch.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let width = (self.right().min(other.right()) - self.x.max(other.x)).max(0);
        let height = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0);
        width as i64 * height as i64
    }

    /// Shrinks the rectangle so that it plus a border of `border_width` on each
    /// side fills the original outer rectangle.
    pub fn inset_border(&self, border_width: i32) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width - 2 * border_width,
            self.height - 2 * border_width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_area() {
        let left = Rect::new(0, 0, 100, 100);
        let right = Rect::new(50, 50, 100, 100);
        assert_eq!(left.intersection_area(&right), 2500);
        assert_eq!(left.intersection_area(&Rect::new(200, 0, 10, 10)), 0);
    }

    #[test]
    fn test_contains_point_excludes_far_edge() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains_point(10, 10));
        assert!(!rect.contains_point(30, 15));
    }
}
