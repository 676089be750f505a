/// Inclusive rectangle in absolute pixel coordinates
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Bounds {
    /// Leftmost column
    pub min_x: i32,
    /// Topmost row
    pub min_y: i32,
    /// Rightmost column (inclusive)
    pub max_x: i32,
    /// Bottom row (inclusive)
    pub max_y: i32,
}

impl Bounds {
    /// A 1x1 rectangle covering a single pixel
    #[must_use]
    pub const fn pixel(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// The smallest rectangle holding both corners, in any order
    #[must_use]
    pub fn spanning((x0, y0): (i32, i32), (x1, y1): (i32, i32)) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Grows the rectangle so that it holds `(x, y)`
    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Number of columns covered
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x).saturating_add(1)
    }

    /// Number of rows covered
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y).saturating_add(1)
    }

    /// Whether `(x, y)` lies inside the rectangle
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}
