pub(crate) mod classify;
pub(crate) mod extract;

use std::cmp::Reverse;

use strum::IntoStaticStr;

use crate::raster::Bounds;

/// Direction of a 45 degree diagonal, read left to right
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, IntoStaticStr)]
pub enum Slope {
    /// Bottom-left to top-right
    Ascending,
    /// Top-left to bottom-right
    Descending,
}

impl Slope {
    /// Horizontal step taken for every row going down
    pub(crate) const fn step_x(self) -> i32 {
        match self {
            Self::Ascending => -1,
            Self::Descending => 1,
        }
    }
}

/// The draw operation a [`Fragment`] maps to
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, IntoStaticStr)]
pub enum Kind {
    /// A single pixel
    Point,
    /// A horizontal or vertical run, one pixel thick
    Line,
    /// A 45 degree run, as wide as it is tall
    Diagonal(Slope),
    /// A filled rectangle, at least 2x2
    Rect,
}

/// A shape extracted from a [`crate::BitMap`], drawn with a single palette value
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct Fragment {
    /// Inclusive bounding box
    pub bounds: Bounds,
    /// Palette index, never 0
    pub value: u8,
    /// Shape inside the bounding box
    pub kind: Kind,
}

impl Fragment {
    /// A point, line or rectangle filling `bounds`, typed by its extents
    #[must_use]
    pub fn filled(bounds: Bounds, value: u8) -> Self {
        let kind = match (bounds.width(), bounds.height()) {
            (1, 1) => Kind::Point,
            (1, _) | (_, 1) => Kind::Line,
            _ => Kind::Rect,
        };
        Self {
            bounds,
            value,
            kind,
        }
    }

    /// A diagonal inside the square `bounds`
    #[must_use]
    pub const fn diagonal(bounds: Bounds, value: u8, slope: Slope) -> Self {
        Self {
            bounds,
            value,
            kind: Kind::Diagonal(slope),
        }
    }

    /// Number of columns the fragment draws
    #[must_use]
    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    /// Number of rows the fragment draws
    #[must_use]
    pub fn height(&self) -> u32 {
        self.bounds.height()
    }

    /// Every pixel the fragment covers, row by row
    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        } = self.bounds;
        let kind = self.kind;
        (min_y..=max_y).flat_map(move |y| {
            let (from, to) = match kind {
                Kind::Diagonal(Slope::Descending) => {
                    let x = min_x + (y - min_y);
                    (x, x)
                }
                Kind::Diagonal(Slope::Ascending) => {
                    let x = min_x + (max_y - y);
                    (x, x)
                }
                Kind::Point | Kind::Line | Kind::Rect => (min_x, max_x),
            };
            (from..=to).map(move |x| (x, y))
        })
    }
}

/// Puts fragments in stream order: palette value descending, then top to bottom, then left to
/// right. The sort is stable, and the resulting order is part of the stream format
pub fn sort_fragments(fragments: &mut [Fragment]) {
    fragments.sort_by_key(|f| (Reverse(f.value), f.bounds.min_y, f.bounds.min_x));
}
