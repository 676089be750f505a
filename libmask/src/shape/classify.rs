//! Shape classifiers. All of them read the extraction's working copy and never modify it

use crate::{
    error::Invariant,
    raster::{BitMap, Bounds},
    shape::Slope,
};

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) enum Direction {
    Right,
    Down,
    Up,
    Left,
}

impl Direction {
    // probe order for line seeds
    const ALL: [Self; 4] = [Self::Right, Self::Down, Self::Up, Self::Left];

    const fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
        }
    }
}

/// Number of orthogonal neighbors of `(x, y)` holding `value`
pub(crate) fn neighbor_count(map: &BitMap, x: i32, y: i32, value: u8) -> u8 {
    let mut count = 0;
    for direction in Direction::ALL {
        let (dx, dy) = direction.offset();
        if map.pixel(x + dx, y + dy) == value {
            count += 1;
        }
    }
    count
}

/// Grows a line from a seed with exactly one matching neighbor
///
/// The run only extends in the direction of that neighbor.
pub(crate) fn extract_line(map: &BitMap, x: i32, y: i32, value: u8) -> Result<Bounds, Invariant> {
    let mut matching = Direction::ALL.into_iter().filter(|d| {
        let (dx, dy) = d.offset();
        map.pixel(x + dx, y + dy) == value
    });
    let direction = match (matching.next(), matching.count()) {
        (Some(Direction::Left), 0) => return Err(Invariant::LineToLeft { x, y }),
        (Some(direction), 0) => direction,
        (None, _) => return Err(Invariant::LineBranches { x, y, directions: 0 }),
        (Some(_), others) => {
            return Err(Invariant::LineBranches {
                x,
                y,
                directions: others + 1,
            })
        }
    };

    let (dx, dy) = direction.offset();
    let (mut end_x, mut end_y) = (x, y);
    while map.pixel(end_x + dx, end_y + dy) == value {
        end_x += dx;
        end_y += dy;
    }
    Ok(Bounds::spanning((x, y), (end_x, end_y)))
}

/// Looks for a 45 degree run starting at an isolated seed, preferring down-right
///
/// Every cell after the seed must hold `value` and have no orthogonal neighbor of its own.
pub(crate) fn extract_diagonal(map: &BitMap, x: i32, y: i32, value: u8) -> Option<(Bounds, Slope)> {
    for slope in [Slope::Descending, Slope::Ascending] {
        let dx = slope.step_x();
        let (mut end_x, mut end_y) = (x, y);
        while map.pixel(end_x + dx, end_y + 1) == value
            && neighbor_count(map, end_x + dx, end_y + 1, value) == 0
        {
            end_x += dx;
            end_y += 1;
        }
        if end_y != y {
            return Some((Bounds::spanning((x, y), (end_x, end_y)), slope));
        }
    }
    None
}

/// Greedily grows a rectangle from its top-left seed
///
/// Each round first tries to add a row below, then a column to the right. A direction that
/// fails once is never retried.
pub(crate) fn extract_rect(map: &BitMap, x: i32, y: i32, value: u8) -> Bounds {
    let (mut width, mut height) = (1, 1);
    let (mut grow_down, mut grow_right) = (true, true);
    while grow_down || grow_right {
        if grow_down {
            if (x..x + width).all(|cx| map.pixel(cx, y + height) == value) {
                height += 1;
            } else {
                grow_down = false;
            }
        }
        if grow_right {
            if (y..y + height).all(|cy| map.pixel(x + width, cy) == value) {
                width += 1;
            } else {
                grow_right = false;
            }
        }
    }
    Bounds::spanning((x, y), (x + width - 1, y + height - 1))
}
