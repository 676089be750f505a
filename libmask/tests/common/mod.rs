#![allow(dead_code)]

use std::collections::HashMap;

use libmask::{BitMap, Fragment};

/// Builds a bitmap from rows of characters: `.` is empty, `#` is 255 and digits are their value
pub fn grid(origin: (i32, i32), rows: &[&str]) -> BitMap {
    let width = u16::try_from(rows[0].len()).expect("row too long");
    let height = u16::try_from(rows.len()).expect("too many rows");
    let mut bitmap = BitMap::at(width, height, origin).expect("origin out of range");
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), usize::from(width), "ragged row {y}");
        for (x, c) in row.chars().enumerate() {
            let value = match c {
                '.' => 0,
                '#' => 255,
                d => u8::try_from(d.to_digit(10).expect("unknown cell")).unwrap(),
            };
            bitmap.set_pixel(origin.0 + x as i32, origin.1 + y as i32, value);
        }
    }
    bitmap
}

/// Maps every pixel covered by `fragments` to the value drawn there, failing on overlaps
pub fn covered(fragments: &[Fragment]) -> HashMap<(i32, i32), u8> {
    let mut pixels = HashMap::new();
    for fragment in fragments {
        for p in fragment.pixels() {
            let previous = pixels.insert(p, fragment.value);
            assert!(previous.is_none(), "{p:?} covered twice");
        }
    }
    pixels
}

/// Every nonzero pixel of `bitmap`
pub fn nonzero(bitmap: &BitMap) -> HashMap<(i32, i32), u8> {
    let mut pixels = HashMap::new();
    for y in bitmap.min_y()..bitmap.max_y() {
        for x in bitmap.min_x()..bitmap.max_x() {
            let value = bitmap.pixel(x, y);
            if value != 0 {
                pixels.insert((x, y), value);
            }
        }
    }
    pixels
}
