/// Demonstrates how to encode a glyph-like mask and read the fragments back
///
///
use libmask::{BitMap, Decoder, Encoder};

const GLYPH: [&str; 9] = [
    "..####..",
    ".#....#.",
    "#......#",
    "#......#",
    "########",
    "#......#",
    "#......#",
    "#......#",
    "........",
];

fn main() -> anyhow::Result<()> {
    let mut bitmap = BitMap::empty(8, 9);
    for (y, row) in (0..).zip(GLYPH) {
        for (x, c) in (0..).zip(row.chars()) {
            if c == '#' {
                bitmap.set_pixel(x, y, 255);
            }
        }
    }

    let mut stream = Vec::new();
    let instructions = Encoder::default().encode(&bitmap, &mut stream)?;
    println!(
        "{} pixels -> {instructions} instructions in {} bytes",
        bitmap.pixel_indices().iter().filter(|&&p| p != 0).count(),
        stream.len()
    );

    for fragment in Decoder::new(&stream) {
        let fragment = fragment?;
        println!("{:?} {:?}", fragment.kind, fragment.bounds);
    }
    Ok(())
}
