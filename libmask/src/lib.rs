//! # libmask
//!
//!
//! This library turns sparse palette masks (glyph coverage, icon alpha, anything that is mostly
//! empty and made of straight edges) into a compact stream of draw instructions: points,
//! horizontal and vertical lines, 45 degree diagonals and filled rectangles.
//!
//! A mask is a [`BitMap`] of 8-bit palette indexes, where 0 is empty and 1-255 select a palette
//! entry. Encoding happens in two steps:
//!
//! 1. The bitmap is decomposed into non-overlapping [`Fragment`]s. Isolated pixels, diagonals and
//!    lines are picked up in a first raster scan; everything that touches two or more pixels of
//!    its own value is covered by greedy rectangles in a second scan.
//! 2. The fragments are sorted (palette value descending, then top to bottom, left to right) and
//!    written as one control byte plus up to four payload bytes each. Cursor moves are delta coded
//!    and the palette value is only written when it changes.
//!
//! The exact shape decomposition is part of the format: the same bitmap always produces the same
//! bytes.
//!
//! ### Limitations
//!
//! Cursor moves must lie in `-128..=128` and fragment extents in `1..=256`. Masks that need more
//! fail with [`Error::Limit`] rather than being truncated; split them or move their origin.
//! The stream has no instruction count and no terminator, so containers have to frame it.
//!
//! ### Usage
//!
//! ```rust
//! use libmask::{BitMap, Decoder, Encoder};
//!
//! fn main() -> Result<(), libmask::Error> {
//!     // an "L" with a stray pixel
//!     let mut bitmap = BitMap::empty(8, 8);
//!     for y in 1..6 {
//!         bitmap.set_pixel(2, y, 255);
//!     }
//!     for x in 3..6 {
//!         bitmap.set_pixel(x, 5, 255);
//!     }
//!     bitmap.set_pixel(7, 0, 9);
//!
//!     let mut encoder = Encoder::default();
//!     let mut stream = Vec::new();
//!     let instructions = encoder.encode(&bitmap, &mut stream)?;
//!     assert_eq!(instructions, encoder.fragments().len());
//!
//!     let mut decoded = BitMap::empty(8, 8);
//!     libmask::decode_into(&stream, &mut decoded)?;
//!     assert_eq!(decoded, bitmap);
//!
//!     for fragment in Decoder::new(&stream) {
//!         let fragment = fragment?;
//!         println!("{:?} {:?}", fragment.kind, fragment.bounds);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! #### Consistency checks
//!
//! Debug builds verify every pixel before it is cleared and scan the working copy for leftovers
//! after extraction, reporting failures as [`Error::Invariant`]. Enable the `safety-checks`
//! feature to keep these checks in release builds.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
/// Module containing the bitmap types
pub mod raster;
/// Module containing the fragment types
pub mod shape;
pub mod stream;

pub use error::{Error, Invariant, LimitError};
pub use raster::{BitMap, Bounds, Channel};
pub use shape::{Fragment, Kind, Slope};
pub use stream::decode::{decode_into, Decoder};
pub use stream::encode::Encoder;
pub use stream::DecodeError;

// Redundant checks of the extraction, compiled out of release builds by default
const SAFETY_CHECKS: bool = cfg!(any(debug_assertions, feature = "safety-checks"));

/// Encodes `bitmap` into a new instruction stream
///
/// Use an [`Encoder`] directly to reuse its buffers across many masks.
///
/// # Errors
///
/// See [`Encoder::encode`]
pub fn encode(bitmap: &BitMap) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    Encoder::default().encode(bitmap, &mut out)?;
    Ok(out)
}

/// Decomposes `bitmap` into fragments, in the order they are encoded
///
/// # Errors
///
/// Returns [`Error::Invariant`] if the shape extraction is inconsistent
pub fn extract_fragments(bitmap: &BitMap) -> Result<Vec<Fragment>, Error> {
    let mut fragments = Vec::new();
    shape::extract::extract_into(bitmap, &mut fragments)?;
    shape::sort_fragments(&mut fragments);
    Ok(fragments)
}
