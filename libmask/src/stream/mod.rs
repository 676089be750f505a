//! The instruction stream
//!
//! Every fragment becomes one control byte followed by up to four payload bytes, always in the
//! order `[palette value] [x move] [y move] [size bytes]`. Both ends of the stream track the same
//! [`Cursor`]: it starts at `(0, 0)` with palette value 255, moves by the encoded deltas, and
//! advances horizontally by the width of whatever was drawn. The height of a drawn fragment never
//! moves the cursor down.

pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod error;

use strum::{Display, IntoStaticStr};

pub use error::Error as DecodeError;

use crate::error::LimitError;

/// Bit 0: the palette value changes, payload is the new value
pub const PALETTE: u8 = 1 << 0;
/// Bit 1: horizontal move before drawing, payload is a [`nz_i8`] delta
pub const MOVE_X: u8 = 1 << 1;
/// Bit 2: vertical move before drawing, payload is a [`nz_i8`] delta
pub const MOVE_Y: u8 = 1 << 2;
/// Bit 3: move down exactly one row before drawing, no payload
pub const STEP_Y: u8 = 1 << 3;
/// Bit 4: the fragment is a 45 degree diagonal
pub const DIAGONAL: u8 = 1 << 4;
/// Bit 5: a width byte (`width - 1`) follows
pub const WIDTH: u8 = 1 << 5;
/// Bit 6: a height byte (`height - 1`) follows. On diagonals: the diagonal ascends, no payload
pub const HEIGHT: u8 = 1 << 6;
/// Bit 6 on diagonals
pub const ASCENDING: u8 = HEIGHT;
/// Bit 7: the fragment is a single pixel, no size bytes
pub const PIXEL: u8 = 1 << 7;

/// Axis of a move or extent
#[derive(Debug, Eq, PartialEq, Copy, Clone, Display, IntoStaticStr)]
pub enum Axis {
    /// Horizontal
    #[strum(serialize = "horizontal")]
    X,
    /// Vertical
    #[strum(serialize = "vertical")]
    Y,
}

/// Position and palette value shared by the encoder and the decoder
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Cursor {
    /// Absolute column
    pub x: i64,
    /// Absolute row
    pub y: i64,
    /// Palette value of the next draw
    pub value: u8,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            value: 255,
        }
    }
}

/// Encodes a nonzero delta in `-128..=128` into one byte
///
/// Positive deltas are stored minus one, negative ones as their two's complement, so all 256
/// byte values are used.
///
/// # Errors
///
/// Returns [`LimitError::DeltaOutOfRange`] for 0 and anything outside `-128..=128`
pub fn nz_i8(delta: i64, axis: Axis) -> Result<u8, LimitError> {
    let stored = match delta {
        1..=128 => i8::try_from(delta - 1),
        -128..=-1 => i8::try_from(delta),
        _ => return Err(LimitError::DeltaOutOfRange { axis, delta }),
    }
    .map_err(|_| LimitError::DeltaOutOfRange { axis, delta })?;
    Ok(u8::from_ne_bytes(stored.to_ne_bytes()))
}

/// Inverse of [`nz_i8`]
#[must_use]
pub const fn from_nz_i8(byte: u8) -> i16 {
    let signed = i8::from_ne_bytes([byte]) as i16;
    if signed >= 0 {
        signed + 1
    } else {
        signed
    }
}

/// Encodes a draw extent in `1..=256` as `extent - 1`
///
/// # Errors
///
/// Returns [`LimitError::ExtentOutOfRange`] for anything outside `1..=256`
pub fn extent_byte(extent: u32, axis: Axis) -> Result<u8, LimitError> {
    extent
        .checked_sub(1)
        .and_then(|e| u8::try_from(e).ok())
        .ok_or(LimitError::ExtentOutOfRange { axis, extent })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nz_i8_uses_the_whole_byte() {
        assert_eq!(nz_i8(1, Axis::X), Ok(0));
        assert_eq!(nz_i8(128, Axis::X), Ok(127));
        assert_eq!(nz_i8(-1, Axis::Y), Ok(0xFF));
        assert_eq!(nz_i8(-128, Axis::Y), Ok(0x80));
        assert_eq!(from_nz_i8(0), 1);
        assert_eq!(from_nz_i8(127), 128);
        assert_eq!(from_nz_i8(0xFF), -1);
        assert_eq!(from_nz_i8(0x80), -128);
    }

    #[test]
    fn nz_i8_rejects_zero_and_overflow() {
        for delta in [0, 129, -129, 1000] {
            assert_eq!(
                nz_i8(delta, Axis::X),
                Err(LimitError::DeltaOutOfRange {
                    axis: Axis::X,
                    delta
                })
            );
        }
    }

    #[test]
    fn extents_fit_one_byte() {
        assert_eq!(extent_byte(1, Axis::X), Ok(0));
        assert_eq!(extent_byte(256, Axis::Y), Ok(255));
        assert!(extent_byte(0, Axis::X).is_err());
        assert!(extent_byte(257, Axis::Y).is_err());
    }
}
