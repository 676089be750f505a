use bon::bon;
use tracing::{debug, instrument, trace};

use crate::{
    error::Invariant,
    raster::BitMap,
    shape::{extract::extract_into, sort_fragments, Fragment, Kind, Slope},
    stream::{
        extent_byte, nz_i8, Axis, Cursor, ASCENDING, DIAGONAL, HEIGHT, MOVE_X, MOVE_Y, PALETTE,
        PIXEL, STEP_Y, WIDTH,
    },
    Error,
};

/// Turns bitmaps into instruction streams
///
/// An [`Encoder`] keeps its fragment buffer between calls, so encoding many masks with the same
/// instance avoids reallocating it. [`Encoder::encode`] takes `&mut self`; share an encoder
/// between threads only behind a lock.
#[derive(Debug)]
pub struct Encoder {
    fragments: Vec<Fragment>,
}

#[bon]
impl Encoder {
    /// Creates a new [`Encoder`]
    ///
    /// `fragment_capacity` preallocates the fragment buffer.
    #[builder]
    pub fn new(fragment_capacity: Option<usize>) -> Self {
        Self {
            fragments: Vec::with_capacity(fragment_capacity.unwrap_or(0)),
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Encoder {
    /// Encodes every nonzero pixel of `bitmap`, appending the instructions to `out`
    ///
    /// Returns the number of instructions written; an empty bitmap writes nothing. The stream
    /// carries no instruction count, so callers that concatenate streams need to frame them.
    ///
    /// # Errors
    ///
    /// - [`Error::Limit`] if a cursor move or a fragment extent does not fit the format
    /// - [`Error::Invariant`] if the shape extraction is inconsistent
    ///
    /// On error `out` is left exactly as it was.
    #[instrument(skip_all, level = "trace")]
    pub fn encode(&mut self, bitmap: &BitMap, out: &mut Vec<u8>) -> Result<usize, Error> {
        self.fragments.clear();
        extract_into(bitmap, &mut self.fragments)?;
        sort_fragments(&mut self.fragments);

        let start = out.len();
        let mut cursor = Cursor::default();
        for fragment in &self.fragments {
            if let Err(e) = cursor.emit(fragment, out) {
                debug!("Encoding failed at {:?}: {e}", fragment.bounds);
                out.truncate(start);
                return Err(e);
            }
        }
        debug!(
            "Encoded {} fragments into {} bytes",
            self.fragments.len(),
            out.len() - start
        );
        Ok(self.fragments.len())
    }

    /// Fragments of the last successful [`Self::encode`] call, in stream order
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

impl Cursor {
    /// Appends the instruction drawing `fragment` and moves the cursor past it
    ///
    /// # Errors
    ///
    /// See [`Encoder::encode`]. On error neither `out` nor the cursor change.
    pub fn emit(&mut self, fragment: &Fragment, out: &mut Vec<u8>) -> Result<(), Error> {
        let start = out.len();
        let result = self.write(fragment, out);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    fn write(&mut self, fragment: &Fragment, out: &mut Vec<u8>) -> Result<(), Error> {
        if fragment.value == 0 {
            return Err(Invariant::ZeroValue {
                bounds: fragment.bounds,
            }
            .into());
        }
        let control_at = out.len();
        out.push(0);
        let mut control = 0;

        if fragment.value != self.value {
            control |= PALETTE;
            out.push(fragment.value);
        }

        let dx = i64::from(fragment.bounds.min_x) - self.x;
        if dx != 0 {
            control |= MOVE_X;
            out.push(nz_i8(dx, Axis::X)?);
        }

        let dy = i64::from(fragment.bounds.min_y) - self.y;
        if dy == 1 {
            control |= STEP_Y;
        } else if dy != 0 {
            control |= MOVE_Y;
            out.push(nz_i8(dy, Axis::Y)?);
        }

        let (width, mut height) = (fragment.width(), fragment.height());
        if width == 1 && height == 1 {
            control |= PIXEL;
        } else if let Kind::Diagonal(slope) = fragment.kind {
            control |= DIAGONAL;
            if width > 0 {
                control |= WIDTH;
                out.push(extent_byte(width, Axis::X)?);
            }
            if slope == Slope::Ascending {
                control |= ASCENDING;
            }
        } else {
            if width > 0 && (width > 1 || height <= 1) {
                control |= WIDTH;
                out.push(extent_byte(width, Axis::X)?);
                if height == 1 {
                    // a one-row run needs no height byte
                    height = 0;
                }
            }
            if height > 0 {
                control |= HEIGHT;
                out.push(extent_byte(height, Axis::Y)?);
            }
        }
        out[control_at] = control;
        trace!("{:#010b} {:?}", control, &out[control_at + 1..]);

        self.value = fragment.value;
        self.x += dx + i64::from(width);
        self.y += dy;
        Ok(())
    }
}
