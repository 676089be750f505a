use nom::{
    combinator::{cond, map},
    number::complete::be_u8,
    IResult,
};
use tracing::{debug, instrument};

use crate::{
    raster::{BitMap, Bounds},
    shape::{Fragment, Slope},
    stream::{
        error::Error as DecodeError, from_nz_i8, Cursor, ASCENDING, DIAGONAL, HEIGHT, MOVE_X,
        MOVE_Y, PALETTE, PIXEL, STEP_Y, WIDTH,
    },
    Error,
};

/// One instruction as it appears in the stream, before the cursor is applied
#[derive(Debug)]
struct Instruction {
    control: u8,
    value: Option<u8>,
    dx: Option<i16>,
    dy: Option<i16>,
    width: Option<u16>,
    height: Option<u16>,
}

fn byte(input: &[u8]) -> IResult<&[u8], u8> {
    be_u8(input)
}

fn delta(input: &[u8]) -> IResult<&[u8], i16> {
    map(byte, from_nz_i8)(input)
}

fn extent(input: &[u8]) -> IResult<&[u8], u16> {
    map(byte, |b| u16::from(b) + 1)(input)
}

fn instruction(input: &[u8]) -> IResult<&[u8], Instruction> {
    let (input, control) = byte(input)?;
    let sized = control & PIXEL == 0;
    let (input, value) = cond(control & PALETTE != 0, byte)(input)?;
    let (input, dx) = cond(control & MOVE_X != 0, delta)(input)?;
    let (input, dy) = cond(control & MOVE_Y != 0, delta)(input)?;
    let (input, width) = cond(sized && control & WIDTH != 0, extent)(input)?;
    let (input, height) = cond(
        sized && control & DIAGONAL == 0 && control & HEIGHT != 0,
        extent,
    )(input)?;
    Ok((
        input,
        Instruction {
            control,
            value,
            dx,
            dy,
            width,
            height,
        },
    ))
}

/// Reads an instruction stream back into [`Fragment`]s
///
/// The decoder replays the encoder's [`Cursor`], so fragments come out in stream order with
/// absolute coordinates. Iteration stops after the first error.
#[derive(Debug)]
pub struct Decoder<'a> {
    stream: &'a [u8],
    remaining: &'a [u8],
    cursor: Cursor,
    failed: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a new [`Decoder`] over a complete stream
    #[must_use]
    pub fn new(stream: &'a [u8]) -> Self {
        Self {
            stream,
            remaining: stream,
            cursor: Cursor::default(),
            failed: false,
        }
    }

    /// Returns the cursor after the last decoded instruction
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn next_fragment(&mut self) -> Result<Fragment, DecodeError> {
        let offset = self.stream.len() - self.remaining.len();
        let control = self.remaining[0];
        if control & (MOVE_Y | STEP_Y) == MOVE_Y | STEP_Y
            || (control & PIXEL != 0 && control & (DIAGONAL | WIDTH | HEIGHT) != 0)
        {
            return Err(DecodeError::ConflictingControl { offset, control });
        }
        let (rest, ins) =
            instruction(self.remaining).map_err(|_| DecodeError::Truncated { offset })?;
        self.remaining = rest;
        self.apply(&ins, offset)
    }

    fn apply(&mut self, ins: &Instruction, offset: usize) -> Result<Fragment, DecodeError> {
        let overflow = || DecodeError::CursorOverflow { offset };
        let mut cursor = self.cursor;
        if let Some(value) = ins.value {
            if value == 0 {
                return Err(DecodeError::ZeroValue { offset });
            }
            cursor.value = value;
        }
        cursor.x += ins.dx.map_or(0, i64::from);
        cursor.y += if ins.control & STEP_Y == 0 {
            ins.dy.map_or(0, i64::from)
        } else {
            1
        };

        let width = i64::from(ins.width.unwrap_or(1));
        let height = if ins.control & DIAGONAL == 0 {
            i64::from(ins.height.unwrap_or(1))
        } else {
            width
        };
        let corner = |x: i64, y: i64| -> Result<(i32, i32), DecodeError> {
            Ok((
                i32::try_from(x).map_err(|_| overflow())?,
                i32::try_from(y).map_err(|_| overflow())?,
            ))
        };
        let bounds = Bounds::spanning(
            corner(cursor.x, cursor.y)?,
            corner(cursor.x + width - 1, cursor.y + height - 1)?,
        );
        let fragment = if ins.control & DIAGONAL != 0 {
            let slope = if ins.control & ASCENDING == 0 {
                Slope::Descending
            } else {
                Slope::Ascending
            };
            Fragment::diagonal(bounds, cursor.value, slope)
        } else {
            Fragment::filled(bounds, cursor.value)
        };

        cursor.x += width;
        self.cursor = cursor;
        Ok(fragment)
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Fragment, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }
        let result = self.next_fragment();
        self.failed = result.is_err();
        Some(result.map_err(Error::from))
    }
}

/// Draws every instruction of `stream` into `bitmap`, returning the number of instructions
///
/// Pixels not covered by the stream keep their current value.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the stream is malformed or draws outside `bitmap`. `bitmap` is
/// left untouched on error, even if earlier instructions were valid
#[instrument(skip_all, level = "trace")]
pub fn decode_into(stream: &[u8], bitmap: &mut BitMap) -> Result<usize, Error> {
    let mut canvas = bitmap.clone();
    let mut count = 0;
    for fragment in Decoder::new(stream) {
        let fragment = fragment?;
        for (x, y) in fragment.pixels() {
            if !canvas.set_pixel_checked(x, y, fragment.value) {
                return Err(DecodeError::OutOfBounds { x, y }.into());
            }
        }
        count += 1;
    }
    debug!("Decoded {count} instructions from {} bytes", stream.len());
    *bitmap = canvas;
    Ok(count)
}
