use crate::{raster::Bounds, stream, stream::Axis};
use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
/// Possible `libmask` errors
pub enum Error {
    /// The mask cannot be expressed in the instruction stream format
    #[error("format limitation: {0}")]
    Limit(#[from] LimitError),
    /// An internal consistency check failed. This is a bug in `libmask`
    #[error("invariant violated: {0}")]
    Invariant(#[from] Invariant),
    /// Error returned if an instruction stream cannot be decoded
    #[error("decode error: {0}")]
    Decode(#[from] stream::error::Error),
    /// Error returned if the pixel buffer does not match the grid dimensions
    #[error("pixel buffer of {len} bytes does not fit a {width}x{height} grid with stride {stride}")]
    InvalidDimensions {
        /// grid width
        width: u16,
        /// grid height
        height: u16,
        /// row stride
        stride: usize,
        /// pixel buffer length
        len: usize,
    },
    /// Error returned if a grid placed at `origin` leaves no room for neighbor lookups inside
    /// `i32` coordinates
    #[error("{width}x{height} grid at {origin:?} reaches the edge of the coordinate range")]
    OriginOutOfRange {
        /// requested top-left cell
        origin: (i32, i32),
        /// grid width
        width: u16,
        /// grid height
        height: u16,
    },
    /// Error returned if an image is too large for a [`crate::BitMap`]
    #[error("image of {width}x{height} does not fit 16-bit grid dimensions")]
    ImageTooLarge {
        /// image width
        width: u32,
        /// image height
        height: u32,
    },
}

impl Error {
    /// Whether this error comes from the representable ranges of the format rather than a
    /// defect. Callers can recover from these by splitting the mask or moving its origin
    #[must_use]
    pub const fn is_limitation(&self) -> bool {
        matches!(self, Self::Limit(_))
    }
}

#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
#[non_exhaustive]
/// Values the instruction stream has no room for
pub enum LimitError {
    /// A cursor move must lie in `-128..=128` and cannot be zero-encoded
    #[error("{axis} move of {delta} is outside -128..=128")]
    DeltaOutOfRange {
        /// direction of the move
        axis: Axis,
        /// requested move
        delta: i64,
    },
    /// A draw extent must lie in `1..=256`
    #[error("{axis} extent of {extent} is outside 1..=256")]
    ExtentOutOfRange {
        /// direction of the extent
        axis: Axis,
        /// requested extent
        extent: u32,
    },
}

#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
#[non_exhaustive]
/// Internal consistency failures of the shape extraction or the encoder
pub enum Invariant {
    /// A single-neighbor pixel was asked to grow a line towards an already scanned cell
    #[error("line seed at ({x}, {y}) only connects to the left")]
    LineToLeft {
        /// seed column
        x: i32,
        /// seed row
        y: i32,
    },
    /// A line seed matched in more than one direction
    #[error("line seed at ({x}, {y}) branches in {directions} directions")]
    LineBranches {
        /// seed column
        x: i32,
        /// seed row
        y: i32,
        /// number of matching directions
        directions: usize,
    },
    /// A fragment without a palette value reached the encoder
    #[error("fragment at {bounds:?} has palette value 0")]
    ZeroValue {
        /// fragment bounds
        bounds: Bounds,
    },
    /// A pixel about to be cleared no longer holds the fragment's value
    #[error("pixel ({x}, {y}) holds {found}, expected {expected}")]
    StalePixel {
        /// column
        x: i32,
        /// row
        y: i32,
        /// fragment value
        expected: u8,
        /// value found in the working copy
        found: u8,
    },
    /// Pixels were left behind after extraction
    #[error("extraction left pixels inside {0:?}")]
    Residue(Bounds),
}
