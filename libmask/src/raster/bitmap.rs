use bon::bon;
use itertools::iproduct;

use crate::{raster::bounds::Bounds, Error};

/// Rectangular grid of palette indexes (0 is empty, 1-255 reference a palette entry)
///
/// The grid covers `[min_x, max_x) x [min_y, max_y)` in absolute coordinates, so masks can be
/// anchored anywhere around the encoder's starting cursor at `(0, 0)`. Rows are stored
/// contiguously, `stride` bytes apart.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct BitMap {
    /// The width of the grid
    width: u16,
    /// The height of the grid
    height: u16,
    /// Absolute coordinates of the top-left cell
    origin: (i32, i32),
    /// Distance between the starts of two consecutive rows
    stride: usize,
    /// Grid cells
    pixels: Vec<u8>,
}

#[bon]
impl BitMap {
    /// Creates a new [`BitMap`] from its parts
    ///
    /// `stride` defaults to `width` and `pixels` to an all-empty buffer.
    ///
    /// # Errors
    ///
    /// This function errors if `stride` is smaller than `width`, if `pixels` is not exactly
    /// `stride * height` bytes long, or if the grid plus one cell on every side does not fit
    /// in `i32` coordinates
    #[builder]
    pub fn new(
        width: u16,
        height: u16,
        #[builder(default)] origin: (i32, i32),
        stride: Option<usize>,
        pixels: Option<Vec<u8>>,
    ) -> Result<Self, Error> {
        // neighbor probes reach one cell past each edge
        let fits = |start: i32, extent: u16| {
            start.checked_sub(1).is_some()
                && start.checked_add(i32::from(extent) + 1).is_some()
        };
        if !fits(origin.0, width) || !fits(origin.1, height) {
            return Err(Error::OriginOutOfRange {
                origin,
                width,
                height,
            });
        }

        let stride = stride.unwrap_or(usize::from(width));
        let expected = stride.checked_mul(usize::from(height));
        let pixels = match (pixels, expected) {
            (Some(pixels), _) => pixels,
            (None, Some(expected)) => vec![0; expected],
            (None, None) => Vec::new(),
        };
        if stride < usize::from(width) || expected != Some(pixels.len()) {
            return Err(Error::InvalidDimensions {
                width,
                height,
                stride,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            origin,
            stride,
            pixels,
        })
    }
}

impl BitMap {
    /// Creates an empty [`BitMap`] whose top-left cell sits at `(0, 0)`
    ///
    /// 16-bit dimensions anchored at the origin always leave room around the grid, so this
    /// cannot fail.
    #[must_use]
    pub fn empty(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            origin: (0, 0),
            stride: usize::from(width),
            pixels: vec![0; usize::from(width) * usize::from(height)],
        }
    }

    /// Creates an empty [`BitMap`] whose top-left cell sits at `origin`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OriginOutOfRange`] if the grid sits at the edge of the `i32` range
    pub fn at(width: u16, height: u16, origin: (i32, i32)) -> Result<Self, Error> {
        Self::builder()
            .width(width)
            .height(height)
            .origin(origin)
            .build()
    }

    /// Returns the width of the grid
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Returns the height of the grid
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Returns the row stride of the underlying buffer
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the absolute coordinates of the top-left cell
    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// First column of the grid
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.origin.0
    }

    /// First row of the grid
    #[must_use]
    pub const fn min_y(&self) -> i32 {
        self.origin.1
    }

    /// One past the last column of the grid
    #[must_use]
    pub fn max_x(&self) -> i32 {
        self.origin.0 + i32::from(self.width)
    }

    /// One past the last row of the grid
    #[must_use]
    pub fn max_y(&self) -> i32 {
        self.origin.1 + i32::from(self.height)
    }

    /// Returns the raw pixel buffer, including any stride padding
    #[must_use]
    pub fn pixel_indices(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether `(x, y)` lies inside the grid
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x()..self.max_x()).contains(&x) && (self.min_y()..self.max_y()).contains(&y)
    }

    // the only place absolute coordinates are turned into buffer offsets
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        let col = usize::try_from(x - self.min_x()).ok()?;
        let row = usize::try_from(y - self.min_y()).ok()?;
        Some(row * self.stride + col)
    }

    /// Returns the value at `(x, y)`, or 0 outside the grid
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(0, |i| self.pixels[i])
    }

    /// Sets the value at `(x, y)`. Writes outside the grid are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.set_pixel_checked(x, y, value);
    }

    /// Sets the value at `(x, y)`, returning `false` if the cell lies outside the grid
    pub fn set_pixel_checked(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = value;
                true
            }
            None => false,
        }
    }

    /// Get an entire row of the grid, without stride padding
    #[must_use]
    pub fn row(&self, y: i32) -> Option<&[u8]> {
        let start = self.index(self.min_x(), y)?;
        Some(&self.pixels[start..start + usize::from(self.width)])
    }

    /// Smallest rectangle holding every nonzero pixel, or [`None`] if the grid is empty
    #[must_use]
    pub fn nonzero_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for (y, x) in iproduct!(self.min_y()..self.max_y(), self.min_x()..self.max_x()) {
            if self.pixel(x, y) == 0 {
                continue;
            }
            match bounds.as_mut() {
                Some(b) => b.include(x, y),
                None => bounds = Some(Bounds::pixel(x, y)),
            }
        }
        bounds
    }

    /// Whether every pixel of the grid is zero
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.nonzero_bounds().is_none()
    }
}
