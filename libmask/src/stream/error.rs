use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
#[non_exhaustive]
/// Errors raised while reading an instruction stream
pub enum Error {
    /// The stream ends in the middle of an instruction
    #[error("instruction at byte {offset} is truncated")]
    Truncated {
        /// offset of the control byte
        offset: usize,
    },
    /// A palette change to value 0
    #[error("instruction at byte {offset} changes the palette to 0")]
    ZeroValue {
        /// offset of the control byte
        offset: usize,
    },
    /// A control byte whose bits cannot appear together
    #[error("instruction at byte {offset} has conflicting control bits {control:#010b}")]
    ConflictingControl {
        /// offset of the control byte
        offset: usize,
        /// the control byte
        control: u8,
    },
    /// The cursor left the 32-bit coordinate space
    #[error("instruction at byte {offset} moves the cursor out of range")]
    CursorOverflow {
        /// offset of the control byte
        offset: usize,
    },
    /// A decoded pixel does not fit the target grid
    #[error("pixel ({x}, {y}) lies outside the target grid")]
    OutOfBounds {
        /// column
        x: i32,
        /// row
        y: i32,
    },
}
