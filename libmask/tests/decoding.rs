mod common;
use common::grid;
use libmask::{stream::Cursor, BitMap, Bounds, DecodeError, Decoder, Error, Fragment, Slope};

#[test]
fn decodes_fragments_in_stream_order() -> anyhow::Result<()> {
    let stream = [0x36, 0xFF, 0xFF, 0x01, 0x81, 7, 0x6A, 0x00, 0x01, 0x01];
    let fragments = Decoder::new(&stream).collect::<Result<Vec<_>, _>>()?;
    assert_eq!(
        fragments,
        [
            Fragment::diagonal(Bounds::spanning((-1, -1), (0, 0)), 255, Slope::Descending),
            Fragment::filled(Bounds::pixel(1, -1), 7),
            Fragment::filled(Bounds::spanning((3, 0), (4, 1)), 7),
        ]
    );
    Ok(())
}

#[test]
fn decoder_replays_the_cursor() -> anyhow::Result<()> {
    let mut decoder = Decoder::new(&[0x40, 2, 0x82, 1]);
    assert_eq!(
        decoder.next().transpose()?,
        Some(Fragment::filled(Bounds::spanning((0, 0), (0, 2)), 255))
    );
    assert_eq!(
        decoder.cursor(),
        Cursor {
            x: 1,
            y: 0,
            value: 255
        }
    );
    assert_eq!(
        decoder.next().transpose()?,
        Some(Fragment::filled(Bounds::pixel(3, 0), 255))
    );
    assert!(decoder.next().is_none());
    Ok(())
}

#[test]
fn draws_an_encoded_mask_back() -> anyhow::Result<()> {
    let bitmap = grid(
        (-3, -2),
        &[
            "#..##..2",
            "#..##.2.",
            "#.....2.",
            "..###...",
            "5.###.#.",
            ".5....#.",
        ],
    );
    let stream = libmask::encode(&bitmap)?;
    let mut decoded = BitMap::at(bitmap.width(), bitmap.height(), bitmap.origin())?;
    let count = libmask::decode_into(&stream, &mut decoded)?;
    assert_eq!(count, libmask::extract_fragments(&bitmap)?.len());
    assert_eq!(decoded, bitmap);
    Ok(())
}

#[test]
fn truncated_instruction_is_reported() {
    // palette change without its value
    let mut decoder = Decoder::new(&[0x80, 0x81]);
    assert!(decoder.next().is_some_and(|f| f.is_ok()));
    assert_eq!(
        decoder.next(),
        Some(Err(Error::Decode(DecodeError::Truncated { offset: 1 })))
    );
    assert!(decoder.next().is_none());
}

#[test]
fn malformed_control_bytes_are_rejected() {
    assert_eq!(
        Decoder::new(&[0x81, 0]).next(),
        Some(Err(Error::Decode(DecodeError::ZeroValue { offset: 0 })))
    );
    assert_eq!(
        Decoder::new(&[0x8C, 1]).next(),
        Some(Err(Error::Decode(DecodeError::ConflictingControl {
            offset: 0,
            control: 0x8C
        })))
    );
    assert_eq!(
        Decoder::new(&[0xA0, 1]).next(),
        Some(Err(Error::Decode(DecodeError::ConflictingControl {
            offset: 0,
            control: 0xA0
        })))
    );
}

#[test]
fn drawing_outside_the_target_fails() {
    let mut target = BitMap::empty(2, 2);
    assert_eq!(
        libmask::decode_into(&[0x82, 9], &mut target),
        Err(Error::Decode(DecodeError::OutOfBounds { x: 10, y: 0 }))
    );
}

#[test]
fn failed_decode_leaves_the_target_untouched() {
    let mut target = grid((0, 0), &["..", "3."]);
    let before = target.clone();

    // a valid point, then a move far past the right edge
    assert_eq!(
        libmask::decode_into(&[0x80, 0x82, 9], &mut target),
        Err(Error::Decode(DecodeError::OutOfBounds { x: 11, y: 0 }))
    );
    assert_eq!(target, before);

    assert_eq!(
        libmask::decode_into(&[0x80, 0x82], &mut target),
        Err(Error::Decode(DecodeError::Truncated { offset: 1 }))
    );
    assert_eq!(target, before);
}
