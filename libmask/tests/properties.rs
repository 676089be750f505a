mod common;
use common::{covered, nonzero};
use libmask::{BitMap, Encoder, Kind};
use proptest::{collection::vec, prelude::*};

fn cell() -> impl Strategy<Value = u8> {
    prop_oneof![
        6 => Just(0u8),
        3 => Just(255u8),
        1 => 1u8..=4,
    ]
}

// small enough that every move and extent stays inside the format's ranges
fn arb_bitmap() -> impl Strategy<Value = BitMap> {
    (1u16..24, 1u16..24, -8i32..8, -8i32..8).prop_flat_map(|(width, height, x, y)| {
        vec(cell(), usize::from(width) * usize::from(height)).prop_map(move |pixels| {
            BitMap::builder()
                .width(width)
                .height(height)
                .origin((x, y))
                .pixels(pixels)
                .build()
                .unwrap()
        })
    })
}

proptest! {
    #[test]
    fn fragments_partition_the_mask(bitmap in arb_bitmap()) {
        let fragments = libmask::extract_fragments(&bitmap).unwrap();
        prop_assert_eq!(covered(&fragments), nonzero(&bitmap));
    }

    #[test]
    fn fragment_kinds_match_their_shape(bitmap in arb_bitmap()) {
        for fragment in libmask::extract_fragments(&bitmap).unwrap() {
            let (w, h) = (fragment.width(), fragment.height());
            match fragment.kind {
                Kind::Point => {
                    prop_assert!(w == 1 && h == 1);
                }
                Kind::Line => {
                    prop_assert!((w == 1) != (h == 1));
                }
                Kind::Diagonal(_) => {
                    prop_assert!(w == h && w > 1);
                }
                Kind::Rect => {
                    prop_assert!(w > 1 && h > 1);
                }
            }
        }
    }

    #[test]
    fn fragments_follow_stream_order(bitmap in arb_bitmap()) {
        let fragments = libmask::extract_fragments(&bitmap).unwrap();
        for pair in fragments.windows(2) {
            let key = |i: usize| (
                std::cmp::Reverse(pair[i].value),
                pair[i].bounds.min_y,
                pair[i].bounds.min_x,
            );
            prop_assert!(key(0) <= key(1));
        }
    }

    #[test]
    fn decoding_restores_the_mask(bitmap in arb_bitmap()) {
        let stream = libmask::encode(&bitmap).unwrap();
        let mut decoded = BitMap::at(bitmap.width(), bitmap.height(), bitmap.origin()).unwrap();
        libmask::decode_into(&stream, &mut decoded).unwrap();
        prop_assert_eq!(decoded, bitmap);
    }

    #[test]
    fn encoding_is_deterministic(first in arb_bitmap(), second in arb_bitmap()) {
        let mut encoder = Encoder::default();
        let (mut a, mut b) = (Vec::new(), Vec::new());
        encoder.encode(&second, &mut a).unwrap();
        encoder.encode(&first, &mut a).unwrap();
        a.clear();
        encoder.encode(&second, &mut a).unwrap();
        Encoder::default().encode(&second, &mut b).unwrap();
        prop_assert_eq!(a, b);
    }
}
