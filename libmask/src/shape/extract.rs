use itertools::iproduct;
use tracing::{debug, instrument, trace};

use crate::{
    error::Invariant,
    raster::{BitMap, Bounds},
    shape::{
        classify::{extract_diagonal, extract_line, extract_rect, neighbor_count},
        Fragment,
    },
    Error, SAFETY_CHECKS,
};

/// Decomposes `bitmap` into non-overlapping fragments, appending them to `fragments` in
/// extraction order
///
/// The first pass resolves isolated pixels, diagonals and lines in raster order and sets aside
/// every pixel that touches two or more cells of its own value. The second pass revisits the
/// region around those pixels and covers what is left with greedy rectangles.
/// `bitmap` itself is never modified, the passes clear a private copy.
///
/// # Errors
///
/// Returns [`Error::Invariant`] if the classifiers disagree with each other
#[instrument(skip_all, level = "trace")]
pub(crate) fn extract_into(bitmap: &BitMap, fragments: &mut Vec<Fragment>) -> Result<(), Error> {
    let start = fragments.len();
    let mut work = bitmap.clone();
    let mut deferred: Option<Bounds> = None;

    for (y, x) in iproduct!(work.min_y()..work.max_y(), work.min_x()..work.max_x()) {
        let value = work.pixel(x, y);
        if value == 0 {
            continue;
        }
        let fragment = match neighbor_count(&work, x, y, value) {
            0 => match extract_diagonal(&work, x, y, value) {
                Some((bounds, slope)) => Fragment::diagonal(bounds, value, slope),
                None => Fragment::filled(Bounds::pixel(x, y), value),
            },
            // the only neighbor was set aside earlier in this row
            1 if work.pixel(x - 1, y) == value => {
                defer(&mut deferred, x, y);
                continue;
            }
            1 => Fragment::filled(extract_line(&work, x, y, value)?, value),
            _ => {
                defer(&mut deferred, x, y);
                continue;
            }
        };
        take(&mut work, fragment, fragments)?;
    }
    let first_pass = fragments.len() - start;

    if let Some(region) = deferred {
        trace!("Second pass over {region:?}");
        for (y, x) in iproduct!(region.min_y..=region.max_y, region.min_x..=region.max_x) {
            let value = work.pixel(x, y);
            if value == 0 {
                continue;
            }
            let bounds = match neighbor_count(&work, x, y, value) {
                0 => Bounds::pixel(x, y),
                _ => extract_rect(&work, x, y, value),
            };
            take(&mut work, Fragment::filled(bounds, value), fragments)?;
        }
    }
    debug!(
        "Extracted {} fragments ({first_pass} in the first pass)",
        fragments.len() - start
    );

    if SAFETY_CHECKS {
        ensure_clear(&work)?;
    }
    Ok(())
}

fn ensure_clear(work: &BitMap) -> Result<(), Invariant> {
    work.nonzero_bounds().map_or(Ok(()), |residue| Err(Invariant::Residue(residue)))
}

fn defer(deferred: &mut Option<Bounds>, x: i32, y: i32) {
    match deferred {
        Some(region) => region.include(x, y),
        None => *deferred = Some(Bounds::pixel(x, y)),
    }
}

// records a fragment and clears its pixels from the working copy
fn take(work: &mut BitMap, fragment: Fragment, fragments: &mut Vec<Fragment>) -> Result<(), Error> {
    let kind: &'static str = fragment.kind.into();
    trace!(kind, value = fragment.value, "{:?}", fragment.bounds);
    if SAFETY_CHECKS {
        ensure_holds(work, &fragment)?;
    }
    for (x, y) in fragment.pixels() {
        work.set_pixel(x, y, 0);
    }
    fragments.push(fragment);
    Ok(())
}

// every covered pixel must still hold the fragment's value
fn ensure_holds(work: &BitMap, fragment: &Fragment) -> Result<(), Invariant> {
    for (x, y) in fragment.pixels() {
        let found = work.pixel(x, y);
        if found != fragment.value {
            return Err(Invariant::StalePixel {
                x,
                y,
                expected: fragment.value,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 block of 5 with a 6 in the bottom-right corner
    fn work() -> BitMap {
        let mut map = BitMap::empty(2, 2);
        map.set_pixel(0, 0, 5);
        map.set_pixel(1, 0, 5);
        map.set_pixel(0, 1, 5);
        map.set_pixel(1, 1, 6);
        map
    }

    #[test]
    fn stale_pixels_are_reported() {
        let map = work();
        let block = Fragment::filled(Bounds::spanning((0, 0), (1, 1)), 5);
        assert_eq!(
            ensure_holds(&map, &block),
            Err(Invariant::StalePixel {
                x: 1,
                y: 1,
                expected: 5,
                found: 6
            })
        );
        let row = Fragment::filled(Bounds::spanning((0, 0), (1, 0)), 5);
        assert_eq!(ensure_holds(&map, &row), Ok(()));
    }

    #[test]
    #[cfg_attr(not(any(debug_assertions, feature = "safety-checks")), ignore)]
    fn take_leaves_everything_in_place_on_a_stale_pixel() {
        let mut map = work();
        let mut fragments = vec![Fragment::filled(Bounds::pixel(7, 7), 1)];
        let block = Fragment::filled(Bounds::spanning((0, 0), (1, 1)), 5);
        assert_eq!(
            take(&mut map, block, &mut fragments),
            Err(Error::Invariant(Invariant::StalePixel {
                x: 1,
                y: 1,
                expected: 5,
                found: 6
            }))
        );
        assert_eq!(map, work());
        assert_eq!(fragments, [Fragment::filled(Bounds::pixel(7, 7), 1)]);
    }

    #[test]
    fn take_clears_what_it_records() {
        let mut map = work();
        let mut fragments = Vec::new();
        let column = Fragment::filled(Bounds::spanning((0, 0), (0, 1)), 5);
        take(&mut map, column, &mut fragments).unwrap();
        assert_eq!(fragments, [column]);
        assert_eq!(map.pixel(0, 0), 0);
        assert_eq!(map.pixel(0, 1), 0);
        assert_eq!(
            ensure_clear(&map),
            Err(Invariant::Residue(Bounds::spanning((1, 0), (1, 1))))
        );

        map.set_pixel(1, 0, 0);
        map.set_pixel(1, 1, 0);
        assert_eq!(ensure_clear(&map), Ok(()));
    }
}
