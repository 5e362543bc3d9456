use rayon::prelude::*;
use vo_core::{Corner, KeypointSet};

use crate::response_map::ResponseMap;

/// Square-window non-maximum suppression over a finished response map
pub struct NonMaxSuppressor;

impl NonMaxSuppressor {
    /// Keep every candidate that is the maximum of the `window x window`
    /// square centred on it.
    ///
    /// A neighbour with an equal response only wins if it comes earlier in
    /// row-major order, so exactly one of a tied pair survives. Output is in
    /// scan order. An even `window` behaves like the next odd size.
    pub fn suppress(map: &ResponseMap, window: usize) -> KeypointSet {
        let half = window / 2;
        let width = map.width();

        (0..map.height())
            .into_par_iter()
            .flat_map_iter(move |y| {
                (0..width).filter_map(move |x| {
                    let cell = map.get(x, y)?;
                    Self::is_local_maximum(map, x, y, cell.response, half).then_some(Corner {
                        x,
                        y,
                        response: cell.response,
                        polarity: cell.polarity,
                    })
                })
            })
            .collect()
    }

    fn is_local_maximum(
        map: &ResponseMap,
        x: usize,
        y: usize,
        response: f32,
        half: usize,
    ) -> bool {
        let y_end = (y + half).min(map.height() - 1);
        let x_end = (x + half).min(map.width() - 1);

        for ny in y.saturating_sub(half)..=y_end {
            for nx in x.saturating_sub(half)..=x_end {
                if (nx, ny) == (x, y) {
                    continue;
                }
                let Some(neighbour) = map.get(nx, ny) else {
                    continue;
                };
                let earlier = (ny, nx) < (y, x);
                if neighbour.response > response || (neighbour.response == response && earlier) {
                    return false;
                }
            }
        }
        true
    }
}
