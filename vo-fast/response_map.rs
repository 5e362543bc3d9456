use rayon::prelude::*;
use vo_core::{FastConfig, GrayscaleImage};

use crate::corner_detection::SegmentTest;
use crate::pattern::SamplePattern;
use crate::types::SegmentResponse;

/// Dense per-pixel segment-test responses of one frame.
///
/// Only the interior `[margin, w - margin) x [margin, h - margin)` is ever
/// classified; every other cell stays empty.
#[derive(Debug, Clone)]
pub struct ResponseMap {
    width: usize,
    height: usize,
    margin: usize,
    cells: Vec<Option<SegmentResponse>>,
}

impl ResponseMap {
    /// Classify every interior pixel of `image`.
    ///
    /// Rows are processed in parallel and each worker writes only its own row.
    /// A margin below the circle radius is raised to the radius.
    pub fn compute(image: &GrayscaleImage, cfg: &FastConfig) -> Self {
        let (w, h) = image.dimensions();
        let margin = cfg.border_margin.max(SamplePattern::RADIUS);
        let mut cells = vec![None; w * h];

        if w > 2 * margin && h > 2 * margin {
            cells
                .par_chunks_mut(w)
                .enumerate()
                .skip(margin)
                .take(h - 2 * margin)
                .for_each(|(y, row)| {
                    for (x, cell) in row.iter_mut().enumerate().take(w - margin).skip(margin) {
                        *cell = SegmentTest::classify(image, x, y, cfg.threshold, cfg.fast_variant);
                    }
                });
        }

        Self {
            width: w,
            height: h,
            margin,
            cells,
        }
    }

    /// Map with the given cells already filled in, for exercising suppression.
    #[cfg(test)]
    pub(crate) fn from_cells(
        width: usize,
        height: usize,
        margin: usize,
        filled: &[(usize, usize, SegmentResponse)],
    ) -> Self {
        let mut cells = vec![None; width * height];
        for &(x, y, r) in filled {
            assert!(cells[y * width + x].is_none(), "cell ({x}, {y}) written twice");
            cells[y * width + x] = Some(r);
        }
        Self {
            width,
            height,
            margin,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn margin(&self) -> usize {
        self.margin
    }

    pub fn get(&self, x: usize, y: usize) -> Option<SegmentResponse> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[Option<SegmentResponse>] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Non-empty cells in row-major order.
    pub fn candidates(&self) -> impl Iterator<Item = (usize, usize, SegmentResponse)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|r| (i % self.width, i / self.width, r))
        })
    }

    pub fn candidate_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
