use vo_core::CIRCLE_RADIUS;

/// The 16-sample Bresenham circle of radius 3 used by the segment test.
///
/// Samples are ordered clockwise (image y pointing down) starting at 12 o'clock,
/// so index `i` and `i + 1 mod 16` are always 8-connected neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePattern {
    offsets: [(i32, i32); 16],
}

impl SamplePattern {
    pub const RADIUS: usize = CIRCLE_RADIUS;

    /// Indices of the top, right, bottom and left samples.
    pub const CARDINALS: [usize; 4] = [0, 4, 8, 12];

    pub const CIRCLE: SamplePattern = SamplePattern {
        offsets: [
            (0, -3), (1, -3), (2, -2), (3, -1),
            (3, 0), (3, 1), (2, 2), (1, 3),
            (0, 3), (-1, 3), (-2, 2), (-3, 1),
            (-3, 0), (-3, -1), (-2, -2), (-1, -3),
        ],
    };

    pub fn offsets(&self) -> &[(i32, i32); 16] {
        &self.offsets
    }

    /// Offset of sample `i`, wrapping around the circle.
    pub fn offset(&self, i: usize) -> (i32, i32) {
        self.offsets[i % self.offsets.len()]
    }

    pub fn radius(&self) -> usize {
        Self::RADIUS
    }

    pub fn cardinal_indices(&self) -> [usize; 4] {
        Self::CARDINALS
    }

    /// Number of cardinal samples every contiguous arc of `arc_length` samples
    /// covers. A pixel whose cardinals agree on fewer than this many cannot
    /// hold such an arc.
    pub fn min_cardinal_agreement(arc_length: usize) -> usize {
        arc_length.min(16) / 4
    }
}
