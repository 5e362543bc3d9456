use vo_core::{FastVariant, GrayscaleImage, Polarity};

use crate::pattern::SamplePattern;
use crate::types::{SampleClass, SegmentResponse};
use crate::utils::run_ends;

/// FAST segment test on the radius-3 sample circle
pub struct SegmentTest;

impl SegmentTest {
    /// Classify pixel `(x, y)`.
    ///
    /// The pixel must lie at least [`SamplePattern::RADIUS`] away from every
    /// border; the pipeline never calls this outside its margin. Returns `None`
    /// when no arc of `variant.arc_length()` samples is uniformly brighter or
    /// darker than the center by `threshold`.
    pub fn classify(
        image: &GrayscaleImage,
        x: usize,
        y: usize,
        threshold: u8,
        variant: FastVariant,
    ) -> Option<SegmentResponse> {
        let r = SamplePattern::RADIUS;
        debug_assert!(
            x >= r && y >= r && x + r < image.width() && y + r < image.height(),
            "({x}, {y}) violates the {r}px margin of a {}x{} image",
            image.width(),
            image.height()
        );

        let mut ring = [0u8; 16];
        for (sample, &(dx, dy)) in ring.iter_mut().zip(SamplePattern::CIRCLE.offsets()) {
            let sx = (x as i32 + dx) as usize;
            let sy = (y as i32 + dy) as usize;
            *sample = image.at(sx, sy);
        }

        Self::classify_ring(image.at(x, y), &ring, threshold, variant)
    }

    /// Segment test over already gathered circle samples, in pattern order.
    pub fn classify_ring(
        center: u8,
        ring: &[u8; 16],
        threshold: u8,
        variant: FastVariant,
    ) -> Option<SegmentResponse> {
        let center = center as i16;
        let t = threshold as i16;
        let arc = variant.arc_length();

        // Quick rejection on the four cardinal samples
        let required = SamplePattern::min_cardinal_agreement(arc);
        let (mut bright, mut dark) = (0, 0);
        for &i in &SamplePattern::CARDINALS {
            match SampleClass::of(ring[i] as i16, center, t) {
                SampleClass::Brighter => bright += 1,
                SampleClass::Darker => dark += 1,
                SampleClass::Similar => {}
            }
        }
        if bright < required && dark < required {
            return None;
        }

        let mut diffs = [0i16; 16];
        let mut bright_mask = 0u16;
        let mut dark_mask = 0u16;
        for (i, &sample) in ring.iter().enumerate() {
            let sample = sample as i16;
            diffs[i] = sample - center;
            match SampleClass::of(sample, center, t) {
                SampleClass::Brighter => bright_mask |= 1 << i,
                SampleClass::Darker => dark_mask |= 1 << i,
                SampleClass::Similar => {}
            }
        }

        let brighter = Self::best_arc(bright_mask, &diffs, arc).map(|response| SegmentResponse {
            response: response as f32,
            polarity: Polarity::Brighter,
        });
        let darker = Self::best_arc(dark_mask, &diffs, arc).map(|response| SegmentResponse {
            response: response as f32,
            polarity: Polarity::Darker,
        });

        match (brighter, darker) {
            (Some(b), Some(d)) => Some(if d.response > b.response { d } else { b }),
            (b, d) => b.or(d),
        }
    }

    /// Strongest qualifying arc of exactly `arc` samples within `mask`: the
    /// largest, over all such arcs, of the smallest |sample - center| in the arc.
    fn best_arc(mask: u16, diffs: &[i16; 16], arc: usize) -> Option<i16> {
        let ends = run_ends(mask, arc);
        if ends == 0 {
            return None;
        }

        (0..16)
            .filter(|end| ends & (1 << end) != 0)
            .map(|end| {
                (0..arc)
                    .map(|k| diffs[(end + 16 - k) % 16].abs())
                    .fold(i16::MAX, i16::min)
            })
            .max()
    }
}
