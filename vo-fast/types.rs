use vo_core::Polarity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segment-test outcome for one pixel that passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentResponse {
    pub response: f32,
    pub polarity: Polarity,
}

/// Ordering of the keypoints returned by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeypointOrder {
    /// Row-major, as the image was scanned.
    #[default]
    ScanOrder,
    /// Strongest first; equal responses keep scan order.
    ByResponse,
}

/// Per-sample classification against the center intensity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleClass {
    Brighter,
    Darker,
    Similar,
}

impl SampleClass {
    #[inline]
    pub(crate) fn of(sample: i16, center: i16, threshold: i16) -> Self {
        if sample >= center + threshold {
            SampleClass::Brighter
        } else if sample <= center - threshold {
            SampleClass::Darker
        } else {
            SampleClass::Similar
        }
    }
}
