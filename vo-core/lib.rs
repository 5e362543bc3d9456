//! Shared frame and keypoint types for the visual-odometry front end.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Radius of the Bresenham circle sampled by the segment test.
pub const CIRCLE_RADIUS: usize = 3;

/// Borrowed view over one decoded frame: row-major, interleaved channels.
///
/// Nothing is checked on construction. The detection pipeline validates the
/// dimensions, channel count and data length once, at its entry point.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    pub fn new(width: usize, height: usize, channels: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * self.channels
    }

    /// Number of samples the declared dimensions require, `None` on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.channels)
    }

    /// Channel `c` of pixel `(x, y)`, or `None` outside the buffer.
    pub fn sample(&self, x: usize, y: usize, c: usize) -> Option<u8> {
        if x >= self.width || y >= self.height || c >= self.channels {
            return None;
        }
        self.data.get(y * self.stride() + x * self.channels + c).copied()
    }

    /// All channels of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y * self.stride() + x * self.channels;
        self.data.get(start..start + self.channels)
    }
}

/// Owned single-channel 8-bit luminance image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayscaleImage {
    /// Wraps row-major luminance samples. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)? != data.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Intensity at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Intensity at `(x, y)` for callers that already respect the bounds.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the image.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width, "x = {x} outside width {}", self.width);
        self.data[y * self.width + x]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// One-channel buffer view, e.g. to hand the luminance frame to a renderer.
    pub fn as_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(self.width, self.height, 1, &self.data)
    }
}

/// Which side of the center intensity the qualifying arc lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Polarity {
    Brighter,
    Darker,
}

/// Segment-test corner at integer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Corner {
    pub x: usize,
    pub y: usize,
    /// Largest threshold at which this pixel still passes the segment test.
    pub response: f32,
    pub polarity: Polarity,
}

/// Keypoints of one frame, in row-major scan order unless ranked.
pub type KeypointSet = Vec<Corner>;

/// Minimum contiguous arc length of the segment test (FAST-N).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FastVariant {
    #[default]
    Fast9,
    Fast12,
}

impl FastVariant {
    pub const fn arc_length(self) -> usize {
        match self {
            FastVariant::Fast9 => 9,
            FastVariant::Fast12 => 12,
        }
    }

    pub fn from_arc_length(n: usize) -> Option<Self> {
        match n {
            9 => Some(FastVariant::Fast9),
            12 => Some(FastVariant::Fast12),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FastConfig {
    /// Intensity difference a circle sample needs to count as brighter/darker.
    pub threshold: u8,
    pub fast_variant: FastVariant,
    /// Distance from every image border inside which no pixel is classified.
    pub border_margin: usize,
    /// Side length of the non-maximum suppression square (odd).
    pub suppression_window: usize,
    /// Worker threads of a detection pipeline; read from config files, never written.
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    pub n_threads: usize,
}

impl Default for FastConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            fast_variant: FastVariant::Fast9,
            border_margin: CIRCLE_RADIUS,
            suppression_window: 3,
            n_threads: num_cpus::get().max(1),
        }
    }
}
