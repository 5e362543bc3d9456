use rayon::prelude::*;
use vo_core::{GrayscaleImage, PixelBuffer};

use crate::error::{FastError, FastResult};

/// Color to luminance conversion (ITU-R BT.601 weights)
pub struct GrayscaleConverter;

impl GrayscaleConverter {
    /// R, G, B weights in thousandths.
    pub const WEIGHTS: [u32; 3] = [299, 587, 114];

    /// Checks dimensions, channel layout and data length of a frame buffer.
    pub fn validate(buf: &PixelBuffer) -> FastResult<()> {
        if buf.width == 0 || buf.height == 0 {
            return Err(FastError::invalid_image(format!(
                "dimensions {}x{} (must be > 0)",
                buf.width, buf.height
            )));
        }
        if buf.data.is_empty() {
            return Err(FastError::invalid_image("empty sample data"));
        }
        if !matches!(buf.channels, 1 | 3 | 4) {
            return Err(FastError::UnsupportedChannelLayout {
                channels: buf.channels,
            });
        }
        match buf.expected_len() {
            Some(expected) if expected == buf.data.len() => Ok(()),
            Some(expected) => Err(FastError::invalid_image(format!(
                "data length mismatch: expected {}, got {}",
                expected,
                buf.data.len()
            ))),
            None => Err(FastError::invalid_image(format!(
                "dimensions {}x{}x{} overflow",
                buf.width, buf.height, buf.channels
            ))),
        }
    }

    /// Derive the luminance image of `buf`.
    ///
    /// Single-channel input is copied through unchanged; for 3 and 4 channel
    /// input the first three channels are read as R, G, B and alpha is ignored.
    pub fn convert(buf: &PixelBuffer) -> FastResult<GrayscaleImage> {
        Self::validate(buf)?;

        let data = match buf.channels {
            1 => buf.data.to_vec(),
            channels => buf
                .data
                .par_chunks_exact(channels)
                .with_min_len(1024)
                .map(|px| Self::luminance(px[0], px[1], px[2]))
                .collect(),
        };

        GrayscaleImage::from_raw(buf.width, buf.height, data)
            .ok_or_else(|| FastError::invalid_image("converted length does not match dimensions"))
    }

    /// `round(0.299 R + 0.587 G + 0.114 B)`, rounding half up, in exact integer
    /// arithmetic.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
        let [wr, wg, wb] = Self::WEIGHTS;
        let weighted = wr * r as u32 + wg * g as u32 + wb * b as u32;
        ((weighted + 500) / 1000).min(255) as u8
    }
}
