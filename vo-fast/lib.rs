//! FAST segment-test corner extraction for the visual-odometry front end.
//!
//! One frame goes through [`GrayscaleConverter`], a dense [`ResponseMap`] of
//! segment-test results, and [`NonMaxSuppressor`]; [`DetectionPipeline`] runs
//! the three in order.
//!
//! ```no_run
//! use vo_core::PixelBuffer;
//! use vo_fast::DetectorBuilder;
//!
//! let rgb = vec![0u8; 640 * 480 * 3];
//! let pipeline = DetectorBuilder::new().threshold(25).build()?;
//! let keypoints = pipeline.detect(&PixelBuffer::new(640, 480, 3, &rgb))?;
//! # Ok::<(), vo_fast::FastError>(())
//! ```

pub mod builder;
pub mod config;
pub mod corner_detection;
pub mod detector;
pub mod error;
pub mod grayscale;
pub mod pattern;
pub mod response_map;
pub mod suppression;
pub mod types;
pub mod utils;

pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
#[cfg(feature = "serde")]
pub use config::ConfigError;
pub use corner_detection::SegmentTest;
pub use detector::{rank_by_response, DetectionPipeline};
pub use error::{FastError, FastResult};
pub use grayscale::GrayscaleConverter;
pub use pattern::SamplePattern;
pub use response_map::ResponseMap;
pub use suppression::NonMaxSuppressor;
pub use types::{KeypointOrder, SegmentResponse};

pub use vo_core::{
    Corner, FastConfig, FastVariant, GrayscaleImage, KeypointSet, PixelBuffer, Polarity,
};

/// Validate `cfg`, then detect keypoints in one frame.
pub fn detect(buf: &PixelBuffer, cfg: &DetectorConfig) -> FastResult<KeypointSet> {
    DetectionPipeline::new(cfg.clone())?.detect(buf)
}
