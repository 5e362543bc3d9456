use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use vo_core::{KeypointSet, PixelBuffer, Polarity};
use vo_fast::{ConfigError, DetectionPipeline, DetectorConfig, FastError, GrayscaleConverter};

pub use vo_core::{self, Corner};
pub use vo_fast::{self, DetectorBuilder};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("detection failed: {0}")]
    Detect(#[from] FastError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest line {line}: {reason}")]
    Manifest { line: usize, reason: String },
    #[error("unknown preset '{0}' (expected default, fast12, dense or sparse)")]
    UnknownPreset(String),
}

pub type CliResult<T> = Result<T, CliError>;

/// One frame listed in a dataset manifest
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEntry {
    pub timestamp: f64,
    pub path: PathBuf,
}

/// Ordered frame list of a TUM RGB-D style sequence (`rgb.txt`).
///
/// Lines starting with `#` and blank lines are ignored; every other line is
/// `timestamp relative/path`.
#[derive(Debug, Clone, Default)]
pub struct FrameManifest {
    entries: Vec<FrameEntry>,
}

impl FrameManifest {
    pub const FILE_NAME: &'static str = "rgb.txt";

    /// Read `<dataset>/rgb.txt`, resolving frame paths against `dataset`
    pub fn read<P: AsRef<Path>>(dataset: P) -> CliResult<Self> {
        let dataset = dataset.as_ref();
        let text = std::fs::read_to_string(dataset.join(Self::FILE_NAME))?;
        Self::parse(dataset, &text)
    }

    pub fn parse(root: &Path, text: &str) -> CliResult<Self> {
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: &str| CliError::Manifest {
                line: idx + 1,
                reason: reason.to_string(),
            };

            let mut fields = line.split_whitespace();
            let (Some(stamp), Some(rel), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed("expected `timestamp path`"));
            };
            let timestamp = stamp
                .parse::<f64>()
                .map_err(|_| malformed("timestamp is not a number"))?;
            entries.push(FrameEntry {
                timestamp,
                path: root.join(rel),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FrameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decoded frame in one of the layouts the detector accepts
#[derive(Debug, Clone)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Decode an image file. Formats other than 8-bit gray, RGB and RGBA are
    /// converted to RGBA.
    pub fn open<P: AsRef<Path>>(path: P) -> CliResult<Self> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let (channels, data) = match img {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Wrap interleaved samples, checking them the way detection would
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> CliResult<Self> {
        GrayscaleConverter::validate(&PixelBuffer::new(width, height, channels, &data))?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn as_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(self.width, self.height, self.channels, &self.data)
    }

    pub fn to_rgba(&self) -> RgbaImage {
        let c = self.channels;
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let i = (y as usize * self.width + x as usize) * c;
            let px = &self.data[i..i + c];
            match c {
                1 => Rgba([px[0], px[0], px[0], 255]),
                3 => Rgba([px[0], px[1], px[2], 255]),
                _ => Rgba([px[0], px[1], px[2], px[3]]),
            }
        })
    }
}

const BRIGHTER_MARKER: Rgba<u8> = Rgba([255, 0, 0, 255]);
const DARKER_MARKER: Rgba<u8> = Rgba([0, 0, 255, 255]);
const MARKER_RADIUS: i32 = 3;

/// Frame with a hollow circle drawn at every keypoint: red for brighter
/// arcs, blue for darker ones.
pub fn render_keypoints(frame: &Frame, keypoints: &[Corner]) -> RgbaImage {
    let mut output = frame.to_rgba();
    for kp in keypoints {
        let color = match kp.polarity {
            Polarity::Brighter => BRIGHTER_MARKER,
            Polarity::Darker => DARKER_MARKER,
        };
        draw_hollow_circle_mut(
            &mut output,
            (kp.x as i32, kp.y as i32),
            MARKER_RADIUS,
            color,
        );
    }
    output
}

/// Detection result for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub width: usize,
    pub height: usize,
    pub elapsed_ms: f64,
    pub keypoints: KeypointSet,
}

/// Totals of one `process_sequence` run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SequenceSummary {
    pub processed: usize,
    pub skipped: usize,
    pub total_keypoints: usize,
    pub elapsed_ms: f64,
    pub frames: Vec<FrameReport>,
}

/// Per-frame keypoint extraction over single images and whole sequences
#[derive(Debug, Clone)]
pub struct VoFrontend {
    pipeline: DetectionPipeline,
}

impl VoFrontend {
    pub fn new(cfg: DetectorConfig) -> CliResult<Self> {
        Ok(Self {
            pipeline: DetectionPipeline::new(cfg)?,
        })
    }

    pub fn pipeline(&self) -> &DetectionPipeline {
        &self.pipeline
    }

    /// Detect keypoints in an already decoded frame
    pub fn detect_frame(
        &self,
        frame: &Frame,
        path: &Path,
        timestamp: Option<f64>,
    ) -> CliResult<FrameReport> {
        let t0 = Instant::now();
        let keypoints = self.pipeline.detect(&frame.as_buffer())?;
        let elapsed = t0.elapsed();
        debug!(path = %path.display(), keypoints = keypoints.len(), "frame detected");

        Ok(FrameReport {
            path: path.to_path_buf(),
            timestamp,
            width: frame.width(),
            height: frame.height(),
            elapsed_ms: millis(elapsed),
            keypoints,
        })
    }

    /// Load one image file and detect keypoints in it
    pub fn process_frame<P: AsRef<Path>>(&self, path: P) -> CliResult<FrameReport> {
        let path = path.as_ref();
        let frame = Frame::open(path)?;
        self.detect_frame(&frame, path, None)
    }

    /// Run detection on the first `limit` frames of a manifest (all if `None`).
    ///
    /// Frames that cannot be read or decoded are logged and skipped. Errors
    /// returned by `visit` stop the run.
    pub fn process_sequence<F>(
        &self,
        manifest: &FrameManifest,
        limit: Option<usize>,
        mut visit: F,
    ) -> CliResult<SequenceSummary>
    where
        F: FnMut(&Frame, &FrameReport) -> CliResult<()>,
    {
        let t0 = Instant::now();
        let mut summary = SequenceSummary::default();
        let count = limit.unwrap_or(manifest.len()).min(manifest.len());

        for (idx, entry) in manifest.entries().iter().take(count).enumerate() {
            let frame = match Frame::open(&entry.path) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!(
                        frame = idx,
                        path = %entry.path.display(),
                        error = %err,
                        "skipping unreadable frame"
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

            let report = self.detect_frame(&frame, &entry.path, Some(entry.timestamp))?;
            info!(
                frame = idx,
                timestamp = entry.timestamp,
                keypoints = report.keypoints.len(),
                ms = report.elapsed_ms,
                "frame processed"
            );
            visit(&frame, &report)?;

            summary.processed += 1;
            summary.total_keypoints += report.keypoints.len();
            summary.frames.push(report);
        }

        summary.elapsed_ms = millis(t0.elapsed());
        Ok(summary)
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
