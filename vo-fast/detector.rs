use std::sync::Arc;

use rayon::ThreadPool;
use tracing::debug;
use vo_core::{Corner, GrayscaleImage, KeypointSet, PixelBuffer};

use crate::config::DetectorConfig;
use crate::error::{FastError, FastResult};
use crate::grayscale::GrayscaleConverter;
use crate::response_map::ResponseMap;
use crate::suppression::NonMaxSuppressor;
use crate::types::KeypointOrder;

/// Frame → luminance → response map → suppression → keypoints
///
/// Every stage runs on the pipeline's own worker pool, sized by
/// `core.n_threads` (0 lets rayon choose). Clones share the pool.
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    cfg: DetectorConfig,
    pool: Arc<ThreadPool>,
}

impl DetectionPipeline {
    /// Creates a new pipeline with validation
    pub fn new(cfg: DetectorConfig) -> FastResult<Self> {
        cfg.validate()?;
        let threads = cfg.core.n_threads;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("vo-fast-{i}"))
            .build()
            .map_err(|e| FastError::ThreadPool {
                threads,
                reason: e.to_string(),
            })?;
        Ok(Self {
            cfg,
            pool: Arc::new(pool),
        })
    }

    /// Detect keypoints in one decoded frame.
    ///
    /// Fails with `InvalidImage` or `UnsupportedChannelLayout` before any work
    /// is done; after that detection cannot fail. Frames too small to have an
    /// interior give an empty set.
    pub fn detect(&self, buf: &PixelBuffer) -> FastResult<KeypointSet> {
        let span = tracing::debug_span!(
            "detect",
            width = buf.width,
            height = buf.height,
            channels = buf.channels
        );

        self.pool.install(|| {
            let _entered = span.enter();
            let gray = GrayscaleConverter::convert(buf)?;
            Ok(self.run(&gray))
        })
    }

    /// Detect keypoints in an already converted luminance image
    pub fn detect_grayscale(&self, img: &GrayscaleImage) -> KeypointSet {
        self.pool.install(|| self.run(img))
    }

    fn run(&self, img: &GrayscaleImage) -> KeypointSet {
        let map = ResponseMap::compute(img, &self.cfg.core);
        let suppressed = NonMaxSuppressor::suppress(&map, self.cfg.core.suppression_window);
        let suppressed_len = suppressed.len();
        let keypoints = self.finalize(suppressed);

        debug!(
            candidates = map.candidate_count(),
            suppressed = suppressed_len,
            kept = keypoints.len(),
            "segment test finished"
        );
        keypoints
    }

    /// Segment-test responses before suppression, for inspection
    pub fn response_map(&self, img: &GrayscaleImage) -> ResponseMap {
        self.pool.install(|| ResponseMap::compute(img, &self.cfg.core))
    }

    /// Apply the configured limit and ordering to scan-ordered survivors.
    fn finalize(&self, mut keypoints: KeypointSet) -> KeypointSet {
        let limit = self.cfg.max_keypoints.filter(|&n| keypoints.len() > n);

        if self.cfg.order == KeypointOrder::ByResponse || limit.is_some() {
            rank_by_response(&mut keypoints);
        }
        if let Some(n) = limit {
            keypoints.truncate(n);
            if self.cfg.order == KeypointOrder::ScanOrder {
                keypoints.sort_by_key(|c| (c.y, c.x));
            }
        }
        keypoints
    }

    /// Get pipeline configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Worker threads detection runs on
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

/// Sort strongest first. Stable, so equal responses keep their relative order.
pub fn rank_by_response(keypoints: &mut [Corner]) {
    keypoints.sort_by(|a, b| b.response.total_cmp(&a.response));
}
