use vo_core::FastVariant;

use crate::config::DetectorConfig;
use crate::detector::DetectionPipeline;
use crate::error::FastResult;
use crate::types::KeypointOrder;

/// Builder for creating a `DetectionPipeline`
#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
    config: DetectorConfig,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segment-test threshold
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.core.threshold = threshold;
        self
    }

    /// Set the FAST variant (FAST-9 or FAST-12)
    pub fn fast_variant(mut self, variant: FastVariant) -> Self {
        self.config.core.fast_variant = variant;
        self
    }

    /// Set the distance from the borders inside which nothing is detected
    pub fn border_margin(mut self, margin: usize) -> Self {
        self.config.core.border_margin = margin;
        self
    }

    /// Set the side of the non-maximum suppression window
    pub fn suppression_window(mut self, window: usize) -> Self {
        self.config.core.suppression_window = window;
        self
    }

    /// Size of the pipeline's worker pool (0 lets rayon choose)
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.core.n_threads = n_threads;
        self
    }

    pub fn order(mut self, order: KeypointOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Return keypoints strongest first
    pub fn ranked(self) -> Self {
        self.order(KeypointOrder::ByResponse)
    }

    pub fn max_keypoints(mut self, limit: usize) -> Self {
        self.config.max_keypoints = Some(limit);
        self
    }

    /// Apply the FAST-12 preset
    pub fn preset_fast12(self) -> Self {
        self.with_preset(DetectorConfig::fast12_preset())
    }

    /// Apply the dense preset
    pub fn preset_dense(self) -> Self {
        self.with_preset(DetectorConfig::dense_preset())
    }

    /// Apply the sparse preset
    pub fn preset_sparse(self) -> Self {
        self.with_preset(DetectorConfig::sparse_preset())
    }

    fn with_preset(mut self, preset: DetectorConfig) -> Self {
        let n_threads = self.config.core.n_threads;
        self.config = preset;
        self.config.core.n_threads = n_threads;
        self
    }

    /// Validate and build the pipeline
    pub fn build(self) -> FastResult<DetectionPipeline> {
        DetectionPipeline::new(self.config)
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.config.summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        self.config
    }
}
