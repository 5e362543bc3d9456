use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastError {
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },
    #[error("Unsupported channel layout: {channels} channels (expected 1, 3 or 4)")]
    UnsupportedChannelLayout { channels: usize },
    #[error("Border margin {margin} smaller than the sample circle radius {min}")]
    InvalidBorderMargin { margin: usize, min: usize },
    #[error("Invalid suppression window: {0} (must be odd and >= 1)")]
    InvalidSuppressionWindow(usize),
    #[error("Worker pool with {threads} threads: {reason}")]
    ThreadPool { threads: usize, reason: String },
}

impl FastError {
    pub(crate) fn invalid_image(reason: impl Into<String>) -> Self {
        FastError::InvalidImage {
            reason: reason.into(),
        }
    }
}

pub type FastResult<T> = Result<T, FastError>;
