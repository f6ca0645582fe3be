use thiserror::Error;

/// Every failure the tracking-to-physics pipeline can surface.
///
/// Detection misses are not errors: a half-frame with nothing in it yields
/// `None` and the paddle simply holds its last position.
#[derive(Debug, Error)]
pub enum PongError {
    /// The frame source could not supply a frame (no camera, end of stream).
    #[error("frame acquisition failed: {0}")]
    Acquisition(String),

    /// A frame with zero width or height reached the pipeline.
    #[error("received an empty frame")]
    EmptyFrame,

    /// The two frames of a motion pair do not share dimensions.
    #[error("frame size mismatch: expected {expected:?}, got {actual:?}")]
    FrameMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("display sink failed: {0}")]
    Display(String),
}

impl PongError {
    /// Whether the session should drop the current tick and keep playing.
    pub fn is_skippable(&self) -> bool {
        matches!(self, PongError::EmptyFrame | PongError::FrameMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, PongError>;
