/// Convenience result type used across steamclock.
pub type ClockResult<T> = Result<T, ClockError>;

/// Top-level error taxonomy for the clock pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ClockError {
    /// Invalid compile-time configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Missing, unsupported, or undecodable clock artwork.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while compositing or saving a frame.
    #[error("render error: {0}")]
    Render(String),

    /// External encoder failed, timed out, or could not be launched.
    #[error("encode error: {detail}")]
    Encode {
        /// Exit code reported by the encoder, when it exited on its own.
        code: Option<i32>,
        /// Human readable failure description.
        detail: String,
    },

    /// Player command channel failures.
    #[error("player error: {0}")]
    Player(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClockError {
    /// Build a [`ClockError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ClockError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ClockError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ClockError::Encode`] value.
    pub fn encode(code: Option<i32>, detail: impl Into<String>) -> Self {
        Self::Encode {
            code,
            detail: detail.into(),
        }
    }

    /// Build a [`ClockError::Player`] value.
    pub fn player(msg: impl Into<String>) -> Self {
        Self::Player(msg.into())
    }

    /// Whether this error stops the process when it happens before the loop starts.
    ///
    /// Asset, config, and player-channel failures leave nothing useful to run. Encoder
    /// failures never stop the process.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Asset(_) | Self::Player(_) | Self::Other(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
