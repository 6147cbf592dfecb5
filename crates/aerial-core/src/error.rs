//! Error types for Aerial Core

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge error types
#[derive(Error, Debug)]
pub enum Error {
    // Wrapper errors
    #[error("No command sink registered on wrapper")]
    SinkNotRegistered,

    // Surface errors
    #[error("No source assigned to playback surface")]
    NoSource,

    #[error("Volume out of range: {volume} (expected 0.0..=1.0)")]
    VolumeOutOfRange { volume: f32 },

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    // Source errors
    #[error("Invalid validity window: {from} >= {to}")]
    InvalidWindow {
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    },

    #[error("Invalid channel name: {0:?}")]
    InvalidChannel(String),

    // Registry errors
    #[error("Source factory already installed")]
    SourcesAlreadyInstalled,

    #[error("Source factory not installed yet")]
    SourcesNotInstalled,

    // Ad errors
    #[error("Ad is not eligible for skipping")]
    SkipNotAllowed,

    #[error("Ad feed closed")]
    AdFeedClosed,
}

impl Error {
    /// Returns the error code for log tagging
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::SinkNotRegistered => "SINK_NOT_REGISTERED",
            Error::NoSource => "NO_SOURCE",
            Error::VolumeOutOfRange { .. } => "VOLUME_OUT_OF_RANGE",
            Error::PlaybackFailed(_) => "PLAYBACK_FAILED",
            Error::InvalidWindow { .. } => "INVALID_WINDOW",
            Error::InvalidChannel(_) => "INVALID_CHANNEL",
            Error::SourcesAlreadyInstalled => "SOURCES_INSTALLED",
            Error::SourcesNotInstalled => "SOURCES_MISSING",
            Error::SkipNotAllowed => "SKIP_NOT_ALLOWED",
            Error::AdFeedClosed => "AD_FEED_CLOSED",
        }
    }
}
