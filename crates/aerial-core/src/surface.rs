//! Native playback surface abstraction
//!
//! Models the boundary of a native media element: assignable source,
//! playback control, seekable position, volume/mute, and a lifecycle
//! event stream.

use std::time::Duration;

use tokio::sync::broadcast;
use url::Url;

use crate::Result;

pub mod mock;

/// Lifecycle events emitted by a playback surface.
///
/// Payloads are carried on the event itself so forwarding never needs to
/// reach back into the surface.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// Playback position advanced
    TimeUpdate { position: Duration },
    /// Playback was requested to start
    Play,
    /// Playback actually started or resumed
    Playing,
    /// Playback paused
    Pause,
    /// End of stream reached
    Ended,
    /// Content duration became known or changed.
    ///
    /// May be non-finite (NaN before metadata, infinity for live streams).
    DurationChange { seconds: f64 },
    /// Runtime playback failure; terminal for the current source
    Error { reason: String },
}

/// A native media-playback surface.
///
/// Commands apply synchronously on the caller's thread; observers learn of
/// the outcome through the event stream. Volume is valid in `0.0..=1.0`.
pub trait MediaSurface: Send + 'static {
    /// Assign or clear the content source. Resets position; any known
    /// duration becomes unknown until the new media reports one.
    fn set_src(&mut self, src: Option<Url>);

    /// Currently assigned source, if any
    fn src(&self) -> Option<Url>;

    /// Start or resume playback. Fails when no source is assigned.
    fn play(&mut self) -> Result<()>;

    /// Pause playback. Harmless when already paused.
    fn pause(&mut self) -> Result<()>;

    /// Seek to a position. Positions beyond a known duration are clamped.
    fn set_position(&mut self, position: Duration);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Set the output volume. Out-of-range values are rejected.
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Current output volume
    fn volume(&self) -> f32;

    /// Set the mute flag
    fn set_muted(&mut self, muted: bool);

    /// Current mute flag
    fn muted(&self) -> bool;

    /// Content duration in seconds; NaN until known, may be infinite
    fn duration_seconds(&self) -> f64;

    /// Subscribe to surface lifecycle events
    fn events(&self) -> broadcast::Receiver<SurfaceEvent>;
}
