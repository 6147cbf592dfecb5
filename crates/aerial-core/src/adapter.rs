//! Player adapter - binds a native surface to a wrapper handle
//!
//! [`PlayerAdapter::bind`] moves the surface into a command sink registered
//! on the wrapper and subscribes to the surface event stream exactly once.
//! Because binding consumes the surface, a duplicate registration of the
//! same surface cannot be expressed. Dropping the returned
//! [`SurfaceBinding`] releases both the sink and the event subscription.

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::surface::{MediaSurface, SurfaceEvent};
use crate::types::{PlaybackSource, PlayerState};
use crate::wrapper::{CommandSink, PlayerWrapper};
use crate::Error;

/// Reason forwarded to the service for any surface failure. The service
/// receives no further classification; details stay in the logs.
const GENERIC_FAILURE: &str = "failed to play";

/// Entry point binding surfaces to wrappers
pub struct PlayerAdapter;

impl PlayerAdapter {
    /// Register `surface` as the playback target of `wrapper`.
    ///
    /// The returned binding forwards surface events as notifications for as
    /// long as it lives; run its event pump with [`SurfaceBinding::run`].
    pub fn bind<S: MediaSurface>(surface: S, wrapper: &PlayerWrapper) -> SurfaceBinding {
        let events = surface.events();
        info!(wrapper_id = %wrapper.wrapper_id(), session_id = %wrapper.session_id(), "Binding playback surface");

        wrapper.register(Box::new(SurfaceSink {
            surface,
            wrapper: wrapper.clone(),
        }));

        SurfaceBinding {
            wrapper: wrapper.clone(),
            events,
        }
    }
}

/// Command sink applying service commands to the owned surface.
///
/// Every operation is applied idempotently and no failure crosses the
/// boundary; errors surface as a generic error notification.
struct SurfaceSink<S: MediaSurface> {
    surface: S,
    wrapper: PlayerWrapper,
}

impl<S: MediaSurface> SurfaceSink<S> {
    fn report(&self, context: &str, err: Error) {
        warn!(context, code = err.error_code(), error = %err, "Surface command failed");
        self.wrapper.on_error(GENERIC_FAILURE);
    }
}

impl<S: MediaSurface> CommandSink for SurfaceSink<S> {
    fn play(&mut self) {
        debug!("Received play()");
        if let Err(err) = self.surface.play() {
            self.report("play", err);
        }
    }

    fn pause(&mut self) {
        debug!("Received pause()");
        if let Err(err) = self.surface.pause() {
            self.report("pause", err);
        }
    }

    fn set_source(&mut self, source: &PlaybackSource) {
        debug!(uri = %source.uri(), channel = source.channel_id(), "Received source");

        // Idle first, then the swap, then play: observers must never see
        // "playing" with a stale source.
        self.wrapper.on_state_changed(PlayerState::Idle);
        self.surface.set_src(None);
        self.surface.set_src(Some(source.uri().clone()));

        if let Err(err) = self.surface.play() {
            self.report("set_source", err);
        }
    }

    fn seek_to(&mut self, position: Duration) {
        debug!(position_ms = position.as_millis() as u64, "Received seek");
        self.surface.set_position(position);
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(volume, "Received volume");
        if let Err(err) = self.surface.set_volume(volume) {
            self.report("set_volume", err);
        }
    }

    fn mute(&mut self) {
        debug!("Received mute");
        self.surface.set_muted(true);
    }

    fn unmute(&mut self) {
        debug!("Received unmute");
        self.surface.set_muted(false);
    }
}

/// Live binding between a surface event stream and a wrapper.
///
/// Unregisters the command sink when dropped.
pub struct SurfaceBinding {
    wrapper: PlayerWrapper,
    events: broadcast::Receiver<SurfaceEvent>,
}

impl SurfaceBinding {
    /// Translate one surface event into its notification(s).
    ///
    /// Each event maps to exactly one externally-visible notification,
    /// except end-of-stream which reports the idle state strictly before
    /// the playback-ended signal.
    pub fn forward(&self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::TimeUpdate { position } => {
                self.wrapper.on_time_changed(position);
            }
            SurfaceEvent::Play | SurfaceEvent::Playing => {
                self.wrapper.on_state_changed(PlayerState::Playing);
            }
            SurfaceEvent::Pause => {
                self.wrapper.on_state_changed(PlayerState::Paused);
            }
            SurfaceEvent::Ended => {
                self.wrapper.on_state_changed(PlayerState::Idle);
                self.wrapper.on_playback_ended();
            }
            SurfaceEvent::DurationChange { seconds } => {
                // Live/unknown-length streams report non-finite durations;
                // the visible duration keeps its previous value then.
                if seconds.is_finite() && seconds >= 0.0 {
                    self.wrapper.set_duration(Duration::from_secs_f64(seconds));
                }
            }
            SurfaceEvent::Error { reason } => {
                warn!(%reason, "Surface raised a playback error");
                self.wrapper.on_error(GENERIC_FAILURE);
            }
        }
    }

    /// Pump surface events until the surface goes away or the binding's
    /// future is dropped.
    pub async fn run(mut self) {
        loop {
            match self.events.recv().await {
                Ok(event) => self.forward(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Surface event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

impl Drop for SurfaceBinding {
    fn drop(&mut self) {
        self.wrapper.unregister();
    }
}
