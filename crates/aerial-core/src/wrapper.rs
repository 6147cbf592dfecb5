//! Player wrapper handle - the boundary with the orchestration service
//!
//! The service drives playback through the registered [`CommandSink`] and
//! observes it through [`PlayerNotification`]s. The wrapper itself holds no
//! playback logic; it is plumbing with a stable session identity.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::types::{PlaybackSource, PlayerState, SessionId, WrapperId};
use crate::{Error, Result};

const NOTIFICATION_CAPACITY: usize = 256;

/// The fixed set of operations the service may issue against the native
/// playback surface.
///
/// Implementations must apply each operation idempotently and must never
/// fail across this boundary; failures are reported through the wrapper's
/// error notification instead.
pub trait CommandSink: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn set_source(&mut self, source: &PlaybackSource);
    fn seek_to(&mut self, position: Duration);
    fn set_volume(&mut self, volume: f32);
    fn mute(&mut self);
    fn unmute(&mut self);
}

/// Status notifications forwarded to the orchestration service
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "notification", rename_all = "snake_case")]
pub enum PlayerNotification {
    StateChanged { state: PlayerState },
    TimeChanged { position: Duration },
    PlaybackEnded,
    SourceChanged { source: PlaybackSource },
    Error { reason: String },
}

struct WrapperInner {
    wrapper_id: WrapperId,
    session_id: SessionId,
    sink: Mutex<Option<Box<dyn CommandSink>>>,
    duration: Mutex<Option<Duration>>,
    notifications: broadcast::Sender<PlayerNotification>,
}

/// Session-scoped handle coordinating one logical playback session.
///
/// Cheap to clone; all clones share the same registered sink, duration
/// field, and notification channel.
#[derive(Clone)]
pub struct PlayerWrapper {
    inner: Arc<WrapperInner>,
}

impl PlayerWrapper {
    pub(crate) fn new(wrapper_id: WrapperId) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            inner: Arc::new(WrapperInner {
                wrapper_id,
                session_id: SessionId::new(),
                sink: Mutex::new(None),
                duration: Mutex::new(None),
                notifications,
            }),
        }
    }

    /// External wrapper identifier this handle was requested under
    pub fn wrapper_id(&self) -> &WrapperId {
        &self.inner.wrapper_id
    }

    /// Stable session identifier
    pub fn session_id(&self) -> SessionId {
        self.inner.session_id
    }

    // ── Command side (service → sink) ───────────────────────────────────

    /// Register the command sink driving the native surface.
    ///
    /// A subsequent registration replaces the previous sink.
    pub fn register(&self, sink: Box<dyn CommandSink>) {
        info!(wrapper_id = %self.inner.wrapper_id, session_id = %self.inner.session_id, "Registering command sink");
        *self.inner.sink.lock().expect("sink lock poisoned") = Some(sink);
    }

    /// Release the registered command sink, if any
    pub fn unregister(&self) {
        let released = self
            .inner
            .sink
            .lock()
            .expect("sink lock poisoned")
            .take()
            .is_some();
        if released {
            info!(wrapper_id = %self.inner.wrapper_id, "Command sink released");
        }
    }

    /// Whether a command sink is currently registered
    pub fn is_registered(&self) -> bool {
        self.inner.sink.lock().expect("sink lock poisoned").is_some()
    }

    fn with_sink(&self, apply: impl FnOnce(&mut dyn CommandSink)) -> Result<()> {
        let mut guard = self.inner.sink.lock().expect("sink lock poisoned");
        match guard.as_mut() {
            Some(sink) => {
                apply(sink.as_mut());
                Ok(())
            }
            None => Err(Error::SinkNotRegistered),
        }
    }

    pub fn play(&self) -> Result<()> {
        self.with_sink(|sink| sink.play())
    }

    pub fn pause(&self) -> Result<()> {
        self.with_sink(|sink| sink.pause())
    }

    pub fn set_source(&self, source: &PlaybackSource) -> Result<()> {
        self.with_sink(|sink| sink.set_source(source))
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.with_sink(|sink| sink.seek_to(position))
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.with_sink(|sink| sink.set_volume(volume))
    }

    pub fn mute(&self) -> Result<()> {
        self.with_sink(|sink| sink.mute())
    }

    pub fn unmute(&self) -> Result<()> {
        self.with_sink(|sink| sink.unmute())
    }

    // ── Notification side (sink → service) ──────────────────────────────

    fn notify(&self, notification: PlayerNotification) {
        // Without subscribers the notification is dropped, same as an
        // unobserved callback.
        let _ = self.inner.notifications.send(notification);
    }

    /// Subscribe to all future notifications
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerNotification> {
        self.inner.notifications.subscribe()
    }

    pub fn on_state_changed(&self, state: PlayerState) {
        debug!(wrapper_id = %self.inner.wrapper_id, %state, "Signalling state change");
        self.notify(PlayerNotification::StateChanged { state });
    }

    pub fn on_time_changed(&self, position: Duration) {
        debug!(wrapper_id = %self.inner.wrapper_id, position_ms = position.as_millis() as u64, "Signalling time change");
        self.notify(PlayerNotification::TimeChanged { position });
    }

    pub fn on_playback_ended(&self) {
        debug!(wrapper_id = %self.inner.wrapper_id, "Signalling playback ended");
        self.notify(PlayerNotification::PlaybackEnded);
    }

    pub fn on_source_changed(&self, source: PlaybackSource) {
        debug!(wrapper_id = %self.inner.wrapper_id, uri = %source.uri(), "Signalling source change");
        self.notify(PlayerNotification::SourceChanged { source });
    }

    pub fn on_error(&self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(wrapper_id = %self.inner.wrapper_id, %reason, "Signalling error");
        self.notify(PlayerNotification::Error { reason });
    }

    /// Update the externally-visible content duration
    pub fn set_duration(&self, duration: Duration) {
        *self.inner.duration.lock().expect("duration lock poisoned") = Some(duration);
    }

    /// Externally-visible content duration, once known
    pub fn duration(&self) -> Option<Duration> {
        *self.inner.duration.lock().expect("duration lock poisoned")
    }
}

impl std::fmt::Debug for PlayerWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerWrapper")
            .field("wrapper_id", &self.inner.wrapper_id)
            .field("session_id", &self.inner.session_id)
            .field("registered", &self.is_registered())
            .finish()
    }
}
