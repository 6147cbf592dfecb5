//! Simulated playback surface for tests and the demo driver

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use url::Url;

use crate::{Error, MediaSurface, Result, SurfaceEvent};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct MockInner {
    src: Option<Url>,
    playing: bool,
    position: Duration,
    volume: f32,
    muted: bool,
    duration_seconds: f64,
}

/// A stateful [`MediaSurface`] driven by explicit clock advancement.
///
/// Cloning yields another handle over the same surface, so a test can keep
/// a handle for inspection while the adapter owns the one it was given.
/// Time only moves through [`MockSurface::advance`]; media metadata arrives
/// through [`MockSurface::set_media_duration`].
#[derive(Clone, Debug)]
pub struct MockSurface {
    inner: Arc<Mutex<MockInner>>,
    events: broadcast::Sender<SurfaceEvent>,
}

impl MockSurface {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                src: None,
                playing: false,
                position: Duration::ZERO,
                volume: 1.0,
                muted: false,
                duration_seconds: f64::NAN,
            })),
            events,
        }
    }

    fn emit(&self, event: SurfaceEvent) {
        // No subscribers is fine; events are simply dropped.
        let _ = self.events.send(event);
    }

    /// Whether the surface is currently progressing
    pub fn is_playing(&self) -> bool {
        self.inner.lock().expect("surface lock poisoned").playing
    }

    /// Report the media duration, as the element would once metadata loads.
    ///
    /// Non-finite values are emitted as-is; live streams report infinity.
    pub fn set_media_duration(&self, seconds: f64) {
        self.inner.lock().expect("surface lock poisoned").duration_seconds = seconds;
        self.emit(SurfaceEvent::DurationChange { seconds });
    }

    /// Advance the simulated clock. While playing this emits a time update,
    /// and reaching a known duration stops playback at the end of stream.
    pub fn advance(&self, dt: Duration) {
        let mut inner = self.inner.lock().expect("surface lock poisoned");
        if !inner.playing {
            return;
        }
        inner.position += dt;

        let duration = inner.duration_seconds;
        if duration.is_finite() && duration >= 0.0 && inner.position.as_secs_f64() >= duration {
            inner.position = Duration::from_secs_f64(duration);
            inner.playing = false;
            let position = inner.position;
            drop(inner);
            self.emit(SurfaceEvent::TimeUpdate { position });
            self.emit(SurfaceEvent::Ended);
        } else {
            let position = inner.position;
            drop(inner);
            self.emit(SurfaceEvent::TimeUpdate { position });
        }
    }

    /// Raise a runtime playback failure
    pub fn inject_error(&self, reason: impl Into<String>) {
        self.inner.lock().expect("surface lock poisoned").playing = false;
        self.emit(SurfaceEvent::Error {
            reason: reason.into(),
        });
    }
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSurface for MockSurface {
    fn set_src(&mut self, src: Option<Url>) {
        let mut inner = self.inner.lock().expect("surface lock poisoned");
        inner.src = src;
        inner.playing = false;
        inner.position = Duration::ZERO;
        inner.duration_seconds = f64::NAN;
    }

    fn src(&self) -> Option<Url> {
        self.inner.lock().expect("surface lock poisoned").src.clone()
    }

    fn play(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().expect("surface lock poisoned");
        if inner.src.is_none() {
            return Err(Error::NoSource);
        }
        if !inner.playing {
            inner.playing = true;
            drop(inner);
            self.emit(SurfaceEvent::Play);
            self.emit(SurfaceEvent::Playing);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().expect("surface lock poisoned");
        if inner.playing {
            inner.playing = false;
            drop(inner);
            self.emit(SurfaceEvent::Pause);
        }
        Ok(())
    }

    fn set_position(&mut self, position: Duration) {
        let mut inner = self.inner.lock().expect("surface lock poisoned");
        let duration = inner.duration_seconds;
        inner.position = if duration.is_finite() && duration >= 0.0 {
            position.min(Duration::from_secs_f64(duration))
        } else {
            position
        };
        let position = inner.position;
        drop(inner);
        self.emit(SurfaceEvent::TimeUpdate { position });
    }

    fn position(&self) -> Duration {
        self.inner.lock().expect("surface lock poisoned").position
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(Error::VolumeOutOfRange { volume });
        }
        self.inner.lock().expect("surface lock poisoned").volume = volume;
        Ok(())
    }

    fn volume(&self) -> f32 {
        self.inner.lock().expect("surface lock poisoned").volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().expect("surface lock poisoned").muted = muted;
    }

    fn muted(&self) -> bool {
        self.inner.lock().expect("surface lock poisoned").muted
    }

    fn duration_seconds(&self) -> f64 {
        self.inner.lock().expect("surface lock poisoned").duration_seconds
    }

    fn events(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_url() -> Url {
        Url::parse("https://example.com/video.mp4").unwrap()
    }

    #[test]
    fn test_play_without_source_fails() {
        let mut surface = MockSurface::new();
        assert!(matches!(surface.play(), Err(Error::NoSource)));
        assert!(!surface.is_playing());
    }

    #[test]
    fn test_play_pause_idempotent() {
        let mut surface = MockSurface::new();
        let mut rx = surface.events();
        surface.set_src(Some(test_url()));

        surface.play().unwrap();
        surface.play().unwrap();
        surface.pause().unwrap();
        surface.pause().unwrap();

        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Play));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Playing));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Pause));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_advance_emits_time_updates() {
        let mut surface = MockSurface::new();
        let mut rx = surface.events();
        surface.set_src(Some(test_url()));
        surface.set_media_duration(10.0);
        surface.play().unwrap();

        surface.advance(Duration::from_secs(1));
        surface.advance(Duration::from_secs(1));

        // durationchange, play, playing, then two time updates
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::DurationChange { .. }));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Play));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Playing));
        match rx.try_recv().unwrap() {
            SurfaceEvent::TimeUpdate { position } => assert_eq!(position, Duration::from_secs(1)),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            SurfaceEvent::TimeUpdate { position } => assert_eq!(position, Duration::from_secs(2)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_advance_past_duration_ends_playback() {
        let mut surface = MockSurface::new();
        surface.set_src(Some(test_url()));
        surface.set_media_duration(3.0);
        surface.play().unwrap();
        let mut rx = surface.events();

        surface.advance(Duration::from_secs(5));

        assert!(!surface.is_playing());
        assert_eq!(surface.position(), Duration::from_secs(3));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::TimeUpdate { .. }));
        assert!(matches!(rx.try_recv().unwrap(), SurfaceEvent::Ended));
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut surface = MockSurface::new();
        surface.set_src(Some(test_url()));
        surface.set_media_duration(10.0);

        surface.set_position(Duration::from_secs(30));
        assert_eq!(surface.position(), Duration::from_secs(10));

        surface.set_position(Duration::from_secs(4));
        assert_eq!(surface.position(), Duration::from_secs(4));
    }

    #[test]
    fn test_volume_range() {
        let mut surface = MockSurface::new();
        surface.set_volume(0.3).unwrap();
        assert_eq!(surface.volume(), 0.3);

        assert!(matches!(
            surface.set_volume(1.5),
            Err(Error::VolumeOutOfRange { .. })
        ));
        assert_eq!(surface.volume(), 0.3);
    }

    #[test]
    fn test_set_src_resets_state() {
        let mut surface = MockSurface::new();
        surface.set_src(Some(test_url()));
        surface.set_media_duration(10.0);
        surface.play().unwrap();
        surface.advance(Duration::from_secs(2));

        surface.set_src(Some(test_url()));
        assert!(!surface.is_playing());
        assert_eq!(surface.position(), Duration::ZERO);
        assert!(surface.duration_seconds().is_nan());
    }
}
