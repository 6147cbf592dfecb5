//! Readiness boundary with the orchestration service
//!
//! The service signals readiness once; the payload carries a
//! session-scoped wrapper factory and the source constructor. Until then
//! subscribers observe `None` and show a loading placeholder.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info};
use url::Url;

use crate::types::{PlaybackSource, ValidityWindow, WrapperId};
use crate::wrapper::PlayerWrapper;
use crate::{Error, Result};

/// Constructor for channel playback sources.
///
/// Owns the service-side construction rules: channel-name normalization
/// and validity-window checks. Delivered in the readiness payload and
/// installed into [`crate::registry`].
#[derive(Debug, Clone, Default)]
pub struct SourceFactory;

impl SourceFactory {
    /// Build an immutable channel source descriptor.
    ///
    /// The metadata value is opaque and carried through untouched. The
    /// channel name may arrive in any casing or separator style.
    #[allow(clippy::too_many_arguments)]
    pub fn channel_source(
        &self,
        uri: Url,
        metadata: Value,
        channel: &str,
        program: &str,
        description: Option<&str>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<PlaybackSource> {
        if channel.trim().is_empty() {
            return Err(Error::InvalidChannel(channel.to_owned()));
        }
        if from >= to {
            return Err(Error::InvalidWindow { from, to });
        }

        let source = PlaybackSource::new(
            uri,
            metadata,
            channel.to_owned(),
            program.to_owned(),
            description.map(str::to_owned),
            ValidityWindow { from, to },
        );
        debug!(uri = %source.uri(), channel_id = source.channel_id(), "Channel source constructed");
        Ok(source)
    }
}

/// Factory handing out session-scoped wrapper handles.
///
/// Repeated requests for the same wrapper id return the same handle, so
/// the session identity stays stable across lookups.
#[derive(Debug, Clone, Default)]
pub struct WrapperFactory {
    wrappers: Arc<Mutex<HashMap<WrapperId, PlayerWrapper>>>,
}

impl WrapperFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_player_wrapper(&self, wrapper_id: &WrapperId) -> PlayerWrapper {
        let mut wrappers = self.wrappers.lock().expect("factory lock poisoned");
        wrappers
            .entry(wrapper_id.clone())
            .or_insert_with(|| {
                info!(%wrapper_id, "Creating player wrapper");
                PlayerWrapper::new(wrapper_id.clone())
            })
            .clone()
    }
}

/// Payload delivered when the service becomes ready
#[derive(Debug, Clone)]
pub struct ReadyData {
    /// Getter for session-scoped wrapper handles
    pub wrappers: WrapperFactory,
    /// Constructor for channel playback sources
    pub sources: SourceFactory,
}

impl Default for ReadyData {
    fn default() -> Self {
        Self {
            wrappers: WrapperFactory::new(),
            sources: SourceFactory,
        }
    }
}

/// One-shot readiness signal.
///
/// Subscribers observe `None` until [`Readiness::signal_ready`] publishes
/// the payload.
#[derive(Debug)]
pub struct Readiness {
    tx: watch::Sender<Option<ReadyData>>,
}

impl Readiness {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ReadyData>> {
        self.tx.subscribe()
    }

    pub fn signal_ready(&self, data: ReadyData) {
        info!("Service signalled readiness");
        let _ = self.tx.send(Some(data));
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2021, 12, 10, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 12, 10, 13, 40, 0).unwrap(),
        )
    }

    #[test]
    fn test_channel_source_normalizes_channel() {
        let (from, to) = window();
        let source = SourceFactory
            .channel_source(
                Url::parse("https://example.com/video.mp4").unwrap(),
                serde_json::json!({ "custom": true }),
                "Prima COOL",
                "Dr. House",
                Some("Episode description"),
                from,
                to,
            )
            .unwrap();

        assert_eq!(source.channel(), "Prima COOL");
        assert_eq!(source.channel_id(), "prima_cool_hd");
        assert_eq!(source.program(), "Dr. House");
        assert_eq!(source.description(), Some("Episode description"));
        assert_eq!(source.metadata()["custom"], serde_json::json!(true));
    }

    #[test]
    fn test_channel_source_rejects_inverted_window() {
        let (from, to) = window();
        let result = SourceFactory.channel_source(
            Url::parse("https://example.com/video.mp4").unwrap(),
            serde_json::json!({}),
            "Prima HD",
            "Dr. House",
            None,
            to,
            from,
        );
        assert!(matches!(result, Err(Error::InvalidWindow { .. })));
    }

    #[test]
    fn test_channel_source_rejects_blank_channel() {
        let (from, to) = window();
        let result = SourceFactory.channel_source(
            Url::parse("https://example.com/video.mp4").unwrap(),
            serde_json::json!({}),
            "   ",
            "Dr. House",
            None,
            from,
            to,
        );
        assert!(matches!(result, Err(Error::InvalidChannel(_))));
    }

    #[test]
    fn test_factory_returns_stable_handles() {
        let factory = WrapperFactory::new();
        let id = WrapperId::from("player-wrapper");

        let first = factory.get_player_wrapper(&id);
        let second = factory.get_player_wrapper(&id);
        assert_eq!(first.session_id(), second.session_id());

        let other = factory.get_player_wrapper(&WrapperId::from("pip-wrapper"));
        assert_ne!(first.session_id(), other.session_id());
    }

    #[tokio::test]
    async fn test_readiness_flips_once_signalled() {
        let readiness = Readiness::new();
        let mut rx = readiness.subscribe();
        assert!(rx.borrow().is_none());

        readiness.signal_ready(ReadyData::default());

        let data = rx.wait_for(Option::is_some).await.unwrap();
        assert!(data.is_some());
    }
}
