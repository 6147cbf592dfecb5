//! Ad state snapshots and the passive overlay projection
//!
//! The orchestration service owns ad scheduling; this module only models
//! the snapshot it reports and projects it into something renderable. The
//! feed publishes `None` whenever no ad is playing.

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::debug;
use url::Url;

use crate::{Error, Result};

/// Read-only snapshot of an in-progress advertisement.
///
/// Has no lifecycle of its own; it exists only as long as the service
/// reports an active ad. Seconds-to-end is clamped to be non-negative.
#[derive(Debug, Clone, Serialize)]
pub struct AdState {
    uri: Url,
    order: Option<u32>,
    total_count: Option<u32>,
    seconds_to_end: f64,
    seconds_to_skippable: Option<f64>,
    is_skippable: bool,
    can_skip: bool,
}

impl AdState {
    pub fn new(uri: Url, seconds_to_end: f64) -> Self {
        Self {
            uri,
            order: None,
            total_count: None,
            seconds_to_end: seconds_to_end.max(0.0),
            seconds_to_skippable: None,
            is_skippable: false,
            can_skip: false,
        }
    }

    /// Ordinal position within the pod (1-based) and pod size
    pub fn with_ordinal(mut self, order: u32, total_count: u32) -> Self {
        self.order = Some(order);
        self.total_count = Some(total_count);
        self
    }

    /// Mark the ad skippable, with the remaining seconds until skipping
    /// becomes available
    pub fn skippable(mut self, seconds_to_skippable: f64) -> Self {
        self.is_skippable = true;
        self.seconds_to_skippable = Some(seconds_to_skippable.max(0.0));
        self
    }

    /// Current skip eligibility as reported by the service
    pub fn with_can_skip(mut self, can_skip: bool) -> Self {
        self.can_skip = can_skip;
        self
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn order(&self) -> Option<u32> {
        self.order
    }

    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }

    pub fn seconds_to_end(&self) -> f64 {
        self.seconds_to_end
    }

    pub fn seconds_to_skippable(&self) -> Option<f64> {
        self.seconds_to_skippable
    }

    pub fn is_skippable(&self) -> bool {
        self.is_skippable
    }

    pub fn can_skip(&self) -> bool {
        self.can_skip
    }
}

/// Request to skip the ad currently playing, handled by the service
#[derive(Debug, Clone)]
pub struct SkipRequest {
    pub uri: Url,
}

/// An active ad snapshot together with its skip action
#[derive(Debug, Clone)]
pub struct ActiveAd {
    state: AdState,
    skip_tx: mpsc::UnboundedSender<SkipRequest>,
}

impl ActiveAd {
    pub fn state(&self) -> &AdState {
        &self.state
    }

    /// Ask the service to skip this ad.
    ///
    /// Refused while the ad is not skippable or skipping is not yet
    /// allowed.
    pub fn skip(&self) -> Result<()> {
        if !self.state.is_skippable || !self.state.can_skip {
            return Err(Error::SkipNotAllowed);
        }
        debug!(uri = %self.state.uri, "Requesting ad skip");
        self.skip_tx
            .send(SkipRequest {
                uri: self.state.uri.clone(),
            })
            .map_err(|_| Error::AdFeedClosed)
    }
}

/// Publisher side of the ad-state boundary.
///
/// The service publishes snapshots; observers watch `Option<ActiveAd>`
/// where `None` means no ad is currently playing. Skip requests travel
/// back over the receiver returned by [`AdFeed::new`].
#[derive(Debug)]
pub struct AdFeed {
    state_tx: watch::Sender<Option<ActiveAd>>,
    skip_tx: mpsc::UnboundedSender<SkipRequest>,
}

impl AdFeed {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SkipRequest>) {
        let (state_tx, _) = watch::channel(None);
        let (skip_tx, skip_rx) = mpsc::unbounded_channel();
        (Self { state_tx, skip_tx }, skip_rx)
    }

    /// Publish the current ad state; `None` clears the overlay
    pub fn publish(&self, state: Option<AdState>) {
        let active = state.map(|state| ActiveAd {
            state,
            skip_tx: self.skip_tx.clone(),
        });
        let _ = self.state_tx.send(active);
    }

    /// Subscribe to ad-state changes
    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveAd>> {
        self.state_tx.subscribe()
    }
}

/// Passive display component projecting ad state into render data
pub struct AdOverlay;

/// Skip control descriptor; present only for skippable ads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipControl {
    /// The control is enabled exactly when skipping is currently allowed
    pub enabled: bool,
    /// Remaining seconds until skipping becomes available
    pub seconds_to_skippable: Option<f64>,
}

/// What the overlay displays for one ad snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdOverlayView {
    /// Ordinal label ("1 / 3"), only when both order and pod size are known
    pub ordinal: Option<String>,
    /// Remaining seconds until the ad finishes
    pub seconds_to_end: f64,
    pub is_skippable: bool,
    pub skip: Option<SkipControl>,
}

impl AdOverlay {
    /// Project the current ad state; renders nothing when no ad is active.
    ///
    /// Holds no state of its own, so repeated projection of the same
    /// snapshot yields the same view.
    pub fn project(ad: Option<&ActiveAd>) -> Option<AdOverlayView> {
        let state = ad.map(ActiveAd::state)?;

        let ordinal = match (state.order(), state.total_count()) {
            (Some(order), Some(total)) => Some(format!("{order} / {total}")),
            _ => None,
        };

        let skip = state.is_skippable().then(|| SkipControl {
            enabled: state.can_skip(),
            seconds_to_skippable: state.seconds_to_skippable(),
        });

        Some(AdOverlayView {
            ordinal,
            seconds_to_end: state.seconds_to_end(),
            is_skippable: state.is_skippable(),
            skip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad_url() -> Url {
        Url::parse("https://ads.example.com/spot.mp4").unwrap()
    }

    fn feed_with(state: AdState) -> (AdFeed, mpsc::UnboundedReceiver<SkipRequest>, ActiveAd) {
        let (feed, skip_rx) = AdFeed::new();
        feed.publish(Some(state));
        let ad = feed.subscribe().borrow().clone().unwrap();
        (feed, skip_rx, ad)
    }

    #[test]
    fn test_no_ad_renders_nothing() {
        assert_eq!(AdOverlay::project(None), None);
    }

    #[test]
    fn test_ordinal_requires_both_fields() {
        let (_feed, _rx, ad) = feed_with(AdState::new(ad_url(), 20.0).with_ordinal(1, 3));
        let view = AdOverlay::project(Some(&ad)).unwrap();
        assert_eq!(view.ordinal.as_deref(), Some("1 / 3"));

        let (feed, _rx) = AdFeed::new();
        feed.publish(Some(AdState::new(ad_url(), 20.0)));
        let ad = feed.subscribe().borrow().clone().unwrap();
        let view = AdOverlay::project(Some(&ad)).unwrap();
        assert_eq!(view.ordinal, None);
    }

    #[test]
    fn test_unskippable_ad_has_no_skip_control() {
        // can_skip must not matter while the ad is not skippable at all
        let (_feed, _rx, ad) = feed_with(AdState::new(ad_url(), 20.0).with_can_skip(true));
        let view = AdOverlay::project(Some(&ad)).unwrap();
        assert!(!view.is_skippable);
        assert_eq!(view.skip, None);
    }

    #[test]
    fn test_skip_control_enabled_iff_can_skip() {
        let (_feed, _rx, ad) = feed_with(AdState::new(ad_url(), 20.0).skippable(5.0));
        let view = AdOverlay::project(Some(&ad)).unwrap();
        let control = view.skip.unwrap();
        assert!(!control.enabled);
        assert_eq!(control.seconds_to_skippable, Some(5.0));

        let (_feed, _rx, ad) =
            feed_with(AdState::new(ad_url(), 20.0).skippable(0.0).with_can_skip(true));
        let view = AdOverlay::project(Some(&ad)).unwrap();
        assert!(view.skip.unwrap().enabled);
    }

    #[test]
    fn test_seconds_to_end_clamped_non_negative() {
        let state = AdState::new(ad_url(), -3.0);
        assert_eq!(state.seconds_to_end(), 0.0);
    }

    #[test]
    fn test_skip_refused_until_eligible() {
        let (_feed, mut skip_rx, ad) = feed_with(AdState::new(ad_url(), 20.0).skippable(5.0));
        assert!(matches!(ad.skip(), Err(Error::SkipNotAllowed)));
        assert!(skip_rx.try_recv().is_err());

        let (_feed, _rx, ad) = feed_with(AdState::new(ad_url(), 20.0).with_can_skip(true));
        assert!(matches!(ad.skip(), Err(Error::SkipNotAllowed)));
    }

    #[test]
    fn test_skip_request_reaches_service() {
        let (_feed, mut skip_rx, ad) =
            feed_with(AdState::new(ad_url(), 20.0).skippable(0.0).with_can_skip(true));

        ad.skip().unwrap();

        let request = skip_rx.try_recv().unwrap();
        assert_eq!(request.uri, ad_url());
    }

    #[test]
    fn test_publish_none_clears_overlay() {
        let (feed, _rx) = AdFeed::new();
        let rx = feed.subscribe();

        feed.publish(Some(AdState::new(ad_url(), 20.0)));
        assert!(rx.borrow().is_some());

        feed.publish(None);
        assert!(rx.borrow().is_none());
    }
}
