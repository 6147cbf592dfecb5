//! Aerial Core - Player Wrapper Bridge
//!
//! This crate provides the glue between a native media-playback surface and
//! an external video-orchestration service:
//! - Command sink registration (play/pause/set-source/seek/volume/mute)
//! - Surface event forwarding as service notifications
//! - Ad state projection for overlay rendering
//! - Source-constructor registry and readiness boundary
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         Aerial Core                            │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │   orchestration service                 native surface         │
//! │   ┌───────────────┐   commands   ┌────────────────────┐        │
//! │   │ PlayerWrapper │─────────────▶│    CommandSink     │        │
//! │   │   (handle)    │              │  (owns the surface)│        │
//! │   └───────┬───────┘              └─────────┬──────────┘        │
//! │           │ notifications                  │ SurfaceEvent      │
//! │           ▼                                ▼                   │
//! │   ┌───────────────┐   forwards   ┌────────────────────┐        │
//! │   │  subscribers  │◀─────────────│   SurfaceBinding   │        │
//! │   └───────────────┘              └────────────────────┘        │
//! │                                                                │
//! │   ┌───────────────┐              ┌────────────────────┐        │
//! │   │    AdFeed     │─────────────▶│     AdOverlay      │        │
//! │   └───────────────┘   snapshots  └────────────────────┘        │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapter;
pub mod ads;
pub mod config;
pub mod error;
pub mod ready;
pub mod registry;
pub mod surface;
pub mod types;
pub mod wrapper;

pub use adapter::{PlayerAdapter, SurfaceBinding};
pub use ads::{ActiveAd, AdFeed, AdOverlay, AdOverlayView, AdState, SkipControl, SkipRequest};
pub use config::SdkConfig;
pub use error::{Error, Result};
pub use ready::{ReadyData, Readiness, SourceFactory, WrapperFactory};
pub use surface::{mock::MockSurface, MediaSurface, SurfaceEvent};
pub use types::{PlaybackSource, PlayerState, SessionId, ValidityWindow, WrapperId};
pub use wrapper::{CommandSink, PlayerNotification, PlayerWrapper};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the bridge library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Aerial Core initialized");
}
