//! Core types for the wrapper bridge

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

/// Unique identifier for a wrapper session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable external identifier used to request a wrapper handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WrapperId(String);

impl WrapperId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WrapperId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for WrapperId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WrapperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback states visible to the orchestration service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No content playing; also the reset state while a source is swapped
    Idle,
    /// Surface is actively progressing
    Playing,
    /// Playback paused
    Paused,
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Idle => write!(f, "idle"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::Paused => write!(f, "paused"),
        }
    }
}

/// Time-bounded validity window of a source (EPG start/end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ValidityWindow {
    /// Check if a given instant falls within this window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.from && at < self.to
    }
}

/// Descriptor of a specific piece of content to be played.
///
/// Constructed by [`crate::SourceFactory`], never mutated afterwards. The
/// metadata value is opaque and passed through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSource {
    uri: Url,
    metadata: Value,
    channel: String,
    channel_id: String,
    program: String,
    description: Option<String>,
    window: ValidityWindow,
}

impl PlaybackSource {
    pub(crate) fn new(
        uri: Url,
        metadata: Value,
        channel: String,
        program: String,
        description: Option<String>,
        window: ValidityWindow,
    ) -> Self {
        let channel_id = normalize_channel(&channel);
        Self {
            uri,
            metadata,
            channel,
            channel_id,
            program,
            description,
            window,
        }
    }

    /// Content URI assigned to the surface
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Freeform metadata, untouched by the bridge
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Channel name as provided by the caller
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Normalized channel identifier (snake case, `_hd` suffixed)
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Optional program description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// EPG validity window
    pub fn window(&self) -> ValidityWindow {
        self.window
    }
}

/// Normalize a raw channel name to its canonical identifier.
///
/// Accepts any casing and separator style ("Prima HD", "prima_hd",
/// "PRIMA"); produces snake case and appends the `_hd` suffix when missing.
pub fn normalize_channel(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            id.extend(c.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            id.push('_');
            last_was_sep = true;
        }
    }
    while id.ends_with('_') {
        id.pop();
    }
    if !id.is_empty() && !id.ends_with("_hd") && id != "hd" {
        id.push_str("_hd");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_channel_variants() {
        assert_eq!(normalize_channel("Prima HD"), "prima_hd");
        assert_eq!(normalize_channel("prima hd"), "prima_hd");
        assert_eq!(normalize_channel("prima_hd"), "prima_hd");
        assert_eq!(normalize_channel("PRIMA"), "prima_hd");
        assert_eq!(normalize_channel("Prima COOL"), "prima_cool_hd");
        assert_eq!(normalize_channel("  Prima   Love  "), "prima_love_hd");
    }

    #[test]
    fn test_normalize_channel_empty() {
        assert_eq!(normalize_channel(""), "");
        assert_eq!(normalize_channel("  -  "), "");
    }

    #[test]
    fn test_player_state_display() {
        assert_eq!(PlayerState::Idle.to_string(), "idle");
        assert_eq!(PlayerState::Playing.to_string(), "playing");
        assert_eq!(PlayerState::Paused.to_string(), "paused");
    }

    #[test]
    fn test_session_ids_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_validity_window_contains() {
        let from = Utc.with_ymd_and_hms(2021, 12, 10, 12, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2021, 12, 10, 13, 40, 0).unwrap();
        let window = ValidityWindow { from, to };

        assert!(window.contains(Utc.with_ymd_and_hms(2021, 12, 10, 12, 30, 0).unwrap()));
        assert!(window.contains(from));
        assert!(!window.contains(to));
        assert!(!window.contains(Utc.with_ymd_and_hms(2021, 12, 10, 11, 59, 59).unwrap()));
    }
}
