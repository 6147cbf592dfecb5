//! Static configuration handed opaquely to the orchestration service

use serde::{Deserialize, Serialize};

/// Service configuration.
///
/// The bridge never interprets these values; they are forwarded as-is when
/// the service is brought up. The secret is redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Secret token authenticating this integration
    pub secret: String,
    /// Enable verbose service-side logging
    pub verbose: bool,
}

impl SdkConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("secret", &"<redacted>")
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = SdkConfig::new("super-secret").with_verbose(true);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
