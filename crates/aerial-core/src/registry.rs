//! Process-wide source-constructor registry
//!
//! The source factory arrives in the readiness payload and is installed
//! here once at startup; everything else reads it through the getter.
//! This replaces sharing the constructor through module-level mutable
//! state.

use std::sync::OnceLock;

use crate::ready::SourceFactory;
use crate::{Error, Result};

static SOURCES: OnceLock<SourceFactory> = OnceLock::new();

/// Install the source factory delivered at readiness.
///
/// Installing a second factory is an error; the registry is populated
/// exactly once per process.
pub fn install(factory: SourceFactory) -> Result<()> {
    SOURCES
        .set(factory)
        .map_err(|_| Error::SourcesAlreadyInstalled)
}

/// The installed source factory.
///
/// Fails until [`install`] has run, which callers handle the same way as
/// an unready service: wait, or show a placeholder.
pub fn sources() -> Result<&'static SourceFactory> {
    SOURCES.get().ok_or(Error::SourcesNotInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test only: the registry is process-global, so install/read/
    // reinstall must be exercised in a single sequence.
    #[test]
    fn test_install_then_read_then_reinstall() {
        assert!(matches!(sources(), Err(Error::SourcesNotInstalled)));

        install(SourceFactory::default()).unwrap();
        assert!(sources().is_ok());

        assert!(matches!(
            install(SourceFactory::default()),
            Err(Error::SourcesAlreadyInstalled)
        ));
    }
}
