use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a [`CachedStore`](crate::CachedStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// After every successful persist, recompute the backing store's
    /// checksum and compare it with the cache's running checksum.
    ///
    /// This costs a full scan of the backing store per flush. A mismatch
    /// means the backing store was modified behind the cache's back; it is
    /// logged as a warning and the persist still succeeds. Call
    /// `CachedStore::verify` to get it as an error.
    pub verify_after_persist: bool,
}

impl CacheConfig {
    /// A configuration that cross-checks checksums after every persist.
    pub fn verified() -> Self {
        Self {
            verify_after_persist: true,
        }
    }

    /// Parse a configuration from TOML text. Missing fields take their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}
