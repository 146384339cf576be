//! # Pool Configuration
//!
//! Pool sizes are loaded once at startup from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PoolError, PoolResult};

/// Default number of slots in a pool.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Sizing for a single [`SlotPool`](crate::SlotPool).
///
/// ```toml
/// capacity = 1000
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Maximum number of live entries.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] on malformed TOML or a zero capacity.
    pub fn from_toml_str(text: &str) -> PoolResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> PoolResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PoolError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] for a zero capacity or one that does not fit
    /// the `u32` index space.
    pub fn validate(&self) -> PoolResult<()> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if u32::try_from(self.capacity).is_err() || self.capacity == u32::MAX as usize {
            return Err(PoolError::InvalidConfig(format!(
                "capacity {} exceeds the index space",
                self.capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::from_toml_str("").unwrap();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_explicit_capacity() {
        let config = PoolConfig::from_toml_str("capacity = 16").unwrap();
        assert_eq!(config.capacity, 16);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PoolConfig::from_toml_str("capacity = 0").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(PoolConfig::from_toml_str("size = 4").is_err());
    }
}
