//! Database pool sizing, loaded once at startup.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DatabaseError, DatabaseResult};

/// Database pool configuration.
///
/// ```toml
/// max_connections = 1024
/// max_result_sets = 1024
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabasesConfig {
    /// Maximum number of open connections.
    pub max_connections: usize,
    /// Maximum number of open result sets per connection.
    pub max_result_sets: usize,
}

impl Default for DatabasesConfig {
    fn default() -> Self {
        Self {
            max_connections: 1024,
            max_result_sets: 1024,
        }
    }
}

impl DatabasesConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidConfig`] on malformed TOML or zero sizes.
    pub fn from_toml_str(text: &str) -> DatabaseResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| DatabaseError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> DatabaseResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DatabaseError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidConfig`] for a zero or oversized limit.
    pub fn validate(&self) -> DatabaseResult<()> {
        for (name, value) in [
            ("max_connections", self.max_connections),
            ("max_result_sets", self.max_result_sets),
        ] {
            if value == 0 || value >= u32::MAX as usize {
                return Err(DatabaseError::InvalidConfig(format!(
                    "{name} must be in 1..{}, got {value}",
                    u32::MAX
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DatabasesConfig::from_toml_str("").unwrap(), DatabasesConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = DatabasesConfig::from_toml_str("max_result_sets = 8").unwrap();
        assert_eq!(config.max_connections, 1024);
        assert_eq!(config.max_result_sets, 8);
    }

    #[test]
    fn test_zero_rejected() {
        let err = DatabasesConfig::from_toml_str("max_connections = 0").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidConfig(_)));
    }
}
