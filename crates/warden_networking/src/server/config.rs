//! Server configuration, loaded once at startup.

use std::path::Path;

use serde::Deserialize;

use super::pool::PlayerPoolError;
use crate::MAX_PLAYERS;

/// Player server configuration.
///
/// ```toml
/// max_players = 1000
/// inbound_queue_capacity = 10000
/// player_colour = 0xFF0000FF
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Maximum number of concurrent players.
    pub max_players: usize,
    /// Capacity of the I/O → owner event queue.
    pub inbound_queue_capacity: usize,
    /// Nametag colour (RGBA) announced for joining players.
    pub player_colour: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players: 1000,
            inbound_queue_capacity: 10_000,
            player_colour: 0xFF00_00FF,
        }
    }
}

impl ServerConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerPoolError::InvalidConfig`] on malformed TOML or bad values.
    pub fn from_toml_str(text: &str) -> Result<Self, PlayerPoolError> {
        let config: Self =
            toml::from_str(text).map_err(|e| PlayerPoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerPoolError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PlayerPoolError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PlayerPoolError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerPoolError::InvalidConfig`] for zero sizes or more players than a
    /// `UINT16` index can address.
    pub fn validate(&self) -> Result<(), PlayerPoolError> {
        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(PlayerPoolError::InvalidConfig(format!(
                "max_players must be in 1..={MAX_PLAYERS}, got {}",
                self.max_players
            )));
        }
        if self.inbound_queue_capacity == 0 {
            return Err(PlayerPoolError::InvalidConfig(
                "inbound_queue_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
