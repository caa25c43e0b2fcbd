//! Run configuration with documented defaults
//!
//! Geometry (step length, charge radius, play area) is fixed and lives in
//! `geometry`. Everything here can be overridden from a TOML file.

use serde::Deserialize;
use std::path::Path;

use super::error::{PowergrabError, Result};

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Power spent on every move
    pub move_cost: f64,

    /// Power the drone starts with
    ///
    /// At the default cost of 2.5 this buys 100 moves of travel before any
    /// charging.
    pub initial_power: f64,

    /// Coins the drone starts with
    pub initial_coins: f64,

    /// Hard cap on the number of moves in a run
    pub max_moves: u32,

    /// Consecutive moves without getting closer to the current target
    /// before the stateful policy gives up on it
    pub stuck_threshold: u32,

    /// Base URL that daily maps are published under
    pub map_url_base: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            move_cost: 2.5,
            initial_power: 250.0,
            initial_coins: 0.0,
            max_moves: 250,
            stuck_threshold: 8,
            map_url_base: "http://homepages.inf.ed.ac.uk/stg/powergrab".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Parse overrides from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.move_cost > 0.0) {
            return Err(PowergrabError::InvalidConfig(format!(
                "move_cost ({}) must be positive",
                self.move_cost
            )));
        }

        if self.initial_power < 0.0 || self.initial_coins < 0.0 {
            return Err(PowergrabError::InvalidConfig(format!(
                "initial balances must be non-negative (power {}, coins {})",
                self.initial_power, self.initial_coins
            )));
        }

        if self.max_moves == 0 {
            return Err(PowergrabError::InvalidConfig(
                "max_moves must be at least 1".into(),
            ));
        }

        if self.stuck_threshold == 0 {
            return Err(PowergrabError::InvalidConfig(
                "stuck_threshold must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
