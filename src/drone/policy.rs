//! Policy selection
//!
//! A policy picks the direction for the next move and applies it through the
//! drone. Which policy runs is fixed when the flight is created.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Drone, MoveOutcome, StatefulPolicy, StatelessPolicy};
use crate::core::error::{PowergrabError, Result};
use crate::map::PoiRegistry;

/// Decides and applies a drone's moves
pub trait MovePolicy {
    /// Choose a direction, apply it, and do any bookkeeping the policy needs
    fn next_move(&mut self, drone: &mut Drone, registry: &mut PoiRegistry) -> Result<MoveOutcome>;

    fn kind(&self) -> PolicyKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Stateless,
    Stateful,
}

impl PolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Stateless => "stateless",
            PolicyKind::Stateful => "stateful",
        }
    }

    /// Build the policy for a drone about to fly over `registry`
    pub fn build(
        self,
        drone: &Drone,
        registry: &PoiRegistry,
        stuck_threshold: u32,
    ) -> Box<dyn MovePolicy> {
        match self {
            PolicyKind::Stateless => Box::new(StatelessPolicy::new()),
            PolicyKind::Stateful => {
                Box::new(StatefulPolicy::new(drone, registry, stuck_threshold))
            }
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = PowergrabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stateless" => Ok(PolicyKind::Stateless),
            "stateful" => Ok(PolicyKind::Stateful),
            _ => Err(PowergrabError::UnknownPolicyType(s.to_string())),
        }
    }
}
