//! Points of interest: charging stations and hazards

use serde::{Deserialize, Serialize};

use crate::geometry::Position;

/// Index of a POI within its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoiId(pub usize);

/// Station type, from the map's `marker-symbol`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    /// Pays out its balance once
    Lighthouse,
    /// Drains the drone, keeping whatever the drone cannot pay
    Danger,
    Other,
}

impl Symbol {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "lighthouse" => Symbol::Lighthouse,
            "danger" => Symbol::Danger,
            _ => Symbol::Other,
        }
    }
}

/// A station on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub position: Position,
    pub coins: f64,
    pub power: f64,
    pub symbol: Symbol,
    pub color: String,
}

impl Poi {
    pub fn new(id: impl Into<String>, position: Position, coins: f64, power: f64, symbol: Symbol) -> Self {
        Self {
            id: id.into(),
            position,
            coins,
            power,
            symbol,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn lighthouse(id: impl Into<String>, position: Position, coins: f64, power: f64) -> Self {
        Self::new(id, position, coins, power, Symbol::Lighthouse)
    }

    pub fn danger(id: impl Into<String>, position: Position, coins: f64, power: f64) -> Self {
        Self::new(id, position, coins, power, Symbol::Danger)
    }

    /// A lighthouse that still has something to pay out
    pub fn is_beneficial(&self) -> bool {
        self.symbol == Symbol::Lighthouse && (self.coins > 0.0 || self.power > 0.0)
    }

    /// A danger that would still take something from the drone
    pub fn is_harmful(&self) -> bool {
        self.symbol == Symbol::Danger && (self.coins < 0.0 || self.power < 0.0)
    }
}
