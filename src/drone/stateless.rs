//! One-step lookahead with no memory between moves
//!
//! Every in-bounds direction is sorted into one of three tiers:
//! directions that reach a paying lighthouse safely, directions that stay
//! clear of dangers, and everything else. The move is a seeded random pick
//! from the best non-empty tier.

use super::policy::{MovePolicy, PolicyKind};
use super::{Drone, MoveOutcome};
use crate::core::error::Result;
use crate::geometry::{Direction, Position, CHARGE_RADIUS};
use crate::map::{PoiId, PoiRegistry};

/// What a drone would find within charge range of a position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Surroundings {
    pub closest_lighthouse: Option<f64>,
    pub closest_danger: Option<f64>,
}

impl Surroundings {
    /// Classify `position` against the stations in `candidates`
    pub(crate) fn at(
        position: &Position,
        candidates: impl IntoIterator<Item = PoiId>,
        registry: &PoiRegistry,
    ) -> Self {
        let mut found = Surroundings::default();

        for id in candidates {
            let Some(poi) = registry.get(id) else {
                continue;
            };
            let distance = poi.position.distance(position);
            if distance > CHARGE_RADIUS {
                continue;
            }
            if poi.is_beneficial() {
                found.closest_lighthouse = Some(min_of(found.closest_lighthouse, distance));
            } else if poi.is_harmful() {
                found.closest_danger = Some(min_of(found.closest_danger, distance));
            }
        }

        found
    }

    pub(crate) fn has_danger(&self) -> bool {
        self.closest_danger.is_some()
    }

    /// A paying lighthouse is in range and strictly closer than any danger
    pub(crate) fn reaches_lighthouse_safely(&self) -> bool {
        match (self.closest_lighthouse, self.closest_danger) {
            (Some(_), None) => true,
            (Some(lighthouse), Some(danger)) => lighthouse < danger,
            (None, _) => false,
        }
    }
}

fn min_of(current: Option<f64>, distance: f64) -> f64 {
    current.map_or(distance, |c| c.min(distance))
}

/// Candidate directions grouped by priority
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tiers {
    pub lighthouse: Vec<Direction>,
    pub safe: Vec<Direction>,
    pub valid: Vec<Direction>,
}

impl Tiers {
    /// Highest-priority non-empty tier
    pub fn best(&self) -> &[Direction] {
        if !self.lighthouse.is_empty() {
            &self.lighthouse
        } else if !self.safe.is_empty() {
            &self.safe
        } else {
            &self.valid
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatelessPolicy;

impl StatelessPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Rank every in-bounds direction from the drone's current position
    pub fn rank(&self, drone: &Drone, registry: &PoiRegistry) -> Tiers {
        let mut tiers = Tiers::default();

        for direction in drone.valid_directions() {
            let next = drone.position().next(direction);
            let around = Surroundings::at(&next, drone.in_move_range().iter().copied(), registry);

            if around.reaches_lighthouse_safely() {
                tiers.lighthouse.push(direction);
            } else if !around.has_danger() {
                tiers.safe.push(direction);
            }
            tiers.valid.push(direction);
        }

        tiers
    }
}

impl MovePolicy for StatelessPolicy {
    fn next_move(&mut self, drone: &mut Drone, registry: &mut PoiRegistry) -> Result<MoveOutcome> {
        let tiers = self.rank(drone, registry);

        if tiers.lighthouse.is_empty() && tiers.safe.is_empty() {
            tracing::warn!(moves = drone.moves(), "No safe direction, moving at random");
        }

        let direction = drone.choose(tiers.best())?;
        drone.apply_move(direction, registry)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Stateless
    }
}
