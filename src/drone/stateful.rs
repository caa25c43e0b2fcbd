//! Target-seeking policy with memory
//!
//! The drone keeps a backlog of paying lighthouses and steers toward the
//! nearest one, avoiding dangers and refusing to step straight back to where
//! it just was. If the distance to the target stops shrinking for
//! `stuck_threshold` moves, the target goes back into the backlog and the
//! nearest other lighthouse is tried instead.

use ordered_float::OrderedFloat;
use std::collections::BTreeSet;

use super::policy::{MovePolicy, PolicyKind};
use super::stateless::Surroundings;
use super::{Drone, MoveOutcome};
use crate::core::error::Result;
use crate::geometry::{Direction, Position, CHARGE_RADIUS};
use crate::map::{PoiId, PoiRegistry};

/// Distances closer than this count as equal when ranking directions
const DISTANCE_TIE: f64 = 1e-12;

/// Tracks whether the drone is still closing in on its target
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Progress {
    best: f64,
    stalled: u32,
}

impl Progress {
    fn starting_at(distance: f64) -> Self {
        Self {
            best: distance,
            stalled: 0,
        }
    }

    /// Record the distance after a move; returns moves without progress
    fn record(&mut self, distance: f64) -> u32 {
        if distance < self.best - DISTANCE_TIE {
            self.best = distance;
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.stalled
    }
}

#[derive(Debug, Clone)]
pub struct StatefulPolicy {
    target: Option<PoiId>,
    unvisited: BTreeSet<PoiId>,
    previous_position: Option<Position>,
    just_charged: bool,
    progress: Progress,
    stuck_threshold: u32,
}

impl StatefulPolicy {
    /// Load every paying lighthouse as a target and pick the nearest
    pub fn new(drone: &Drone, registry: &PoiRegistry, stuck_threshold: u32) -> Self {
        let unvisited = registry
            .iter()
            .filter(|(_, poi)| poi.is_beneficial())
            .map(|(id, _)| id)
            .collect();

        let mut policy = Self {
            target: None,
            unvisited,
            previous_position: None,
            just_charged: false,
            progress: Progress::default(),
            stuck_threshold,
        };
        policy.select_target(drone.position(), registry);
        policy
    }

    pub fn target(&self) -> Option<PoiId> {
        self.target
    }

    pub fn unvisited(&self) -> &BTreeSet<PoiId> {
        &self.unvisited
    }

    /// Take the nearest paying lighthouse out of the backlog as the target
    fn select_target(&mut self, from: Position, registry: &PoiRegistry) {
        self.unvisited
            .retain(|&id| registry.get(id).is_some_and(|poi| poi.is_beneficial()));

        let nearest = self
            .unvisited
            .iter()
            .filter_map(|&id| registry.get(id).map(|poi| (id, poi.position.distance(&from))))
            .min_by_key(|&(_, d)| OrderedFloat(d));

        match nearest {
            Some((id, distance)) => {
                self.unvisited.remove(&id);
                self.target = Some(id);
                self.progress = Progress::starting_at(distance);
                tracing::debug!(station = id.0, distance, "New target");
            }
            None => {
                self.target = None;
                tracing::debug!("Target backlog empty");
            }
        }
    }

    /// Give up on the current target in favour of the nearest other one
    fn retarget(&mut self, from: Position, registry: &PoiRegistry) {
        let Some(stale) = self.target.take() else {
            return;
        };

        self.select_target(from, registry);

        if self.target.is_some() {
            self.unvisited.insert(stale);
            tracing::debug!(abandoned = stale.0, "Stuck, switching target");
        } else {
            let distance = registry
                .get(stale)
                .map_or(f64::INFINITY, |poi| poi.position.distance(&from));
            self.target = Some(stale);
            self.progress = Progress::starting_at(distance);
            tracing::debug!(station = stale.0, "Stuck, but no other target left");
        }
    }

    /// In-bounds directions that do not land within range of a danger
    fn safe_directions(&self, drone: &Drone, registry: &PoiRegistry) -> Vec<Direction> {
        drone
            .valid_directions()
            .into_iter()
            .filter(|&d| {
                let next = drone.position().next(d);
                !Surroundings::at(&next, registry.ids(), registry).has_danger()
            })
            .collect()
    }

    fn is_eligible(&self, next: &Position, target: PoiId, registry: &PoiRegistry) -> bool {
        let around = Surroundings::at(next, registry.ids(), registry);
        if around.has_danger() && !around.reaches_lighthouse_safely() {
            return false;
        }

        let reaches_target = registry
            .get(target)
            .is_some_and(|poi| poi.position.within(next, CHARGE_RADIUS));
        if reaches_target && registry.closest_within(next, CHARGE_RADIUS) != Some(target) {
            return false;
        }

        let retraces = self
            .previous_position
            .is_some_and(|previous| previous.approx_eq(next));
        !(retraces && !self.just_charged)
    }

    /// Eligible directions that get closest to the target
    fn target_directions(&self, drone: &Drone, target: PoiId, registry: &PoiRegistry) -> Vec<Direction> {
        let Some(goal) = registry.get(target).map(|poi| poi.position) else {
            return Vec::new();
        };

        let mut best = Vec::new();
        let mut best_distance = f64::INFINITY;

        for direction in drone.valid_directions() {
            let next = drone.position().next(direction);
            if !self.is_eligible(&next, target, registry) {
                continue;
            }

            let distance = goal.distance(&next);
            if distance < best_distance - DISTANCE_TIE {
                best_distance = distance;
                best.clear();
                best.push(direction);
            } else if (distance - best_distance).abs() <= DISTANCE_TIE {
                best.push(direction);
            }
        }

        best
    }

    fn candidates(&self, drone: &Drone, registry: &PoiRegistry) -> Vec<Direction> {
        let preferred = match self.target {
            Some(target) => self.target_directions(drone, target, registry),
            None => self.safe_directions(drone, registry),
        };

        if preferred.is_empty() {
            tracing::warn!(moves = drone.moves(), "No safe direction, moving at random");
            drone.valid_directions()
        } else {
            preferred
        }
    }

    fn after_move(&mut self, outcome: &MoveOutcome, drone: &Drone, registry: &PoiRegistry) {
        let Some(target) = self.target else {
            return;
        };

        let target_spent = registry.get(target).map_or(true, |poi| !poi.is_beneficial());
        if target_spent {
            tracing::debug!(station = target.0, moves = drone.moves(), "Charged from target");
            self.just_charged = true;
            self.select_target(drone.position(), registry);
            return;
        }

        self.just_charged = false;

        if let Some(charged) = outcome.charged.filter(|&id| id != target) {
            if self.unvisited.remove(&charged) {
                tracing::debug!(station = charged.0, moves = drone.moves(), "Charged from non-target");
            }
        }

        let distance = registry
            .get(target)
            .map_or(f64::INFINITY, |poi| poi.position.distance(&drone.position()));
        if self.progress.record(distance) >= self.stuck_threshold {
            self.retarget(drone.position(), registry);
        }
    }
}

impl MovePolicy for StatefulPolicy {
    fn next_move(&mut self, drone: &mut Drone, registry: &mut PoiRegistry) -> Result<MoveOutcome> {
        let candidates = self.candidates(drone, registry);
        let direction = drone.choose(&candidates)?;

        self.previous_position = Some(drone.position());
        let outcome = drone.apply_move(direction, registry)?;
        self.after_move(&outcome, drone, registry);

        Ok(outcome)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Stateful
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::map::Poi;

    fn start() -> Position {
        Position::new(55.944425, -3.188396)
    }

    fn north(steps: f64) -> Position {
        Position::new(start().latitude + 0.0003 * steps, start().longitude)
    }

    fn launch(registry: &PoiRegistry) -> Drone {
        Drone::launch(start(), 11, &SimulationConfig::default(), registry).unwrap()
    }

    #[test]
    fn test_initial_target_is_nearest_paying_lighthouse() {
        let registry = PoiRegistry::new(vec![
            Poi::lighthouse("far", north(6.0), 10.0, 10.0),
            Poi::danger("trap", north(1.0), -10.0, -10.0),
            Poi::lighthouse("spent", north(2.0), 0.0, 0.0),
            Poi::lighthouse("near", north(-3.0), 1.0, 0.0),
        ]);
        let drone = launch(&registry);
        let policy = StatefulPolicy::new(&drone, &registry, 8);

        assert_eq!(policy.target(), Some(PoiId(3)));
        assert_eq!(policy.unvisited().iter().copied().collect::<Vec<_>>(), vec![PoiId(0)]);
    }

    #[test]
    fn test_no_lighthouses_means_no_target() {
        let registry = PoiRegistry::new(vec![Poi::danger("trap", north(1.0), -10.0, -10.0)]);
        let drone = launch(&registry);
        let policy = StatefulPolicy::new(&drone, &registry, 8);

        assert_eq!(policy.target(), None);
        let safe = policy.safe_directions(&drone, &registry);
        assert!(!safe.contains(&Direction::N));
        assert!(safe.contains(&Direction::S));
    }

    #[test]
    fn test_heads_straight_for_target() {
        let registry = PoiRegistry::new(vec![Poi::lighthouse("goal", north(4.0), 10.0, 10.0)]);
        let drone = launch(&registry);
        let policy = StatefulPolicy::new(&drone, &registry, 8);

        let directions = policy.target_directions(&drone, PoiId(0), &registry);
        assert_eq!(directions, vec![Direction::N]);
    }

    #[test]
    fn test_steps_around_danger_in_the_way() {
        let registry = PoiRegistry::new(vec![
            Poi::lighthouse("goal", north(4.0), 10.0, 10.0),
            Poi::danger("trap", north(1.0), -10.0, -10.0),
        ]);
        let drone = launch(&registry);
        let policy = StatefulPolicy::new(&drone, &registry, 8);

        let directions = policy.target_directions(&drone, PoiId(0), &registry);
        assert!(!directions.is_empty());
        for d in directions {
            let next = start().next(d);
            assert!(!next.within(&north(1.0), CHARGE_RADIUS), "{} hits the danger", d);
        }
    }

    #[test]
    fn test_does_not_retrace_unless_just_charged() {
        let registry = PoiRegistry::new(vec![Poi::lighthouse("goal", north(5.0), 10.0, 10.0)]);
        let drone = launch(&registry);
        let mut policy = StatefulPolicy::new(&drone, &registry, 8);
        policy.previous_position = Some(start().next(Direction::N));

        let directions = policy.target_directions(&drone, PoiId(0), &registry);
        assert!(!directions.contains(&Direction::N));
        assert!(!directions.is_empty());

        policy.just_charged = true;
        let directions = policy.target_directions(&drone, PoiId(0), &registry);
        assert_eq!(directions, vec![Direction::N]);
    }

    #[test]
    fn test_reaches_and_charges_target_then_moves_on() {
        let mut registry = PoiRegistry::new(vec![
            Poi::lighthouse("first", north(3.0), 10.0, 10.0),
            Poi::lighthouse("second", north(-6.0), 20.0, 0.0),
        ]);
        let mut drone = launch(&registry);
        let mut policy = StatefulPolicy::new(&drone, &registry, 8);
        assert_eq!(policy.target(), Some(PoiId(0)));

        for _ in 0..3 {
            policy.next_move(&mut drone, &mut registry).unwrap();
        }

        assert_eq!(drone.coins(), 10.0);
        assert_eq!(policy.target(), Some(PoiId(1)));
        assert!(policy.just_charged);
        assert!(policy.unvisited().is_empty());
    }

    #[test]
    fn test_opportunistic_charge_leaves_backlog() {
        let mut registry = PoiRegistry::new(vec![
            Poi::lighthouse("goal", north(6.0), 10.0, 10.0),
            Poi::lighthouse("roadside", start().next(Direction::E), 5.0, 5.0),
        ]);
        let mut drone = launch(&registry);
        let mut policy = StatefulPolicy::new(&drone, &registry, 8);
        policy.target = Some(PoiId(0));
        policy.unvisited = BTreeSet::from([PoiId(1)]);

        let outcome = drone.apply_move(Direction::E, &mut registry).unwrap();
        policy.after_move(&outcome, &drone, &registry);

        assert_eq!(outcome.charged, Some(PoiId(1)));
        assert_eq!(policy.target(), Some(PoiId(0)));
        assert!(policy.unvisited().is_empty());
    }

    #[test]
    fn test_stalled_progress_switches_target() {
        let mut registry = PoiRegistry::new(vec![
            Poi::lighthouse("stubborn", north(5.0), 10.0, 10.0),
            Poi::lighthouse("backup", north(-8.0), 10.0, 10.0),
        ]);
        let mut drone = launch(&registry);
        let mut policy = StatefulPolicy::new(&drone, &registry, 3);
        assert_eq!(policy.target(), Some(PoiId(0)));

        // Sideways shuffling never gets closer
        for direction in [Direction::E, Direction::W, Direction::E] {
            let outcome = drone.apply_move(direction, &mut registry).unwrap();
            policy.after_move(&outcome, &drone, &registry);
        }

        assert_eq!(policy.target(), Some(PoiId(1)));
        assert!(policy.unvisited().contains(&PoiId(0)));
    }

    #[test]
    fn test_stalled_with_empty_backlog_keeps_target() {
        let mut registry = PoiRegistry::new(vec![Poi::lighthouse("only", north(5.0), 10.0, 10.0)]);
        let mut drone = launch(&registry);
        let mut policy = StatefulPolicy::new(&drone, &registry, 2);

        for direction in [Direction::E, Direction::W] {
            let outcome = drone.apply_move(direction, &mut registry).unwrap();
            policy.after_move(&outcome, &drone, &registry);
        }

        assert_eq!(policy.target(), Some(PoiId(0)));
        assert_eq!(policy.progress.stalled, 0);
    }

    #[test]
    fn test_exhausted_drone_keeps_its_target() {
        let config = SimulationConfig {
            initial_power: 2.0,
            ..SimulationConfig::default()
        };
        let mut registry = PoiRegistry::new(vec![Poi::lighthouse("goal", north(4.0), 10.0, 10.0)]);
        let mut drone = Drone::launch(start(), 11, &config, &registry).unwrap();
        let mut policy = StatefulPolicy::new(&drone, &registry, 8);

        let result = policy.next_move(&mut drone, &mut registry);

        assert!(matches!(
            result,
            Err(crate::core::error::PowergrabError::OutOfPower { .. })
        ));
        assert_eq!(drone.power(), 2.0);
        assert_eq!(policy.target(), Some(PoiId(0)));
    }

    #[test]
    fn test_progress_tracker() {
        let mut progress = Progress::starting_at(1.0);
        assert_eq!(progress.record(0.9), 0);
        assert_eq!(progress.record(0.95), 1);
        assert_eq!(progress.record(0.9), 2);
        assert_eq!(progress.record(0.5), 0);
    }
}
