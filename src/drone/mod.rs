//! The drone and the policies that steer it
//!
//! `Drone` holds the state both policies share: position, balances, the
//! move counter, the seeded generator and the stations currently in range.
//! A `MovePolicy` decides the direction; the drone applies it.

pub mod policy;
pub mod stateful;
pub mod stateless;

pub use policy::{MovePolicy, PolicyKind};
pub use stateful::StatefulPolicy;
pub use stateless::StatelessPolicy;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{PowergrabError, Result};
use crate::geometry::{Direction, Position, CHARGE_RADIUS, MOVE_RANGE};
use crate::map::{Balance, PoiId, PoiRegistry};

/// Result of applying one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub from: Position,
    pub direction: Direction,
    pub to: Position,
    /// Station the drone settled with after arriving
    pub charged: Option<PoiId>,
}

#[derive(Debug, Clone)]
pub struct Drone {
    position: Position,
    balance: Balance,
    moves: u32,
    move_cost: f64,
    rng: ChaCha8Rng,
    in_range: Vec<PoiId>,
    in_move_range: Vec<PoiId>,
}

impl Drone {
    pub fn new(start: Position, seed: u64, config: &SimulationConfig) -> Self {
        Self {
            position: start,
            balance: Balance::new(config.initial_coins, config.initial_power),
            moves: 0,
            move_cost: config.move_cost,
            rng: ChaCha8Rng::seed_from_u64(seed),
            in_range: Vec::new(),
            in_move_range: Vec::new(),
        }
    }

    /// Create a drone and take its first range reading
    pub fn launch(
        start: Position,
        seed: u64,
        config: &SimulationConfig,
        registry: &PoiRegistry,
    ) -> Result<Self> {
        if !start.in_play_area() {
            return Err(PowergrabError::InvalidStartPosition(start));
        }
        let mut drone = Self::new(start, seed, config);
        drone.scan(registry);
        Ok(drone)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn coins(&self) -> f64 {
        self.balance.coins
    }

    pub fn power(&self) -> f64 {
        self.balance.power
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Whether the next move is affordable
    pub fn has_power(&self) -> bool {
        self.balance.power >= self.move_cost
    }

    /// Stations within charge range of the current position
    pub fn in_range(&self) -> &[PoiId] {
        &self.in_range
    }

    /// Stations that could be within charge range after one move
    pub fn in_move_range(&self) -> &[PoiId] {
        &self.in_move_range
    }

    /// Recompute which stations are in range and in move range
    pub fn scan(&mut self, registry: &PoiRegistry) {
        self.in_range = registry.within(&self.position, CHARGE_RADIUS);
        self.in_move_range = registry.within(&self.position, MOVE_RANGE);
        tracing::trace!(
            moves = self.moves,
            in_range = self.in_range.len(),
            in_move_range = self.in_move_range.len(),
            "Range scan"
        );
    }

    /// Directions whose next position stays inside the play area
    pub fn valid_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.position.next(d).in_play_area())
            .collect()
    }

    /// Uniformly random pick from `candidates`
    pub fn choose(&mut self, candidates: &[Direction]) -> Result<Direction> {
        if candidates.is_empty() {
            tracing::error!(position = %self.position, "Every direction leaves the play area");
            return Err(PowergrabError::NoValidMove {
                position: self.position,
            });
        }
        Ok(candidates[self.rng.gen_range(0..candidates.len())])
    }

    /// Move one step, pay for it, rescan and charge from the closest station
    ///
    /// An exhausted drone does not move.
    pub fn apply_move(
        &mut self,
        direction: Direction,
        registry: &mut PoiRegistry,
    ) -> Result<MoveOutcome> {
        if !self.has_power() {
            return Err(PowergrabError::OutOfPower {
                power: self.balance.power,
                cost: self.move_cost,
            });
        }

        let from = self.position;
        self.moves += 1;
        self.position = from.next(direction);
        self.balance.power -= self.move_cost;
        self.scan(registry);

        let charged = registry.charge(&self.position, &mut self.balance);

        tracing::debug!(
            moves = self.moves,
            %direction,
            coins = self.balance.coins,
            power = self.balance.power,
            "Drone moved"
        );

        Ok(MoveOutcome {
            from,
            direction,
            to: self.position,
            charged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Poi;

    fn start() -> Position {
        Position::new(55.944425, -3.188396)
    }

    #[test]
    fn test_launch_rejects_outside_start() {
        let config = SimulationConfig::default();
        let registry = PoiRegistry::default();
        let result = Drone::launch(Position::new(55.95, -3.188), 1, &config, &registry);
        assert!(matches!(result, Err(PowergrabError::InvalidStartPosition(_))));
    }

    #[test]
    fn test_move_costs_power() {
        let config = SimulationConfig::default();
        let mut registry = PoiRegistry::default();
        let mut drone = Drone::launch(start(), 1, &config, &registry).unwrap();

        let outcome = drone.apply_move(Direction::N, &mut registry).unwrap();

        assert_eq!(drone.moves(), 1);
        assert_eq!(drone.power(), 247.5);
        assert_eq!(drone.coins(), 0.0);
        assert_eq!(outcome.from, start());
        assert_eq!(outcome.to, start().next(Direction::N));
        assert_eq!(outcome.charged, None);
    }

    #[test]
    fn test_has_power_requires_full_move_cost() {
        let config = SimulationConfig {
            initial_power: 6.0,
            ..SimulationConfig::default()
        };
        let mut registry = PoiRegistry::default();
        let mut drone = Drone::launch(start(), 1, &config, &registry).unwrap();

        assert!(drone.has_power());
        drone.apply_move(Direction::E, &mut registry).unwrap();
        assert!(drone.has_power());
        drone.apply_move(Direction::E, &mut registry).unwrap();
        assert_eq!(drone.power(), 1.0);
        assert!(!drone.has_power());
    }

    #[test]
    fn test_exhausted_drone_refuses_to_move() {
        let config = SimulationConfig {
            initial_power: 1.0,
            ..SimulationConfig::default()
        };
        let mut registry = PoiRegistry::default();
        let mut drone = Drone::launch(start(), 1, &config, &registry).unwrap();

        let result = drone.apply_move(Direction::N, &mut registry);

        assert!(matches!(result, Err(PowergrabError::OutOfPower { .. })));
        assert_eq!(drone.moves(), 0);
        assert_eq!(drone.power(), 1.0);
        assert_eq!(drone.position(), start());
    }

    #[test]
    fn test_scan_separates_range_and_move_range() {
        let config = SimulationConfig::default();
        let registry = PoiRegistry::new(vec![
            Poi::lighthouse("in", Position::new(55.944525, -3.188396), 1.0, 1.0),
            Poi::lighthouse("reachable", Position::new(55.944825, -3.188396), 1.0, 1.0),
            Poi::lighthouse("far", Position::new(55.945425, -3.188396), 1.0, 1.0),
        ]);
        let drone = Drone::launch(start(), 1, &config, &registry).unwrap();

        assert_eq!(drone.in_range(), &[PoiId(0)]);
        assert_eq!(drone.in_move_range(), &[PoiId(0), PoiId(1)]);
    }

    #[test]
    fn test_choose_is_seeded() {
        let config = SimulationConfig::default();
        let mut a = Drone::new(start(), 42, &config);
        let mut b = Drone::new(start(), 42, &config);

        let picks_a: Vec<_> = (0..20).map(|_| a.choose(&Direction::ALL).unwrap()).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.choose(&Direction::ALL).unwrap()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_choose_from_nothing_is_fatal() {
        let config = SimulationConfig::default();
        let mut drone = Drone::new(start(), 1, &config);
        assert!(matches!(
            drone.choose(&[]),
            Err(PowergrabError::NoValidMove { .. })
        ));
    }

    #[test]
    fn test_moving_into_danger_clamps_and_spills() {
        let config = SimulationConfig {
            initial_coins: 30.0,
            ..SimulationConfig::default()
        };
        let mut registry = PoiRegistry::new(vec![Poi::danger(
            "trap",
            start().next(Direction::N),
            -1000.0,
            -10.0,
        )]);
        let mut drone = Drone::launch(start(), 1, &config, &registry).unwrap();

        let outcome = drone.apply_move(Direction::N, &mut registry).unwrap();

        assert_eq!(outcome.charged, Some(PoiId(0)));
        assert_eq!(drone.coins(), 0.0);
        assert_eq!(drone.power(), 237.5);
        let trap = registry.get(PoiId(0)).unwrap();
        assert_eq!(trap.coins, -1000.0 + 30.0);
        assert_eq!(trap.power, 0.0);
    }
}
