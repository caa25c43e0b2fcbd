//! Flight loop: ask the policy for moves until the drone runs dry

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::drone::{Drone, MovePolicy, PolicyKind};
use crate::geometry::{Direction, Position};
use crate::map::{Poi, PoiRegistry};

/// One transition of the drone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Position,
    pub direction: Direction,
    pub to: Position,
    pub coins: f64,
    pub power: f64,
}

/// Everything recorded during a flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLog {
    pub policy: PolicyKind,
    pub seed: u64,
    pub start: Position,
    pub records: Vec<MoveRecord>,
}

impl FlightLog {
    /// Visited positions, starting point first
    pub fn path(&self) -> Vec<Position> {
        std::iter::once(self.start)
            .chain(self.records.iter().map(|r| r.to))
            .collect()
    }

    pub fn moves(&self) -> usize {
        self.records.len()
    }

    pub fn final_coins(&self) -> Option<f64> {
        self.records.last().map(|r| r.coins)
    }

    pub fn final_power(&self) -> Option<f64> {
        self.records.last().map(|r| r.power)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} drone made {} moves, finishing with {:.2} coins and {:.2} power",
            self.policy,
            self.moves(),
            self.final_coins().unwrap_or(0.0),
            self.final_power().unwrap_or(0.0),
        )
    }
}

/// A drone, its policy and the stations it flies over
pub struct Flight {
    drone: Drone,
    policy: Box<dyn MovePolicy>,
    registry: PoiRegistry,
    max_moves: u32,
    log: FlightLog,
}

impl Flight {
    pub fn new(
        pois: Vec<Poi>,
        start: Position,
        seed: u64,
        kind: PolicyKind,
        config: &SimulationConfig,
    ) -> Result<Self> {
        config.validate()?;

        let registry = PoiRegistry::new(pois);
        let drone = Drone::launch(start, seed, config, &registry)?;
        let policy = kind.build(&drone, &registry, config.stuck_threshold);
        let log = FlightLog {
            policy: policy.kind(),
            seed,
            start,
            records: Vec::new(),
        };

        Ok(Self {
            drone,
            policy,
            registry,
            max_moves: config.max_moves,
            log,
        })
    }

    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    pub fn registry(&self) -> &PoiRegistry {
        &self.registry
    }

    pub fn log(&self) -> &FlightLog {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        !self.drone.has_power() || self.drone.moves() >= self.max_moves
    }

    /// Make one move; `None` once the flight is over
    pub fn step(&mut self) -> Result<Option<MoveRecord>> {
        if self.is_finished() {
            return Ok(None);
        }

        let outcome = self.policy.next_move(&mut self.drone, &mut self.registry)?;
        let record = MoveRecord {
            from: outcome.from,
            direction: outcome.direction,
            to: outcome.to,
            coins: self.drone.coins(),
            power: self.drone.power(),
        };
        self.log.records.push(record);
        Ok(Some(record))
    }

    /// Fly until out of power or out of moves
    pub fn run(mut self) -> Result<(FlightLog, PoiRegistry)> {
        tracing::info!(
            policy = %self.log.policy,
            seed = self.log.seed,
            start = %self.log.start,
            stations = self.registry.len(),
            "Flight starting"
        );

        while self.step()?.is_some() {}

        tracing::info!(
            moves = self.drone.moves(),
            coins = self.drone.coins(),
            power = self.drone.power(),
            "Flight finished"
        );

        Ok((self.log, self.registry))
    }
}

/// Run a whole flight over `pois`
pub fn simulate(
    pois: Vec<Poi>,
    start: Position,
    seed: u64,
    kind: PolicyKind,
    config: &SimulationConfig,
) -> Result<FlightLog> {
    let (log, _) = Flight::new(pois, start, seed, kind, config)?.run()?;
    Ok(log)
}
