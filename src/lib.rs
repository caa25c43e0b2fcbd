//! PowerGrab - Drone Charging Simulation
//!
//! A drone flies over a daily map of charging stations in fixed-length steps,
//! collecting coins and power from lighthouses and losing them to dangers.

pub mod core;
pub mod drone;
pub mod geometry;
pub mod map;
pub mod simulation;
