//! Running a flight and writing what it did

pub mod output;
pub mod runner;

pub use output::{annotate_map, output_stem, write_outputs, OutputPaths};
pub use runner::{simulate, Flight, FlightLog, MoveRecord};
