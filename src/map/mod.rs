//! Stations on the map and how they are loaded
//!
//! The registry owns every station for the lifetime of one run and is
//! passed explicitly to the drone and its policy.

pub mod charge;
pub mod fetch;
pub mod loader;
pub mod poi;
pub mod registry;

pub use charge::{settle, Balance};
pub use fetch::{fetch_map, map_url};
pub use loader::{load_from_file, load_from_json, MapSnapshot};
pub use poi::{Poi, PoiId, Symbol};
pub use registry::PoiRegistry;
