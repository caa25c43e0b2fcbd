//! Latitude/longitude positions and the play area
//!
//! All distances are plain Euclidean distances in degree space; the play
//! area is small enough that the curvature of the earth is ignored.

use geo::{EuclideanDistance, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::direction::Direction;

/// Length of one drone move, in degrees
pub const STEP_LENGTH: f64 = 0.0003;

/// Distance within which a drone charges from (or is drained by) a station
pub const CHARGE_RADIUS: f64 = 0.00025;

/// Distance within which a station could be charged after one more move
pub const MOVE_RANGE: f64 = STEP_LENGTH + CHARGE_RADIUS;

/// Tolerance for treating two positions as the same point
pub const POSITION_EPSILON: f64 = STEP_LENGTH * 1e-6;

/// Strict bounds of the play area
pub const PLAY_AREA_MIN_LATITUDE: f64 = 55.942617;
pub const PLAY_AREA_MAX_LATITUDE: f64 = 55.946233;
pub const PLAY_AREA_MIN_LONGITUDE: f64 = -3.192473;
pub const PLAY_AREA_MAX_LONGITUDE: f64 = -3.184319;

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Position reached by moving one step in `direction`
    pub fn next(&self, direction: Direction) -> Position {
        let (d_lat, d_lon) = direction.unit_offset();
        Position::new(
            self.latitude + STEP_LENGTH * d_lat,
            self.longitude + STEP_LENGTH * d_lon,
        )
    }

    /// Whether this position lies strictly inside the play area
    pub fn in_play_area(&self) -> bool {
        self.latitude > PLAY_AREA_MIN_LATITUDE
            && self.latitude < PLAY_AREA_MAX_LATITUDE
            && self.longitude > PLAY_AREA_MIN_LONGITUDE
            && self.longitude < PLAY_AREA_MAX_LONGITUDE
    }

    /// Euclidean distance in degrees
    pub fn distance(&self, other: &Position) -> f64 {
        self.to_point().euclidean_distance(&other.to_point())
    }

    pub fn within(&self, other: &Position, radius: f64) -> bool {
        self.distance(other) <= radius
    }

    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.latitude - other.latitude).abs() <= POSITION_EPSILON
            && (self.longitude - other.longitude).abs() <= POSITION_EPSILON
    }

    /// As a geo point, `x` being longitude
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
