//! Arena of all stations in a run
//!
//! Everything outside the registry refers to stations by `PoiId`, so
//! "in range" lists and target backlogs are plain index sets.

use ordered_float::OrderedFloat;

use super::poi::{Poi, PoiId};
use crate::geometry::Position;

#[derive(Debug, Clone, Default)]
pub struct PoiRegistry {
    pois: Vec<Poi>,
}

impl PoiRegistry {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self { pois }
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn get(&self, id: PoiId) -> Option<&Poi> {
        self.pois.get(id.0)
    }

    pub fn get_mut(&mut self, id: PoiId) -> Option<&mut Poi> {
        self.pois.get_mut(id.0)
    }

    /// Stations with their ids, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (PoiId, &Poi)> {
        self.pois.iter().enumerate().map(|(i, p)| (PoiId(i), p))
    }

    pub fn ids(&self) -> impl Iterator<Item = PoiId> {
        (0..self.pois.len()).map(PoiId)
    }

    /// Ids of stations within `radius` of `position`, in registration order
    pub fn within(&self, position: &Position, radius: f64) -> Vec<PoiId> {
        self.iter()
            .filter(|(_, poi)| poi.position.within(position, radius))
            .map(|(id, _)| id)
            .collect()
    }

    /// Closest station within `radius`; the earliest registered wins a tie
    pub fn closest_within(&self, position: &Position, radius: f64) -> Option<PoiId> {
        self.iter()
            .map(|(id, poi)| (id, poi.position.distance(position)))
            .filter(|&(_, d)| d <= radius)
            .min_by_key(|&(_, d)| OrderedFloat(d))
            .map(|(id, _)| id)
    }

    /// Sum of all station balances as `(coins, power)`
    pub fn totals(&self) -> (f64, f64) {
        self.pois
            .iter()
            .fold((0.0, 0.0), |(c, p), poi| (c + poi.coins, p + poi.power))
    }
}
