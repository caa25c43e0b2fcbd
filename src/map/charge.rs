//! The charging transaction between a drone and one station
//!
//! Coins and power settle independently. The drone never ends below zero;
//! whatever a danger takes beyond the drone's balance stays on the danger,
//! so drone plus station totals are conserved.

use serde::{Deserialize, Serialize};

use super::poi::{PoiId, Symbol};
use super::registry::PoiRegistry;
use crate::geometry::{Position, CHARGE_RADIUS};

/// Coins and power held by a drone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub coins: f64,
    pub power: f64,
}

impl Balance {
    pub fn new(coins: f64, power: f64) -> Self {
        Self { coins, power }
    }
}

/// Apply `amount` to a non-negative `held` value.
///
/// Returns `(held', left_on_station)` with `held' >= 0` and
/// `held' + left_on_station == held + amount`.
pub fn settle(held: f64, amount: f64) -> (f64, f64) {
    let total = held + amount;
    if total < 0.0 {
        (0.0, total)
    } else {
        (total, 0.0)
    }
}

impl PoiRegistry {
    /// Resolve a charge between `balance` and the closest station within
    /// charge range of `position`.
    ///
    /// Returns the station that was settled against, if any.
    pub fn charge(&mut self, position: &Position, balance: &mut Balance) -> Option<PoiId> {
        let id = self.closest_within(position, CHARGE_RADIUS)?;
        let poi = self.get_mut(id)?;

        match poi.symbol {
            Symbol::Lighthouse | Symbol::Danger => {
                let (coins, coins_left) = settle(balance.coins, poi.coins);
                let (power, power_left) = settle(balance.power, poi.power);

                tracing::trace!(
                    station = %poi.id,
                    symbol = ?poi.symbol,
                    coins = poi.coins,
                    power = poi.power,
                    "Charging from station"
                );

                balance.coins = coins;
                balance.power = power;
                poi.coins = coins_left;
                poi.power = power_left;
                Some(id)
            }
            Symbol::Other => None,
        }
    }
}
