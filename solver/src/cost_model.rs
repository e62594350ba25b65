// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

#[cfg(test)]
#[path = "cost_model_tests.rs"]
mod cost_model_tests;

use jiff::SignedDuration;
use model::base_types::{Cost, DriverIdx};
use model::config::ConfigCosts;
use model::drivers::Drivers;
use model::rides::Ride;
use model::travel_time::DistanceEstimator;
use solution::DriverState;

use crate::error::EngineError;

/// Scalar costs of opening a chain with a driver and of continuing a chain.
///
/// Drivers are ranked into price tiers (equal price rates share a tier). Opening a chain costs
/// `(tier + 1) * price_step` plus the deadhead from the start location of the driver, capped
/// below `price_step`. Hence a cheaper driver always yields a lower start cost, whatever the
/// ride. Continuing costs `dead_head_per_second` per second of deadhead, zero if the pickup
/// equals the previous drop-off.
pub struct CostModel {
    price_step: Cost,
    dead_head_per_second: Cost,
    tiers: Vec<Cost>, // indexed by DriverIdx
}

// static functions
impl CostModel {
    pub fn new(drivers: &Drivers, config: &ConfigCosts) -> Result<CostModel, EngineError> {
        let mut tiers = Vec::with_capacity(drivers.len());
        let mut tier: Cost = 0;
        let mut previous_rate = None;
        // drivers are sorted by price rate
        for (_, driver) in drivers.iter() {
            if let Some(rate) = previous_rate {
                if driver.price_rate() > rate {
                    tier += 1;
                }
            }
            previous_rate = Some(driver.price_rate());
            tiers.push(tier);
        }

        let model = CostModel {
            price_step: config.price_step,
            dead_head_per_second: config.dead_head_per_second,
            tiers,
        };
        // the most expensive driver must be representable
        model.max_price_cost()?;
        Ok(model)
    }
}

// methods
impl CostModel {
    pub fn price_step(&self) -> Cost {
        self.price_step
    }

    pub fn price_cost(&self, driver: DriverIdx) -> Cost {
        // cannot overflow, as checked in new
        (self.tiers[driver.idx()] + 1) * self.price_step
    }

    pub fn max_price_cost(&self) -> Result<Cost, EngineError> {
        let top_tier = self.tiers.last().copied().unwrap_or(0);
        (top_tier + 1)
            .checked_mul(self.price_step)
            .ok_or(EngineError::CostOverflow {
                context: "price tiers",
            })
    }

    /// cost of the deadhead of the given duration, saturating
    pub fn dead_head_cost(&self, dead_head: SignedDuration) -> Cost {
        dead_head
            .as_secs()
            .max(0)
            .saturating_mul(self.dead_head_per_second)
    }

    /// part of the start cost that depends on the ride, always below price_step
    pub fn approach_cost(&self, dead_head: SignedDuration) -> Cost {
        self.dead_head_cost(dead_head).min(self.price_step - 1)
    }

    pub fn start_cost(
        &self,
        ride: &Ride,
        driver: DriverIdx,
        drivers: &Drivers,
        estimator: &dyn DistanceEstimator,
    ) -> Cost {
        let state = DriverState::initial(drivers.get(driver));
        let dead_head = state.dead_head_to(ride.pickup_location(), estimator);
        self.price_cost(driver) + self.approach_cost(dead_head)
    }

    pub fn continue_cost(&self, dead_head: SignedDuration) -> Result<Cost, EngineError> {
        dead_head
            .as_secs()
            .max(0)
            .checked_mul(self.dead_head_per_second)
            .ok_or(EngineError::CostOverflow {
                context: "deadhead costs",
            })
    }
}
