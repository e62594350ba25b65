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

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::base_types::Cost;
use crate::error::InputError;

/// Parameters of a run. Every field has a default, so an instance without `parameters` (or with
/// only some of them) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub costs: ConfigCosts,
    pub compatibility: ConfigCompatibility,
    pub travel: ConfigTravel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigCosts {
    /// cost difference between two consecutive price tiers of drivers
    pub price_step: Cost,
    pub dead_head_per_second: Cost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigCompatibility {
    /// minimal time between a drop-off and the next pickup of the same driver
    #[serde(rename = "minimalTurnaroundInSeconds", with = "seconds")]
    pub minimal_turnaround: SignedDuration,
    /// successors are only searched within this window after drop-off plus turnaround
    #[serde(rename = "lookaheadInSeconds", with = "seconds")]
    pub lookahead: SignedDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigTravel {
    pub average_speed_in_km_per_hour: f64,
}

impl Default for ConfigCosts {
    fn default() -> Self {
        ConfigCosts {
            price_step: 3600,
            dead_head_per_second: 1,
        }
    }
}

impl Default for ConfigCompatibility {
    fn default() -> Self {
        ConfigCompatibility {
            minimal_turnaround: SignedDuration::ZERO,
            lookahead: SignedDuration::from_hours(12),
        }
    }
}

impl Default for ConfigTravel {
    fn default() -> Self {
        // 0.25 miles per minute
        ConfigTravel {
            average_speed_in_km_per_hour: 24.14,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.costs.price_step <= 0 {
            return Err(invalid("costs.priceStep", "must be positive"));
        }
        if self.costs.dead_head_per_second <= 0 {
            return Err(invalid("costs.deadHeadPerSecond", "must be positive"));
        }
        if self.compatibility.minimal_turnaround.is_negative() {
            return Err(invalid(
                "compatibility.minimalTurnaroundInSeconds",
                "must not be negative",
            ));
        }
        if self.compatibility.lookahead.is_negative() {
            return Err(invalid(
                "compatibility.lookaheadInSeconds",
                "must not be negative",
            ));
        }
        let speed = self.travel.average_speed_in_km_per_hour;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(invalid(
                "travel.averageSpeedInKmPerHour",
                "must be a positive number",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> InputError {
    InputError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

mod seconds {
    use jiff::SignedDuration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        duration: &SignedDuration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SignedDuration, D::Error> {
        i64::deserialize(deserializer).map(SignedDuration::from_secs)
    }
}
