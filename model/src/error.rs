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
use thiserror::Error;

use crate::base_types::{DriverId, RideId};

/// Malformed input. Raised while the batch is built, so the engine never sees it.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("ride {ride} has a negative duration ({duration})")]
    NegativeDuration {
        ride: RideId,
        duration: SignedDuration,
    },

    #[error("ride {ride} ends outside of the supported time range")]
    TimeOutOfRange { ride: RideId },

    #[error("invalid coordinates (latitude {latitude}, longitude {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("ride id {0} is not unique")]
    DuplicateRide(RideId),

    #[error("driver id {0} is not unique")]
    DuplicateDriver(DriverId),

    #[error("driver {driver} has an invalid price rate ({price_rate})")]
    InvalidPriceRate { driver: DriverId, price_rate: f64 },

    #[error("availability of driver {driver} ends before it starts")]
    EmptyAvailability { driver: DriverId },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("malformed instance: {0}")]
    Json(#[from] serde_json::Error),
}
