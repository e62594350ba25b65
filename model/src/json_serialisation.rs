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


use std::sync::Arc;

use jiff::civil::DateTime;
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::base_types::{DriverId, Location, RideId};
use crate::config::Config;
use crate::drivers::{Driver, Drivers};
use crate::error::InputError;
use crate::rides::{Ride, Rides, Stop};

type Coordinates = [f64; 2]; // [latitude, longitude]

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRide {
    id: String,
    pickup_time: DateTime,
    pickup_location: Coordinates,
    pickup_address: String,
    dropoff_location: Coordinates,
    dropoff_address: String,
    estimated_duration_in_minutes: i64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonDriver {
    id: String,
    price_rate: f64,
    #[serde(default)]
    start_location: Option<Coordinates>,
    #[serde(default)]
    available_from: Option<DateTime>,
    #[serde(default)]
    available_until: Option<DateTime>,
    #[serde(default)]
    availability: Vec<(DateTime, DateTime)>, // further windows, e.g., for split shifts
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    rides: Vec<JsonRide>,
    drivers: Vec<JsonDriver>,
    #[serde(default)]
    parameters: Config,
}

/// Reads and validates an instance. Any malformed record rejects the whole batch.
pub fn load_ride_assignment_instance_from_json(
    input_data: serde_json::Value,
) -> Result<(Arc<Rides>, Arc<Drivers>, Arc<Config>), InputError> {
    let json_input: JsonInput = serde_json::from_value(input_data)?;

    json_input.parameters.validate()?;
    let rides = create_rides(&json_input)?;
    let drivers = create_drivers(&json_input)?;

    Ok((
        Arc::new(rides),
        Arc::new(drivers),
        Arc::new(json_input.parameters),
    ))
}

fn create_rides(json_input: &JsonInput) -> Result<Rides, InputError> {
    let rides = json_input
        .rides
        .iter()
        .map(|ride| {
            if ride.estimated_duration_in_minutes.checked_mul(60).is_none() {
                return Err(InputError::TimeOutOfRange {
                    ride: RideId::from(ride.id.as_str()),
                });
            }
            Ride::new(
                RideId::from(ride.id.as_str()),
                ride.pickup_time,
                Stop::new(
                    create_location(ride.pickup_location)?,
                    ride.pickup_address.as_str(),
                ),
                Stop::new(
                    create_location(ride.dropoff_location)?,
                    ride.dropoff_address.as_str(),
                ),
                SignedDuration::from_mins(ride.estimated_duration_in_minutes),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Rides::new(rides)
}

fn create_drivers(json_input: &JsonInput) -> Result<Drivers, InputError> {
    let drivers = json_input
        .drivers
        .iter()
        .map(|driver| {
            let mut windows = driver.availability.clone();
            if driver.available_from.is_some() || driver.available_until.is_some() {
                windows.push((
                    driver.available_from.unwrap_or(DateTime::MIN),
                    driver.available_until.unwrap_or(DateTime::MAX),
                ));
            }
            let mut new_driver = Driver::new(DriverId::from(driver.id.as_str()), driver.price_rate)?
                .with_availability_windows(windows)?;
            if let Some(coordinates) = driver.start_location {
                new_driver = new_driver.with_start_location(create_location(coordinates)?);
            }
            Ok(new_driver)
        })
        .collect::<Result<Vec<_>, InputError>>()?;
    Drivers::new(drivers)
}

fn create_location(coordinates: Coordinates) -> Result<Location, InputError> {
    Location::new(coordinates[0], coordinates[1])
}
