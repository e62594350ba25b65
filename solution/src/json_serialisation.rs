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

use jiff::civil::DateTime;
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::Schedule;

type Coordinates = [f64; 2]; // [latitude, longitude]

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRoute {
    driver: String,
    price_rate: f64,
    dead_head_in_seconds: i64,
    route: Vec<JsonRouteStop>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
enum JsonRouteStop {
    DeadHeadTrip {
        origin: Coordinates,
        destination: Coordinates,
        departure_time: DateTime,
        arrival_time: DateTime,
    },
    Ride {
        id: String,
        origin: String,
        destination: String,
        pickup_time: DateTime,
        dropoff_time: DateTime,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonUnassignedRide {
    id: String,
    pickup_time: DateTime,
    pickup_address: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    number_of_rides: usize,
    number_of_assigned_rides: usize,
    number_of_unassigned_rides: usize,
    number_of_used_drivers: usize,
    total_dead_head_in_seconds: i64,
    total_price_rate: f64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonSchedule {
    summary: JsonSummary,
    routes: Vec<JsonRoute>,
    unassigned_rides: Vec<JsonUnassignedRide>,
}

pub fn schedule_to_json(schedule: &Schedule) -> serde_json::Value {
    let rides = schedule.rides();
    let drivers = schedule.drivers();

    let routes = schedule
        .routes()
        .map(|route| {
            let driver = drivers.get(route.driver());
            let mut position = driver.start_location();
            let mut stops = Vec::new();
            for ride_idx in route.rides() {
                let ride = rides.get(ride_idx);
                let dead_head = schedule
                    .assignment_of(ride_idx)
                    .map_or(SignedDuration::ZERO, |a| a.dead_head());
                if let Some(origin) = position {
                    if origin != ride.pickup_location() {
                        stops.push(JsonRouteStop::DeadHeadTrip {
                            origin: coordinates(origin),
                            destination: coordinates(ride.pickup_location()),
                            departure_time: ride.pickup_time().saturating_sub(dead_head),
                            arrival_time: ride.pickup_time(),
                        });
                    }
                }
                stops.push(JsonRouteStop::Ride {
                    id: ride.id().to_string(),
                    origin: ride.pickup().address().to_string(),
                    destination: ride.dropoff().address().to_string(),
                    pickup_time: ride.pickup_time(),
                    dropoff_time: ride.dropoff_time(),
                });
                position = Some(ride.dropoff_location());
            }
            JsonRoute {
                driver: driver.id().to_string(),
                price_rate: driver.price_rate(),
                dead_head_in_seconds: route.dead_head().as_secs(),
                route: stops,
            }
        })
        .collect();

    let unassigned_rides = schedule
        .unassigned()
        .map(|ride_idx| {
            let ride = rides.get(ride_idx);
            JsonUnassignedRide {
                id: ride.id().to_string(),
                pickup_time: ride.pickup_time(),
                pickup_address: ride.pickup().address().to_string(),
            }
        })
        .collect();

    let json_schedule = JsonSchedule {
        summary: JsonSummary {
            number_of_rides: rides.len(),
            number_of_assigned_rides: schedule.number_of_assignments(),
            number_of_unassigned_rides: schedule.number_of_unassigned(),
            number_of_used_drivers: schedule.number_of_used_drivers(),
            total_dead_head_in_seconds: schedule.total_dead_head().as_secs(),
            total_price_rate: schedule.total_price_rate(),
        },
        routes,
        unassigned_rides,
    };
    serde_json::to_value(json_schedule).unwrap_or_default()
}

pub fn write_schedule_to_json(schedule: &Schedule, path: &str) -> Result<(), std::io::Error> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &schedule_to_json(schedule))?;
    Ok(())
}

fn coordinates(location: model::base_types::Location) -> Coordinates {
    [location.latitude(), location.longitude()]
}
