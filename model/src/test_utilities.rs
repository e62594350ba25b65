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

//! Small fixtures shared by the tests of all crates.

use std::sync::Arc;

use jiff::civil::{date, DateTime};
use jiff::SignedDuration;

use crate::base_types::{DriverId, Location, PriceRate, RideId};
use crate::config::Config;
use crate::drivers::{Driver, Drivers};
use crate::rides::{Ride, Rides, Stop};

pub fn at(hour: i8, minute: i8) -> DateTime {
    date(2024, 8, 29).at(hour, minute, 0, 0)
}

pub fn minutes(m: i64) -> SignedDuration {
    SignedDuration::from_mins(m)
}

pub fn place(name: &str, latitude: f64, longitude: f64) -> Stop {
    Stop::new(Location::new(latitude, longitude).unwrap(), name)
}

pub fn times_square() -> Stop {
    place("Times Square", 40.7580, -73.9855)
}

pub fn jfk() -> Stop {
    place("JFK Airport", 40.6413, -73.7781)
}

pub fn midtown() -> Stop {
    place("Midtown", 40.7549, -73.9840)
}

pub fn brooklyn() -> Stop {
    place("Brooklyn", 40.6782, -73.9442)
}

pub fn east_village() -> Stop {
    place("East Village", 40.7306, -73.9352)
}

pub fn downtown() -> Stop {
    place("Downtown Manhattan", 40.7128, -74.0060)
}

pub fn ride(id: &str, pickup_time: DateTime, from: Stop, to: Stop, duration_in_minutes: i64) -> Ride {
    Ride::new(
        RideId::from(id),
        pickup_time,
        from,
        to,
        minutes(duration_in_minutes),
    )
    .unwrap()
}

pub fn driver(id: &str, price_rate: PriceRate) -> Driver {
    Driver::new(DriverId::from(id), price_rate).unwrap()
}

pub struct TestData {
    pub rides: Arc<Rides>,
    pub drivers: Arc<Drivers>,
    pub config: Arc<Config>,
}

pub fn test_data(rides: Vec<Ride>, drivers: Vec<Driver>) -> TestData {
    TestData {
        rides: Arc::new(Rides::new(rides).unwrap()),
        drivers: Arc::new(Drivers::new(drivers).unwrap()),
        config: Arc::new(Config::default()),
    }
}

/// R1 09:00 Times Square -> JFK (60min), R2 10:30 JFK -> Times Square (60min),
/// R3 09:15 Midtown -> Brooklyn (40min); D1 with price 10, D2 with price 20.
pub fn init_airport_data() -> TestData {
    test_data(
        vec![
            ride("R1", at(9, 0), times_square(), jfk(), 60),
            ride("R2", at(10, 30), jfk(), times_square(), 60),
            ride("R3", at(9, 15), midtown(), brooklyn(), 40),
        ],
        vec![driver("D2", 20.0), driver("D1", 10.0)],
    )
}
