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
use model::base_types::Location;
use model::drivers::Driver;
use model::rides::Stop;
use model::test_utilities::{at, driver, minutes, place, ride, test_data, TestData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn ten_minutes(from: Location, to: Location) -> SignedDuration {
    if from == to {
        SignedDuration::ZERO
    } else {
        minutes(10)
    }
}

// a handful of places, so that zero-deadhead continuations occur
fn random_places(rng: &mut StdRng, count: usize) -> Vec<Stop> {
    (0..count)
        .map(|i| {
            place(
                &format!("place {}", i),
                40.60 + rng.gen_range(0.0..0.2),
                -74.05 + rng.gen_range(0.0..0.3),
            )
        })
        .collect()
}

/// Random batch between 6:00 and 20:00. If `constrained` some drivers get a start location
/// and availability windows, some of them a split shift.
pub fn random_instance(
    seed: u64,
    number_of_rides: usize,
    number_of_drivers: usize,
    constrained: bool,
) -> TestData {
    let mut rng = StdRng::seed_from_u64(seed);
    let places = random_places(&mut rng, 6);

    let rides = (0..number_of_rides)
        .map(|i| {
            let from = places[rng.gen_range(0..places.len())].clone();
            let to = places[rng.gen_range(0..places.len())].clone();
            let pickup = at(6, 0)
                .checked_add(minutes(5 * rng.gen_range(0..168)))
                .unwrap();
            ride(&format!("R{:03}", i), pickup, from, to, rng.gen_range(5..90))
        })
        .collect();

    let drivers: Vec<Driver> = (0..number_of_drivers)
        .map(|i| {
            let d = driver(&format!("D{:02}", i), [10.0, 15.0, 20.0, 25.0][rng.gen_range(0..4)]);
            if constrained && rng.gen_bool(0.5) {
                let start = places[rng.gen_range(0..places.len())].location();
                let from = at(rng.gen_range(5..12), 0);
                let until = at(rng.gen_range(14..23), 0);
                let windows = if rng.gen_bool(0.3) {
                    // split shift with a lunch break
                    vec![(from, at(12, 0)), (at(13, 0), until)]
                } else {
                    vec![(from, until)]
                };
                d.with_start_location(start)
                    .with_availability_windows(windows)
                    .unwrap()
            } else {
                d
            }
        })
        .collect();

    test_data(rides, drivers)
}
