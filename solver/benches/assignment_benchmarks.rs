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

use criterion::{criterion_group, criterion_main, Criterion};
use model::test_utilities::{at, driver, minutes, place, ride, test_data, TestData};
use model::travel_time::{HaversineEstimator, MemoizedEstimator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solver::AssignmentEngine;

fn synthetic_batch(number_of_rides: usize, number_of_drivers: usize) -> TestData {
    let mut rng = StdRng::seed_from_u64(0);
    let places: Vec<_> = (0..20)
        .map(|i| {
            place(
                &format!("place {}", i),
                40.60 + rng.gen_range(0.0..0.2),
                -74.05 + rng.gen_range(0.0..0.3),
            )
        })
        .collect();
    let rides = (0..number_of_rides)
        .map(|i| {
            let pickup = at(6, 0)
                .checked_add(minutes(rng.gen_range(0..14 * 60)))
                .unwrap();
            ride(
                &format!("R{}", i),
                pickup,
                places[rng.gen_range(0..places.len())].clone(),
                places[rng.gen_range(0..places.len())].clone(),
                rng.gen_range(5..90),
            )
        })
        .collect();
    let drivers = (0..number_of_drivers)
        .map(|i| driver(&format!("D{}", i), rng.gen_range(10..30) as f64))
        .collect();
    test_data(rides, drivers)
}

pub fn assignment_benchmarks(c: &mut Criterion) {
    for (number_of_rides, number_of_drivers) in [(100, 20), (500, 60)] {
        let d = synthetic_batch(number_of_rides, number_of_drivers);
        let engine = AssignmentEngine::new(d.config.clone());
        c.bench_function(
            &format!("solve_{}_rides_{}_drivers", number_of_rides, number_of_drivers),
            |b| {
                b.iter(|| {
                    let estimator = MemoizedEstimator::new(HaversineEstimator::new(24.14));
                    engine
                        .solve(d.rides.clone(), d.drivers.clone(), &estimator)
                        .unwrap();
                })
            },
        );
    }
}

criterion_group!(benches, assignment_benchmarks);
criterion_main!(benches);
