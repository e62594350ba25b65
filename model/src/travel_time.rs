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
#[path = "travel_time_tests.rs"]
mod travel_time_tests;

use fxhash::FxHashMap;
use jiff::SignedDuration;
use parking_lot::RwLock;

use crate::base_types::Location;
use crate::config::ConfigTravel;

const EARTH_RADIUS_IN_METER: f64 = 6_371_000.0;

/// Provides the travel time between two locations.
///
/// Implementations must be deterministic within a run and must return zero for
/// `travel_time(x, x)`. The triangle-inequality is not asserted.
pub trait DistanceEstimator: Sync {
    fn travel_time(&self, from: Location, to: Location) -> SignedDuration;
}

impl<F> DistanceEstimator for F
where
    F: Fn(Location, Location) -> SignedDuration + Sync,
{
    fn travel_time(&self, from: Location, to: Location) -> SignedDuration {
        self(from, to)
    }
}

/// Travel time as the crow flies at a constant average speed, rounded up to whole seconds.
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimator {
    meter_per_second: f64,
}

impl HaversineEstimator {
    pub fn new(average_speed_in_km_per_hour: f64) -> HaversineEstimator {
        HaversineEstimator {
            meter_per_second: average_speed_in_km_per_hour / 3.6,
        }
    }

    pub fn from_config(config: &ConfigTravel) -> HaversineEstimator {
        HaversineEstimator::new(config.average_speed_in_km_per_hour)
    }

    /// great-circle distance in meter
    pub fn distance_in_meter(from: Location, to: Location) -> f64 {
        let lat1 = from.latitude().to_radians();
        let lat2 = to.latitude().to_radians();
        let delta_lat = lat2 - lat1;
        let delta_lon = (to.longitude() - from.longitude()).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_IN_METER * c
    }
}

impl DistanceEstimator for HaversineEstimator {
    fn travel_time(&self, from: Location, to: Location) -> SignedDuration {
        if from == to {
            return SignedDuration::ZERO;
        }
        let seconds = HaversineEstimator::distance_in_meter(from, to) / self.meter_per_second;
        SignedDuration::from_secs(seconds.ceil() as i64)
    }
}

/// Wraps an estimator and remembers every queried pair for the rest of the run.
/// Can be shared between threads.
pub struct MemoizedEstimator<E> {
    estimator: E,
    cache: RwLock<FxHashMap<(Location, Location), SignedDuration>>,
}

impl<E: DistanceEstimator> MemoizedEstimator<E> {
    pub fn new(estimator: E) -> MemoizedEstimator<E> {
        MemoizedEstimator {
            estimator,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// number of distinct location pairs queried so far
    pub fn cached_pairs(&self) -> usize {
        self.cache.read().len()
    }
}

impl<E: DistanceEstimator> DistanceEstimator for MemoizedEstimator<E> {
    fn travel_time(&self, from: Location, to: Location) -> SignedDuration {
        if let Some(&travel_time) = self.cache.read().get(&(from, to)) {
            return travel_time;
        }
        let travel_time = self.estimator.travel_time(from, to);
        self.cache.write().insert((from, to), travel_time);
        travel_time
    }
}
