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
#[path = "driver_state_tests.rs"]
mod driver_state_tests;

use jiff::civil::DateTime;
use jiff::SignedDuration;
use model::base_types::Location;
use model::drivers::Driver;
use model::rides::Ride;
use model::travel_time::DistanceEstimator;

/// Where and when a driver becomes free while its route is built up.
/// Kept in an arena indexed by `DriverIdx`; a state never refers to other states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverState {
    free_at: Option<DateTime>,    // None: no ride served so far
    location: Option<Location>,   // None: unconstrained, no deadhead to the first pickup
    last_pickup: Option<DateTime>, // None: no ride served so far
}

// static functions
impl DriverState {
    pub fn initial(driver: &Driver) -> DriverState {
        DriverState {
            free_at: None,
            location: driver.start_location(),
            last_pickup: None,
        }
    }
}

// methods
impl DriverState {
    pub fn free_at(&self) -> Option<DateTime> {
        self.free_at
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// travel time from the current location to the given location (zero if unconstrained)
    pub fn dead_head_to(&self, to: Location, estimator: &dyn DistanceEstimator) -> SignedDuration {
        match self.location {
            Some(from) => estimator.travel_time(from, to),
            None => SignedDuration::ZERO,
        }
    }

    /// true iff the driver reaches the pickup of the ride in time and the deadhead together
    /// with the ride lies within one of its availability windows. The turnaround is only
    /// required between two rides.
    pub fn can_serve(
        &self,
        ride: &Ride,
        driver: &Driver,
        turnaround: SignedDuration,
        estimator: &dyn DistanceEstimator,
    ) -> bool {
        if let Some(last_pickup) = self.last_pickup {
            if last_pickup >= ride.pickup_time() {
                return false;
            }
        }
        let departure = ride
            .pickup_time()
            .saturating_sub(self.dead_head_to(ride.pickup_location(), estimator));
        if let Some(free_at) = self.free_at {
            if free_at.saturating_add(turnaround) > departure {
                return false;
            }
        }
        driver.is_available(departure, ride.dropoff_time())
    }

    /// the driver drops the passenger of the given ride off and waits there
    pub fn serve(&mut self, ride: &Ride) {
        self.free_at = Some(ride.dropoff_time());
        self.location = Some(ride.dropoff_location());
        self.last_pickup = Some(ride.pickup_time());
    }
}
