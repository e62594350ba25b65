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

use std::fmt;

use im::Vector;
use jiff::civil::DateTime;
use jiff::SignedDuration;
use model::base_types::{DriverId, DriverIdx, RideId, RideIdx};

/// A ride served by a driver together with the deadhead the driver needs to reach its pickup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    ride: RideIdx,
    driver: DriverIdx,
    ride_id: RideId,
    driver_id: DriverId,
    dead_head: SignedDuration,
    pickup_time: DateTime,
    dropoff_time: DateTime,
}

impl Assignment {
    pub(crate) fn new(
        ride: RideIdx,
        driver: DriverIdx,
        ride_id: RideId,
        driver_id: DriverId,
        dead_head: SignedDuration,
        pickup_time: DateTime,
        dropoff_time: DateTime,
    ) -> Assignment {
        Assignment {
            ride,
            driver,
            ride_id,
            driver_id,
            dead_head,
            pickup_time,
            dropoff_time,
        }
    }

    pub fn ride(&self) -> RideIdx {
        self.ride
    }

    pub fn driver(&self) -> DriverIdx {
        self.driver
    }

    pub fn ride_id(&self) -> &RideId {
        &self.ride_id
    }

    pub fn driver_id(&self) -> &DriverId {
        &self.driver_id
    }

    pub fn dead_head(&self) -> SignedDuration {
        self.dead_head
    }

    pub fn pickup_time(&self) -> DateTime {
        self.pickup_time
    }

    pub fn dropoff_time(&self) -> DateTime {
        self.dropoff_time
    }

    /// the driver is busy from the departure of the deadhead until the drop-off
    pub fn busy_from(&self) -> DateTime {
        self.pickup_time.saturating_sub(self.dead_head)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} -> {} (deadhead {}s, busy {} - {})",
            self.ride_id,
            self.driver_id,
            self.dead_head.as_secs(),
            self.busy_from(),
            self.dropoff_time
        )
    }
}

/// The rides of one driver in pickup order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRoute {
    driver: DriverIdx,
    rides: Vector<RideIdx>,
    dead_head: SignedDuration,
}

impl DriverRoute {
    pub(crate) fn new(driver: DriverIdx, rides: Vector<RideIdx>, dead_head: SignedDuration) -> DriverRoute {
        DriverRoute {
            driver,
            rides,
            dead_head,
        }
    }

    pub fn driver(&self) -> DriverIdx {
        self.driver
    }

    pub fn rides(&self) -> impl Iterator<Item = RideIdx> + '_ {
        self.rides.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn first_ride(&self) -> Option<RideIdx> {
        self.rides.front().copied()
    }

    pub fn last_ride(&self) -> Option<RideIdx> {
        self.rides.back().copied()
    }

    /// sum of all deadheads of the route
    pub fn dead_head(&self) -> SignedDuration {
        self.dead_head
    }
}
