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

use model::base_types::{DriverIdx, Idx, RideIdx};

/// Rides that are not yet assigned and drivers that have no route yet.
/// Solving a batch can take several rounds; each round commits routes and shrinks the batch.
#[derive(Clone, Debug)]
pub struct OpenBatch {
    open_rides: Vec<bool>,
    idle_drivers: Vec<bool>,
}

// static functions
impl OpenBatch {
    pub fn new(number_of_rides: usize, number_of_drivers: usize) -> OpenBatch {
        OpenBatch {
            open_rides: vec![true; number_of_rides],
            idle_drivers: vec![true; number_of_drivers],
        }
    }
}

// methods
impl OpenBatch {
    pub fn is_open(&self, ride: RideIdx) -> bool {
        self.open_rides[ride.idx()]
    }

    pub fn is_idle(&self, driver: DriverIdx) -> bool {
        self.idle_drivers[driver.idx()]
    }

    pub fn open_rides(&self) -> impl Iterator<Item = RideIdx> + '_ {
        self.open_rides
            .iter()
            .enumerate()
            .filter(|(_, open)| **open)
            .map(|(i, _)| RideIdx::from(i as Idx))
    }

    pub fn idle_drivers(&self) -> impl Iterator<Item = DriverIdx> + '_ {
        self.idle_drivers
            .iter()
            .enumerate()
            .filter(|(_, idle)| **idle)
            .map(|(i, _)| DriverIdx::from(i as Idx))
    }

    pub fn number_of_open_rides(&self) -> usize {
        self.open_rides.iter().filter(|open| **open).count()
    }

    /// true iff an idle driver could still take an open ride
    pub fn has_work(&self) -> bool {
        self.open_rides.contains(&true) && self.idle_drivers.contains(&true)
    }

    pub fn commit(&mut self, driver: DriverIdx, chain: &[RideIdx]) {
        self.idle_drivers[driver.idx()] = false;
        for ride in chain {
            self.open_rides[ride.idx()] = false;
        }
    }
}
