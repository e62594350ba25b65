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
#[path = "rides_tests.rs"]
mod rides_tests;

use std::collections::HashMap;
use std::fmt;

use jiff::civil::DateTime;
use jiff::SignedDuration;

use crate::base_types::{Idx, Location, RideId, RideIdx};
use crate::error::InputError;

/// Pickup or drop-off point of a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    location: Location,
    address: String,
}

impl Stop {
    pub fn new(location: Location, address: impl Into<String>) -> Stop {
        Stop {
            location,
            address: address.into(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    id: RideId,
    pickup_time: DateTime,
    pickup: Stop,
    dropoff: Stop,
    duration: SignedDuration,
    dropoff_time: DateTime, // redundant, pickup_time + duration
}

// static functions
impl Ride {
    pub fn new(
        id: RideId,
        pickup_time: DateTime,
        pickup: Stop,
        dropoff: Stop,
        duration: SignedDuration,
    ) -> Result<Ride, InputError> {
        if duration.is_negative() {
            return Err(InputError::NegativeDuration { ride: id, duration });
        }
        let dropoff_time = match pickup_time.checked_add(duration) {
            Ok(t) => t,
            Err(_) => return Err(InputError::TimeOutOfRange { ride: id }),
        };
        Ok(Ride {
            id,
            pickup_time,
            pickup,
            dropoff,
            duration,
            dropoff_time,
        })
    }
}

// methods
impl Ride {
    pub fn id(&self) -> &RideId {
        &self.id
    }

    pub fn pickup_time(&self) -> DateTime {
        self.pickup_time
    }

    /// the point in time the driver is free again (pickup_time + duration)
    pub fn dropoff_time(&self) -> DateTime {
        self.dropoff_time
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn pickup(&self) -> &Stop {
        &self.pickup
    }

    pub fn dropoff(&self) -> &Stop {
        &self.dropoff
    }

    pub fn pickup_location(&self) -> Location {
        self.pickup.location
    }

    pub fn dropoff_location(&self) -> Location {
        self.dropoff.location
    }
}

impl fmt::Display for Ride {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({} {} -> {} {})",
            self.id, self.pickup_time, self.pickup.address, self.dropoff_time, self.dropoff.address
        )
    }
}

/// All rides of the batch, sorted by pickup time (ties are broken by id).
/// The RideIdx of a ride is its position in this order, hence comparing indices compares pickup
/// times.
pub struct Rides {
    rides: Vec<Ride>,
    idx_lookup: HashMap<RideId, RideIdx>,
}

impl Rides {
    pub fn new(mut rides: Vec<Ride>) -> Result<Rides, InputError> {
        rides.sort_by(|r1, r2| {
            r1.pickup_time
                .cmp(&r2.pickup_time)
                .then_with(|| r1.id.cmp(&r2.id))
        });

        let mut idx_lookup = HashMap::with_capacity(rides.len());
        for (i, ride) in rides.iter().enumerate() {
            if idx_lookup
                .insert(ride.id.clone(), RideIdx::from(i as Idx))
                .is_some()
            {
                return Err(InputError::DuplicateRide(ride.id.clone()));
            }
        }

        Ok(Rides { rides, idx_lookup })
    }

    pub fn get(&self, ride: RideIdx) -> &Ride {
        &self.rides[ride.idx()]
    }

    pub fn idx_of(&self, id: &RideId) -> Option<RideIdx> {
        self.idx_lookup.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    /// all ride indices in pickup order
    pub fn idxs(&self) -> impl DoubleEndedIterator<Item = RideIdx> + ExactSizeIterator {
        (0..self.rides.len() as Idx).map(RideIdx::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RideIdx, &Ride)> + '_ {
        self.idxs().zip(self.rides.iter())
    }

    /// all rides with earliest <= pickup_time <= latest, in pickup order
    pub fn picked_up_between(
        &self,
        earliest: DateTime,
        latest: DateTime,
    ) -> impl Iterator<Item = RideIdx> + '_ {
        let start = self.rides.partition_point(|r| r.pickup_time < earliest);
        let end = self.rides.partition_point(|r| r.pickup_time <= latest);
        (start as Idx..end.max(start) as Idx).map(RideIdx::from)
    }
}
