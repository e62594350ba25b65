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

use std::collections::HashMap;

use itertools::Itertools;
use model::base_types::{DriverId, RideId, RideIdx};
use thiserror::Error;

use crate::{Assignment, Schedule};

/// A broken schedule. The engine never produces one, so encountering it is a bug.
#[derive(Debug, Error, PartialEq)]
pub enum InvariantViolation {
    #[error("{ride} is assigned more than once: [{first}] and [{second}]")]
    RideAssignedTwice {
        ride: RideId,
        first: Assignment,
        second: Assignment,
    },

    #[error("{ride} is assigned and unassigned at the same time: [{assignment}]")]
    AssignedAndUnassigned { ride: RideId, assignment: Assignment },

    #[error("{ride} is neither assigned nor unassigned")]
    RideMissing { ride: RideId },

    #[error("{driver} received more than one route")]
    DriverUsedTwice { driver: DriverId },

    #[error("double booking of {driver}: [{first}] and [{second}]")]
    Overlap {
        driver: DriverId,
        first: Assignment,
        second: Assignment,
    },

    #[error("{driver} is not available for [{assignment}]")]
    OutsideAvailability {
        driver: DriverId,
        assignment: Assignment,
    },
}

impl Schedule {
    /// Checks that every ride is either assigned exactly once or unassigned, and that no driver
    /// is double booked, i.e., the intervals [pickup - deadhead, drop-off] of a driver are
    /// pairwise disjoint (touching is fine) and each lies within one availability window of the
    /// driver.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut seen: HashMap<RideIdx, &Assignment> = HashMap::new();
        for assignment in self.assignments() {
            if let Some(first) = seen.insert(assignment.ride(), assignment) {
                return Err(InvariantViolation::RideAssignedTwice {
                    ride: assignment.ride_id().clone(),
                    first: first.clone(),
                    second: assignment.clone(),
                });
            }
            if self.is_unassigned(assignment.ride()) {
                return Err(InvariantViolation::AssignedAndUnassigned {
                    ride: assignment.ride_id().clone(),
                    assignment: assignment.clone(),
                });
            }
        }

        if let Some(ride) = self
            .rides()
            .idxs()
            .find(|r| !seen.contains_key(r) && !self.is_unassigned(*r))
        {
            return Err(InvariantViolation::RideMissing {
                ride: self.rides().get(ride).id().clone(),
            });
        }

        for (driver, assignments) in &self
            .assignments()
            .sorted_by_key(|a| (a.driver(), a.pickup_time(), a.ride()))
            .group_by(|a| a.driver())
        {
            let driver = self.drivers().get(driver);
            let assignments: Vec<&Assignment> = assignments.collect();

            if let Some(outside) = assignments
                .iter()
                .find(|a| !driver.is_available(a.busy_from(), a.dropoff_time()))
            {
                return Err(InvariantViolation::OutsideAvailability {
                    driver: driver.id().clone(),
                    assignment: (*outside).clone(),
                });
            }

            for (first, second) in assignments.iter().tuple_windows() {
                if first.pickup_time() >= second.pickup_time()
                    || first.dropoff_time() > second.busy_from()
                {
                    return Err(InvariantViolation::Overlap {
                        driver: driver.id().clone(),
                        first: (*first).clone(),
                        second: (*second).clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
