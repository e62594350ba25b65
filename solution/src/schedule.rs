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
use std::sync::Arc;

use im::{OrdMap, OrdSet, Vector};
use jiff::SignedDuration;
use model::base_types::{DriverIdx, PriceRate, RideIdx};
use model::drivers::Drivers;
use model::rides::Rides;
use model::travel_time::DistanceEstimator;

use crate::driver_state::DriverState;
use crate::{Assignment, DriverRoute, InvariantViolation};

// The assignment of rides to drivers of one batch.
// It is an immutable object that is assembled once and validated before it is handed out.
#[derive(Clone)]
pub struct Schedule {
    // ordered by driver, then by pickup time
    assignments: Vector<Assignment>,

    // position of each assigned ride within assignments
    assignment_positions: OrdMap<RideIdx, usize>,

    // only drivers with at least one ride have a route
    routes: OrdMap<DriverIdx, DriverRoute>,

    unassigned: OrdSet<RideIdx>,

    rides: Arc<Rides>,
    drivers: Arc<Drivers>,
}

// static functions
impl Schedule {
    /// Turns chains that are already paired with drivers into a schedule.
    ///
    /// The deadhead of each ride is measured from the drop-off of the previous ride of the route
    /// (or the start location of the driver for the first ride). Rides that appear in no chain
    /// are unassigned. The result is validated before it is returned.
    pub fn assemble(
        routes: Vec<(DriverIdx, Vec<RideIdx>)>,
        rides: Arc<Rides>,
        drivers: Arc<Drivers>,
        estimator: &dyn DistanceEstimator,
    ) -> Result<Schedule, InvariantViolation> {
        let mut driver_states: Vec<DriverState> = drivers
            .iter()
            .map(|(_, driver)| DriverState::initial(driver))
            .collect();

        let mut assignments = Vector::new();
        let mut assignment_positions = OrdMap::new();
        let mut driver_routes = OrdMap::new();

        for (driver_idx, chain) in routes {
            let driver = drivers.get(driver_idx);
            if chain.is_empty() {
                continue;
            }
            if driver_routes.contains_key(&driver_idx) {
                return Err(InvariantViolation::DriverUsedTwice {
                    driver: driver.id().clone(),
                });
            }

            let state = &mut driver_states[driver_idx.idx()];
            let mut route_dead_head = SignedDuration::ZERO;
            for &ride_idx in chain.iter() {
                let ride = rides.get(ride_idx);
                let dead_head = state.dead_head_to(ride.pickup_location(), estimator);
                route_dead_head += dead_head;
                state.serve(ride);

                assignment_positions.insert(ride_idx, assignments.len());
                assignments.push_back(Assignment::new(
                    ride_idx,
                    driver_idx,
                    ride.id().clone(),
                    driver.id().clone(),
                    dead_head,
                    ride.pickup_time(),
                    ride.dropoff_time(),
                ));
            }
            driver_routes.insert(
                driver_idx,
                DriverRoute::new(driver_idx, chain.into_iter().collect(), route_dead_head),
            );
        }

        let unassigned = rides
            .idxs()
            .filter(|r| !assignment_positions.contains_key(r))
            .collect();

        let schedule = Schedule {
            assignments,
            assignment_positions,
            routes: driver_routes,
            unassigned,
            rides,
            drivers,
        }
        .sorted();

        schedule.validate()?;
        Ok(schedule)
    }
}

// methods
impl Schedule {
    /// all assignments, ordered by driver and then by pickup time
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.iter()
    }

    pub fn number_of_assignments(&self) -> usize {
        self.assignments.len()
    }

    pub fn assignment_of(&self, ride: RideIdx) -> Option<&Assignment> {
        self.assignment_positions
            .get(&ride)
            .and_then(|&pos| self.assignments.get(pos))
    }

    pub fn route_of(&self, driver: DriverIdx) -> Option<&DriverRoute> {
        self.routes.get(&driver)
    }

    /// routes of all used drivers, from the cheapest to the most expensive driver
    pub fn routes(&self) -> impl Iterator<Item = &DriverRoute> + '_ {
        self.routes.values()
    }

    pub fn is_unassigned(&self, ride: RideIdx) -> bool {
        self.unassigned.contains(&ride)
    }

    /// unassigned rides in pickup order
    pub fn unassigned(&self) -> impl Iterator<Item = RideIdx> + '_ {
        self.unassigned.iter().copied()
    }

    pub fn number_of_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    pub fn number_of_used_drivers(&self) -> usize {
        self.routes.len()
    }

    pub fn total_dead_head(&self) -> SignedDuration {
        self.routes
            .values()
            .fold(SignedDuration::ZERO, |sum, route| sum + route.dead_head())
    }

    /// sum of the price rates of all used drivers
    pub fn total_price_rate(&self) -> PriceRate {
        self.routes
            .keys()
            .map(|&d| self.drivers.get(d).price_rate())
            .sum()
    }

    pub fn rides(&self) -> &Rides {
        &self.rides
    }

    pub fn drivers(&self) -> &Drivers {
        &self.drivers
    }

    pub fn print(&self) {
        println!("{}", self);
    }

    // brings the assignments into driver order (routes are given in pairing order)
    fn sorted(self) -> Schedule {
        let mut assignments: Vec<Assignment> = self.assignments.iter().cloned().collect();
        // stable, so the order within a route is kept
        assignments.sort_by_key(|a| a.driver());
        let mut assignment_positions = OrdMap::new();
        for (pos, assignment) in assignments.iter().enumerate() {
            assignment_positions.insert(assignment.ride(), pos);
        }
        Schedule {
            assignments: assignments.into_iter().collect(),
            assignment_positions,
            ..self
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for route in self.routes.values() {
            let driver = self.drivers.get(route.driver());
            write!(f, "{}:", driver)?;
            for ride in route.rides() {
                let assignment = self.assignment_of(ride);
                let dead_head = assignment.map_or(0, |a| a.dead_head().as_secs());
                write!(f, " [deadhead {}s] {}", dead_head, self.rides.get(ride))?;
            }
            writeln!(f)?;
        }
        if !self.unassigned.is_empty() {
            write!(f, "unassigned:")?;
            for ride in self.unassigned.iter() {
                write!(f, " {}", self.rides.get(*ride).id())?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{} of {} rides assigned to {} drivers, total deadhead: {}s",
            self.assignments.len(),
            self.rides.len(),
            self.routes.len(),
            self.total_dead_head().as_secs()
        )
    }
}
