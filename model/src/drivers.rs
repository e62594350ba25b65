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
#[path = "drivers_tests.rs"]
mod drivers_tests;

use std::collections::HashMap;
use std::fmt;

use jiff::civil::DateTime;

use crate::base_types::{DriverId, DriverIdx, Idx, Location, PriceRate};
use crate::error::InputError;

/// A time interval in which a driver works. A ride together with the deadhead leading to it
/// must lie within one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AvailabilityWindow {
    from: DateTime,
    until: DateTime,
}

impl AvailabilityWindow {
    pub fn from(&self) -> DateTime {
        self.from
    }

    pub fn until(&self) -> DateTime {
        self.until
    }

    pub fn contains(&self, from: DateTime, until: DateTime) -> bool {
        self.from <= from && until <= self.until
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    id: DriverId,
    price_rate: PriceRate,
    start_location: Option<Location>, // None means the driver can be anywhere at the start
    availability: Vec<AvailabilityWindow>, // empty means available all day; sorted
}

// static functions
impl Driver {
    pub fn new(id: DriverId, price_rate: PriceRate) -> Result<Driver, InputError> {
        if !price_rate.is_finite() || price_rate < 0.0 {
            return Err(InputError::InvalidPriceRate {
                driver: id,
                price_rate,
            });
        }
        Ok(Driver {
            id,
            price_rate,
            start_location: None,
            availability: Vec::new(),
        })
    }

    pub fn with_start_location(mut self, location: Location) -> Driver {
        self.start_location = Some(location);
        self
    }

    /// Single availability window; a missing bound means start or end of the day. Without
    /// both bounds the driver stays available all day.
    pub fn with_availability(
        self,
        from: Option<DateTime>,
        until: Option<DateTime>,
    ) -> Result<Driver, InputError> {
        if from.is_none() && until.is_none() {
            return Ok(self);
        }
        self.with_availability_windows(vec![(
            from.unwrap_or(DateTime::MIN),
            until.unwrap_or(DateTime::MAX),
        )])
    }

    /// Several availability windows, e.g., a split shift. They may be given in any order.
    pub fn with_availability_windows(
        mut self,
        windows: Vec<(DateTime, DateTime)>,
    ) -> Result<Driver, InputError> {
        for (from, until) in windows {
            if until < from {
                return Err(InputError::EmptyAvailability { driver: self.id });
            }
            self.availability.push(AvailabilityWindow { from, until });
        }
        self.availability.sort();
        Ok(self)
    }
}

// methods
impl Driver {
    pub fn id(&self) -> &DriverId {
        &self.id
    }

    pub fn price_rate(&self) -> PriceRate {
        self.price_rate
    }

    pub fn start_location(&self) -> Option<Location> {
        self.start_location
    }

    pub fn availability(&self) -> &[AvailabilityWindow] {
        &self.availability
    }

    /// true iff [from, until] lies within one availability window
    pub fn is_available(&self, from: DateTime, until: DateTime) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.contains(from, until))
    }

    /// true iff the driver has a start location or availability windows, i.e., it cannot
    /// take every chain.
    pub fn is_constrained(&self) -> bool {
        self.start_location.is_some() || !self.availability.is_empty()
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (price rate: {})", self.id, self.price_rate)
    }
}

/// The driver pool, sorted by price rate (ties are broken by id).
/// The DriverIdx of a driver is its position in this order, hence iterating goes from the
/// cheapest to the most expensive driver.
pub struct Drivers {
    drivers: Vec<Driver>,
    idx_lookup: HashMap<DriverId, DriverIdx>,
}

impl Drivers {
    pub fn new(mut drivers: Vec<Driver>) -> Result<Drivers, InputError> {
        drivers.sort_by(|d1, d2| {
            d1.price_rate
                .total_cmp(&d2.price_rate)
                .then_with(|| d1.id.cmp(&d2.id))
        });

        let mut idx_lookup = HashMap::with_capacity(drivers.len());
        for (i, driver) in drivers.iter().enumerate() {
            if idx_lookup
                .insert(driver.id.clone(), DriverIdx::from(i as Idx))
                .is_some()
            {
                return Err(InputError::DuplicateDriver(driver.id.clone()));
            }
        }

        Ok(Drivers {
            drivers,
            idx_lookup,
        })
    }

    pub fn get(&self, driver: DriverIdx) -> &Driver {
        &self.drivers[driver.idx()]
    }

    pub fn idx_of(&self, id: &DriverId) -> Option<DriverIdx> {
        self.idx_lookup.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// all driver indices from the cheapest to the most expensive
    pub fn idxs(&self) -> impl DoubleEndedIterator<Item = DriverIdx> + ExactSizeIterator {
        (0..self.drivers.len() as Idx).map(DriverIdx::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DriverIdx, &Driver)> + '_ {
        self.idxs().zip(self.drivers.iter())
    }
}
