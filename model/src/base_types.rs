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

use derive_more::Display;
use derive_more::From;
use serde::{Deserialize, Serialize};

pub mod location;

pub use location::Location;

pub type Idx = u32;

/// Costs of the flow network. Signed, as covered rides are rewarded by negative costs.
pub type Cost = i64;

pub type PriceRate = f64;

#[derive(Display, From, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId(String);

impl From<&str> for RideId {
    fn from(string: &str) -> Self {
        RideId(String::from(string))
    }
}

#[derive(Display, From, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl From<&str> for DriverId {
    fn from(string: &str) -> Self {
        DriverId(String::from(string))
    }
}

/// Position of a ride within `Rides`, i.e., rides are indexed by pickup time (ties broken by id).
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "ride_{}", _0)]
pub struct RideIdx(Idx);

impl RideIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}

/// Position of a driver within `Drivers`, i.e., drivers are indexed by price rate (ties broken
/// by id). So a smaller index is always at least as cheap.
#[derive(Display, From, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display(fmt = "driver_{}", _0)]
pub struct DriverIdx(Idx);

impl DriverIdx {
    pub fn idx(&self) -> usize {
        self.0 as usize
    }
}
