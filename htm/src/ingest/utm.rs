/*
This file is part of the HTM indexing engine.

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The UTM-to-geodetic projection is an external collaborator: this crate
//! only depends on its interface, never its implementation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "N" => Some(Hemisphere::North),
            "S" => Some(Hemisphere::South),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
        }
    }
}

/// Converts a UTM coordinate to `(lat, lon)` in degrees. Implemented
/// outside this crate; ingestion only calls through this trait.
pub trait UtmProjector {
    fn to_lat_lon(&self, x: i64, y: i64, zone: u32, hemisphere: Hemisphere) -> (f64, f64);
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// A projector stand-in for tests: treats UTM meters as a flat
    /// equirectangular patch centered on the equator/prime meridian, which
    /// is enough to exercise mapping/chunk/backfill logic without a real
    /// projection implementation.
    pub struct FlatProjector {
        pub meters_per_degree: f64,
    }

    impl Default for FlatProjector {
        fn default() -> Self {
            FlatProjector { meters_per_degree: 111_000.0 }
        }
    }

    impl UtmProjector for FlatProjector {
        fn to_lat_lon(&self, x: i64, y: i64, _zone: u32, _hemisphere: Hemisphere) -> (f64, f64) {
            let lat = y as f64 / self.meters_per_degree;
            let lon = x as f64 / self.meters_per_degree;
            (lat, lon)
        }
    }
}
