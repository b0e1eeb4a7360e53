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

//! The concrete WGS84 UTM-to-geodetic projector this binary wires into
//! the library's `UtmProjector` seam. Inverse transverse Mercator via the
//! standard Krüger series; the library itself never depends on this.

use htm::ingest::utm::{Hemisphere, UtmProjector};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING: f64 = 10_000_000.0;

pub struct UtmCrateProjector;

impl UtmProjector for UtmCrateProjector {
    fn to_lat_lon(&self, x: i64, y: i64, zone: u32, hemisphere: Hemisphere) -> (f64, f64) {
        let easting = x as f64;
        let northing = match hemisphere {
            Hemisphere::North => y as f64,
            Hemisphere::South => y as f64 - FALSE_NORTHING,
        };

        let e = (2.0 * WGS84_F - WGS84_F * WGS84_F).sqrt();
        let e2 = e * e;
        let ep2 = e2 / (1.0 - e2);

        let m = northing / K0;
        let mu = m
            / (WGS84_A
                * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let n1 = WGS84_A / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let t1 = phi1.tan().powi(2);
        let c1 = ep2 * phi1.cos().powi(2);
        let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = (easting - FALSE_EASTING) / (n1 * K0);

        let lat_rad = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon_rad = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / phi1.cos();

        let origin_lon = (zone as f64) * 6.0 - 183.0;

        (lat_rad.to_degrees(), origin_lon + lon_rad.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_of_zone_maps_to_zero_latitude_at_equator() {
        let p = UtmCrateProjector;
        let (lat, lon) = p.to_lat_lon(500_000, 0, 32, Hemisphere::North);
        assert!(lat.abs() < 1e-6, "lat = {}", lat);
        assert!((lon - 9.0).abs() < 1e-6, "lon = {}", lon);
    }

    #[test]
    fn southern_hemisphere_equator_northing_matches_false_northing_convention() {
        let p = UtmCrateProjector;
        let (lat, _lon) = p.to_lat_lon(500_000, 10_000_000, 32, Hemisphere::South);
        assert!(lat.abs() < 1e-6, "lat = {}", lat);
    }
}
