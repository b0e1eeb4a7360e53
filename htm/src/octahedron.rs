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

//! The eight seed triangles the HTM hierarchy descends from, and the
//! constant-time classifier that picks one from a point's octant.

use crate::geometry::Vec3;

const PX: Vec3 = (1.0, 0.0, 0.0);
const NX: Vec3 = (-1.0, 0.0, 0.0);
const PY: Vec3 = (0.0, 1.0, 0.0);
const NY: Vec3 = (0.0, -1.0, 0.0);
const PZ: Vec3 = (0.0, 0.0, 1.0);
const NZ: Vec3 = (0.0, 0.0, -1.0);

/// Root names in the fixed order `get_roots()` returns them. This order is
/// also the order `trixels_in_cap` visits roots in at depth 1.
pub const ROOT_NAMES: [&str; 8] = ["N0", "N1", "N2", "N3", "S0", "S1", "S2", "S3"];

/// Vertex order must be preserved byte-for-byte: child naming during
/// subdivision depends on it (see `trixel::subdivide`).
pub fn root_vertices(name: &str) -> Option<[Vec3; 3]> {
    Some(match name {
        "N0" => [PX, PZ, NY],
        "N1" => [NY, PZ, NX],
        "N2" => [NX, PZ, PY],
        "N3" => [PY, PZ, PX],
        "S0" => [PX, NZ, PY],
        "S1" => [PY, NZ, NX],
        "S2" => [NX, NZ, NY],
        "S3" => [NY, NZ, PX],
        _ => return None,
    })
}

pub fn roots() -> impl Iterator<Item = (&'static str, [Vec3; 3])> {
    ROOT_NAMES.iter().map(|&n| (n, root_vertices(n).unwrap()))
}

/// Classifies a point's octant into the root trixel that contains it.
/// This is the first step of descent; containment within the root still
/// needs to be verified by the trixel's own predicate at the poles/edges.
pub fn classify_octant(x: f64, y: f64, z: f64) -> &'static str {
    if z > 0.0 {
        match (y > 0.0, x > 0.0) {
            (true, true) => "N3",
            (true, false) => "N2",
            (false, true) => "N0",
            (false, false) => "N1",
        }
    } else {
        match (y > 0.0, x > 0.0) {
            (true, true) => "S0",
            (true, false) => "S1",
            (false, true) => "S3",
            (false, false) => "S2",
        }
    }
}
