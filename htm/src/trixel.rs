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

//! Named spherical triangles ("trixels") and the operations on them:
//! containment, subdivision, descent from a point or name, and midpoint.

use crate::error::{HtmError, Result};
use crate::geometry::{cross, dot, midpoint, Vec3};
use crate::octahedron;

/// A trixel is a value, not stored state: it is built on demand either by
/// descending from an octahedron root or by resolving a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Trixel {
    pub name: String,
    pub vertices: [Vec3; 3],
}

impl Trixel {
    pub fn root(name: &str) -> Option<Self> {
        octahedron::root_vertices(name).map(|vertices| Trixel {
            name: name.to_string(),
            vertices,
        })
    }

    /// Depth = number of `-`-separated path segments; a root is depth 1.
    pub fn depth(&self) -> u32 {
        self.name.matches('-').count() as u32 + 1
    }

    /// `p` is inside iff it is on the interior side of every edge's
    /// great circle, using the inclusive `>= -eps` test so that adjacent
    /// trixels tile the sphere without gaps at shared edges.
    pub fn contains(&self, p: Vec3) -> bool {
        let [v0, v1, v2] = self.vertices;
        let eps = f64::EPSILON;
        dot(cross(v0, v1), p) >= -eps
            && dot(cross(v1, v2), p) >= -eps
            && dot(cross(v2, v0), p) >= -eps
    }

    /// Representative point of the trixel, used for simplification.
    pub fn midpoint(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        crate::geometry::normalize(crate::geometry::add(crate::geometry::add(v0, v1), v2))
    }

    /// The four children, in the fixed `-0, -1, -2, -3` order.
    pub fn subdivide(&self) -> [Trixel; 4] {
        let [v0, v1, v2] = self.vertices;
        let w0 = midpoint(v1, v2);
        let w1 = midpoint(v2, v0);
        let w2 = midpoint(v0, v1);

        [
            Trixel { name: format!("{}-0", self.name), vertices: [v0, w2, w1] },
            Trixel { name: format!("{}-1", self.name), vertices: [v1, w0, w2] },
            Trixel { name: format!("{}-2", self.name), vertices: [v2, w1, w0] },
            Trixel { name: format!("{}-3", self.name), vertices: [w0, w1, w2] },
        ]
    }

    /// All descendants at exactly `depth`. `depth` must be `>=` this
    /// trixel's own depth.
    pub fn subtrixels_at_depth(&self, depth: u32) -> Result<Vec<Trixel>> {
        let self_depth = self.depth();
        if depth < self_depth {
            return Err(HtmError::InvalidArgument(format!(
                "target depth {} is below trixel depth {}",
                depth, self_depth
            )));
        }
        if depth == self_depth {
            return Ok(vec![self.clone()]);
        }

        let mut frontier = self.subdivide().to_vec();
        for _ in 0..(depth - self_depth - 1) {
            let mut next = Vec::with_capacity(frontier.len() * 4);
            for t in &frontier {
                next.extend(t.subdivide());
            }
            frontier = next;
        }
        Ok(frontier)
    }
}

/// Descends from the point's octant root into the unique child containing
/// it at each level, down to `depth`. Boundary ties are resolved by
/// accepting the first child whose `contains` predicate holds.
pub fn find_trixel_from_xyz(p: Vec3, depth: u32) -> Result<Trixel> {
    if depth < 1 {
        return Err(HtmError::InvalidArgument("depth must be >= 1".to_string()));
    }

    let root_name = octahedron::classify_octant(p.0, p.1, p.2);
    let mut trixel = Trixel::root(root_name).expect("root name from classifier is always valid");

    for _ in 0..(depth - 1) {
        let mut next = None;
        for child in trixel.subdivide() {
            if child.contains(p) {
                next = Some(child);
                break;
            }
        }
        trixel = next.ok_or(HtmError::PointNotContained {
            x: p.0,
            y: p.1,
            z: p.2,
            depth,
        })?;
    }

    Ok(trixel)
}

pub fn find_trixel_from_lat_lon(lat: f64, lon: f64, depth: u32) -> Result<Trixel> {
    find_trixel_from_xyz(crate::geometry::lat_lon_to_xyz(lat, lon), depth)
}

/// Resolves a trixel by its `^(N0|N1|N2|N3|S0|S1|S2|S3)(-[0-3])*$` name,
/// splitting on `-` and indexing the subdivision table at each segment.
pub fn find_trixel_from_name(name: &str) -> Result<Trixel> {
    let mut segments = name.split('-');
    let root_name = segments
        .next()
        .ok_or_else(|| HtmError::InvalidArgument(format!("invalid trixel name: {}", name)))?;

    let mut trixel = Trixel::root(root_name)
        .ok_or_else(|| HtmError::InvalidArgument(format!("invalid trixel name: {}", name)))?;

    for segment in segments {
        let index: usize = segment
            .parse()
            .map_err(|_| HtmError::InvalidArgument(format!("invalid trixel name: {}", name)))?;
        if index > 3 {
            return Err(HtmError::InvalidArgument(format!("invalid trixel name: {}", name)));
        }
        let children = trixel.subdivide();
        trixel = children[index].clone();
    }

    Ok(trixel)
}

/// The parent's name, i.e. the name with its last `-i` segment dropped.
/// Returns `None` for a root (depth 1) name.
pub fn parent_name(name: &str) -> Option<String> {
    let idx = name.rfind('-')?;
    Some(name[..idx].to_string())
}
