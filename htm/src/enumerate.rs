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

//! Recursive enumeration of trixels intersecting a spherical cap, down to
//! a target depth. Driven by an explicit worklist rather than recursion,
//! since depth can run as deep as `DETAILED_DEPTH = 20` and a full tree at
//! that depth is never materialized (only the active frontier exists).

use crate::error::{HtmError, Result};
use crate::halfspace::{classify, Classification, Halfspace};
use crate::octahedron;
use crate::trixel::Trixel;

/// All trixels that intersect `h` down to `depth`: fully-contained
/// trixels are returned as soon as found (possibly shallower than
/// `depth`), partially-intersecting trixels are subdivided until `depth`
/// and returned as-is at the frontier.
pub fn trixels_in_cap(h: &Halfspace, depth: u32) -> Result<Vec<Trixel>> {
    if depth < 1 {
        return Err(HtmError::InvalidArgument("depth must be >= 1".to_string()));
    }

    let mut selected = Vec::new();
    let mut candidates = Vec::new();

    for (name, _) in octahedron::roots() {
        let t = Trixel::root(name).unwrap();
        match classify(h, &t) {
            Classification::Full => selected.push(t),
            Classification::Partial => candidates.push(t),
            Classification::Outside => {}
        }
    }

    for _ in 0..(depth - 1) {
        let mut next_candidates = Vec::new();
        for candidate in candidates {
            for child in candidate.subdivide() {
                match classify(h, &child) {
                    Classification::Full => selected.push(child),
                    Classification::Partial => next_candidates.push(child),
                    Classification::Outside => {}
                }
            }
        }
        candidates = next_candidates;
    }

    selected.extend(candidates);
    Ok(selected)
}

/// As `trixels_in_cap`, but every returned trixel shallower than `depth`
/// is expanded to its descendants at exactly `depth`, so callers always
/// see uniform leaf granularity.
pub fn expanded_trixels_in_cap(h: &Halfspace, depth: u32) -> Result<Vec<Trixel>> {
    let trixels = trixels_in_cap(h, depth)?;

    let mut expanded = Vec::new();
    for t in trixels {
        if t.depth() == depth {
            expanded.push(t);
        } else {
            expanded.extend(t.subtrixels_at_depth(depth)?);
        }
    }
    Ok(expanded)
}
