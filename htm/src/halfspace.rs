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

//! Spherical caps ("halfspaces") and their intersection classification
//! against a trixel.

use crate::geometry::{angle_between, cross, dot, normalize, sub, Vec3};
use crate::trixel::Trixel;

/// A spherical cap: the set of unit vectors `p` with `dot(vector, p) >
/// distance`. `distance = cos(theta)` where `theta` is the angular radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halfspace {
    pub vector: Vec3,
    pub distance: f64,
}

impl Halfspace {
    pub fn new(vector: Vec3, distance: f64) -> Self {
        Halfspace { vector, distance }
    }

    pub fn arcangle(&self) -> f64 {
        self.distance.clamp(-1.0, 1.0).acos()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Outside,
    Partial,
    Full,
}

/// Classifies a cap against a trixel as `OUTSIDE`, `PARTIAL` or `FULL`.
/// See spec §4.3 for the derivation of each branch.
pub fn classify(h: &Halfspace, t: &Trixel) -> Classification {
    let [v0, v1, v2] = t.vertices;
    let eps = f64::EPSILON;

    let in0 = dot(h.vector, v0) > h.distance;
    let in1 = dot(h.vector, v1) > h.distance;
    let in2 = dot(h.vector, v2) > h.distance;

    if in0 && in1 && in2 {
        return Classification::Full;
    }
    if in0 || in1 || in2 {
        return Classification::Partial;
    }

    // All vertices outside the cap. Compute the triangle's bounding cap
    // (smallest cap containing it, axis normal to the triangle plane) to
    // cheaply rule out caps far from the triangle.
    let n = normalize(cross(sub(v1, v0), sub(v2, v1)));
    let d_bounding = dot(v0, n);
    let bounding = Halfspace::new(n, d_bounding);

    let theta_bounding = angle_between(h.vector, n);

    if theta_bounding >= h.arcangle() + bounding.arcangle() {
        return Classification::Outside;
    }

    let edges = [(v0, v1), (v1, v2), (v2, v0)];

    for (vi, vj) in edges {
        let theta_ij = angle_between(vi, vj);
        let u = (theta_ij / 2.0).tan();
        let u2 = u * u;

        let gamma_i = dot(h.vector, vi);
        let gamma_j = dot(h.vector, vj);

        let a = -u2 * (gamma_i + h.distance);
        let b = gamma_i * (u2 - 1.0) + gamma_j * (u2 + 1.0);
        let c = gamma_i - h.distance;

        for s in quadratic_real_roots(a, b, c) {
            if (0.0..=1.0).contains(&s) {
                return Classification::Partial;
            }
        }
    }

    for (vi, vj) in edges {
        if dot(cross(vi, vj), h.vector) < -eps {
            return Classification::Outside;
        }
    }

    // Cap lies entirely inside the triangle.
    Classification::Partial
}

/// Real roots of `a*s^2 + b*s + c = 0`, degrading gracefully to the
/// linear/degenerate cases when `a` is (near) zero.
fn quadratic_real_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < f64::EPSILON {
        if b.abs() < f64::EPSILON {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    vec![(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)]
}
