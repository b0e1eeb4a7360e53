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

//! Unit-sphere vector math shared by the trixel and halfspace modules.

/// Mean earth radius in meters, used to turn a surface distance into an
/// angular cap radius.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

pub type Vec3 = (f64, f64, f64);

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a.0 * b.0 + a.1 * b.1 + a.2 * b.2
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    (
        a.1 * b.2 - a.2 * b.1,
        a.2 * b.0 - a.0 * b.2,
        a.0 * b.1 - a.1 * b.0,
    )
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    (a.0 - b.0, a.1 - b.1, a.2 - b.2)
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    (a.0 * s, a.1 * s, a.2 * s)
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Normalizes `a` to the unit sphere. `a` must not be the zero vector.
pub fn normalize(a: Vec3) -> Vec3 {
    let n = norm(a);
    scale(a, 1.0 / n)
}

pub fn lat_lon_to_xyz(lat: f64, lon: f64) -> Vec3 {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();
    (cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

pub fn xyz_to_lat_lon(v: Vec3) -> (f64, f64) {
    let lat = v.2.asin();
    let lon = v.1.atan2(v.0);
    (lat.to_degrees(), lon.to_degrees())
}

/// Great-circle midpoint of two points on the unit sphere: the normalized
/// sum. Undefined (division by zero) only if `a` and `b` are antipodal,
/// which never happens for the adjacent trixel vertices this is used on.
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    normalize(add(a, b))
}

/// Angle between two vectors, clamped to absorb floating-point drift in
/// the cosine before `acos`.
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    let cos_theta = dot(a, b) / (norm(a) * norm(b));
    cos_theta.clamp(-1.0, 1.0).acos()
}

/// Converts a surface distance in meters to a halfspace (cap) distance,
/// i.e. `cos(angle)` where `angle = distance / EARTH_RADIUS`.
pub fn surface_radius_to_cap_distance(surface_distance_m: f64) -> f64 {
    (surface_distance_m / EARTH_RADIUS).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx_eq_vec(a: Vec3, b: Vec3, eps: f64) {
        assert!((a.0 - b.0).abs() < eps, "{:?} vs {:?}", a, b);
        assert!((a.1 - b.1).abs() < eps, "{:?} vs {:?}", a, b);
        assert!((a.2 - b.2).abs() < eps, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn equator_prime_meridian() {
        approx_eq_vec(lat_lon_to_xyz(0.0, 0.0), (1.0, 0.0, 0.0), 1e-15);
    }

    #[test]
    fn north_pole() {
        approx_eq_vec(lat_lon_to_xyz(90.0, 0.0), (0.0, 0.0, 1.0), 1e-15);
    }

    #[test]
    fn roundtrip_non_polar() {
        let mut lat = -89.0_f64;
        while lat <= 89.0 {
            let mut lon = -179.0_f64;
            while lon <= 179.0 {
                let xyz = lat_lon_to_xyz(lat, lon);
                let (lat2, lon2) = xyz_to_lat_lon(xyz);
                assert!((lat - lat2).abs() < 1e-9, "lat {} -> {}", lat, lat2);
                assert!((lon - lon2).abs() < 1e-9, "lon {} -> {}", lon, lon2);
                lon += 37.0;
            }
            lat += 23.0;
        }
    }

    #[test]
    fn angle_between_handles_drift_past_unit_range() {
        let v = (1.0, 0.0, 0.0);
        // dot/norm product here is exactly 1.0 + epsilon-scale drift once
        // scaled; clamp() must keep acos() from returning NaN.
        let a = angle_between(v, scale(v, 1.0 + 1e-16));
        assert!(!a.is_nan());
        assert!(a.abs() < 1e-6);
    }

    #[test]
    fn midpoint_is_unit_length() {
        let a = lat_lon_to_xyz(10.0, 20.0);
        let b = lat_lon_to_xyz(15.0, 25.0);
        let m = midpoint(a, b);
        assert!((norm(m) - 1.0).abs() < 1e-12);
    }
}
