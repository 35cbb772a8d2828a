use nalgebra::{Unit, UnitQuaternion, Vector3};

use std::f64::consts::{PI, TAU};

pub fn reject(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    // Computes the vector rejection of u from v. v must be non-zero.
    let u_proj_v = u.dot(v) * v / v.norm_squared();
    u - u_proj_v
}

/// Wraps an angle into [0, 2pi).
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns the unsigned distance between two angles, going the short way around
/// the circle. The result is in [0, pi].
pub fn angle_between(a: f64, b: f64) -> f64 {
    let diff = wrap_angle(a - b);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// Returns the smallest rotation R with R(from) pointing along `to`.
///
/// The length of `to` doesn't matter, but if it is shorter than `tolerance`,
/// there's no direction to point at, and this returns the identity.
///
/// When `to` is antiparallel to `from`, every axis perpendicular to `from` gives
/// a minimal (half-turn) rotation. We pick the one closest to the x-axis, or the
/// z-axis if `from` is itself along x.
pub fn rotation_between_axes(
    from: &Unit<Vector3<f64>>,
    to: &Vector3<f64>,
    tolerance: f64,
) -> UnitQuaternion<f64> {
    if to.norm() < tolerance {
        return UnitQuaternion::identity();
    }

    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return rotation;
    }

    // Antiparallel: nalgebra gives up, so we make the half-turn ourselves.
    let mut axis = reject(&Vector3::x(), from);
    if axis.norm() < tolerance {
        axis = reject(&Vector3::z(), from);
    }
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), PI)
}
