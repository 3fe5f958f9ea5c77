use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

/// Direction cosine matrix (inertial → body) for a yaw-pitch-roll (3-2-1)
/// Euler sequence.
pub fn dcm_from_euler(yaw: f64, pitch: f64, roll: f64) -> Matrix3<f64> {
    let (spsi, cpsi) = yaw.sin_cos();
    let (stheta, ctheta) = pitch.sin_cos();
    let (sphi, cphi) = roll.sin_cos();

    Matrix3::new(
        cpsi * ctheta,
        spsi * ctheta,
        -stheta,
        cpsi * stheta * sphi - spsi * cphi,
        spsi * stheta * sphi + cpsi * cphi,
        ctheta * sphi,
        cpsi * stheta * cphi + spsi * sphi,
        spsi * stheta * cphi - cpsi * sphi,
        ctheta * cphi,
    )
}

/// Recover `(yaw, pitch, roll)` from a DCM built by [`dcm_from_euler`].
/// Pitch is confined to [-pi/2, pi/2].
pub fn euler_from_dcm(dcm: &Matrix3<f64>) -> (f64, f64, f64) {
    let yaw = dcm[(0, 1)].atan2(dcm[(0, 0)]);
    let pitch = (-dcm[(0, 2)]).clamp(-1.0, 1.0).asin();
    let roll = dcm[(1, 2)].atan2(dcm[(2, 2)]);
    (yaw, pitch, roll)
}

/// Angle between two vectors, rad. `None` if either is zero.
pub fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<f64> {
    let denom = u.norm() * v.norm();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((u.dot(v) / denom).clamp(-1.0, 1.0).acos())
}

/// Rotation matrix for `angle` about `axis` (axis need not be unit length).
pub fn dcm_from_axis_angle(angle: f64, axis: &Vector3<f64>) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle).into_inner()
}

/// Local launch-site frame as ECEF column vectors `[up, east, north]`.
pub fn local_frame(pos: &Vector3<f64>) -> Matrix3<f64> {
    let up = pos.normalize();
    let east_raw = Vector3::z().cross(&up);
    // Over a pole east is undefined; pick ECEF x.
    let east = if east_raw.norm() < 1e-9 {
        Vector3::x()
    } else {
        east_raw.normalize()
    };
    let north = up.cross(&east);
    Matrix3::from_columns(&[up, east, north])
}
