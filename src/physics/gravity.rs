use std::fmt;

use nalgebra::Vector3;

use crate::config::PlanetConfig;

// ---------------------------------------------------------------------------
// Point-mass Newtonian gravity (ECEF, origin at Earth's centre of mass)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceError {
    /// The projectile is closer to the centre than the configured minimum
    /// radius, where inverse-square gravity is treated as undefined.
    BelowMinimumRadius { radius: f64, min_radius: f64 },
}

impl fmt::Display for ForceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimumRadius { radius, min_radius } => write!(
                f,
                "gravity undefined at r = {:.1} m (minimum {:.1} m)",
                radius, min_radius
            ),
        }
    }
}

impl std::error::Error for ForceError {}

/// Gravitational force magnitude `G M m / r^2`, N.
pub fn gravity_magnitude(planet: &PlanetConfig, mass: f64, radius: f64) -> Result<f64, ForceError> {
    if !(radius >= planet.min_radius) {
        log::warn!("gravity refused: r = {:.1} m below {:.1} m", radius, planet.min_radius);
        return Err(ForceError::BelowMinimumRadius { radius, min_radius: planet.min_radius });
    }
    Ok(planet.mu() * mass / (radius * radius))
}

/// Gravitational force on the projectile, pointing from `pos` to the origin.
pub fn gravity_force(
    planet: &PlanetConfig,
    pos: &Vector3<f64>,
    mass: f64,
) -> Result<Vector3<f64>, ForceError> {
    let r = pos.norm();
    let magnitude = gravity_magnitude(planet, mass, r)?;
    Ok(-pos / r * magnitude)
}

/// Gravitational acceleration at `pos`, m/s^2.
pub fn gravity_accel(planet: &PlanetConfig, pos: &Vector3<f64>) -> Result<Vector3<f64>, ForceError> {
    gravity_force(planet, pos, 1.0)
}

/// Net force handed to the propagation core: thrust plus the inward pull.
pub fn net_force(
    planet: &PlanetConfig,
    pos: &Vector3<f64>,
    mass: f64,
    thrust: &Vector3<f64>,
) -> Result<Vector3<f64>, ForceError> {
    Ok(thrust + gravity_force(planet, pos, mass)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_gravity_is_about_9_8() {
        let p = PlanetConfig::default();
        let a = gravity_accel(&p, &Vector3::new(p.radius_earth, 0.0, 0.0)).unwrap();
        assert!(a.x < 0.0, "gravity must point inward");
        assert!(a.y.abs() < 1e-12 && a.z.abs() < 1e-12);
        assert!((a.norm() - 9.8).abs() / 9.8 < 0.01, "|g| = {}", a.norm());
    }

    #[test]
    fn force_scales_with_mass_and_points_home() {
        let p = PlanetConfig::default();
        let pos = Vector3::new(-2_705_678.0, -4_325_150.0, 3_815_106.0);
        let f = gravity_force(&p, &pos, 1252.0).unwrap();
        let a = gravity_accel(&p, &pos).unwrap();
        assert!((f - a * 1252.0).norm() < 1e-6);
        let cos = f.dot(&pos) / (f.norm() * pos.norm());
        assert!((cos + 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_square_falloff() {
        let p = PlanetConfig::default();
        let g1 = gravity_magnitude(&p, 1.0, p.radius_earth).unwrap();
        let g2 = gravity_magnitude(&p, 1.0, 2.0 * p.radius_earth).unwrap();
        assert!((g1 / g2 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn too_close_is_a_fault_not_nan() {
        let p = PlanetConfig::default();
        assert_eq!(
            gravity_force(&p, &Vector3::zeros(), 1.0),
            Err(ForceError::BelowMinimumRadius { radius: 0.0, min_radius: p.min_radius })
        );
        assert!(gravity_force(&p, &Vector3::new(1000.0, 0.0, 0.0), 1.0).is_err());
        let nan = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(gravity_force(&p, &nan, 1.0).is_err());
    }

    #[test]
    fn net_force_sums_thrust_and_gravity() {
        let p = PlanetConfig::default();
        let pos = Vector3::new(p.radius_earth, 0.0, 0.0);
        let thrust = Vector3::new(100_000.0, 0.0, 0.0);
        let net = net_force(&p, &pos, 1252.0, &thrust).unwrap();
        let weight = gravity_magnitude(&p, 1252.0, p.radius_earth).unwrap();
        assert!((net.x - (100_000.0 - weight)).abs() < 1e-6);
    }
}
