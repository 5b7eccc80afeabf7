//! Angle and spherical-coordinate helpers

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

/// Wrap an angle in radians into `[0, 2π)`.
///
/// Repeats rather than clamps, so an orbit can pass continuously through the pole.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Offset from an orbit target for the given angles and radius
pub fn orbit_offset(horizontal: f32, vertical: f32, radius: f32) -> Vec3 {
    Vec3::new(
        horizontal.sin() * vertical.cos(),
        vertical.sin(),
        horizontal.cos() * vertical.cos(),
    ) * radius
}

/// Up vector for an orbit camera at the given vertical angle.
///
/// Points down while the camera is past the pole, i.e. for angles strictly
/// between π/2 and 3π/2.
pub fn orbit_up(vertical: f32) -> Vec3 {
    if vertical > FRAC_PI_2 && vertical < 3.0 * FRAC_PI_2 {
        Vec3::NEG_Y
    } else {
        Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle_range() {
        for angle in [-1.0e-8, -TAU, -100.0, 0.0, TAU, 7.5, 1.0e6, -3.3e5] {
            let wrapped = wrap_angle(angle);
            assert!((0.0..TAU).contains(&wrapped), "{angle} wrapped to {wrapped}");
        }
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-1.0) - (TAU - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_offset() {
        let offset = orbit_offset(0.0, 0.0, 20.0);
        assert!(offset.abs_diff_eq(Vec3::new(0.0, 0.0, 20.0), 1e-4));

        let offset = orbit_offset(FRAC_PI_2, 0.0, 20.0);
        assert!(offset.abs_diff_eq(Vec3::new(20.0, 0.0, 0.0), 1e-4));

        let offset = orbit_offset(0.0, FRAC_PI_2, 10.0);
        assert!(offset.abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), 1e-4));
    }

    #[test]
    fn test_orbit_up_flips_past_pole() {
        assert_eq!(orbit_up(0.0), Vec3::Y);
        assert_eq!(orbit_up(FRAC_PI_2), Vec3::Y);
        assert_eq!(orbit_up(FRAC_PI_2 + 0.01), Vec3::NEG_Y);
        assert_eq!(orbit_up(PI), Vec3::NEG_Y);
        assert_eq!(orbit_up(3.0 * FRAC_PI_2 - 0.01), Vec3::NEG_Y);
        assert_eq!(orbit_up(3.0 * FRAC_PI_2), Vec3::Y);
        assert_eq!(orbit_up(TAU - 0.01), Vec3::Y);
    }
}
