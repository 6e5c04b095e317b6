//! # Heading controller
//!
//! A proportional controller on the wrapped heading error. The error is always the shortest
//! rotation between the current and desired heading, so a desired heading just across the +/-pi
//! boundary gives a small error rather than one of nearly a full turn.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use util::maths;

use crate::geom::Angle;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Heading controller.
///
/// Holds no state between cycles, the output depends only on the two headings passed in.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HeadingCtrl {
    /// Proportional gain
    k_p: f64,

    /// Output limit, the demand is saturated to +/- this value
    max_omega_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl HeadingCtrl {
    pub fn new(k_p: f64, max_omega_rads: f64) -> Self {
        Self {
            k_p,
            max_omega_rads: max_omega_rads.abs(),
        }
    }

    /// Heading error, positive if the vehicle must turn anticlockwise to reach the desired heading.
    pub fn get_error(&self, current: Angle, desired: Angle) -> Angle {
        current.angle_to(&desired)
    }

    /// Get the turn rate demand which drives the current heading onto the desired heading.
    pub fn get_rate(&self, current: Angle, desired: Angle) -> f64 {
        let error_rad = self.get_error(current, desired).rad();

        maths::clamp(
            self.k_p * error_rad,
            -self.max_omega_rads,
            self.max_omega_rads,
        )
    }

    pub fn max_omega_rads(&self) -> f64 {
        self.max_omega_rads
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_proportional() {
        let ctrl = HeadingCtrl::new(2.0, 10.0);

        let rate = ctrl.get_rate(Angle::from_rad(0.0), Angle::from_rad(0.5));
        assert_abs_diff_eq!(rate, 1.0, epsilon = 1e-12);

        let rate = ctrl.get_rate(Angle::from_rad(0.5), Angle::from_rad(0.0));
        assert_abs_diff_eq!(rate, -1.0, epsilon = 1e-12);

        assert_eq!(ctrl.get_rate(Angle::from_rad(1.0), Angle::from_rad(1.0)), 0.0);
    }

    #[test]
    fn test_saturation() {
        let ctrl = HeadingCtrl::new(5.0, 1.5);

        assert_eq!(ctrl.get_rate(Angle::from_rad(0.0), Angle::from_rad(2.0)), 1.5);
        assert_eq!(ctrl.get_rate(Angle::from_rad(0.0), Angle::from_rad(-2.0)), -1.5);

        // Output is always within the limits, whatever the input
        let mut a = -PI;
        while a < PI {
            let rate = ctrl.get_rate(Angle::from_rad(a), Angle::from_rad(-a * 3.0));
            assert!(rate.abs() <= 1.5);
            a += 0.05;
        }
    }

    #[test]
    fn test_wrap_boundary() {
        let ctrl = HeadingCtrl::new(1.0, 10.0);

        // Desired just across the boundary is a small anticlockwise turn, not nearly a full turn
        let rate = ctrl.get_rate(Angle::from_rad(3.13), Angle::from_rad(-3.13));
        assert!(rate > 0.0);
        assert_abs_diff_eq!(rate, 2.0 * PI - 6.26, epsilon = 1e-9);

        let rate = ctrl.get_rate(Angle::from_rad(-3.13), Angle::from_rad(3.13));
        assert_abs_diff_eq!(rate, -(2.0 * PI - 6.26), epsilon = 1e-9);

        // Sweeping the desired heading across the boundary gives a continuous output
        let current = Angle::from_rad(PI - 0.1);
        let mut prev = ctrl.get_rate(current, Angle::from_rad(PI - 0.2));
        let mut d = PI - 0.2;
        while d < PI + 0.2 {
            d += 0.01;
            let rate = ctrl.get_rate(current, Angle::from_rad(d));
            assert!((rate - prev).abs() < 0.02);
            prev = rate;
        }
    }
}
