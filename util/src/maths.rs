//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Clamp a value into the range `[min, max]`.
///
/// Unlike `f64::clamp` this does not panic when `min > max`, the upper bound wins.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret < min {
        ret = min
    }
    if ret > max {
        ret = max
    }

    ret
}

/// Wrap an angle in radians into the range (-pi, pi].
///
/// -pi and +pi are the same heading, +pi is chosen so that the range is half open.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + FloatConst,
{
    let pi_t = T::PI();
    let tau_t = pi_t + pi_t;

    // pi - angle mapped into [0, 2pi) gives (pi - result) in (-pi, pi]
    let r = rem_euclid(pi_t - angle, tau_t);

    // rem_euclid can round up to exactly tau, which would land on -pi
    if r >= tau_t {
        pi_t
    } else {
        pi_t - r
    }
}

/// Get the signed shortest angular distance from `a` to `b`, in the range (-pi, pi].
///
/// Positive values are anticlockwise rotations (right hand rule about Z).
pub fn get_ang_dist_pi<T>(a: T, b: T) -> T
where
    T: Float + FloatConst,
{
    wrap_pi(b - a)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_wrap_pi() {
        assert_abs_diff_eq!(wrap_pi(0f64), 0f64);
        assert_abs_diff_eq!(wrap_pi(PI), PI);
        assert_abs_diff_eq!(wrap_pi(-PI), PI);
        assert_abs_diff_eq!(wrap_pi(TAU), 0f64, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_pi(3.0 * FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_pi(-3.0 * FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_pi(5.0 * TAU + 1.0), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_get_ang_dist_pi() {
        assert_abs_diff_eq!(get_ang_dist_pi(1f64, 2f64), 1f64, epsilon = 1e-12);
        assert_abs_diff_eq!(get_ang_dist_pi(2f64, 1f64), -1f64, epsilon = 1e-12);

        // Shortest rotation across the wrap boundary is small
        let d = get_ang_dist_pi(3.13f64, -3.13f64);
        assert_abs_diff_eq!(d, TAU - 6.26, epsilon = 1e-12);
        let d = get_ang_dist_pi(-3.13f64, 3.13f64);
        assert_abs_diff_eq!(d, -(TAU - 6.26), epsilon = 1e-12);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f64, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5f64, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.5f64, -1.0, 1.0), 0.5);
    }
}
