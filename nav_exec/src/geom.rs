//! # Geometry primitives
//!
//! Positions and directions are plain [`nalgebra::Vector2`]s in meters, expressed in the field
//! frame unless stated otherwise. Headings are held as [`Angle`]s, which are always wrapped into
//! (-pi, pi] so that arithmetic on them never produces a discontinuity when crossing the back of
//! the vehicle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::ops::{Add, Neg, Sub};

use nalgebra::Rotation2;
use serde::{Deserialize, Serialize};
use util::maths;

pub use nalgebra::Vector2;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Vectors with a norm at or below this are treated as having no direction.
pub const NORM_EPSILON: f64 = 1e-4;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A planar angle in radians, wrapped into (-pi, pi].
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle(f64);

/// Position and heading of a body in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// Position in the field frame
    pub position_m: Vector2<f64>,

    /// Heading, measured anticlockwise from the field X axis
    pub heading: Angle,
}

/// A circular obstacle in the field frame.
///
/// Obstacles are static for the duration of one navigation cycle, the perception collaborator
/// provides a fresh set every cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObstacleSpec", into = "ObstacleSpec")]
pub struct Obstacle {
    centre_m: Vector2<f64>,
    radius_m: f64,
}

/// Contents of an obstacle file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleFile {
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

/// Flat representation of an obstacle, as found in obstacle files.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x_m: f64,
    pub y_m: f64,
    pub radius_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Angle {
    pub fn from_rad(rad: f64) -> Self {
        Self(maths::wrap_pi(rad))
    }

    pub fn from_deg(deg: f64) -> Self {
        Self::from_rad(deg.to_radians())
    }

    /// The bearing of a vector, i.e. the angle between the X axis and the vector.
    ///
    /// The bearing of a zero vector is zero.
    pub fn bearing(vec: &Vector2<f64>) -> Self {
        Self::from_rad(vec.y.atan2(vec.x))
    }

    pub fn rad(&self) -> f64 {
        self.0
    }

    pub fn deg(&self) -> f64 {
        self.0.to_degrees()
    }

    /// The shortest signed rotation which takes this angle onto `other`.
    pub fn angle_to(&self, other: &Angle) -> Angle {
        Angle(maths::get_ang_dist_pi(self.0, other.0))
    }

    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.0)
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::from_rad(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_rad(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_rad(-self.0)
    }
}

impl From<f64> for Angle {
    fn from(rad: f64) -> Self {
        Angle::from_rad(rad)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading: Angle::from_rad(heading_rad),
        }
    }

    /// Express a field frame vector in this pose's body frame.
    ///
    /// This is a pure rotation by the negative of the heading, the position is not involved, so it
    /// is suitable for velocities and directions.
    pub fn field_to_body(&self, vec_field: &Vector2<f64>) -> Vector2<f64> {
        self.heading.rotation().inverse() * *vec_field
    }

    /// Express a body frame vector in the field frame.
    pub fn body_to_field(&self, vec_body: &Vector2<f64>) -> Vector2<f64> {
        self.heading.rotation() * *vec_body
    }
}

impl Obstacle {
    /// Create a new obstacle, negative radii are treated as zero.
    pub fn new(x_m: f64, y_m: f64, radius_m: f64) -> Self {
        Self {
            centre_m: Vector2::new(x_m, y_m),
            radius_m: radius_m.max(0.0),
        }
    }

    pub fn centre_m(&self) -> &Vector2<f64> {
        &self.centre_m
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

impl From<ObstacleSpec> for Obstacle {
    fn from(spec: ObstacleSpec) -> Self {
        Obstacle::new(spec.x_m, spec.y_m, spec.radius_m)
    }
}

impl From<Obstacle> for ObstacleSpec {
    fn from(obs: Obstacle) -> Self {
        ObstacleSpec {
            x_m: obs.centre_m.x,
            y_m: obs.centre_m.y,
            radius_m: obs.radius_m,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Normalise the vector, or return the zero vector if it's too short to have a direction.
pub fn normalise_or_zero(vec: &Vector2<f64>) -> Vector2<f64> {
    vec.try_normalize(NORM_EPSILON).unwrap_or_else(Vector2::zeros)
}

/// True if the vector is too short to have a meaningful direction.
pub fn is_negligible(vec: &Vector2<f64>) -> bool {
    vec.norm() <= NORM_EPSILON
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_wrap() {
        assert_abs_diff_eq!(Angle::from_deg(270.0).rad(), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(Angle::from_rad(-PI).rad(), PI);

        let a = Angle::from_deg(170.0) + Angle::from_deg(20.0);
        assert_abs_diff_eq!(a.deg(), -170.0, epsilon = 1e-9);

        let a = Angle::from_deg(-170.0) - Angle::from_deg(20.0);
        assert_abs_diff_eq!(a.deg(), 170.0, epsilon = 1e-9);

        assert_abs_diff_eq!((-Angle::from_deg(30.0)).deg(), -30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_angle_to() {
        let from = Angle::from_deg(-170.0);
        let to = Angle::from_deg(170.0);
        assert_abs_diff_eq!(from.angle_to(&to).deg(), -20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(to.angle_to(&from).deg(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bearing() {
        assert_abs_diff_eq!(Angle::bearing(&Vector2::new(0.0, 2.0)).rad(), FRAC_PI_2);
        assert_abs_diff_eq!(Angle::bearing(&Vector2::new(-1.0, 0.0)).rad(), PI);
        assert_eq!(Angle::bearing(&Vector2::zeros()).rad(), 0.0);
    }

    #[test]
    fn test_field_to_body() {
        // Facing along field +Y, a field +Y velocity is straight ahead
        let pose = Pose2::new(3.0, -2.0, FRAC_PI_2);
        let body = pose.field_to_body(&Vector2::new(0.0, 1.5));
        assert_abs_diff_eq!(body, Vector2::new(1.5, 0.0), epsilon = 1e-12);

        // and a field +X velocity is to the right
        let body = pose.field_to_body(&Vector2::new(1.0, 0.0));
        assert_abs_diff_eq!(body, Vector2::new(0.0, -1.0), epsilon = 1e-12);

        let field = pose.body_to_field(&body);
        assert_abs_diff_eq!(field, Vector2::new(1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_normalise_or_zero() {
        let v = normalise_or_zero(&Vector2::new(3.0, 4.0));
        assert_abs_diff_eq!(v, Vector2::new(0.6, 0.8), epsilon = 1e-12);

        assert_eq!(normalise_or_zero(&Vector2::new(5e-5, 0.0)), Vector2::zeros());
        assert!(is_negligible(&Vector2::new(0.0, 1e-5)));
        assert!(!is_negligible(&Vector2::new(0.0, 1e-3)));
    }

    #[test]
    fn test_obstacle_radius() {
        let obs = Obstacle::new(1.0, 1.0, -0.5);
        assert_eq!(obs.radius_m(), 0.0);

        let obs: Obstacle = toml_obstacle("x_m = 1.0\ny_m = 2.0\nradius_m = 0.25");
        assert_eq!(obs.centre_m(), &Vector2::new(1.0, 2.0));
        assert_eq!(obs.radius_m(), 0.25);
    }

    #[test]
    fn test_obstacle_file() {
        let file: ObstacleFile =
            util::params::from_str(include_str!("../../params/obstacles_demo.toml")).unwrap();
        assert_eq!(file.obstacles.len(), 2);
        assert_eq!(file.obstacles[1].centre_m(), &Vector2::new(3.8, -0.9));

        let empty: ObstacleFile = util::params::from_str("").unwrap();
        assert!(empty.obstacles.is_empty());
    }

    fn toml_obstacle(s: &str) -> Obstacle {
        util::params::from_str(s).unwrap()
    }
}
