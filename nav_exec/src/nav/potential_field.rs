//! # Potential field
//!
//! Obstacles close to the straight segment between the vehicle and the target push the vehicle
//! away from them. Each obstacle's influence is measured from the closest point on the segment, not
//! from the vehicle, so an obstacle only matters if the vehicle's path would pass near it, and an
//! obstacle behind the vehicle or beyond the target is measured from the segment's end points.
//!
//! The repulsion falls off linearly with distance from the obstacle centre, reaching zero at the
//! edge of the influence region (the obstacle radius plus the influence margin).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;
use util::maths;

use crate::geom::{normalise_or_zero, Obstacle, NORM_EPSILON};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Segments with a squared length below this can't be projected onto.
const SEGMENT_NORM_SQ_EPSILON: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PotentialField {
    /// Margin beyond each obstacle's radius over which it has influence.
    influence_m: f64,

    /// Repulsion strength.
    repulsion_gain: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PotentialField {
    pub fn new(influence_m: f64, repulsion_gain: f64) -> Self {
        Self {
            influence_m,
            repulsion_gain,
        }
    }

    /// Unit vector towards the target, or zero if the target is on top of the vehicle.
    pub fn attraction(&self, to_target: &Vector2<f64>) -> Vector2<f64> {
        normalise_or_zero(to_target)
    }

    /// Total repulsion from all obstacles for the segment starting at `position_m` and running
    /// along `line_to_target_m`.
    ///
    /// The result is a sum of forces and is not normalised.
    pub fn repulsion(
        &self,
        position_m: &Vector2<f64>,
        line_to_target_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> Vector2<f64> {
        obstacles
            .iter()
            .filter_map(|obs| self.obstacle_repulsion(position_m, line_to_target_m, obs))
            .fold(Vector2::zeros(), |acc, force| acc + force)
    }

    /// Repulsion from a single obstacle, `None` if the obstacle has no influence on the segment.
    pub fn obstacle_repulsion(
        &self,
        position_m: &Vector2<f64>,
        line_to_target_m: &Vector2<f64>,
        obstacle: &Obstacle,
    ) -> Option<Vector2<f64>> {
        let line_norm_sq = line_to_target_m.norm_squared();
        if line_norm_sq < SEGMENT_NORM_SQ_EPSILON {
            return None;
        }

        // Closest point on the segment to the obstacle centre
        let obs_vec = obstacle.centre_m() - position_m;
        let proj = maths::clamp(obs_vec.dot(line_to_target_m) / line_norm_sq, 0.0, 1.0);
        let closest_m = position_m + line_to_target_m * proj;

        let dist_m = (obstacle.centre_m() - closest_m).norm();
        let influence_radius_m = obstacle.radius_m() + self.influence_m;

        if !(dist_m < influence_radius_m) {
            return None;
        }

        let strength = self.repulsion_gain * (influence_radius_m - dist_m) / influence_radius_m;

        // An obstacle centred exactly on the segment has no "away" direction
        (closest_m - obstacle.centre_m())
            .try_normalize(NORM_EPSILON)
            .map(|away| away * strength)
    }
}
