//! # Steering strategies
//!
//! A steering strategy decides which way the vehicle should translate this cycle. It returns a
//! unit direction in the field frame, or the zero vector if there is no sensible direction (the
//! attraction and repulsion cancel out). How fast to go along that direction is decided by the
//! kinematic limiter, not the strategy.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Debug;

use nalgebra::Vector2;
use serde::Serialize;

use super::{GridSearch, NavCtrlParams, PotentialField, SearchReport};
use crate::geom::{normalise_or_zero, Obstacle};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Chooses the direction of travel for one cycle.
pub trait SteeringStrategy: Debug + Send + Sync {
    /// Get the direction of travel from `position_m` towards `target_m`.
    ///
    /// `position_m` and `target_m` are never closer than the arrival distance.
    fn steer(
        &self,
        position_m: &Vector2<f64>,
        target_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> SteeringOutput;

    /// Short name for the strategy, used in logs and status reports.
    fn name(&self) -> &'static str;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Output of a steering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteeringOutput {
    /// Unit direction in the field frame, or zero.
    pub direction: Vector2<f64>,

    /// Outcome of the grid search, if one was run.
    pub search: Option<SearchReport>,
}

/// Attraction towards the target plus repulsion from obstacles near the straight line to it.
///
/// Can settle into a local minimum where the two cancel, e.g. directly behind an obstacle which
/// sits symmetrically across the line. The vehicle then stops translating but keeps turning to face
/// the target.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PotentialFieldOnly {
    field: PotentialField,
}

/// First step of an A* route, blended with the potential field repulsion.
///
/// Falls back to the potential field when no route is found within the search budget.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridSearchHybrid {
    field: PotentialField,
    search: GridSearch,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PotentialFieldOnly {
    pub fn new(field: PotentialField) -> Self {
        Self { field }
    }
}

impl SteeringStrategy for PotentialFieldOnly {
    fn steer(
        &self,
        position_m: &Vector2<f64>,
        target_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> SteeringOutput {
        let to_target = target_m - position_m;

        let attraction = self.field.attraction(&to_target);
        let repulsion = self.field.repulsion(position_m, &to_target, obstacles);

        SteeringOutput {
            direction: normalise_or_zero(&(attraction + repulsion)),
            search: None,
        }
    }

    fn name(&self) -> &'static str {
        "potential_field"
    }
}

impl GridSearchHybrid {
    pub fn new(field: PotentialField, search: GridSearch) -> Self {
        Self { field, search }
    }
}

impl SteeringStrategy for GridSearchHybrid {
    fn steer(
        &self,
        position_m: &Vector2<f64>,
        target_m: &Vector2<f64>,
        obstacles: &[Obstacle],
    ) -> SteeringOutput {
        let to_target = target_m - position_m;
        let repulsion = self.field.repulsion(position_m, &to_target, obstacles);

        let (direction, report) = self
            .search
            .compute_direction(position_m, target_m, obstacles, &repulsion);

        SteeringOutput {
            direction,
            search: Some(report),
        }
    }

    fn name(&self) -> &'static str {
        "grid_search"
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the steering strategy selected by the parameters.
pub fn strategy_from_params(params: &NavCtrlParams) -> Box<dyn SteeringStrategy> {
    let field = PotentialField::new(params.obstacle_influence_m, params.obstacle_repulsion_gain);

    if params.use_grid_search {
        Box::new(GridSearchHybrid::new(
            field,
            GridSearch::new(
                params.grid_resolution_m,
                params.max_search_iters,
                params.obstacle_influence_m,
            ),
        ))
    } else {
        Box::new(PotentialFieldOnly::new(field))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nav::GridCell;
    use approx::assert_abs_diff_eq;

    fn field() -> PotentialField {
        PotentialField::new(0.5, 2.0)
    }

    #[test]
    fn test_pure_attraction() {
        let strategy = PotentialFieldOnly::new(field());
        let out = strategy.steer(&Vector2::new(1.0, 1.0), &Vector2::new(4.0, 5.0), &[]);

        assert_abs_diff_eq!(out.direction, Vector2::new(0.6, 0.8), epsilon = 1e-12);
        assert_eq!(out.search, None);
    }

    #[test]
    fn test_deflected_by_obstacle() {
        let strategy = PotentialFieldOnly::new(field());

        // Obstacle just above the line, so the vehicle is pushed below it
        let obstacles = [Obstacle::new(2.0, 0.2, 0.2)];
        let out = strategy.steer(&Vector2::zeros(), &Vector2::new(5.0, 0.0), &obstacles);

        assert_abs_diff_eq!(out.direction.norm(), 1.0, epsilon = 1e-12);
        assert!(out.direction.x > 0.0);
        assert!(out.direction.y < 0.0);
    }

    #[test]
    fn test_local_minimum() {
        let strategy = PotentialFieldOnly::new(PotentialField::new(1.0, 2.0));

        // A point obstacle just beyond the target pushes back along the line with unit strength,
        // exactly cancelling the attraction
        let obstacles = [Obstacle::new(1.5, 0.0, 0.0)];
        let out = strategy.steer(&Vector2::zeros(), &Vector2::new(1.0, 0.0), &obstacles);
        assert_eq!(out.direction, Vector2::zeros());
    }

    #[test]
    fn test_obstacle_on_line() {
        let strategy = PotentialFieldOnly::new(field());

        // No defined direction away from an obstacle centred on the line, so no deflection
        let obstacles = [Obstacle::new(-0.5, 0.0, 0.5)];
        let out = strategy.steer(&Vector2::zeros(), &Vector2::new(-5.0, 0.0), &obstacles);
        assert_abs_diff_eq!(out.direction, Vector2::new(-1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_hybrid_reports_search() {
        let strategy = GridSearchHybrid::new(field(), GridSearch::new(0.3, 400, 0.5));
        let out = strategy.steer(&Vector2::zeros(), &Vector2::new(3.0, 0.0), &[]);

        assert_abs_diff_eq!(out.direction, Vector2::new(1.0, 0.0), epsilon = 1e-12);

        let report = out.search.unwrap();
        assert!(report.goal_reached);
        assert_eq!(report.first_step, Some(GridCell::new(1, 0)));
    }

    #[test]
    fn test_strategy_from_params() {
        let params = NavCtrlParams::default();
        assert_eq!(strategy_from_params(&params).name(), "grid_search");

        let params = NavCtrlParams {
            use_grid_search: false,
            ..Default::default()
        };
        assert_eq!(strategy_from_params(&params).name(), "potential_field");
    }
}
