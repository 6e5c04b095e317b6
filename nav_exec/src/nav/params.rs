//! Navigation control parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::NavError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Largest accepted grid search budget.
///
/// Popping this many cells takes a few tens of milliseconds, about one control cycle.
pub const MAX_SEARCH_ITERS: usize = 20_000;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for navigation control.
///
/// Fixed once the navigator is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavCtrlParams {
    // ---- LIMITS ----
    /// Maximum linear speed demand.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Maximum turn rate demand.
    ///
    /// Units: radians/second
    pub max_omega_rads: f64,

    // ---- HEADING CONTROL ----
    /// Heading controller proportional gain.
    pub head_k_p: f64,

    // ---- OBSTACLE AVOIDANCE ----
    /// Margin beyond an obstacle's radius over which it repels the vehicle.
    ///
    /// Grid cells within half this margin of an obstacle's surface are blocked.
    ///
    /// Units: meters
    pub obstacle_influence_m: f64,

    /// Strength of the repulsion from an obstacle.
    pub obstacle_repulsion_gain: f64,

    // ---- VEHICLE ----
    /// Units: kilograms
    pub mass_kg: f64,

    /// Height of the centre of mass above the ground.
    ///
    /// Units: meters
    pub com_height_m: f64,

    /// Units: meters
    pub track_width_m: f64,

    /// Units: meters
    pub wheelbase_m: f64,

    /// Coefficient of friction between tyres and ground.
    pub friction_coeff: f64,

    // ---- GRID SEARCH ----
    /// Use the grid search hybrid steering strategy instead of the pure potential field.
    #[serde(default = "default_use_grid_search")]
    pub use_grid_search: bool,

    /// Size of one search grid cell.
    ///
    /// Units: meters
    #[serde(default = "default_grid_resolution_m")]
    pub grid_resolution_m: f64,

    /// Maximum number of cells popped from the open set in one search, at most
    /// [`MAX_SEARCH_ITERS`].
    #[serde(default = "default_max_search_iters")]
    pub max_search_iters: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavCtrlParams {
    /// Check the parameters are usable, so that nothing has to be checked inside the control loop.
    pub fn validate(&self) -> Result<(), NavError> {
        positive("max_speed_ms", self.max_speed_ms)?;
        positive("max_omega_rads", self.max_omega_rads)?;
        positive("grid_resolution_m", self.grid_resolution_m)?;

        non_negative("head_k_p", self.head_k_p)?;
        non_negative("obstacle_influence_m", self.obstacle_influence_m)?;
        non_negative("obstacle_repulsion_gain", self.obstacle_repulsion_gain)?;
        non_negative("mass_kg", self.mass_kg)?;
        non_negative("com_height_m", self.com_height_m)?;
        non_negative("track_width_m", self.track_width_m)?;
        non_negative("wheelbase_m", self.wheelbase_m)?;
        non_negative("friction_coeff", self.friction_coeff)?;

        if self.use_grid_search && self.max_search_iters == 0 {
            return Err(NavError::InvalidParam {
                name: "max_search_iters",
                value: 0.0,
                reason: "must be at least 1 when grid search is enabled",
            });
        }

        if self.max_search_iters > MAX_SEARCH_ITERS {
            return Err(NavError::InvalidParam {
                name: "max_search_iters",
                value: self.max_search_iters as f64,
                reason: "must not exceed MAX_SEARCH_ITERS",
            });
        }

        Ok(())
    }
}

impl Default for NavCtrlParams {
    fn default() -> Self {
        Self {
            max_speed_ms: 2.0,
            max_omega_rads: 3.0,
            head_k_p: 2.5,
            obstacle_influence_m: 0.6,
            obstacle_repulsion_gain: 1.5,
            mass_kg: 45.0,
            com_height_m: 0.25,
            track_width_m: 0.55,
            wheelbase_m: 0.55,
            friction_coeff: 0.9,
            use_grid_search: default_use_grid_search(),
            grid_resolution_m: default_grid_resolution_m(),
            max_search_iters: default_max_search_iters(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_use_grid_search() -> bool {
    true
}

fn default_grid_resolution_m() -> f64 {
    0.3
}

fn default_max_search_iters() -> usize {
    400
}

fn positive(name: &'static str, value: f64) -> Result<(), NavError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavError::InvalidParam {
            name,
            value,
            reason: "must be finite and greater than zero",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), NavError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NavError::InvalidParam {
            name,
            value,
            reason: "must be finite and not negative",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static DEFAULT_PARAMS: &str = include_str!("../../../params/nav_ctrl.toml");

    #[test]
    fn test_default_params_file() {
        let params: NavCtrlParams = util::params::from_str(DEFAULT_PARAMS).unwrap();
        params.validate().unwrap();
        assert!(params.use_grid_search);
        assert_eq!(params.max_search_iters, 400);
    }

    #[test]
    fn test_serde_defaults() {
        let params: NavCtrlParams = util::params::from_str(
            r#"
            max_speed_ms = 1.0
            max_omega_rads = 1.0
            head_k_p = 1.0
            obstacle_influence_m = 0.5
            obstacle_repulsion_gain = 1.0
            mass_kg = 20.0
            com_height_m = 0.2
            track_width_m = 0.4
            wheelbase_m = 0.4
            friction_coeff = 0.8
            "#,
        )
        .unwrap();

        assert!(params.use_grid_search);
        assert_eq!(params.grid_resolution_m, 0.3);
        assert_eq!(params.max_search_iters, 400);
    }

    #[test]
    fn test_invalid_params() {
        NavCtrlParams::default().validate().unwrap();

        let params = NavCtrlParams {
            grid_resolution_m: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(NavError::InvalidParam {
                name: "grid_resolution_m",
                ..
            })
        ));

        let params = NavCtrlParams {
            max_speed_ms: -1.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = NavCtrlParams {
            max_omega_rads: std::f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = NavCtrlParams {
            max_search_iters: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        // No search budget is fine if the search is never run
        let params = NavCtrlParams {
            max_search_iters: 0,
            use_grid_search: false,
            ..Default::default()
        };
        params.validate().unwrap();

        let params = NavCtrlParams {
            max_search_iters: MAX_SEARCH_ITERS,
            ..Default::default()
        };
        params.validate().unwrap();

        for &iters in &[MAX_SEARCH_ITERS + 1, std::usize::MAX / 2] {
            let params = NavCtrlParams {
                max_search_iters: iters,
                ..Default::default()
            };
            assert!(matches!(
                params.validate(),
                Err(NavError::InvalidParam {
                    name: "max_search_iters",
                    ..
                })
            ));
        }
    }
}
