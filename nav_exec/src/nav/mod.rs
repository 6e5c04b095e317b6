//! # Navigation
//!
//! This module provides the per-cycle navigation decision of the vehicle. Once per control cycle
//! [`NavCtrl`] resolves the target marker, decides which direction to travel in, limits how fast
//! to travel so the vehicle can always stop at the target, and steers the vehicle's heading
//! towards the target.
//!
//! Two steering strategies are available, selected by the `use_grid_search` parameter:
//! - [`PotentialFieldOnly`] - attraction towards the target summed with repulsion away from any
//!   obstacle close to the straight line to the target.
//! - [`GridSearchHybrid`] - an A* search over a small grid anchored at the vehicle gives the first
//!   step of an obstacle-free route, which is then blended with the same repulsion.
//!
//! Heading and translation are decoupled: the vehicle always turns to face the target, even while
//! it translates around an obstacle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod grid_search;
mod heading_ctrl;
mod kin_limit;
mod nav_ctrl;
mod params;
mod potential_field;
mod steering;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use grid_search::*;
pub use heading_ctrl::*;
pub use kin_limit::*;
pub use nav_ctrl::*;
pub use params::{NavCtrlParams, MAX_SEARCH_ITERS};
pub use potential_field::*;
pub use steering::*;

use crate::field::FieldLayoutError;
use util::params::LoadError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Distance to the target under which the vehicle is considered to have arrived.
pub const ARRIVAL_EPSILON_M: f64 = 1e-3;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Invalid navigation parameter `{name}` = {value}: {reason}")]
    InvalidParam {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Could not load the navigation parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Could not load the field layout: {0}")]
    FieldLayoutError(FieldLayoutError),
}
