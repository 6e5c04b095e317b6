//! # Navigation library.
//!
//! This library provides the per-cycle navigation decision core: given the vehicle's pose, the ID
//! of a target marker and the obstacles currently seen, it produces the velocity command which
//! drives the vehicle towards the marker.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Geometry primitives - poses, angles and obstacles in the field frame
pub mod geom;

/// Field layout - the registry of known marker positions on the field
pub mod field;

/// Navigation module - steering, limiting and heading control
pub mod nav;

/// Simulated vehicle - kinematic model used to close the loop in the demonstration executable
pub mod sim_vehicle;
