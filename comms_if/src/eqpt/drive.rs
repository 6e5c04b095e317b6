//! # Drive Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Velocity demand sent to the motion control layer.
///
/// Linear components are in the vehicle body frame, X forwards and Y to the left. The zero command
/// is the safe default and is what the navigator outputs whenever it has nothing to do.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityCmd {
    /// Forward speed in meters/second.
    pub vx_ms: f64,

    /// Leftward speed in meters/second.
    pub vy_ms: f64,

    /// Turn rate in radians/second, positive anticlockwise (right hand rule about Z+).
    pub omega_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VelocityCmd {
    pub fn new(vx_ms: f64, vy_ms: f64, omega_rads: f64) -> Self {
        Self {
            vx_ms,
            vy_ms,
            omega_rads,
        }
    }

    /// The all-zero command.
    pub fn zero() -> Self {
        Self::default()
    }

    /// True if every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.vx_ms == 0.0 && self.vy_ms == 0.0 && self.omega_rads == 0.0
    }

    /// Magnitude of the linear part of the command.
    pub fn speed_ms(&self) -> f64 {
        self.vx_ms.hypot(self.vy_ms)
    }
}
