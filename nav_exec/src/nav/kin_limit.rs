//! # Kinematic limiter
//!
//! Works out how hard the vehicle can accelerate (or brake) without sliding or tipping over, and
//! from that the fastest speed from which it can still stop at the target.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use super::NavCtrlParams;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Units: meters/second^2
pub const GRAVITY_MSS: f64 = 9.81;

/// Lowest centre of mass height used in the tip over limit.
///
/// Units: meters
const MIN_COM_HEIGHT_M: f64 = 1e-3;

/// Vehicles heavier than this have their acceleration derated in proportion to their mass.
///
/// Units: kilograms
const MASS_DERATE_REF_KG: f64 = 50.0;

/// The acceleration limit is never lower than this, so that the vehicle can always move.
///
/// Units: meters/second^2
const MIN_ACCEL_MSS: f64 = 0.5;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Kinematic speed limiter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KinLimiter {
    /// Units: meters/second
    max_speed_ms: f64,

    /// Units: meters/second^2
    max_accel_mss: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl KinLimiter {
    /// Create a new limiter, the acceleration limit is worked out once here.
    pub fn new(params: &NavCtrlParams) -> Self {
        Self {
            max_speed_ms: params.max_speed_ms,
            max_accel_mss: max_acceleration(params),
        }
    }

    /// Maximum linear acceleration.
    ///
    /// Units: meters/second^2
    pub fn max_accel_mss(&self) -> f64 {
        self.max_accel_mss
    }

    /// Highest speed the vehicle may travel at with `dist_m` left to go.
    ///
    /// This is the braking distance law `v = sqrt(2 a d)` capped at the maximum speed.
    pub fn speed_cap(&self, dist_m: f64) -> f64 {
        let braking_ms = (2.0 * self.max_accel_mss * dist_m).max(0.0).sqrt();

        self.max_speed_ms.min(braking_ms)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Maximum linear acceleration of the vehicle described by the parameters.
///
/// The lower of the friction limit (`mu g`) and the tip over limit (`g * half_base / com_height`,
/// using the narrower of the track and wheelbase) is derated for vehicles heavier than 50 kg, then
/// floored at 0.5 m/s^2.
///
/// Units: meters/second^2
pub fn max_acceleration(params: &NavCtrlParams) -> f64 {
    let friction_mss = params.friction_coeff * GRAVITY_MSS;

    let half_base_m = (0.5 * params.track_width_m).min(0.5 * params.wheelbase_m);
    let tip_mss = GRAVITY_MSS * half_base_m / params.com_height_m.max(MIN_COM_HEIGHT_M);

    let derate = (params.mass_kg / MASS_DERATE_REF_KG).max(1.0);

    (friction_mss.min(tip_mss) / derate).max(MIN_ACCEL_MSS)
}
