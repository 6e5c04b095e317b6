//! # Simulated vehicle
//!
//! A kinematic stand-in for the real drive train, used to close the loop around the navigator when
//! no hardware is attached. The commanded body velocity is tracked with a first-order lag and then
//! integrated into the field pose. There is no slip, no acceleration limit and no collision
//! checking, obstacles are only something the navigator reacts to.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use comms_if::eqpt::drive::VelocityCmd;

use crate::geom::{Angle, Pose2, Vector2};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated vehicle state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimVehicle {
    pose: Pose2,

    /// Current velocity, in the body frame
    vel: VelocityCmd,

    /// Time constant of the velocity response, zero for an instant response.
    ///
    /// Units: seconds
    response_time_s: f64,

    /// Distance travelled since the start.
    ///
    /// Units: meters
    odometer_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimVehicle {
    pub fn new(pose: Pose2, response_time_s: f64) -> Self {
        Self {
            pose,
            vel: VelocityCmd::zero(),
            response_time_s: response_time_s.max(0.0),
            odometer_m: 0.0,
        }
    }

    pub fn pose(&self) -> &Pose2 {
        &self.pose
    }

    pub fn vel(&self) -> &VelocityCmd {
        &self.vel
    }

    pub fn odometer_m(&self) -> f64 {
        self.odometer_m
    }

    /// Advance the simulation by `dt_s` while executing `cmd`.
    pub fn step(&mut self, cmd: &VelocityCmd, dt_s: f64) {
        if dt_s <= 0.0 {
            return;
        }

        // Fraction of the way the velocity moves towards the demand this step
        let alpha = if self.response_time_s > 0.0 {
            1.0 - (-dt_s / self.response_time_s).exp()
        } else {
            1.0
        };

        self.vel = VelocityCmd::new(
            self.vel.vx_ms + alpha * (cmd.vx_ms - self.vel.vx_ms),
            self.vel.vy_ms + alpha * (cmd.vy_ms - self.vel.vy_ms),
            self.vel.omega_rads + alpha * (cmd.omega_rads - self.vel.omega_rads),
        );

        let vel_field_ms = self
            .pose
            .body_to_field(&Vector2::new(self.vel.vx_ms, self.vel.vy_ms));

        self.pose.position_m += vel_field_ms * dt_s;
        self.pose.heading = self.pose.heading + Angle::from_rad(self.vel.omega_rads * dt_s);
        self.odometer_m += vel_field_ms.norm() * dt_s;
    }
}
