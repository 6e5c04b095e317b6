//! # Navigation controller
//!
//! Ties the target registry, steering strategy, kinematic limiter and heading controller together
//! into the once-per-cycle navigation decision.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};
use serde::Serialize;

use comms_if::eqpt::drive::VelocityCmd;
use util::{module::State, params, session::Session};

use super::{
    strategy_from_params, HeadingCtrl, KinLimiter, NavCtrlParams, NavError, SearchReport,
    SteeringStrategy, ARRIVAL_EPSILON_M,
};
use crate::field::{FieldLayout, TargetRegistry};
use crate::geom::{Angle, Obstacle, Pose2};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Navigation controller.
///
/// Configuration is fixed at construction. Calls to [`NavCtrl::update`] hold no state between
/// them, so the same inputs always give the same command.
#[derive(Debug)]
pub struct NavCtrl<R: TargetRegistry = FieldLayout> {
    params: NavCtrlParams,

    registry: R,

    steering: Box<dyn SteeringStrategy>,

    heading_ctrl: HeadingCtrl,

    kin_limiter: KinLimiter,
}

/// Paths to the files needed to initialise the controller, relative to the params directory.
#[derive(Debug, Clone, Copy)]
pub struct InitData {
    pub params_path: &'static str,
    pub field_layout_path: &'static str,
}

/// Input data to the navigation controller.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Current pose of the vehicle in the field frame.
    pub pose: Pose2,

    /// The marker to drive to, or `None` to stay put.
    pub target_marker_id: Option<u32>,

    /// Obstacles detected this cycle.
    pub obstacles: Vec<Obstacle>,
}

/// Status report for one navigation cycle.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// True if the target marker was found in the registry.
    pub target_resolved: bool,

    /// True if the vehicle is within the arrival distance of the target.
    pub arrived: bool,

    /// Units: meters
    pub dist_to_target_m: f64,

    /// Units: meters/second
    pub speed_cap_ms: f64,

    pub desired_heading_rad: f64,

    pub heading_error_rad: f64,

    /// Outcome of the grid search, `None` if no search was run this cycle.
    pub search: Option<SearchReport>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<R: TargetRegistry> NavCtrl<R> {
    /// Create a new controller, checking the parameters first.
    pub fn new(params: NavCtrlParams, registry: R) -> Result<Self, NavError> {
        params.validate()?;

        Ok(Self::new_unchecked(params, registry))
    }

    fn new_unchecked(params: NavCtrlParams, registry: R) -> Self {
        let steering = strategy_from_params(&params);
        let heading_ctrl = HeadingCtrl::new(params.head_k_p, params.max_omega_rads);
        let kin_limiter = KinLimiter::new(&params);

        debug!(
            "NavCtrl using {} steering, max acceleration {:.3} m/s^2",
            steering.name(),
            kin_limiter.max_accel_mss()
        );

        Self {
            params,
            registry,
            steering,
            heading_ctrl,
            kin_limiter,
        }
    }

    /// Compute the velocity command to drive towards the given marker.
    ///
    /// Returns the zero command if the marker is unknown or the vehicle has already arrived.
    pub fn update(
        &self,
        pose: &Pose2,
        target_marker_id: u32,
        obstacles: &[Obstacle],
    ) -> VelocityCmd {
        self.update_with_report(pose, target_marker_id, obstacles).0
    }

    /// As [`NavCtrl::update`] but also returns a report on how the command was reached.
    pub fn update_with_report(
        &self,
        pose: &Pose2,
        target_marker_id: u32,
        obstacles: &[Obstacle],
    ) -> (VelocityCmd, StatusReport) {
        let mut report = StatusReport::default();

        // ---- TARGET ----

        let target = match self.registry.target_pose(target_marker_id) {
            Some(t) => t,
            None => {
                debug!("Target marker {} is not in the registry", target_marker_id);
                return (VelocityCmd::zero(), report);
            }
        };
        report.target_resolved = true;

        let to_target = target.position_m - pose.position_m;
        report.dist_to_target_m = to_target.norm();

        if report.dist_to_target_m < ARRIVAL_EPSILON_M {
            trace!("Arrived at marker {}", target_marker_id);
            report.arrived = true;
            return (VelocityCmd::zero(), report);
        }

        // ---- TRANSLATION ----

        let steering = self
            .steering
            .steer(&pose.position_m, &target.position_m, obstacles);
        report.search = steering.search;

        if let Some(ref s) = steering.search {
            if !s.goal_reached {
                debug!(
                    "Grid search to marker {} exhausted after {} iterations, using potential field",
                    target_marker_id, s.num_iters
                );
            }
        }

        report.speed_cap_ms = self.kin_limiter.speed_cap(report.dist_to_target_m);
        let vel_field_ms = steering.direction * report.speed_cap_ms;

        // ---- HEADING ----

        // Always face the target, regardless of which way the steering sends the vehicle
        let desired_heading = Angle::bearing(&to_target);
        let omega_rads = self.heading_ctrl.get_rate(pose.heading, desired_heading);

        report.desired_heading_rad = desired_heading.rad();
        report.heading_error_rad = self
            .heading_ctrl
            .get_error(pose.heading, desired_heading)
            .rad();

        // ---- OUTPUT ----

        let vel_body_ms = pose.field_to_body(&vel_field_ms);
        let cmd = VelocityCmd::new(vel_body_ms.x, vel_body_ms.y, omega_rads);

        trace!(
            "NavCtrl to marker {}: dist = {:.3} m, cap = {:.3} m/s, cmd = {:?}",
            target_marker_id,
            report.dist_to_target_m,
            report.speed_cap_ms,
            cmd
        );

        (cmd, report)
    }

    pub fn params(&self) -> &NavCtrlParams {
        &self.params
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Name of the steering strategy in use.
    pub fn strategy_name(&self) -> &'static str {
        self.steering.name()
    }
}

impl Default for NavCtrl<FieldLayout> {
    /// A controller with the default parameters and no known markers.
    fn default() -> Self {
        Self::new_unchecked(NavCtrlParams::default(), FieldLayout::new())
    }
}

impl State for NavCtrl<FieldLayout> {
    type InitData = InitData;
    type InitError = NavError;

    type InputData = InputData;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = NavError;

    /// Initialise the controller from the parameter and field layout files.
    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: NavCtrlParams =
            params::load(init_data.params_path).map_err(NavError::ParamLoadError)?;

        let layout = FieldLayout::from_file(init_data.field_layout_path)
            .map_err(NavError::FieldLayoutError)?;

        *self = Self::new(params, layout)?;

        Ok(())
    }

    /// Perform one navigation cycle.
    ///
    /// With no target marker the output is the zero command.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        match input_data.target_marker_id {
            Some(id) => Ok(self.update_with_report(&input_data.pose, id, &input_data.obstacles)),
            None => Ok((VelocityCmd::zero(), StatusReport::default())),
        }
    }
}
