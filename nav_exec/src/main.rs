//! Navigation demonstration executable entry point.
//!
//! # Architecture
//!
//! The executable closes the loop between the navigator and a simulated vehicle:
//!
//!     - Initialise the session, logger and navigator
//!     - Main loop:
//!         - Pose acquisition from the simulated vehicle
//!         - Navigation processing
//!         - Simulated vehicle update with the velocity command
//!         - Cycle management
//!     - Save a summary of the run into the session
//!
//! # Usage
//!
//! ```text
//! nav_exec [--cycles N] [--obstacles FILE] goto <MARKER_ID>
//! nav_exec stop
//! ```
//!
//! Parameters are loaded from `$NAV_SW_ROOT/params/`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::{eqpt::drive::VelocityCmd, tc::nav::NavCmd};
use nav_lib::{
    geom::{ObstacleFile, Pose2},
    nav::{InitData, InputData, NavCtrl, StatusReport},
    sim_vehicle::SimVehicle,
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Response time of the simulated drive train.
const SIM_RESPONSE_TIME_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Command line arguments.
#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Drive a simulated vehicle to a field marker")]
struct Args {
    /// Maximum number of cycles to run for
    #[structopt(short, long, default_value = "1500")]
    cycles: u64,

    /// Obstacle file (TOML) describing the obstacles seen on every cycle
    #[structopt(short, long, parse(from_os_str))]
    obstacles: Option<PathBuf>,

    /// Starting X position of the vehicle in meters
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    start_x: f64,

    /// Starting Y position of the vehicle in meters
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    start_y: f64,

    /// Starting heading of the vehicle in radians
    #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
    start_heading: f64,

    /// Run as fast as possible instead of at the cycle rate
    #[structopt(long)]
    no_sleep: bool,

    /// Include the per-cycle navigation traces in the log
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: NavCmd,
}

/// Summary of a run, saved into the session at exit.
#[derive(Debug, Serialize)]
struct RunSummary {
    cmd: NavCmd,
    strategy: &'static str,
    start_pose: Pose2,
    final_pose: Pose2,
    num_cycles: u64,
    num_overruns: u64,
    arrived: bool,
    odometer_m: f64,
    last_report: StatusReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let args = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let nav_level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    logger_init(LevelFilter::Info, &[("nav_lib", nav_level)], &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Navigation Demonstration Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- INITIALISE MODULES ----

    let mut nav_ctrl: NavCtrl = NavCtrl::default();
    nav_ctrl
        .init(
            InitData {
                params_path: "nav_ctrl.toml",
                field_layout_path: "field_layout.toml",
            },
            &session,
        )
        .wrap_err("Failed to initialise NavCtrl")?;
    info!(
        "NavCtrl init complete, {} markers known, using {} steering",
        nav_ctrl.registry().len(),
        nav_ctrl.strategy_name()
    );

    let obstacles = match args.obstacles {
        Some(ref path) => {
            let file: ObstacleFile = util::params::load_path(path)
                .wrap_err_with(|| format!("Could not load the obstacle file {:?}", path))?;
            info!("Loaded {} obstacles from {:?}", file.obstacles.len(), path);
            file.obstacles
        }
        None => Vec::new(),
    };

    let start_pose = Pose2::new(args.start_x, args.start_y, args.start_heading);
    let mut sim = SimVehicle::new(start_pose, SIM_RESPONSE_TIME_S);

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop, executing {:?}\n", args.cmd);

    let mut num_cycles = 0;
    let mut num_overruns = 0;
    let mut last_report = StatusReport::default();

    while num_cycles < args.cycles {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- NAVIGATION ----

        let input = InputData {
            pose: *sim.pose(),
            target_marker_id: args.cmd.target_marker_id(),
            obstacles: obstacles.clone(),
        };

        let (cmd, report) = nav_ctrl
            .proc(&input)
            .wrap_err("Error during NavCtrl processing")?;
        last_report = report;

        // ---- VEHICLE ----

        sim.step(&cmd, CYCLE_PERIOD_S);
        num_cycles += 1;

        if finished(&args.cmd, &report, &cmd) {
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                if !args.no_sleep {
                    thread::sleep(d);
                }
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                num_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    let summary = RunSummary {
        cmd: args.cmd,
        strategy: nav_ctrl.strategy_name(),
        start_pose,
        final_pose: *sim.pose(),
        num_cycles,
        num_overruns,
        arrived: last_report.arrived,
        odometer_m: sim.odometer_m(),
        last_report,
    };

    if summary.arrived {
        info!(
            "Arrived after {} cycles ({:.2} s), travelled {:.2} m",
            num_cycles,
            num_cycles as f64 * CYCLE_PERIOD_S,
            summary.odometer_m
        );
    } else if args.cmd.target_marker_id().is_some() {
        warn!(
            "Did not arrive after {} cycles, {:.3} m from the target",
            num_cycles, last_report.dist_to_target_m
        );
    }

    session
        .save("run_summary.json", &summary)
        .wrap_err("Failed to save the run summary")?;

    info!(
        "End of execution after {:.2} s",
        session::get_elapsed_seconds()
    );

    Ok(())
}

/// True once there is nothing left for the loop to do.
fn finished(nav_cmd: &NavCmd, report: &StatusReport, cmd: &VelocityCmd) -> bool {
    match nav_cmd {
        NavCmd::Stop => {
            info!("Stop commanded");
            true
        }
        NavCmd::Goto { marker_id } => {
            if !report.target_resolved {
                warn!("Marker {} is not in the field layout", marker_id);
                true
            } else {
                report.arrived && cmd.is_zero()
            }
        }
    }
}
