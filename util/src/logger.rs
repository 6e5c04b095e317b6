//! Logger initialisation
//!
//! Log lines go to both stdout and the session's log file. Each line starts with the number of
//! seconds since the session began and a three letter level tag:
//!
//! ```text
//! [  1.204817 INF] NavCtrl init complete, 4 markers known, using grid_search steering
//! [  1.226113 DBG] nav_lib::nav::nav_ctrl: Target marker 9 is not in the registry
//! ```
//!
//! Debug and trace lines also name the module they came from. The level tag is coloured on stdout
//! only, so the log file stays plain text.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level, Record};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of `INFO` or more verbose, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `target_levels` overrides the level for individual log targets (e.g. `("nav_lib", Trace)`),
/// which keeps the per-cycle navigation traces out of the log unless they are asked for.
///
/// # Notes
///
/// - `min_level` must be `Info` or more verbose, warnings and errors are never filtered out.
/// - Only the first call in a process can succeed, later ones return `FernInitError`.
pub fn logger_init(
    min_level: LevelFilter,
    target_levels: &[(&'static str, LevelFilter)],
    session: &Session,
) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let stdout = fern::Dispatch::new()
        .format(|out, message, record| finish_line(out, message, record, true))
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| finish_line(out, message, record, false))
        .chain(log_file);

    target_levels
        .iter()
        .fold(fern::Dispatch::new().level(min_level), |d, (target, level)| {
            d.level_for(*target, *level)
        })
        .chain(stdout)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    for (target, level) in target_levels {
        info!("    Log level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a record and hand it back to fern
fn finish_line(
    out: fern::FormatCallback,
    message: &fmt::Arguments,
    record: &Record,
    colour: bool,
) {
    // Colour codes are zero width, so tags line up either way
    let tag = if colour {
        level_tag(record.level())
    } else {
        ColoredString::from(level_str(record.level()))
    };
    let elapsed_s = session::get_elapsed_seconds();

    if record.level() > Level::Info {
        out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            elapsed_s,
            tag,
            record.target(),
            message
        ))
    } else {
        out.finish(format_args!("[{:10.6} {}] {}", elapsed_s, tag, message))
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

/// Coloured level tag for terminal output
fn level_tag(level: Level) -> ColoredString {
    let s = level_str(level);

    match level {
        Level::Trace => s.dimmed().italic(),
        Level::Debug => s.dimmed(),
        Level::Info => s.normal(),
        Level::Warn => s.yellow(),
        Level::Error => s.red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_str() {
        assert_eq!(level_str(Level::Warn), "WRN");
        assert!(level_tag(Level::Error).to_string().contains("ERR"));
    }
}
