//! # Navigation telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A navigation command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, StructOpt)]
pub enum NavCmd {
    /// Drive to the field position of a fiducial marker.
    ///
    /// The marker is looked up in the field layout on every cycle, a marker which isn't in the
    /// layout results in the vehicle holding still.
    #[structopt(name = "goto")]
    Goto {
        /// ID of the target marker
        marker_id: u32,
    },

    /// Hold the vehicle still.
    #[structopt(name = "stop")]
    Stop,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavCmd {
    /// The marker this command targets, if any.
    pub fn target_marker_id(&self) -> Option<u32> {
        match self {
            NavCmd::Goto { marker_id } => Some(*marker_id),
            NavCmd::Stop => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_args() {
        let cmd = NavCmd::from_iter(&["nav", "goto", "7"]);
        assert_eq!(cmd, NavCmd::Goto { marker_id: 7 });
        assert_eq!(cmd.target_marker_id(), Some(7));

        let cmd = NavCmd::from_iter(&["nav", "stop"]);
        assert_eq!(cmd.target_marker_id(), None);
    }

    #[test]
    fn test_json() {
        let cmd: NavCmd = serde_json::from_str(r#"{"Goto":{"marker_id":3}}"#).unwrap();
        assert_eq!(cmd, NavCmd::Goto { marker_id: 3 });
    }
}
