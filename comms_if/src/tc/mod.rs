//! # Telecommand module
//!
//! Telecommands are the instructions given to the navigator by whichever collaborator owns the
//! mission (a ground station, a script, or an operator on the command line).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod nav;
