//! # Communications interface crate.
//!
//! Provides the data exchanged between the navigator and its collaborators.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand definitions, i.e. what the navigator is asked to do
pub mod tc;

/// Command definitions for equipment (like the drive train)
pub mod eqpt;
