//! # Equipment Interface
//!
//! This module defines the interface structures which are sent to equipment such as the motion
//! control layer.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
