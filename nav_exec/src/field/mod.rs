//! # Field layout
//!
//! The field layout records where each fiducial marker sits on the field. It is populated once at
//! startup from a layout file and is read-only afterwards. The navigator only ever asks one
//! question of it: where is marker `id`? A marker which isn't in the layout is a normal answer, not
//! an error, so lookups return an `Option`.
//!
//! Markers are mounted in 3D but the navigator works in the plane, so the layout keeps the planar
//! projection of each marker and drops its height.
//!
//! Layout files are TOML:
//!
//! ```toml
//! [[markers]]
//! id = 1
//! x_m = 5.0
//! y_m = 0.0
//! z_m = 0.45          # optional, ignored by navigation
//! heading_rad = 3.14  # optional, defaults to 0
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};
use util::params::{self, LoadError};

use crate::geom::Pose2;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Something which can resolve a marker ID into a field pose.
pub trait TargetRegistry {
    /// Get the field pose of the marker, or `None` if the marker is unknown.
    fn target_pose(&self, id: u32) -> Option<Pose2>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Registry of known marker poses.
#[derive(Debug, Clone, Default)]
pub struct FieldLayout {
    markers: HashMap<u32, Pose2>,
}

/// Layout file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldLayoutFile {
    #[serde(default)]
    pub markers: Vec<MarkerSpec>,
}

/// A single marker in a layout file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: u32,
    pub x_m: f64,
    pub y_m: f64,

    /// Height of the marker, not used for navigation.
    #[serde(default)]
    pub z_m: f64,

    #[serde(default)]
    pub heading_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FieldLayoutError {
    #[error("Could not load the field layout file: {0}")]
    LoadError(LoadError),

    #[error("Marker {0} appears more than once in the field layout")]
    DuplicateMarker(u32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FieldLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a layout from a file relative to the params directory.
    pub fn from_file(param_file_path: &str) -> Result<Self, FieldLayoutError> {
        let file: FieldLayoutFile =
            params::load(param_file_path).map_err(FieldLayoutError::LoadError)?;

        let layout = Self::from_layout_file(&file)?;

        debug!(
            "Loaded field layout {:?} with {} markers",
            param_file_path,
            layout.len()
        );

        Ok(layout)
    }

    /// Build a layout from already parsed file contents, rejecting duplicate marker IDs.
    pub fn from_layout_file(file: &FieldLayoutFile) -> Result<Self, FieldLayoutError> {
        let mut layout = Self::new();

        for marker in &file.markers {
            if layout.markers.contains_key(&marker.id) {
                return Err(FieldLayoutError::DuplicateMarker(marker.id));
            }

            layout.set_marker_pose(
                marker.id,
                Pose2::new(marker.x_m, marker.y_m, marker.heading_rad),
            );
        }

        Ok(layout)
    }

    /// Set (or replace) the pose of a marker.
    pub fn set_marker_pose(&mut self, id: u32, pose: Pose2) {
        self.markers.insert(id, pose);
    }

    pub fn get_marker_pose(&self, id: u32) -> Option<Pose2> {
        self.markers.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// IDs of all known markers, in ascending order.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.markers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl TargetRegistry for FieldLayout {
    fn target_pose(&self, id: u32) -> Option<Pose2> {
        self.get_marker_pose(id)
    }
}

impl TargetRegistry for HashMap<u32, Pose2> {
    fn target_pose(&self, id: u32) -> Option<Pose2> {
        self.get(&id).copied()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    static DEFAULT_LAYOUT: &str = include_str!("../../../params/field_layout.toml");

    #[test]
    fn test_lookup() {
        let mut layout = FieldLayout::new();
        assert!(layout.is_empty());

        layout.set_marker_pose(4, Pose2::new(5.0, 0.0, 0.0));
        assert_eq!(
            layout.target_pose(4).map(|p| p.position_m),
            Some(Vector2::new(5.0, 0.0))
        );
        assert_eq!(layout.target_pose(5), None);
    }

    #[test]
    fn test_layout_file() {
        let file: FieldLayoutFile = params::from_str(
            r#"
            [[markers]]
            id = 2
            x_m = 1.0
            y_m = -1.0
            z_m = 0.5

            [[markers]]
            id = 1
            x_m = 3.0
            y_m = 4.0
            heading_rad = 1.0
            "#,
        )
        .unwrap();

        let layout = FieldLayout::from_layout_file(&file).unwrap();
        assert_eq!(layout.ids(), vec![1, 2]);

        // Height is dropped, heading defaults to zero
        let pose = layout.get_marker_pose(2).unwrap();
        assert_eq!(pose.position_m, Vector2::new(1.0, -1.0));
        assert_eq!(pose.heading.rad(), 0.0);
        assert_eq!(layout.get_marker_pose(1).unwrap().heading.rad(), 1.0);
    }

    #[test]
    fn test_duplicate_marker() {
        let file: FieldLayoutFile = params::from_str(
            r#"
            [[markers]]
            id = 7
            x_m = 1.0
            y_m = 1.0

            [[markers]]
            id = 7
            x_m = 2.0
            y_m = 2.0
            "#,
        )
        .unwrap();

        assert!(matches!(
            FieldLayout::from_layout_file(&file),
            Err(FieldLayoutError::DuplicateMarker(7))
        ));
    }

    #[test]
    fn test_negative_id_rejected() {
        let res = params::from_str::<FieldLayoutFile>("[[markers]]\nid = -1\nx_m = 0.0\ny_m = 0.0");
        assert!(res.is_err());
    }

    #[test]
    fn test_default_layout() {
        let file: FieldLayoutFile = params::from_str(DEFAULT_LAYOUT).unwrap();
        let layout = FieldLayout::from_layout_file(&file).unwrap();
        assert!(!layout.is_empty());
    }
}
