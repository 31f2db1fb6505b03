//! Rendering defaults consumed by the marshallers.
//!
//! The values are held in a process-wide store and read at marshal time, so
//! changing them affects every subsequent `update_data` call.

use std::path::Path;
use std::sync::{OnceLock, RwLock};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Global settings singleton.
static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

/// Default colors and sizes for drawables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Uniform color of point clouds without per-vertex colors.
    pub point_cloud_points_color: Vec3,

    /// Color of surface mesh vertices drawn as points.
    pub surface_mesh_vertices_color: Vec3,

    /// Point size of surface mesh vertices.
    pub surface_mesh_vertices_point_size: f32,

    /// Color of surface mesh edges.
    pub surface_mesh_edges_color: Vec3,

    /// Line width of surface mesh edges.
    pub surface_mesh_edges_line_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            point_cloud_points_color: Vec3::new(0.33, 0.67, 1.0),
            surface_mesh_vertices_color: Vec3::new(0.0, 1.0, 0.0),
            surface_mesh_vertices_point_size: 5.0,
            surface_mesh_edges_color: Vec3::ZERO,
            surface_mesh_edges_line_width: 1.0,
        }
    }
}

impl Settings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded settings from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Saves settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }
}

fn store() -> &'static RwLock<Settings> {
    SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

/// Returns a snapshot of the current settings.
pub fn settings() -> Settings {
    match store().read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Modifies the current settings in place.
pub fn with_settings_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut Settings) -> R,
{
    let mut guard = match store().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut guard)
}

/// Restores the default settings.
pub fn reset_settings() {
    with_settings_mut(|s| *s = Settings::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.point_cloud_points_color, Vec3::new(0.33, 0.67, 1.0));
        assert_eq!(s.surface_mesh_vertices_point_size, 5.0);
        assert_eq!(s.surface_mesh_edges_color, Vec3::ZERO);
        assert_eq!(s.surface_mesh_edges_line_width, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json_str(r#"{ "surface_mesh_edges_line_width": 2.5 }"#).unwrap();
        assert_eq!(s.surface_mesh_edges_line_width, 2.5);
        assert_eq!(
            s.surface_mesh_vertices_point_size,
            Settings::default().surface_mesh_vertices_point_size
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::default();
        s.point_cloud_points_color = Vec3::new(0.1, 0.2, 0.3);
        let back = Settings::from_json_str(&s.to_json_string().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Settings::from_json_str("{ not json"),
            Err(crate::GeodrawError::JsonError(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        assert!(matches!(
            Settings::load("/nonexistent/geodraw-settings.json"),
            Err(crate::GeodrawError::IoError(_))
        ));
    }
}
