//! Backlight scenes: named per-key color layouts saved as JSON.

use std::fs;
use std::path::Path;

use crate::backlight::{BacklightCommand, Color};
use crate::error::{Error, Result};
use crate::layout::KEY_COUNT;
use crate::transport::{self, PanelTransport};
use serde::{Deserialize, Serialize};

/// A saved backlight layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Scene display name.
    pub name: String,
    /// One color per logical key, in layout order.
    pub keys: Vec<Color>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            keys: vec![Color::Off; KEY_COUNT],
        }
    }
}

impl Scene {
    fn validate(&self) -> Result<()> {
        if self.keys.len() != KEY_COUNT {
            return Err(Error::Scene(format!(
                "scene '{}' has {} key colors, expected {}",
                self.name,
                self.keys.len(),
                KEY_COUNT
            )));
        }
        Ok(())
    }
}

/// Save a scene as pretty-printed JSON.
pub fn save_scene(path: &Path, scene: &Scene) -> Result<()> {
    scene.validate()?;
    let json = serde_json::to_string_pretty(scene)
        .map_err(|e| Error::Scene(format!("serialize: {e}")))?;
    fs::write(path, json).map_err(|e| Error::Scene(format!("write {}: {e}", path.display())))
}

/// Load a scene from a JSON file.
pub fn load_scene(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)
        .map_err(|e| Error::Scene(format!("read {}: {e}", path.display())))?;
    let scene: Scene =
        serde_json::from_str(&json).map_err(|e| Error::Scene(format!("parse {}: {e}", path.display())))?;
    scene.validate()?;
    Ok(scene)
}

/// Send a scene to the panel, one backlight frame per key.
pub fn apply_scene(panel: &dyn PanelTransport, scene: &Scene) -> Result<()> {
    scene.validate()?;
    for (key, &color) in scene.keys.iter().enumerate() {
        transport::send_backlight(panel, &BacklightCommand::new(color, key))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockPanel;

    #[test]
    fn default_scene_covers_every_key() {
        let scene = Scene::default();
        assert_eq!(scene.keys.len(), KEY_COUNT);
        assert!(scene.keys.iter().all(|&c| c == Color::Off));
    }

    #[test]
    fn scene_serialization_roundtrip() {
        let mut scene = Scene::default();
        scene.keys[0] = Color::Red;
        scene.keys[23] = Color::Blue;

        let json = serde_json::to_string(&scene).expect("serialize scene");
        let back: Scene = serde_json::from_str(&json).expect("deserialize scene");
        assert_eq!(back.keys[0], Color::Red);
        assert_eq!(back.keys[23], Color::Blue);
        assert_eq!(back.name, scene.name);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scene.json");

        let mut scene = Scene::default();
        scene.name = "Streaming".into();
        scene.keys[4] = Color::Blue;

        save_scene(&path, &scene).unwrap();
        let loaded = load_scene(&path).unwrap();
        assert_eq!(loaded.name, "Streaming");
        assert_eq!(loaded.keys[4], Color::Blue);
    }

    #[test]
    fn load_rejects_wrong_key_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("short.json");
        fs::write(&path, r#"{"name":"Short","keys":["Red","Blue"]}"#).unwrap();

        assert!(load_scene(&path).is_err());
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_scene(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn apply_writes_one_frame_per_key() {
        let panel = MockPanel::new();
        let mut scene = Scene::default();
        scene.keys[1] = Color::Red;
        scene.keys[6] = Color::Blue;

        apply_scene(&panel, &scene).unwrap();

        let writes = panel.writes();
        assert_eq!(writes.len(), KEY_COUNT);
        // Key 1: red on
        assert_eq!(&writes[1][..4], &[0, 181, 1, 1]);
        // Key 6 sits past the first column gap: blue bank + firmware number 8
        assert_eq!(&writes[6][..4], &[0, 181, 32 + 8, 1]);
        // Untouched keys are switched off
        assert_eq!(&writes[0][..4], &[0, 181, 0, 0]);
    }

    #[test]
    fn apply_propagates_write_error() {
        let panel = MockPanel::new();
        panel.fail_writes();
        assert!(apply_scene(&panel, &Scene::default()).is_err());
    }
}
