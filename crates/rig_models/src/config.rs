use std::fs::{read_to_string, write};
use std::io;
use std::path::{Path, PathBuf};
use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::camera::{OrbitCameraRig, OrbitRigSettings, RigConfigError};
use crate::key_utils::{convert, convert_mouse_button};

/// Environment variable overriding the directory the config files live in.
pub const CONFIG_DIR_ENV: &str = "RIG_CONFIG_DIR";

/// Directory used when [`CONFIG_DIR_ENV`] is not set.
pub const DEFAULT_CONFIG_DIR: &str = "config";

const CAMERA_FILE: &str = "camera.toml";
const INPUT_FILE: &str = "input.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid camera settings: {0}")]
    InvalidRig(#[from] RigConfigError),
}

// =================================================================================================
//
//                                            Global
//
// =================================================================================================

#[derive(Resource, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct GlobalConfig {
    pub camera_config: CameraConfig,
    pub input_config: InputConfig,
}

impl GlobalConfig {

    /// Loads a configuration file and deserializes it into the specified type.
    ///
    /// # Arguments
    /// - `path`: The file path of the configuration file to load.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read and [`ConfigError::Parse`]
    /// if it is not valid TOML for `T`.
    pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let content = read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Like [`GlobalConfig::load`], but falls back to `T::default()` and logs a warning
    /// when the file is missing or broken.
    pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
        match Self::load(path) {
            Ok(value) => value,
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                T::default()
            }
            Err(err) => {
                warn!("{err}, using defaults");
                T::default()
            }
        }
    }

    /// Loads all config files from `dir`.
    ///
    /// Camera settings that fail validation are replaced by the defaults, so the app
    /// always starts with a usable rig.
    pub fn from_dir(dir: &Path) -> Self {
        let mut camera_config: CameraConfig = Self::load_or_default(&dir.join(CAMERA_FILE));
        if let Err(err) = camera_config.rig.validate() {
            warn!("Invalid camera settings in {}: {err}, using defaults", dir.display());
            camera_config.rig = OrbitRigSettings::default();
        }

        Self {
            camera_config,
            input_config: Self::load_or_default(&dir.join(INPUT_FILE)),
        }
    }

    /// Creates a new `GlobalConfig` instance and loads all configuration files from the
    /// directory named by `RIG_CONFIG_DIR` (default `config/`).
    ///
    /// # Returns
    /// - `GlobalConfig`: A new instance with loaded configurations for camera and input.
    pub fn new() -> Self {
        Self::from_dir(&config_dir())
    }

    /// Saves a specified file with his name.
    fn save<T: Serialize>(data: &T, path: &Path) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(data)?;
        write(path, toml_string)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }

    /// Saves all known config files into `dir`.
    /// This func used `GlobalConfig::save` for saving.
    ///
    /// # Errors
    /// Fails on the first file that cannot be serialized or written.
    pub fn save_all(&self, dir: &Path) -> Result<(), ConfigError> {
        Self::save(&self.camera_config, &dir.join(CAMERA_FILE))?;
        Self::save(&self.input_config, &dir.join(INPUT_FILE))
    }

}

/// The config directory, taken from `RIG_CONFIG_DIR` when set.
pub fn config_dir() -> PathBuf {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
}

// =================================================================================================
//
//                                            Camera
//
// =================================================================================================

/// Serializable setup of the orbit camera: where it starts, what it orbits and how the
/// rig reacts to drags.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial pivot in world space.
    pub pivot: [f32; 3],
    /// Initial camera position in world space. The camera starts looking at the pivot.
    pub camera_position: [f32; 3],
    /// Rates and limits of the rig.
    pub rig: OrbitRigSettings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pivot: [0.0, 0.0, 0.0],
            camera_position: [0.0, 0.0, 8.0],
            rig: OrbitRigSettings::default(),
        }
    }
}

impl CameraConfig {

    pub fn get_pivot(&self) -> Vec3 {
        Vec3::from_array(self.pivot)
    }

    /// Initial camera transform, placed at `camera_position` and looking at the pivot.
    pub fn get_camera_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.camera_position))
            .looking_at(self.get_pivot(), Vec3::Y)
    }

    /// Builds the rig component for this configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidRig`] when the rig settings do not validate.
    pub fn build_rig(&self) -> Result<OrbitCameraRig, ConfigError> {
        Ok(OrbitCameraRig::new(self.get_pivot(), self.rig)?)
    }
}

// =================================================================================================
//
//                                            Input
//
// =================================================================================================

/// Serializable input configuration mapping actions to human-readable button and key
/// names (e.g. "Left", "F1") that are converted into engine types at runtime.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse button that drags the camera.
    pub drag_button: String,
    /// Whether the first touch drags the camera as well.
    pub touch_drag: bool,
    /// Toggle developer inspector overlay.
    pub inspector: String,
    /// Toggle pivot/translate band gizmos.
    pub gizmos: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_button: String::from("Left"),
            touch_drag: true,
            inspector: String::from("F1"),
            gizmos: String::from("F9"),
        }
    }
}

impl InputConfig {
    pub fn get_drag_button(&self) -> MouseButton {
        convert_mouse_button(self.drag_button.as_str()).unwrap_or(MouseButton::Left)
    }

    pub fn get_inspector_key(&self) -> KeyCode {
        convert(self.inspector.as_str()).unwrap_or(KeyCode::F1)
    }

    pub fn get_gizmo_key(&self) -> KeyCode {
        convert(self.gizmos.as_str()).unwrap_or(KeyCode::F9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_config_from_toml() {
        let config: CameraConfig = toml::from_str(
            r#"
            pivot = [0.0, 1.0, 0.0]
            camera_position = [0.0, 1.5, 10.0]

            [rig]
            reference_height = 1.0
            max_vertical_rotation_angle = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.get_pivot(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(config.rig.reference_height, 1.0);
        assert_eq!(config.rig.max_vertical_rotation_angle, 60.0);
        // missing keys keep their defaults
        assert_eq!(config.rig.vertical_translate_rate, 0.01);

        let rig = config.build_rig().unwrap();
        assert_eq!(rig.pivot, Vec3::new(0.0, 1.0, 0.0));
        assert!(!rig.is_dragging());
    }

    #[test]
    fn test_build_rig_rejects_invalid_settings() {
        let config = CameraConfig {
            rig: OrbitRigSettings { max_vertical_rotation_angle: 90.0, ..default() },
            ..default()
        };

        assert!(matches!(
            config.build_rig(),
            Err(ConfigError::InvalidRig(RigConfigError::RotationAngleOutOfRange(_)))
        ));
    }

    #[test]
    fn test_camera_transform_looks_at_pivot() {
        let config = CameraConfig::default();
        let transform = config.get_camera_transform();

        assert_eq!(transform.translation, Vec3::new(0.0, 0.0, 8.0));
        assert!(transform.forward().dot(Vec3::NEG_Z) > 0.999);
    }

    #[test]
    fn test_input_config_fallbacks() {
        let config = InputConfig {
            drag_button: String::from("Thumb"),
            touch_drag: false,
            inspector: String::from("nope"),
            gizmos: String::from("G"),
        };

        assert_eq!(config.get_drag_button(), MouseButton::Left);
        assert_eq!(config.get_inspector_key(), KeyCode::F1);
        assert_eq!(config.get_gizmo_key(), KeyCode::KeyG);
    }

    #[test]
    fn test_from_dir_uses_defaults_for_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join(CAMERA_FILE), "[rig]\nmax_vertical_rotation_angle = 120.0\n").unwrap();

        let config = GlobalConfig::from_dir(dir.path());

        assert_eq!(config.camera_config.rig, OrbitRigSettings::default());
        assert_eq!(config.input_config, InputConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INPUT_FILE);
        write(&path, "touch_drag = \"definitely\"").unwrap();

        let result = GlobalConfig::load::<InputConfig>(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_all_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GlobalConfig::default();
        config.camera_config.rig.vertical_rotate_rate = 0.25;
        config.input_config.drag_button = String::from("Right");

        config.save_all(dir.path()).unwrap();
        let loaded = GlobalConfig::from_dir(dir.path());

        assert_eq!(loaded, config);
    }
}
