use loadscreen_common::{RuntimeEnvironment, WidgetClassPath};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported settings format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Loading screen settings, as authored in the game's config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingScreenSettings {
    /// Widget class instantiated as the overlay.
    pub widget: WidgetClassPath,
    /// Layer the overlay is attached at. Intentionally high to sit above all other content.
    pub z_order: i32,
    /// Seconds to keep the screen up after loading has finished.
    pub hold_seconds: f32,
    /// Debug: always show the screen.
    pub force_display: bool,
    /// Debug: log the display state and reason on every update.
    pub log_reason: bool,
    /// Debug: apply `hold_seconds` when running in the editor too.
    pub hold_in_editor: bool,
}

impl Default for LoadingScreenSettings {
    fn default() -> Self {
        Self {
            widget: WidgetClassPath::new("/Game/UI/W_LoadingScreen"),
            z_order: 10_000,
            hold_seconds: 2.0,
            force_display: false,
            log_reason: false,
            hold_in_editor: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from the file extension, without touching the file.
    fn of(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl LoadingScreenSettings {
    /// Load settings from a `.yaml`/`.yml` or `.json` file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let data = std::fs::read_to_string(path)?;

        let settings: Self = match format {
            Format::Yaml => serde_yaml::from_str(&data)?,
            Format::Json => serde_json::from_str(&data)?,
        };
        settings.validate()?;

        tracing::debug!(path = %path.display(), ?settings, "loaded loading screen settings");
        Ok(settings)
    }

    /// Write settings to disk, picking the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let data = match Format::of(path)? {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.hold_seconds.is_finite() {
            return Err(ConfigError::Invalid {
                field: "hold_seconds",
                reason: format!("must be a finite number, got {}", self.hold_seconds),
            });
        }
        if self.widget.is_empty() {
            return Err(ConfigError::Invalid {
                field: "widget",
                reason: "widget class path is empty".into(),
            });
        }
        Ok(())
    }

    /// Hold duration that applies in `env`. Editor sessions skip the hold
    /// unless `hold_in_editor` is set.
    pub fn effective_hold_seconds(&self, env: RuntimeEnvironment) -> f32 {
        if env.editor && !self.hold_in_editor {
            0.0
        } else {
            self.hold_seconds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let s = LoadingScreenSettings::default();
        assert_eq!(s.z_order, 10_000);
        assert_eq!(s.hold_seconds, 2.0);
        assert!(!s.force_display);
        assert!(!s.log_reason);
        assert!(!s.hold_in_editor);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn editor_skips_hold_unless_enabled() {
        let mut s = LoadingScreenSettings::default();
        assert_eq!(s.effective_hold_seconds(RuntimeEnvironment::game()), 2.0);
        assert_eq!(s.effective_hold_seconds(RuntimeEnvironment::editor()), 0.0);

        s.hold_in_editor = true;
        assert_eq!(s.effective_hold_seconds(RuntimeEnvironment::editor()), 2.0);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let s: LoadingScreenSettings =
            serde_yaml::from_str("hold_seconds: 0.5\nforce_display: true\n").unwrap();
        assert_eq!(s.hold_seconds, 0.5);
        assert!(s.force_display);
        assert_eq!(s.z_order, 10_000);
        assert_eq!(s.widget, LoadingScreenSettings::default().widget);
    }

    #[test]
    fn load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let custom = LoadingScreenSettings {
            widget: WidgetClassPath::new("/Game/UI/W_Custom"),
            z_order: 42,
            hold_seconds: 3.5,
            log_reason: true,
            ..LoadingScreenSettings::default()
        };

        let yaml_path = dir.path().join("loading.yaml");
        custom.save(&yaml_path).unwrap();
        assert_eq!(LoadingScreenSettings::load(&yaml_path).unwrap(), custom);

        let json_path = dir.path().join("loading.json");
        std::fs::write(&json_path, r#"{ "z_order": 7, "hold_in_editor": true }"#).unwrap();
        let loaded = LoadingScreenSettings::load(&json_path).unwrap();
        assert_eq!(loaded.z_order, 7);
        assert!(loaded.hold_in_editor);
        assert_eq!(loaded.hold_seconds, 2.0);
    }

    #[test]
    fn unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loading.ini");
        std::fs::write(&path, "z_order=1").unwrap();
        let err = LoadingScreenSettings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));
    }

    #[test]
    fn format_checked_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.ini");
        let err = LoadingScreenSettings::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "ini"));

        let err = LoadingScreenSettings::default().save(dir.path().join("out.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "toml"));
        assert!(!dir.path().join("out.toml").exists());

        let err = LoadingScreenSettings::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        let s = LoadingScreenSettings {
            hold_seconds: f32::NAN,
            ..LoadingScreenSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::Invalid {
                field: "hold_seconds",
                ..
            })
        ));

        let s = LoadingScreenSettings {
            widget: WidgetClassPath::new(""),
            ..LoadingScreenSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ConfigError::Invalid { field: "widget", .. })
        ));
    }

    #[test]
    fn negative_hold_is_valid() {
        let s = LoadingScreenSettings {
            hold_seconds: -1.0,
            ..LoadingScreenSettings::default()
        };
        assert!(s.validate().is_ok());
    }
}
