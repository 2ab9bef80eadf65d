//! Configuration for the tutor app.
//!
//! Config lives as JSON under the `.tutor` directory and covers backend
//! selection plus capture defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding config and saved sessions.
pub const TUTOR_DIR: &str = ".tutor";

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Priority order for backend selection.
    #[serde(default = "default_model_priority")]
    pub model_priority: Vec<String>,

    /// Backend configurations.
    #[serde(default)]
    pub models: Vec<ModelConfig>,

    /// Quality factor passed to capture requests.
    #[serde(default = "default_capture_quality")]
    pub capture_quality: f32,

    /// Whether transcripts are saved on exit.
    #[serde(default = "default_save_sessions")]
    pub save_sessions: bool,
}

fn default_model_priority() -> Vec<String> {
    vec!["claude".into(), "codex".into(), "gemini".into()]
}

fn default_capture_quality() -> f32 {
    0.8
}

fn default_save_sessions() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config populated with the given detected backends.
    pub fn with_detected_models(model_names: &[String]) -> Self {
        Self {
            model_priority: model_names.to_vec(),
            models: model_names
                .iter()
                .map(|name| ModelConfig::default_for(name))
                .collect(),
            ..Default::default()
        }
    }

    /// Backend config by name, falling back to built-in defaults.
    pub fn model(&self, name: &str) -> ModelConfig {
        self.models
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .unwrap_or_else(|| ModelConfig::default_for(name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_priority: default_model_priority(),
            models: Vec::new(),
            capture_quality: default_capture_quality(),
            save_sessions: default_save_sessions(),
        }
    }
}

/// Configuration for a single backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Backend name (e.g., "claude", "codex", "gemini").
    pub name: String,

    /// Command and arguments to invoke the backend.
    pub command_argv: Vec<String>,

    /// Timeout in seconds for one turn.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    300
}

impl ModelConfig {
    /// Built-in invocation for a known backend.
    pub fn default_for(name: &str) -> Self {
        match name {
            "claude" => Self {
                name: "claude".into(),
                command_argv: vec![
                    "claude".into(),
                    "-p".into(),
                    "--output-format".into(),
                    "text".into(),
                ],
                timeout_seconds: 300,
            },
            "codex" => Self {
                name: "codex".into(),
                command_argv: vec!["codex".into(), "exec".into(), "-".into()],
                timeout_seconds: 300,
            },
            "gemini" => Self {
                name: "gemini".into(),
                command_argv: vec!["gemini".into(), "-p".into()],
                timeout_seconds: 300,
            },
            _ => Self {
                name: name.into(),
                command_argv: vec![name.into()],
                timeout_seconds: 300,
            },
        }
    }
}

/// Path of the config file under a root directory.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(TUTOR_DIR).join("config.json")
}

/// Path of the sessions directory under a root directory.
pub fn sessions_dir(root: &Path) -> PathBuf {
    root.join(TUTOR_DIR).join("sessions")
}

/// Errors when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model_priority, vec!["claude", "codex", "gemini"]);
        assert!((config.capture_quality - 0.8).abs() < f32::EPSILON);
        assert!(config.save_sessions);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());

        let config = Config::with_detected_models(&["claude".into()]);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.model_priority, vec!["claude"]);
        assert_eq!(loaded.models.len(), 1);
    }

    #[test]
    fn test_model_falls_back_to_builtin() {
        let config = Config::default();
        let gemini = config.model("gemini");
        assert_eq!(gemini.command_argv, vec!["gemini", "-p"]);

        let other = config.model("mystery");
        assert_eq!(other.command_argv, vec!["mystery"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"model_priority": ["codex"]}"#).unwrap();
        assert_eq!(parsed.model_priority, vec!["codex"]);
        assert!(parsed.save_sessions);
    }
}
