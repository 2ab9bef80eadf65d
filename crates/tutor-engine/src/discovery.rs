//! Backend discovery.
//!
//! Detects which tutor backends are installed by looking them up on PATH.

use serde::{Deserialize, Serialize};
use std::process::Command;

/// Known backend CLI names.
pub const KNOWN_MODELS: &[&str] = &["claude", "codex", "gemini"];

/// Information about a discovered backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Backend name.
    pub name: String,

    /// Whether the binary was found on PATH.
    pub found: bool,

    /// Path to the binary, if found.
    pub path: Option<String>,

    /// Version string, if the binary reports one.
    pub version: Option<String>,
}

impl ModelInfo {
    /// Whether this backend can be used for tutoring.
    pub fn ready(&self) -> bool {
        self.found
    }
}

/// Discover all known backends.
pub fn discover_models() -> Vec<ModelInfo> {
    KNOWN_MODELS.iter().map(|name| discover_model(name)).collect()
}

/// Discover a single backend by name.
pub fn discover_model(name: &str) -> ModelInfo {
    let Ok(path) = which::which(name) else {
        return ModelInfo {
            name: name.to_string(),
            found: false,
            path: None,
            version: None,
        };
    };

    let version = Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| extract_version(&String::from_utf8_lossy(&out.stdout)));

    ModelInfo {
        name: name.to_string(),
        found: true,
        path: Some(path.display().to_string()),
        version,
    }
}

/// Pull a dotted version number out of command output.
fn extract_version(output: &str) -> Option<String> {
    for line in output.lines().take(3) {
        let version: String = line
            .trim()
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if version.contains('.') {
            return Some(version);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_unknown_binary() {
        let info = discover_model("definitely-not-a-real-backend-cli");
        assert!(!info.found);
        assert!(info.path.is_none());
        assert!(!info.ready());
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("v1.2.3"), Some("1.2.3".into()));
        assert_eq!(extract_version("claude 2.0.14 (stable)"), Some("2.0.14".into()));
        assert_eq!(extract_version("no digits here"), None);
    }

    #[test]
    fn test_model_info_serialization() {
        let info = ModelInfo {
            name: "claude".into(),
            found: true,
            path: Some("/usr/local/bin/claude".into()),
            version: Some("1.0.0".into()),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("claude"));
    }
}
