//! Tool capabilities exposed to the agent.
//!
//! Tools are declared to the model in the prompt and their outputs are
//! validated against a small JSON schema subset (object with typed required
//! string fields) before a reply part is accepted as well-formed.

use serde_json::Value;

/// Name of the encouragement tool.
pub const CONFIDENCE_TOOL: &str = "showConfidence";

/// Declaration of a tool the agent may call.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name as it appears in reply tags.
    pub name: String,
    /// Description included in the prompt.
    pub description: String,
    /// Output schema: object with required string fields.
    pub schema: Value,
}

impl ToolSpec {
    /// The encouragement tool, whose output requires a single string
    /// field `message`.
    pub fn confidence() -> Self {
        Self {
            name: CONFIDENCE_TOOL.into(),
            description: "Show a confidence boost message when the student \
                          makes progress or understands a concept"
                .into(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Encouraging message for the student's progress"
                    }
                },
                "required": ["message"]
            }),
        }
    }
}

/// Registry of tools available in a session.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default tutor tools.
    pub fn tutor_default() -> Self {
        let mut registry = Self::new();
        registry.register(ToolSpec::confidence());
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, spec: ToolSpec) {
        self.specs.push(spec);
    }

    /// All registered tools.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Validate a tool output value against the registered schema.
    ///
    /// Unknown tools are an error; renderers may still choose to drop the
    /// part silently instead of surfacing this.
    pub fn validate_output(&self, name: &str, output: &Value) -> Result<(), ToolError> {
        let spec = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let Some(required) = spec.schema.get("required").and_then(Value::as_array) else {
            return Ok(());
        };

        for field in required.iter().filter_map(Value::as_str) {
            match output.get(field) {
                None => {
                    return Err(ToolError::MissingField {
                        tool: name.to_string(),
                        field: field.to_string(),
                    })
                }
                Some(value) if !value.is_string() => {
                    return Err(ToolError::WrongType {
                        tool: name.to_string(),
                        field: field.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Errors from tool output validation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A required field was absent.
    #[error("tool {tool} output missing required field {field}")]
    MissingField { tool: String, field: String },

    /// A required field had the wrong type.
    #[error("tool {tool} output field {field} is not a string")]
    WrongType { tool: String, field: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry_has_confidence_tool() {
        let registry = ToolRegistry::tutor_default();
        assert!(registry.get(CONFIDENCE_TOOL).is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_validate_output_accepts_string_message() {
        let registry = ToolRegistry::tutor_default();
        registry
            .validate_output(CONFIDENCE_TOOL, &json!({"message": "Nicely done"}))
            .unwrap();
    }

    #[test]
    fn test_validate_output_rejects_missing_message() {
        let registry = ToolRegistry::tutor_default();
        let err = registry
            .validate_output(CONFIDENCE_TOOL, &json!({}))
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingField { .. }));
    }

    #[test]
    fn test_validate_output_rejects_non_string_message() {
        let registry = ToolRegistry::tutor_default();
        let err = registry
            .validate_output(CONFIDENCE_TOOL, &json!({"message": 7}))
            .unwrap_err();
        assert!(matches!(err, ToolError::WrongType { .. }));
    }

    #[test]
    fn test_validate_output_unknown_tool() {
        let registry = ToolRegistry::tutor_default();
        let err = registry
            .validate_output("drawGraph", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }
}
