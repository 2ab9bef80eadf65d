//! Agent client for the tutor.
//!
//! The tutor agent is an external model CLI reached as a subprocess. This
//! module assembles the prompt from a transcript, invokes the configured
//! backend, and parses the reply into message parts, including tool-call
//! tags the model emits for registered capabilities.

use crate::config::ModelConfig;
use crate::tools::ToolRegistry;
use crate::transcript::{Message, Part, Role, Transcript};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Fixed opening message sent with the captured problem image.
pub const KICKOFF_TEXT: &str =
    "I need help with this math problem. Can you guide me through it step by step?";

/// System prompt establishing the Socratic tutoring style.
const TUTOR_SYSTEM_PROMPT: &str = r"You are a patient, compassionate Socratic math tutor. Your goal is to guide students through understanding, not just give them answers.

CRITICAL RULES:
1. NEVER give the final answer directly. Always guide step-by-step.
2. Start by analyzing the problem and asking what the student notices or what they think the first step might be.
3. When they answer or ask why, explain ONLY that specific concept before moving to the next step.
4. Use encouraging language. Celebrate small wins. Be patient with confusion.
5. If they're stuck, give a small hint or ask a leading question, but don't solve it for them.
6. Break complex problems into tiny, manageable steps.
7. Use the showConfidence tool when they make good progress or show understanding.";

/// A file attached to an outgoing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    /// A file reference with its mime type.
    #[serde(rename_all = "camelCase")]
    File { mime_type: String, uri: String },
}

/// Payload for a send: plain text, optionally with attached files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendPayload {
    /// Message text.
    pub text: String,
    /// Attached files.
    pub files: Vec<Attachment>,
}

impl SendPayload {
    /// Create a text-only payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            files: Vec::new(),
        }
    }

    /// Create a payload with a single attached file.
    pub fn with_file(
        text: impl Into<String>,
        mime_type: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            files: vec![Attachment::File {
                mime_type: mime_type.into(),
                uri: uri.into(),
            }],
        }
    }

    /// Convert to a user message: one text part followed by one image part
    /// per attached file.
    pub fn into_message(self) -> Message {
        let mut parts = vec![Part::text(self.text)];
        for Attachment::File { uri, .. } in self.files {
            parts.push(Part::image(uri));
        }
        Message::new(Role::User, parts)
    }
}

impl From<&str> for SendPayload {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// An attachment decoded to a file the backend can read.
#[derive(Debug, Clone)]
pub struct MaterializedAttachment {
    /// Mime type of the content.
    pub mime_type: String,
    /// Path on disk.
    pub path: PathBuf,
}

/// Build the full prompt for a transcript whose last message is the pending
/// student turn.
pub fn build_prompt(
    transcript: &Transcript,
    registry: &ToolRegistry,
    attachments: &[MaterializedAttachment],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(TUTOR_SYSTEM_PROMPT);
    prompt.push_str("\n\n");

    if !registry.specs().is_empty() {
        prompt.push_str("TOOLS:\n");
        prompt.push_str(
            "To call a tool, emit a tag on its own line in your reply, with the \
             output as JSON:\n<tool name=\"NAME\">{...}</tool>\n",
        );
        for spec in registry.specs() {
            let _ = writeln!(
                prompt,
                "- {}: {} (output schema: {})",
                spec.name, spec.description, spec.schema
            );
        }
        prompt.push('\n');
    }

    prompt.push_str("Conversation:\n");
    for msg in transcript.messages() {
        let speaker = match msg.role {
            Role::User => "Student",
            Role::Assistant => "Tutor",
        };
        let text = msg.text_content();
        if !text.is_empty() {
            let _ = write!(prompt, "{speaker}: {text}\n\n");
        }
        let images = msg.parts.iter().filter(|p| matches!(p, Part::Image { .. })).count();
        if images > 0 {
            let _ = write!(prompt, "[the student attached {images} image(s)]\n\n");
        }
    }

    for att in attachments {
        let _ = writeln!(
            prompt,
            "Attached file ({}): {}",
            att.mime_type,
            att.path.display()
        );
    }

    prompt.push_str("\nRespond to the student's last message as the tutor.\n");
    prompt
}

/// Decode the image parts of the pending user message to temp files.
///
/// `data:` URIs are base64-decoded to disk; plain paths pass through.
pub fn materialize_attachments(message: &Message) -> Result<Vec<MaterializedAttachment>, AgentError> {
    let mut out = Vec::new();
    for part in &message.parts {
        let Part::Image { image } = part else {
            continue;
        };
        if let Some(rest) = image.strip_prefix("data:") {
            let (mime, payload) = rest
                .split_once(";base64,")
                .ok_or_else(|| AgentError::Attachment("malformed data URI".into()))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| AgentError::Attachment(format!("invalid base64 payload: {e}")))?;
            let ext = match mime {
                "image/png" => "png",
                _ => "jpg",
            };
            let path =
                std::env::temp_dir().join(format!("tutor-attach-{}.{ext}", uuid::Uuid::new_v4()));
            std::fs::write(&path, bytes).map_err(AgentError::Io)?;
            out.push(MaterializedAttachment {
                mime_type: mime.to_string(),
                path,
            });
        } else {
            out.push(MaterializedAttachment {
                mime_type: "image/jpeg".into(),
                path: PathBuf::from(image),
            });
        }
    }
    Ok(out)
}

/// Parse a raw reply into ordered message parts.
///
/// Text between tool tags becomes text parts; each tag becomes a tool part.
/// A tag whose body is not valid JSON becomes an output-error part; a tag
/// whose JSON fails the registered schema is kept as-is (the renderer
/// degrades it) but logged.
pub fn parse_reply(raw: &str, registry: &ToolRegistry) -> Vec<Part> {
    // Tag bodies never nest, so a lazy match up to the close tag is enough.
    let Ok(tag) = regex::Regex::new(r#"(?s)<tool\s+name="([^"]+)">(.*?)</tool>"#) else {
        return vec![Part::text(raw.trim())];
    };

    let mut parts = Vec::new();
    let mut cursor = 0;

    for caps in tag.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        let body = caps[2].trim();

        let before = raw[cursor..whole.start()].trim();
        if !before.is_empty() {
            parts.push(Part::text(before));
        }
        cursor = whole.end();

        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(output) => {
                if let Err(e) = registry.validate_output(name, &output) {
                    tracing::warn!(tool = name, error = %e, "tool output failed validation");
                }
                parts.push(Part::tool_output(name, output));
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool output is not valid JSON");
                parts.push(Part::tool_error(name, format!("invalid tool output: {e}")));
            }
        }
    }

    let tail = raw[cursor..].trim();
    if !tail.is_empty() || parts.is_empty() {
        parts.push(Part::text(tail));
    }

    parts
}

/// Invoke the tutor backend for one turn.
///
/// The transcript's last message is the pending student turn. Returns the
/// parsed assistant parts.
pub async fn invoke_tutor(
    model: &ModelConfig,
    transcript: &Transcript,
    registry: &ToolRegistry,
    timeout_secs: u64,
) -> Result<Vec<Part>, AgentError> {
    let attachments = transcript
        .last()
        .map(materialize_attachments)
        .transpose()?
        .unwrap_or_default();
    let prompt = build_prompt(transcript, registry, &attachments);

    let mut cmd = Command::new(&model.command_argv[0]);

    // Gemini CLI takes the prompt as a positional argument, not stdin.
    let uses_stdin = if model.name == "gemini" {
        cmd.arg(&prompt);
        false
    } else {
        for arg in &model.command_argv[1..] {
            cmd.arg(arg);
        }
        true
    };

    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(AgentError::Spawn)?;

    if uses_stdin {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(AgentError::Io)?;
            drop(stdin);
        }
    }

    let result = timeout(Duration::from_secs(timeout_secs), child.wait_with_output()).await;

    match result {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            if !output.status.success() {
                return Err(AgentError::Backend {
                    model: model.name.clone(),
                    detail: if stderr.trim().is_empty() { stdout } else { stderr },
                });
            }

            // Some CLIs write the reply to stderr.
            let reply = if stdout.trim().is_empty() { stderr } else { stdout };
            tracing::debug!(model = %model.name, bytes = reply.len(), "tutor reply received");
            Ok(parse_reply(&reply, registry))
        }
        Ok(Err(e)) => Err(AgentError::Io(e)),
        Err(_) => Err(AgentError::Timeout(model.name.clone())),
    }
}

/// Errors from the agent client.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Failed to start the backend process.
    #[error("failed to spawn backend: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O error talking to the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend exited with a failure status.
    #[error("{model} failed: {detail}")]
    Backend { model: String, detail: String },

    /// Backend did not answer within the timeout.
    #[error("{0} timed out")]
    Timeout(String),

    /// Attachment could not be decoded for the backend.
    #[error("attachment error: {0}")]
    Attachment(String),
}
