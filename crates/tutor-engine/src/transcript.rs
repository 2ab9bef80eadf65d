//! Transcript data model.
//!
//! A transcript is the append-only, ordered list of messages exchanged with
//! the tutor agent. Messages are immutable once appended, except for a tool
//! part's state which may only advance forward through its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student input.
    User,
    /// Tutor agent response.
    Assistant,
}

/// Lifecycle state of a tool part.
///
/// States only ever move forward: input-streaming, then input-available,
/// then one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolState {
    /// Arguments are still being produced.
    InputStreaming,
    /// Arguments are complete, the call has not finished.
    InputAvailable,
    /// The call finished and produced output.
    OutputAvailable,
    /// The call failed.
    OutputError,
}

impl ToolState {
    /// Position in the lifecycle, used to reject regressions.
    fn stage(self) -> u8 {
        match self {
            Self::InputStreaming => 0,
            Self::InputAvailable => 1,
            Self::OutputAvailable | Self::OutputError => 2,
        }
    }

    /// Whether a transition from `self` to `next` moves forward.
    pub fn can_advance_to(self, next: Self) -> bool {
        next.stage() > self.stage()
    }
}

/// One unit of content within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    /// Plain text.
    Text { text: String },
    /// An image reference (URI or data URI).
    Image { image: String },
    /// A structured tool call with lifecycle state.
    #[serde(rename_all = "camelCase")]
    Tool {
        tool_name: String,
        state: ToolState,
        #[serde(skip_serializing_if = "Option::is_none")]
        input: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        output: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_text: Option<String>,
    },
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image part from a URI.
    pub fn image(image: impl Into<String>) -> Self {
        Self::Image {
            image: image.into(),
        }
    }

    /// Create a completed tool part with output.
    pub fn tool_output(tool_name: impl Into<String>, output: serde_json::Value) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            state: ToolState::OutputAvailable,
            input: None,
            output: Some(output),
            error_text: None,
        }
    }

    /// Create a failed tool part.
    pub fn tool_error(tool_name: impl Into<String>, error_text: impl Into<String>) -> Self {
        Self::Tool {
            tool_name: tool_name.into(),
            state: ToolState::OutputError,
            input: None,
            output: None,
            error_text: Some(error_text.into()),
        }
    }
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID.
    pub id: String,
    /// Role of the author, fixed at creation.
    pub role: Role,
    /// Ordered content parts.
    pub parts: Vec<Part>,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh ID.
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            parts,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Part::text(text)])
    }

    /// Create an assistant message from parsed reply parts.
    pub fn assistant(parts: Vec<Part>) -> Self {
        Self::new(Role::Assistant, parts)
    }

    /// Concatenated text content, used when building follow-up prompts.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let Part::Text { text } = part {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
        out
    }
}

/// Append-only ordered store of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in store order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message.
    ///
    /// Rejects messages with no parts and messages whose ID is already
    /// present in the transcript.
    pub fn push(&mut self, message: Message) -> Result<(), TranscriptError> {
        if message.parts.is_empty() {
            return Err(TranscriptError::EmptyParts(message.id));
        }
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(TranscriptError::DuplicateId(message.id));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Whether the agent still owes a reply: the last message is from the
    /// user and no assistant message follows it.
    pub fn awaiting_reply(&self) -> bool {
        self.last().is_some_and(|m| m.role == Role::User)
    }

    /// Advance a tool part's state, optionally attaching output or an error.
    ///
    /// The only mutation a transcript permits. Transitions that do not move
    /// the state forward are rejected.
    pub fn advance_tool_state(
        &mut self,
        message_id: &str,
        part_index: usize,
        next: ToolState,
        new_output: Option<serde_json::Value>,
        new_error: Option<String>,
    ) -> Result<(), TranscriptError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| TranscriptError::UnknownMessage(message_id.to_string()))?;

        let part = message
            .parts
            .get_mut(part_index)
            .ok_or(TranscriptError::UnknownPart(part_index))?;

        let Part::Tool {
            state,
            output,
            error_text,
            ..
        } = part
        else {
            return Err(TranscriptError::NotAToolPart(part_index));
        };

        if !state.can_advance_to(next) {
            return Err(TranscriptError::StateRegression {
                from: *state,
                to: next,
            });
        }

        *state = next;
        if new_output.is_some() {
            *output = new_output;
        }
        if new_error.is_some() {
            *error_text = new_error;
        }
        Ok(())
    }
}

/// Errors that can occur when mutating a transcript.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    /// Message had no parts.
    #[error("message {0} has no parts")]
    EmptyParts(String),

    /// Message ID already present.
    #[error("duplicate message id: {0}")]
    DuplicateId(String),

    /// No message with the given ID.
    #[error("unknown message id: {0}")]
    UnknownMessage(String),

    /// Part index out of range.
    #[error("no part at index {0}")]
    UnknownPart(usize),

    /// The addressed part is not a tool call.
    #[error("part at index {0} is not a tool part")]
    NotAToolPart(usize),

    /// Tool state transitions may only move forward.
    #[error("tool state cannot move from {from:?} to {to:?}")]
    StateRegression { from: ToolState, to: ToolState },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_and_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user_text("first")).unwrap();
        transcript
            .push(Message::assistant(vec![Part::text("second")]))
            .unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].role, Role::User);
        assert_eq!(transcript.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut transcript = Transcript::new();
        let msg = Message::user_text("hello");
        let dup = msg.clone();
        transcript.push(msg).unwrap();

        let err = transcript.push(dup).unwrap_err();
        assert!(matches!(err, TranscriptError::DuplicateId(_)));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_empty_parts_rejected() {
        let mut transcript = Transcript::new();
        let err = transcript
            .push(Message::new(Role::User, Vec::new()))
            .unwrap_err();
        assert!(matches!(err, TranscriptError::EmptyParts(_)));
    }

    #[test]
    fn test_awaiting_reply() {
        let mut transcript = Transcript::new();
        assert!(!transcript.awaiting_reply());

        transcript.push(Message::user_text("I need help...")).unwrap();
        assert!(transcript.awaiting_reply());

        transcript
            .push(Message::assistant(vec![Part::text("Let's look at it.")]))
            .unwrap();
        assert!(!transcript.awaiting_reply());

        transcript.push(Message::user_text("Why?")).unwrap();
        assert!(transcript.awaiting_reply());
    }

    #[test]
    fn test_tool_state_moves_forward_only() {
        assert!(ToolState::InputStreaming.can_advance_to(ToolState::InputAvailable));
        assert!(ToolState::InputAvailable.can_advance_to(ToolState::OutputAvailable));
        assert!(ToolState::InputAvailable.can_advance_to(ToolState::OutputError));
        assert!(ToolState::InputStreaming.can_advance_to(ToolState::OutputError));

        assert!(!ToolState::OutputAvailable.can_advance_to(ToolState::InputAvailable));
        assert!(!ToolState::OutputAvailable.can_advance_to(ToolState::OutputError));
        assert!(!ToolState::InputAvailable.can_advance_to(ToolState::InputAvailable));
    }

    #[test]
    fn test_advance_tool_state() {
        let mut transcript = Transcript::new();
        let msg = Message::assistant(vec![Part::Tool {
            tool_name: "showConfidence".into(),
            state: ToolState::InputAvailable,
            input: Some(json!({"message": "..."})),
            output: None,
            error_text: None,
        }]);
        let id = msg.id.clone();
        transcript.push(msg).unwrap();

        transcript
            .advance_tool_state(
                &id,
                0,
                ToolState::OutputAvailable,
                Some(json!({"message": "Nice work"})),
                None,
            )
            .unwrap();

        // Regressing from a terminal state is rejected.
        let err = transcript
            .advance_tool_state(&id, 0, ToolState::InputStreaming, None, None)
            .unwrap_err();
        assert!(matches!(err, TranscriptError::StateRegression { .. }));
    }

    #[test]
    fn test_advance_rejects_non_tool_part() {
        let mut transcript = Transcript::new();
        let msg = Message::user_text("hello");
        let id = msg.id.clone();
        transcript.push(msg).unwrap();

        let err = transcript
            .advance_tool_state(&id, 0, ToolState::OutputAvailable, None, None)
            .unwrap_err();
        assert!(matches!(err, TranscriptError::NotAToolPart(0)));
    }

    #[test]
    fn test_part_wire_names() {
        let part = Part::Tool {
            tool_name: "showConfidence".into(),
            state: ToolState::OutputAvailable,
            input: None,
            output: Some(json!({"message": "Great effort"})),
            error_text: None,
        };
        let json = serde_json::to_string(&part).unwrap();
        assert!(json.contains(r#""type":"tool""#));
        assert!(json.contains(r#""toolName":"showConfidence""#));
        assert!(json.contains(r#""state":"output-available""#));

        let text = serde_json::to_string(&Part::text("hi")).unwrap();
        assert!(text.contains(r#""type":"text""#));
    }

    #[test]
    fn test_text_content_skips_non_text_parts() {
        let msg = Message::new(
            Role::User,
            vec![
                Part::text("line one"),
                Part::image("data:image/jpeg;base64,AAAA"),
                Part::text("line two"),
            ],
        );
        assert_eq!(msg.text_content(), "line one\nline two");
    }
}
