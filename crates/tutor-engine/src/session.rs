//! Session persistence.
//!
//! A session records one tutoring conversation as a JSONL file: a metadata
//! line first, then one line per message.

use crate::transcript::{Message, Transcript};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// A tutoring session: a transcript plus identity and the problem image.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session ID.
    pub id: String,
    /// Digest of the captured problem image, if any.
    pub image_digest: Option<String>,
    /// Conversation so far.
    pub transcript: Transcript,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            image_digest: None,
            transcript: Transcript::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the problem-image digest for this session.
    pub fn set_image_digest(&mut self, digest: impl Into<String>) {
        self.image_digest = Some(digest.into());
        self.updated_at = Utc::now();
    }

    /// Save the session as a JSONL file under `sessions_dir`.
    pub fn save(&self, sessions_dir: &Path) -> Result<(), SessionError> {
        use std::io::Write as _;

        std::fs::create_dir_all(sessions_dir).map_err(SessionError::Io)?;
        let path = sessions_dir.join(format!("{}.jsonl", self.id));
        let mut file = std::fs::File::create(&path).map_err(SessionError::Io)?;

        let metadata = SessionMetadata {
            id: self.id.clone(),
            image_digest: self.image_digest.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        let meta_json = serde_json::to_string(&metadata).map_err(SessionError::Serialize)?;
        writeln!(file, "{meta_json}").map_err(SessionError::Io)?;

        for msg in self.transcript.messages() {
            let json = serde_json::to_string(msg).map_err(SessionError::Serialize)?;
            writeln!(file, "{json}").map_err(SessionError::Io)?;
        }

        Ok(())
    }

    /// Load a session by ID from `sessions_dir`.
    pub fn load(sessions_dir: &Path, session_id: &str) -> Result<Self, SessionError> {
        let path = sessions_dir.join(format!("{session_id}.jsonl"));
        let content = std::fs::read_to_string(&path).map_err(SessionError::Io)?;

        let mut lines = content.lines();
        let meta_line = lines.next().ok_or(SessionError::EmptySession)?;
        let metadata: SessionMetadata =
            serde_json::from_str(meta_line).map_err(SessionError::Parse)?;

        let mut transcript = Transcript::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let msg: Message = serde_json::from_str(line).map_err(SessionError::Parse)?;
            transcript
                .push(msg)
                .map_err(|e| SessionError::Corrupt(e.to_string()))?;
        }

        Ok(Self {
            id: metadata.id,
            image_digest: metadata.image_digest,
            transcript,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
        })
    }

    /// List all session IDs under `sessions_dir`, newest first.
    pub fn list(sessions_dir: &Path) -> Result<Vec<String>, SessionError> {
        if !sessions_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(sessions_dir).map_err(SessionError::Io)? {
            let entry = entry.map_err(SessionError::Io)?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "jsonl") {
                if let Some(stem) = path.file_stem() {
                    let modified = entry.metadata().and_then(|m| m.modified()).ok();
                    entries.push((modified, stem.to_string_lossy().to_string()));
                }
            }
        }

        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries.into_iter().map(|(_, id)| id).collect())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session metadata (first line of the JSONL file).
#[derive(Debug, Serialize, Deserialize)]
struct SessionMetadata {
    id: String,
    image_digest: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Session file is empty.
    #[error("session file is empty")]
    EmptySession,

    /// Stored transcript violates an invariant.
    #[error("corrupt session: {0}")]
    Corrupt(String),
}
