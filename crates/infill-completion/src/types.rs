//! Request and result types crossing the editor-host boundary

use serde::{Deserialize, Serialize};

/// A zero-based line/column cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    pub line: usize,
    /// Character offset within the line
    pub character: usize,
}

/// What caused the editor to ask for a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// The user explicitly invoked completion
    Invoked,
    /// An auto-suggest character was typed
    AutoSuggest,
}

/// Immutable view of one open document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub path: String,
    pub language_id: String,
    pub text: String,
}

impl DocumentSnapshot {
    pub fn new(
        path: impl Into<String>,
        language_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    /// Document text split on `\n`; a trailing newline yields a final empty line
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

/// One completion request from the editor host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The document being edited
    pub document: DocumentSnapshot,
    pub position: Position,
    pub trigger: TriggerKind,
    /// Other open documents, candidates for file-level context
    #[serde(default)]
    pub open_documents: Vec<DocumentSnapshot>,
}

/// Text immediately surrounding the cursor, bounded by the context window
///
/// Immutable once computed for a request; the prefix ends exactly at the
/// cursor column and the suffix starts exactly there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
    pub prefix: String,
    pub suffix: String,
}

/// The final value handed back to the editor host
///
/// `text` is already safe to insert at `position` without further edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub position: Position,
    pub text: String,
}
