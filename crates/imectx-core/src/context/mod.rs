//! Context classifier: what lexical context the caret sits in.
//!
//! The classifier is a strict decision chain over four text scanners:
//!
//! ```text
//!  empty / invalid ──▶ Default
//!  git commit buffer ─▶ GitCommit
//!  current line ──┬──▶ string literal ──▶ String (non-Latin) | Default (Latin)
//!                 ├──▶ `//` comment ────▶ Comment
//!  full text ─────┴──▶ `/* */` depth ───▶ Comment
//!  otherwise ─────────────────────────▶ Default
//! ```
//!
//! Every call re-scans the buffer from the start; nothing is cached between
//! caret movements. All offsets are character (Unicode scalar) indices.

pub mod block_comment;
pub mod line;
pub mod line_comment;
pub mod string_literal;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ClassifyError;

pub use block_comment::is_inside_block_comment;
pub use line::current_line;
pub use line_comment::has_line_comment;
pub use string_literal::{
    NON_LATIN_THRESHOLD, StringLiteral, detect_string_literal, extract_identifier,
    is_non_latin_char, is_non_latin_dominant,
};

/// The kind of context at the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Plain code, or a string literal whose content is mostly Latin.
    Default,
    /// Inside a `//` line comment or a `/* */` block comment.
    Comment,
    /// Inside a string literal whose content is mostly non-Latin.
    String,
    /// The buffer is a Git commit message.
    GitCommit,
    /// Classification failed.
    Unknown,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Default => write!(f, "default"),
            ContextKind::Comment => write!(f, "comment"),
            ContextKind::String => write!(f, "string"),
            ContextKind::GitCommit => write!(f, "git_commit"),
            ContextKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of classifying a caret position.
///
/// Two values compare equal when their [`kind`](Self::kind) does; the other
/// fields are descriptive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextInfo {
    pub kind: ContextKind,
    /// Human-readable explanation. Not meant to be parsed.
    pub reason: String,
    /// Identifier preceding a detected string literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_name: Option<String>,
    /// Reserved for hosts that classify tool windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_window_type: Option<String>,
    /// Reserved for hosts that report the custom rule which fired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rule_name: Option<String>,
}

impl ContextInfo {
    pub fn new(kind: ContextKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            string_name: None,
            tool_window_type: None,
            custom_rule_name: None,
        }
    }

    /// Attach the identifier of a detected string literal.
    pub fn with_string_name(mut self, name: Option<String>) -> Self {
        self.string_name = name;
        self
    }
}

impl PartialEq for ContextInfo {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ContextInfo {}

fn classify(chars: &[char], offset: usize) -> Result<ContextInfo, ClassifyError> {
    let (_, line) = line::line_at(chars, offset)?;
    debug!(line = %line.iter().collect::<String>(), "current line");

    if let Some(lit) = string_literal::scan(line)? {
        let name = lit.identifier.as_deref().unwrap_or("-");
        let info = if lit.non_latin_dominant {
            ContextInfo::new(ContextKind::String, format!("non-Latin string: {name}"))
        } else {
            ContextInfo::new(ContextKind::Default, format!("Latin string: {name}"))
        };
        return Ok(info.with_string_name(lit.identifier));
    }

    if line_comment::scan(line) {
        return Ok(ContextInfo::new(ContextKind::Comment, "line comment"));
    }

    if block_comment::scan(chars, offset)? {
        return Ok(ContextInfo::new(ContextKind::Comment, "block comment"));
    }

    Ok(ContextInfo::new(ContextKind::Default, "code region"))
}

/// Classify the caret at character `offset` in `text`.
///
/// Offsets past the end are clamped to the end. Empty text or an offset of
/// zero or less yields [`ContextKind::Default`] without further analysis; a
/// Git commit buffer yields [`ContextKind::GitCommit`] without looking at the
/// text. Internal failures are reported as [`ContextKind::Unknown`] rather
/// than returned.
pub fn detect_context(text: &str, is_git_commit: bool, offset: i64) -> ContextInfo {
    debug!(
        text_len = text.len(),
        is_git_commit, offset, "detecting caret context"
    );

    if text.is_empty() || offset <= 0 {
        debug!(kind = %ContextKind::Default, "empty text or invalid offset");
        return ContextInfo::new(ContextKind::Default, "empty text or invalid offset");
    }

    if is_git_commit {
        debug!(kind = %ContextKind::GitCommit, "git commit buffer");
        return ContextInfo::new(ContextKind::GitCommit, "git commit message");
    }

    let chars: Vec<char> = text.chars().collect();
    let safe = usize::try_from(offset).map_or(chars.len(), |o| o.min(chars.len()));

    match classify(&chars, safe) {
        Ok(info) => {
            debug!(kind = %info.kind, reason = %info.reason, "classified");
            info
        }
        Err(e) => {
            warn!(error = %e, "caret classification failed");
            ContextInfo::new(ContextKind::Unknown, format!("classification failed: {e}"))
        }
    }
}
