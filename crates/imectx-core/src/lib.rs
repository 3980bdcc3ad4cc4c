#![deny(unsafe_code)]

//! imectx core: caret context classification.
//!
//! Decides, for a caret offset inside a source buffer, whether the caret sits
//! in code, a line comment, a block comment, a string literal, or a Git commit
//! message, and maps that classification to the input method an editor should
//! switch to. Everything here is synchronous and pure over its arguments; the
//! only side effect is `tracing` events, which go nowhere unless a subscriber
//! is installed.

/// Context classifier: line extraction, comment and string detection.
pub mod context;
/// Classification failure type.
pub mod error;
/// Git commit message buffer recognition.
pub mod git;
/// Input-method resolution from a classification plus user settings.
pub mod switching;
/// Capture of classifier trace events for `--explain` style output.
pub mod trace;

pub use context::{ContextInfo, ContextKind, detect_context};
pub use error::ClassifyError;
pub use git::GitCommitRules;
pub use imectx_config::InputMethod;
pub use switching::{CaretText, Decision, DecisionSource, SwitchSettings, Switcher};
pub use trace::{TraceCollector, TraceReader};
