//! Errors raised while scanning a buffer.
//!
//! Classification never surfaces these to callers of
//! [`detect_context`](crate::detect_context); they become
//! [`ContextKind::Unknown`](crate::ContextKind::Unknown) there.

/// A classification failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("span {start}..{end} is outside a {len}-character buffer")]
    Span { start: usize, end: usize, len: usize },
}

/// Checked sub-slice of a character buffer.
pub(crate) fn span(chars: &[char], start: usize, end: usize) -> Result<&[char], ClassifyError> {
    chars.get(start..end).ok_or(ClassifyError::Span {
        start,
        end,
        len: chars.len(),
    })
}
