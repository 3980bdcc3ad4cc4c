//! Double-quoted string literal detection and content scoring.
//!
//! Operates on one line with the caret assumed at its end: the literal that
//! matters is the one still open at end of line, or the closed pair whose
//! closing quote ends the line. Quotes are paired left to right (0-1, 2-3,
//! ...), and a quote preceded by a backslash is skipped.

use serde::Serialize;

use crate::error::{ClassifyError, span};

/// Content with more than this share of CJK characters is treated as
/// non-Latin text. Exactly this share is still Latin.
pub const NON_LATIN_THRESHOLD: f64 = 0.30;

/// Minimum length of an identifier reported for a literal.
const MIN_IDENTIFIER_LEN: usize = 2;

/// CJK and fullwidth punctuation outside the block ranges below.
const CJK_PUNCTUATION: [char; 22] = [
    '\u{FF0C}', '\u{3002}', '\u{FF01}', '\u{FF1F}', '\u{FF1B}', '\u{FF1A}', // ，。！？；：
    '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{FF08}', '\u{FF09}', // “”‘’（）
    '\u{3010}', '\u{3011}', '\u{300A}', '\u{300B}', '\u{300E}', '\u{300F}', // 【】《》『』
    '\u{3014}', '\u{3015}', '\u{300C}', '\u{300D}', // 〔〕「」
];

/// A string literal found on the caret's line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    /// Best-effort name the literal is assigned or passed to.
    pub identifier: Option<String>,
    /// The literal's content without quotes.
    pub content: String,
    /// Whether a closing quote was found.
    pub closed: bool,
    /// Whether the content is predominantly CJK text.
    pub non_latin_dominant: bool,
}

/// Whether `c` is a CJK ideograph, CJK symbol, or fullwidth form.
pub fn is_non_latin_char(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{FF00}'..='\u{FFEF}' | '\u{3000}'..='\u{303F}')
        || CJK_PUNCTUATION.contains(&c)
}

/// Score `content` against [`NON_LATIN_THRESHOLD`].
///
/// Whitespace and backslashes are left out of the denominator.
pub fn is_non_latin_dominant(content: &str) -> bool {
    let mut non_latin = 0usize;
    let mut counted = 0usize;
    for c in content.chars() {
        if is_non_latin_char(c) {
            non_latin += 1;
        }
        if !c.is_whitespace() && c != '\\' {
            counted += 1;
        }
    }
    counted > 0 && (non_latin as f64 / counted as f64) > NON_LATIN_THRESHOLD
}

/// Last whitespace-separated word of `before` made only of alphanumerics
/// and `_`, at least two characters long.
pub fn extract_identifier(before: &str) -> Option<String> {
    before
        .split_whitespace()
        .rev()
        .find(|word| {
            word.chars().count() >= MIN_IDENTIFIER_LEN
                && word.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
        .map(str::to_string)
}

fn quote_positions(line: &[char]) -> Vec<usize> {
    line.iter()
        .enumerate()
        .filter(|&(i, &c)| c == '"' && (i == 0 || line[i - 1] != '\\'))
        .map(|(i, _)| i)
        .collect()
}

fn literal_at(
    line: &[char],
    open: usize,
    close: Option<usize>,
) -> Result<StringLiteral, ClassifyError> {
    let before: String = span(line, 0, open)?.iter().collect();
    let end = close.unwrap_or(line.len());
    let content: String = if open + 1 >= end {
        String::new()
    } else {
        span(line, open + 1, end)?.iter().collect()
    };
    Ok(StringLiteral {
        identifier: extract_identifier(before.trim()),
        non_latin_dominant: is_non_latin_dominant(&content),
        content,
        closed: close.is_some(),
    })
}

pub(crate) fn scan(line: &[char]) -> Result<Option<StringLiteral>, ClassifyError> {
    let quotes = quote_positions(line);
    match quotes.as_slice() {
        [] => Ok(None),
        [open] => literal_at(line, *open, None).map(Some),
        pairs => {
            let caret = line.len().saturating_sub(1);
            for pair in pairs.chunks_exact(2) {
                let (open, close) = (pair[0], pair[1]);
                if (open..=close).contains(&caret) {
                    return literal_at(line, open, Some(close)).map(Some);
                }
            }
            Ok(None)
        }
    }
}

/// Find the string literal spanning the end of `line`, if any.
pub fn detect_string_literal(line: &str) -> Result<Option<StringLiteral>, ClassifyError> {
    let chars: Vec<char> = line.chars().collect();
    scan(&chars)
}
