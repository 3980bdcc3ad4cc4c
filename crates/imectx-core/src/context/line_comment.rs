//! `//` line comment detection.
//!
//! A quote only counts as escaped when the character right before it is a
//! backslash, so `"\\"` is mis-read as an unterminated string. Double and
//! single quotes toggle independent states; an apostrophe inside a string
//! still flips the character-literal state.

/// Scan a single line (no `\n`) for a `//` outside string and char literals.
pub(crate) fn scan(line: &[char]) -> bool {
    let leading = line.iter().take_while(|c| c.is_whitespace()).count();
    if line[leading..].starts_with(&['/', '/']) {
        return true;
    }

    let mut in_string = false;
    let mut in_char = false;
    for (i, &c) in line.iter().enumerate() {
        let escaped = i > 0 && line[i - 1] == '\\';
        match c {
            '"' if !escaped => in_string = !in_string,
            '\'' if !escaped => in_char = !in_char,
            '/' if !in_string && !in_char && line.get(i + 1) == Some(&'/') => return true,
            _ => {}
        }
    }
    false
}

/// Return `true` if `line` contains a `//` comment opener outside quoted
/// string and character literals.
pub fn has_line_comment(line: &str) -> bool {
    let chars: Vec<char> = line.chars().collect();
    scan(&chars)
}
