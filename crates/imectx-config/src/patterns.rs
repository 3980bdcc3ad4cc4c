//! Pattern rule engine: regex rules on the text around the caret.
//!
//! A rule inspects the text left of the caret, the text right of it, or
//! both, and names the [`InputMethod`] to switch to when it matches. The
//! [`PatternEngine`] evaluates rules in configuration order and the first
//! match wins.
//!
//! Whole-text versus substring matching follows the anchors the user wrote:
//! a left pattern containing `$` must match the entire left text, a right
//! pattern containing `^` must match the entire right text. Anything else is
//! a substring search.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{ConfigError, InputMethod, PatternRuleConfig};

/// How the left and right patterns combine when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Both sides must match.
    #[default]
    Both,
    /// Either side matching is enough.
    Either,
}

/// The editing area a rule is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    All,
    Code,
    Comment,
    String,
}

/// One side of a rule, compiled for the matching mode its source asks for.
#[derive(Debug, Clone)]
struct SidePattern {
    source: String,
    regex: Regex,
}

impl SidePattern {
    fn compile(name: &str, source: &str, whole_text: bool) -> Result<Self, ConfigError> {
        let anchored = if whole_text {
            format!("^(?:{source})$")
        } else {
            source.to_string()
        };
        let regex = Regex::new(&anchored).map_err(|e| ConfigError::Pattern {
            name: name.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    fn is_match(&self, text: &str) -> bool {
        !text.is_empty() && self.regex.is_match(text)
    }
}

/// A compiled pattern rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    left: Option<SidePattern>,
    right: Option<SidePattern>,
    strategy: MatchStrategy,
    areas: Vec<Area>,
    file_types: Vec<String>,
    method: InputMethod,
    enabled: bool,
}

impl PatternRule {
    /// Compile a rule from its TOML form.
    pub fn compile(config: &PatternRuleConfig) -> Result<Self, ConfigError> {
        let side = |pattern: &Option<String>, anchor: char| -> Result<_, ConfigError> {
            match pattern.as_deref() {
                Some(p) if !p.trim().is_empty() => {
                    SidePattern::compile(&config.name, p, p.contains(anchor)).map(Some)
                }
                _ => Ok(None),
            }
        };

        Ok(Self {
            name: config.name.clone(),
            left: side(&config.left, '$')?,
            right: side(&config.right, '^')?,
            strategy: config.strategy,
            areas: config.areas.clone(),
            file_types: config.file_types.clone(),
            method: config.method,
            enabled: config.enabled,
        })
    }

    /// The rule's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The input method this rule selects.
    pub fn method(&self) -> InputMethod {
        self.method
    }

    fn applies_to(&self, file_type: &str, area: Option<Area>) -> bool {
        if !self.file_types.is_empty()
            && !self
                .file_types
                .iter()
                .any(|ft| ft.eq_ignore_ascii_case(file_type))
        {
            return false;
        }
        if self.areas.contains(&Area::All) {
            return true;
        }
        area.is_some_and(|a| self.areas.contains(&a))
    }

    /// Check the rule against the text around the caret.
    ///
    /// `area` is the classified context at the caret; `None` (commit
    /// messages, failed classification) only satisfies rules that apply to
    /// all areas.
    pub fn matches(
        &self,
        left_text: &str,
        right_text: &str,
        file_type: &str,
        area: Option<Area>,
    ) -> bool {
        if !self.enabled || !self.applies_to(file_type, area) {
            return false;
        }

        let left = self
            .left
            .as_ref()
            .map(|p| p.is_match(left_text.trim_end_matches(['\n', '\r'])));
        let right = self
            .right
            .as_ref()
            .map(|p| p.is_match(right_text.trim_start_matches(['\n', '\r'])));

        let result = match (left, right) {
            (None, None) => false,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (Some(l), Some(r)) => match self.strategy {
                MatchStrategy::Both => l && r,
                MatchStrategy::Either => l || r,
            },
        };

        trace!(
            rule = %self.name,
            left_pattern = self.left.as_ref().map(|p| p.source.as_str()),
            right_pattern = self.right.as_ref().map(|p| p.source.as_str()),
            ?left,
            ?right,
            result,
            "evaluated pattern rule"
        );
        result
    }
}

/// Ordered set of compiled pattern rules.
#[derive(Debug, Clone, Default)]
pub struct PatternEngine {
    rules: Vec<PatternRule>,
}

impl PatternEngine {
    /// Create an engine from rules already in evaluation order.
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Return the first rule matching the caret neighbourhood.
    pub fn first_match(
        &self,
        left_text: &str,
        right_text: &str,
        file_type: &str,
        area: Option<Area>,
    ) -> Option<&PatternRule> {
        let found = self
            .rules
            .iter()
            .find(|rule| rule.matches(left_text, right_text, file_type, area));
        if let Some(rule) = found {
            debug!(rule = %rule.name, method = %rule.method, "pattern rule matched");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn rule(left: Option<&str>, right: Option<&str>, strategy: MatchStrategy) -> PatternRule {
        PatternRule::compile(&PatternRuleConfig {
            name: "test".to_string(),
            description: String::new(),
            left: left.map(str::to_string),
            right: right.map(str::to_string),
            strategy,
            areas: vec![Area::All],
            file_types: Vec::new(),
            method: InputMethod::Native,
            enabled: true,
        })
        .unwrap()
    }

    #[test]
    fn test_between_cjk_characters() {
        let r = rule(Some(".*[一-龥]$"), Some("^[一-龥].*"), MatchStrategy::Both);
        assert!(r.matches("val s = \"你", "好\"", "kt", Some(Area::String)));
        assert!(!r.matches("val s = \"a", "好\"", "kt", Some(Area::String)));
        assert!(!r.matches("val s = \"你", "b\"", "kt", Some(Area::String)));
    }

    #[test]
    fn test_either_strategy() {
        let r = rule(Some(".*[A-Z]$"), Some("^[A-Z].*"), MatchStrategy::Either);
        assert!(r.matches("FOO", "bar", "rs", Some(Area::Code)));
        assert!(r.matches("foo", "BAR", "rs", Some(Area::Code)));
        assert!(!r.matches("foo", "bar", "rs", Some(Area::Code)));
    }

    #[test]
    fn test_left_only_rule() {
        let r = rule(Some(".*[A-Z]{2,}$"), None, MatchStrategy::Either);
        assert!(r.matches("let X = AB", "", "rs", Some(Area::Code)));
        assert!(!r.matches("let X = Ab", "", "rs", Some(Area::Code)));
    }

    #[test]
    fn test_dollar_anchor_requires_whole_line_match() {
        // `.` does not cross newlines, so a whole-text match fails on
        // multi-line left text even when the last line would match.
        let r = rule(Some(".*[A-Z]$"), None, MatchStrategy::Both);
        assert!(!r.matches("first\nSECOND", "", "rs", Some(Area::Code)));
        assert!(r.matches("SECOND\n", "", "rs", Some(Area::Code)));
    }

    #[test]
    fn test_unanchored_pattern_is_substring_search() {
        let r = rule(Some("static"), None, MatchStrategy::Both);
        assert!(r.matches("public static void", "", "java", Some(Area::Code)));
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_the_pattern() {
        let r = rule(Some(" $"), None, MatchStrategy::Both);
        assert!(r.matches(" ", "", "rs", Some(Area::Code)));
        assert!(!r.matches("x", "", "rs", Some(Area::Code)));

        let r = rule(Some("= "), None, MatchStrategy::Both);
        assert!(r.matches("let a = ", "", "rs", Some(Area::Code)));
        assert!(!r.matches("let a =", "", "rs", Some(Area::Code)));

        // A whitespace-only pattern still counts as absent.
        let r = rule(Some("  "), Some("x"), MatchStrategy::Both);
        assert!(r.matches("  ", "x", "rs", Some(Area::Code)));
        assert!(r.matches("no gap", "x", "rs", Some(Area::Code)));
    }

    #[test]
    fn test_empty_side_text_never_matches() {
        let r = rule(None, Some("x"), MatchStrategy::Both);
        assert!(!r.matches("abc", "", "rs", Some(Area::Code)));
        assert!(!r.matches("abc", "\n", "rs", Some(Area::Code)));
    }

    #[test]
    fn test_area_and_file_type_restrictions() {
        let r = PatternRule::compile(&PatternRuleConfig {
            name: "java-keywords".to_string(),
            description: String::new(),
            left: Some(".*(private|static).*".to_string()),
            right: None,
            strategy: MatchStrategy::Either,
            areas: vec![Area::Code],
            file_types: vec!["java".to_string()],
            method: InputMethod::English,
            enabled: true,
        })
        .unwrap();
        assert!(r.matches("private ", "", "JAVA", Some(Area::Code)));
        assert!(!r.matches("private ", "", "kt", Some(Area::Code)));
        assert!(!r.matches("private ", "", "java", Some(Area::Comment)));
        assert!(!r.matches("private ", "", "java", None));
    }

    #[test]
    fn test_disabled_rule_never_matches() {
        let mut config = PatternRuleConfig {
            name: "off".to_string(),
            description: String::new(),
            left: Some("a".to_string()),
            right: None,
            strategy: MatchStrategy::Both,
            areas: vec![Area::All],
            file_types: Vec::new(),
            method: InputMethod::English,
            enabled: false,
        };
        assert!(!PatternRule::compile(&config).unwrap().matches("a", "", "rs", None));
        config.enabled = true;
        assert!(PatternRule::compile(&config).unwrap().matches("a", "", "rs", None));
    }

    #[test]
    fn test_first_match_wins() {
        let mut first = rule(Some("a"), None, MatchStrategy::Both);
        first.name = "first".to_string();
        let mut second = rule(Some("a"), None, MatchStrategy::Both);
        second.name = "second".to_string();
        let engine = PatternEngine::new(vec![first, second]);

        let hit = engine.first_match("a", "", "rs", Some(Area::Code)).unwrap();
        assert_eq!(hit.name(), "first");
        assert!(engine.first_match("b", "", "rs", Some(Area::Code)).is_none());
    }

    #[test]
    fn test_invalid_regex_reports_rule_name() {
        let err = PatternRule::compile(&PatternRuleConfig {
            name: "broken".to_string(),
            description: String::new(),
            left: Some("(".to_string()),
            right: None,
            strategy: MatchStrategy::Both,
            areas: vec![Area::All],
            file_types: Vec::new(),
            method: InputMethod::English,
            enabled: true,
        })
        .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
