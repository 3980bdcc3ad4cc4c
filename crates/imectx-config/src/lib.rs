#![deny(unsafe_code)]

//! Configuration loading, validation, and pattern rules for imectx.
//!
//! Loads TOML configuration files and validates them before use. Provides
//! the [`AppConfig`] type as the central configuration structure, and the
//! [`patterns`] module for caret-neighbourhood regex rules.

/// Regex rules matched against the text on either side of the caret.
pub mod patterns;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use patterns::{Area, MatchStrategy, PatternEngine, PatternRule};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("pattern rule {name:?} has an invalid regex: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// The input method an editor should switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    /// Latin keyboard layout.
    English,
    /// The user's native-language input method (e.g. Pinyin).
    Native,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMethod::English => write!(f, "english"),
            InputMethod::Native => write!(f, "native"),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-context input methods.
    #[serde(default)]
    pub switching: SwitchingConfig,

    /// How Git commit message buffers are recognised.
    #[serde(default)]
    pub git_commit: GitCommitConfig,

    /// Input method overrides for plain code, keyed by file extension.
    #[serde(default)]
    pub file_types: Vec<FileTypeRuleConfig>,

    /// Input method overrides for string literals assigned to known names.
    #[serde(default)]
    pub string_rules: Vec<StringRuleConfig>,

    /// Regex rules evaluated before context-based resolution.
    #[serde(default)]
    pub pattern_rules: Vec<PatternRuleConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which input method each detected context maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchingConfig {
    /// Used for plain code and whenever classification fails.
    #[serde(default = "default_code_method")]
    pub default_method: InputMethod,

    /// Used inside line and block comments, and in commit messages.
    #[serde(default = "default_prose_method")]
    pub comment_method: InputMethod,

    /// Used inside string literals whose content is mostly non-Latin.
    #[serde(default = "default_prose_method")]
    pub string_method: InputMethod,
}

impl Default for SwitchingConfig {
    fn default() -> Self {
        Self {
            default_method: default_code_method(),
            comment_method: default_prose_method(),
            string_method: default_prose_method(),
        }
    }
}

fn default_code_method() -> InputMethod {
    InputMethod::English
}

fn default_prose_method() -> InputMethod {
    InputMethod::Native
}

/// Rules for recognising Git commit message buffers by file name.
///
/// ## TOML Example
///
/// ```toml
/// [git_commit]
/// file_names = ["COMMIT_EDITMSG", "MERGE_MSG"]
/// suffixes = [".tmp"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitCommitConfig {
    /// A buffer whose name contains any of these is a commit message.
    #[serde(default = "default_commit_file_names")]
    pub file_names: Vec<String>,

    /// A buffer whose name ends with any of these is a commit message.
    #[serde(default = "default_commit_suffixes")]
    pub suffixes: Vec<String>,
}

impl Default for GitCommitConfig {
    fn default() -> Self {
        Self {
            file_names: default_commit_file_names(),
            suffixes: default_commit_suffixes(),
        }
    }
}

fn default_commit_file_names() -> Vec<String> {
    vec!["COMMIT_EDITMSG".to_string()]
}

fn default_commit_suffixes() -> Vec<String> {
    vec![".tmp".to_string()]
}

/// Default input method for code in files with a given extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeRuleConfig {
    /// File extension without the dot (e.g. "md"). Compared case-insensitively.
    pub extension: String,
    /// Input method for plain code in these files.
    pub method: InputMethod,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Input method for string literals in a language assigned to a matching name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringRuleConfig {
    /// Language id (e.g. "java", "kotlin").
    pub language: String,
    /// Identifier expression; `*` is a wildcard.
    #[serde(default = "default_expression")]
    pub expression: String,
    /// Input method to use.
    pub method: InputMethod,
}

fn default_expression() -> String {
    "*".to_string()
}

fn default_enabled() -> bool {
    true
}

/// A caret-neighbourhood regex rule as expressed in TOML.
///
/// ## TOML Example
///
/// ```toml
/// [[pattern_rules]]
/// name = "between-cjk"
/// left = '.*[一-龥]$'
/// right = '^[一-龥].*'
/// strategy = "both"
/// method = "native"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRuleConfig {
    /// Unique rule name, reported when the rule decides a switch.
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Pattern for the text left of the caret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,

    /// Pattern for the text right of the caret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,

    /// How the two sides combine when both are set.
    #[serde(default)]
    pub strategy: MatchStrategy,

    /// Contexts the rule applies to.
    #[serde(default = "default_areas")]
    pub areas: Vec<Area>,

    /// File extensions the rule is limited to (empty = all).
    #[serde(default)]
    pub file_types: Vec<String>,

    /// Input method to switch to on a match.
    pub method: InputMethod,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_areas() -> Vec<Area> {
    vec![Area::All]
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        if self.git_commit.file_names.is_empty() && self.git_commit.suffixes.is_empty() {
            return Err(ConfigError::Validation(
                "git_commit needs at least one file name or suffix".to_string(),
            ));
        }
        if self.git_commit.file_names.iter().any(String::is_empty)
            || self.git_commit.suffixes.iter().any(String::is_empty)
        {
            return Err(ConfigError::Validation(
                "git_commit entries must not be empty".to_string(),
            ));
        }

        for (i, rule) in self.file_types.iter().enumerate() {
            if rule.extension.trim_start_matches('.').is_empty() {
                return Err(ConfigError::Validation(format!(
                    "file_types[{i}].extension must not be empty"
                )));
            }
        }

        for (i, rule) in self.string_rules.iter().enumerate() {
            if rule.language.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "string_rules[{i}].language must not be empty"
                )));
            }
            if rule.expression.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "string_rules[{i}].expression must not be empty"
                )));
            }
        }

        for (i, rule) in self.pattern_rules.iter().enumerate() {
            if rule.name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pattern_rules[{i}].name must not be empty"
                )));
            }
            if rule.areas.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pattern_rules[{i}].areas must not be empty"
                )));
            }
            let blank = |p: &Option<String>| p.as_deref().is_none_or(|s| s.trim().is_empty());
            if blank(&rule.left) && blank(&rule.right) {
                return Err(ConfigError::Validation(format!(
                    "pattern_rules[{i}] needs a left or right pattern"
                )));
            }
        }

        // Surfaces regex errors at load time rather than on first keystroke.
        self.build_pattern_engine()?;

        Ok(())
    }

    /// Compile the configured pattern rules, preserving their order.
    pub fn build_pattern_engine(&self) -> Result<PatternEngine, ConfigError> {
        let rules = self
            .pattern_rules
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternEngine::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use test_log::test;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.switching.default_method, InputMethod::English);
        assert_eq!(config.switching.comment_method, InputMethod::Native);
        assert_eq!(config.switching.string_method, InputMethod::Native);
        assert_eq!(config.git_commit.file_names, vec!["COMMIT_EDITMSG"]);
        assert_eq!(config.git_commit.suffixes, vec![".tmp"]);
        assert!(config.pattern_rules.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.switching.default_method, InputMethod::English);
        assert_eq!(config.git_commit.file_names.len(), 1);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [logging]
            level = "debug"

            [switching]
            default_method = "english"
            comment_method = "english"
            string_method = "native"

            [git_commit]
            file_names = ["COMMIT_EDITMSG", "MERGE_MSG"]
            suffixes = []

            [[file_types]]
            extension = "md"
            method = "native"

            [[string_rules]]
            language = "java"
            expression = "msg*"
            method = "native"

            [[pattern_rules]]
            name = "between-cjk"
            left = '.*[一-龥]$'
            right = '^[一-龥].*'
            method = "native"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.switching.comment_method, InputMethod::English);
        assert_eq!(config.git_commit.file_names, vec!["COMMIT_EDITMSG", "MERGE_MSG"]);
        assert!(config.git_commit.suffixes.is_empty());
        assert_eq!(config.file_types.len(), 1);
        assert!(config.file_types[0].enabled);
        assert_eq!(config.string_rules[0].expression, "msg*");
        assert_eq!(config.pattern_rules[0].strategy, MatchStrategy::Both);
        assert_eq!(config.pattern_rules[0].areas, vec![Area::All]);
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_unknown_method_is_a_parse_error() {
        let toml = r#"
            [switching]
            comment_method = "klingon"
        "#;
        assert!(matches!(AppConfig::parse(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_rejects_empty_git_commit_rules() {
        let toml = r#"
            [git_commit]
            file_names = []
            suffixes = []
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_extension() {
        let toml = r#"
            [[file_types]]
            extension = "."
            method = "native"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_string_rule_language() {
        let toml = r#"
            [[string_rules]]
            language = ""
            method = "native"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_string_rule_expression_defaults_to_wildcard() {
        let toml = r#"
            [[string_rules]]
            language = "kotlin"
            method = "english"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.string_rules[0].expression, "*");
    }

    #[test]
    fn test_validation_rejects_pattern_rule_without_patterns() {
        let toml = r#"
            [[pattern_rules]]
            name = "nothing"
            left = "  "
            method = "native"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_unnamed_pattern_rule() {
        let toml = r#"
            [[pattern_rules]]
            name = ""
            left = "a$"
            method = "native"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_regex() {
        let toml = r#"
            [[pattern_rules]]
            name = "broken"
            left = "([a-z"
            method = "english"
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_build_pattern_engine_keeps_order() {
        let toml = r#"
            [[pattern_rules]]
            name = "first"
            left = "[A-Z]$"
            method = "english"

            [[pattern_rules]]
            name = "second"
            right = "^x"
            method = "native"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        let engine = config.build_pattern_engine().unwrap();
        let names: Vec<&str> = engine.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let toml = r#"
            [[pattern_rules]]
            name = "caps"
            left = '.*[A-Z]{2,}$'
            strategy = "either"
            areas = ["code", "comment"]
            method = "english"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed = AppConfig::parse(&rendered).unwrap();
        assert_eq!(reparsed.pattern_rules[0].areas, vec![Area::Code, Area::Comment]);
        assert_eq!(reparsed.pattern_rules[0].right, None);
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("imectx.toml");
        tokio::fs::write(&path, b"[switching]\ncomment_method = \"english\"\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.switching.comment_method, InputMethod::English);
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/imectx.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(result.is_err());
    }

    // ── Error display ─────────────────────────────────────────────────

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }

    #[test]
    fn test_input_method_display() {
        assert_eq!(InputMethod::English.to_string(), "english");
        assert_eq!(InputMethod::Native.to_string(), "native");
    }
}
