//! Input-method resolution: from a caret classification to a target method.
//!
//! [`SwitchSettings::resolve`] applies the per-context defaults plus the
//! file-type and string-scene overrides. [`Switcher`] puts the whole chain
//! together for a host editor: Git commit detection, classification, pattern
//! rules (which take priority), then context resolution.

use std::time::SystemTime;

use imectx_config::{AppConfig, Area, ConfigError, InputMethod, PatternEngine};
use regex::RegexBuilder;
use serde::Serialize;
use tracing::debug;

use crate::context::{ContextInfo, ContextKind, detect_context};
use crate::git::GitCommitRules;

/// Default input method for code in files with a given extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeRule {
    pub extension: String,
    pub method: InputMethod,
    pub enabled: bool,
}

/// Input method for string literals assigned to names matching `expression`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRule {
    pub language: String,
    pub expression: String,
    pub method: InputMethod,
}

/// A learned preference: the user switched to `method` inside a literal
/// assigned to `expression`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringHabit {
    pub language: String,
    pub expression: String,
    pub method: InputMethod,
    pub recorded_at: SystemTime,
}

/// Settings consulted when resolving a classification.
#[derive(Debug, Clone)]
pub struct SwitchSettings {
    pub default_method: InputMethod,
    pub comment_method: InputMethod,
    pub string_method: InputMethod,
    pub file_types: Vec<FileTypeRule>,
    pub string_rules: Vec<StringRule>,
    pub habits: Vec<StringHabit>,
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Match an identifier against a string-rule expression where `*` is a
/// wildcard. Comparison is case-insensitive and covers the whole identifier.
fn expression_matches(pattern: &str, identifier: &str) -> bool {
    if pattern == "*" || pattern == identifier {
        return true;
    }
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    RegexBuilder::new(&format!("^{}$", escaped.join(".*")))
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(identifier))
}

/// Text after the last `.` of `file_name`, or empty.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Language id for a file, used to key string rules and habits.
pub fn language_for_file(file_name: &str) -> Option<&'static str> {
    let ext = file_extension(file_name).to_ascii_lowercase();
    let lang = match ext.as_str() {
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "py" => "python",
        "go" => "go",
        "js" | "jsx" | "mjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "c" | "cc" | "cpp" | "h" | "hpp" => "c_cpp",
        "rs" => "rust",
        _ => return None,
    };
    Some(lang)
}

impl SwitchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_method: config.switching.default_method,
            comment_method: config.switching.comment_method,
            string_method: config.switching.string_method,
            file_types: config
                .file_types
                .iter()
                .map(|r| FileTypeRule {
                    extension: r.extension.trim_start_matches('.').to_string(),
                    method: r.method,
                    enabled: r.enabled,
                })
                .collect(),
            string_rules: config
                .string_rules
                .iter()
                .map(|r| StringRule {
                    language: r.language.clone(),
                    expression: r.expression.clone(),
                    method: r.method,
                })
                .collect(),
            habits: Vec::new(),
        }
    }

    /// Input method for plain code in a file with this extension.
    pub fn method_for_file_type(&self, extension: &str) -> InputMethod {
        self.file_types
            .iter()
            .find(|r| r.enabled && r.extension.eq_ignore_ascii_case(extension))
            .map_or(self.default_method, |r| r.method)
    }

    /// Input method configured or learned for literals assigned to
    /// `identifier` in `language`. Habits win over rules; `None` means
    /// nothing is configured.
    pub fn method_for_string(&self, language: &str, identifier: &str) -> Option<InputMethod> {
        if let Some(habit) = self.habits.iter().find(|h| {
            h.language.eq_ignore_ascii_case(language)
                && expression_matches(&h.expression, identifier)
        }) {
            return Some(habit.method);
        }
        self.string_rules
            .iter()
            .find(|r| {
                r.language.eq_ignore_ascii_case(language)
                    && expression_matches(&r.expression, identifier)
            })
            .map(|r| r.method)
    }

    /// Record or update the user's preference for literals assigned to
    /// `expression`.
    pub fn record_habit(&mut self, language: &str, expression: &str, method: InputMethod) {
        let now = SystemTime::now();
        match self.habits.iter_mut().find(|h| {
            h.language.eq_ignore_ascii_case(language)
                && h.expression.eq_ignore_ascii_case(expression)
        }) {
            Some(existing) => {
                existing.method = method;
                existing.recorded_at = now;
            }
            None => self.habits.push(StringHabit {
                language: language.to_string(),
                expression: expression.to_string(),
                method,
                recorded_at: now,
            }),
        }
        debug!(language, expression, %method, "recorded string habit");
    }

    /// Target input method for a classification in `file_name`.
    pub fn resolve(&self, info: &ContextInfo, file_name: &str) -> InputMethod {
        match info.kind {
            ContextKind::Default => self.method_for_file_type(file_extension(file_name)),
            ContextKind::Comment | ContextKind::GitCommit => self.comment_method,
            ContextKind::String => info
                .string_name
                .as_deref()
                .zip(language_for_file(file_name))
                .and_then(|(name, lang)| self.method_for_string(lang, name))
                .unwrap_or(self.string_method),
            ContextKind::Unknown => self.default_method,
        }
    }
}

/// What decided a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum DecisionSource {
    /// A pattern rule with this name matched around the caret.
    PatternRule { name: String },
    /// The classified context.
    Context,
}

/// Outcome of [`Switcher::decide`].
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub method: InputMethod,
    pub source: DecisionSource,
    pub context: ContextInfo,
}

/// Pattern-rule area for a context kind.
fn area_for(kind: ContextKind) -> Option<Area> {
    match kind {
        ContextKind::Default => Some(Area::Code),
        ContextKind::Comment => Some(Area::Comment),
        ContextKind::String => Some(Area::String),
        ContextKind::GitCommit | ContextKind::Unknown => None,
    }
}

/// A buffer split at the caret, as pattern rules see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretText<'a> {
    /// Everything before the caret.
    pub left: &'a str,
    /// Everything from the caret on.
    pub right: &'a str,
}

impl<'a> CaretText<'a> {
    /// Split `text` at character `offset`, clamped to the buffer.
    pub fn split(text: &'a str, offset: i64) -> Self {
        let chars = usize::try_from(offset).unwrap_or(0);
        let byte = text
            .char_indices()
            .nth(chars)
            .map_or(text.len(), |(b, _)| b);
        let (left, right) = text.split_at(byte);
        Self { left, right }
    }
}

/// Full decision chain for a host editor.
#[derive(Debug, Clone, Default)]
pub struct Switcher {
    settings: SwitchSettings,
    patterns: PatternEngine,
    git: GitCommitRules,
}

impl Switcher {
    pub fn new(settings: SwitchSettings, patterns: PatternEngine, git: GitCommitRules) -> Self {
        Self {
            settings,
            patterns,
            git,
        }
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            SwitchSettings::from_config(config),
            config.build_pattern_engine()?,
            GitCommitRules::from_config(&config.git_commit),
        ))
    }

    pub fn settings(&self) -> &SwitchSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SwitchSettings {
        &mut self.settings
    }

    /// Decide the input method for the caret at `offset` in buffer
    /// `file_name` holding `text`.
    ///
    /// Commit message buffers skip pattern rules.
    pub fn decide(&self, file_name: &str, text: &str, offset: i64) -> Decision {
        let is_git_commit = self.git.is_commit_buffer(file_name);
        let context = detect_context(text, is_git_commit, offset);

        if !is_git_commit && !self.patterns.is_empty() {
            let caret = CaretText::split(text, offset);
            let area = area_for(context.kind);
            if let Some(rule) = self.patterns.first_match(
                caret.left,
                caret.right,
                file_extension(file_name),
                area,
            ) {
                return Decision {
                    method: rule.method(),
                    source: DecisionSource::PatternRule {
                        name: rule.name().to_string(),
                    },
                    context,
                };
            }
        }

        let method = self.settings.resolve(&context, file_name);
        debug!(kind = %context.kind, %method, file_name, "resolved input method");
        Decision {
            method,
            source: DecisionSource::Context,
            context,
        }
    }
}
