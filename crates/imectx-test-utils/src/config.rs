//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating TOML boilerplate across crate boundaries.

use imectx_config::{
    AppConfig, Area, FileTypeRuleConfig, InputMethod, MatchStrategy, PatternRuleConfig,
    StringRuleConfig,
};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .comment_method(InputMethod::English)
///     .file_type("md", InputMethod::Native)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn default_method(mut self, method: InputMethod) -> Self {
        self.config.switching.default_method = method;
        self
    }

    pub fn comment_method(mut self, method: InputMethod) -> Self {
        self.config.switching.comment_method = method;
        self
    }

    pub fn string_method(mut self, method: InputMethod) -> Self {
        self.config.switching.string_method = method;
        self
    }

    pub fn commit_file_name(mut self, name: &str) -> Self {
        self.config.git_commit.file_names.push(name.to_string());
        self
    }

    pub fn file_type(mut self, extension: &str, method: InputMethod) -> Self {
        self.config.file_types.push(FileTypeRuleConfig {
            extension: extension.to_string(),
            method,
            enabled: true,
        });
        self
    }

    pub fn string_rule(mut self, language: &str, expression: &str, method: InputMethod) -> Self {
        self.config.string_rules.push(StringRuleConfig {
            language: language.to_string(),
            expression: expression.to_string(),
            method,
        });
        self
    }

    /// Add a pattern rule applying to all areas and file types.
    pub fn pattern_rule(
        mut self,
        name: &str,
        left: Option<&str>,
        right: Option<&str>,
        method: InputMethod,
    ) -> Self {
        self.config.pattern_rules.push(PatternRuleConfig {
            name: name.to_string(),
            description: String::new(),
            left: left.map(str::to_string),
            right: right.map(str::to_string),
            strategy: MatchStrategy::Both,
            areas: vec![Area::All],
            file_types: Vec::new(),
            method,
            enabled: true,
        });
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
