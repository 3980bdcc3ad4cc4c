//! Subcommand bodies. Each returns the text to print so it can be tested
//! without capturing stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context as _, Result};
use imectx_config::AppConfig;
use imectx_core::trace::TraceEntry;
use imectx_core::{ContextInfo, Decision, DecisionSource, GitCommitRules, Switcher, detect_context};
use tracing::info;

use crate::CaretArgs;

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

/// `imectx classify`
pub(crate) async fn classify(
    config: &AppConfig,
    caret: &CaretArgs,
    force_git_commit: bool,
) -> Result<String> {
    let text = read_document(&caret.file).await?;
    let name = caret.file.display().to_string();
    let is_git_commit =
        force_git_commit || GitCommitRules::from_config(&config.git_commit).is_commit_buffer(&name);
    info!(file = %name, offset = caret.offset, is_git_commit, "Classifying caret");

    let context = detect_context(&text, is_git_commit, caret.offset);
    render_context(&context, caret.json)
}

/// `imectx decide`
pub(crate) async fn decide(config: &AppConfig, caret: &CaretArgs) -> Result<String> {
    let text = read_document(&caret.file).await?;
    let switcher = Switcher::from_config(config)?;
    let name = caret.file.display().to_string();
    info!(file = %name, offset = caret.offset, "Resolving input method");

    let decision = switcher.decide(&name, &text, caret.offset);
    render_decision(&decision, caret.json)
}

/// `imectx config`
pub(crate) fn show_config(config: &AppConfig, path: &Path, show: bool) -> Result<String> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        Ok(format!("{toml_str}\n"))
    } else {
        Ok(format!(
            "Configuration at '{}' is valid ({} pattern rules).\n",
            path.display(),
            config.pattern_rules.len()
        ))
    }
}

pub(crate) fn render_context(context: &ContextInfo, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(context)?));
    }
    let mut out = format!("kind: {}\nreason: {}\n", context.kind, context.reason);
    if let Some(name) = &context.string_name {
        writeln!(out, "string_name: {name}")?;
    }
    Ok(out)
}

pub(crate) fn render_decision(decision: &Decision, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(decision)?));
    }
    let source = match &decision.source {
        DecisionSource::PatternRule { name } => format!("pattern rule '{name}'"),
        DecisionSource::Context => "context".to_string(),
    };
    let mut out = format!("method: {}\nsource: {source}\n", decision.method);
    out.push_str(&render_context(&decision.context, false)?);
    Ok(out)
}

/// Captured classifier events, one per line, for `--explain`.
pub(crate) fn render_trace(entries: &[TraceEntry]) -> String {
    let mut out = String::from("trace:\n");
    for entry in entries {
        let _ = writeln!(out, "  [{}] {entry}", entry.target);
    }
    out
}
