//! Loading and validation of `sharp.toml`, plus the tracing setup shared by hosts.
//!
//! ```toml
//! [language]
//! version = "7.3"
//!
//! [refactorings]
//! merge_if_statements = false
//! RR0038 = true
//!
//! [logging]
//! level = "debug"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sharp_refactor::{CSharpLanguageVersion, RefactoringId, RefactoringSettings};
use thiserror::Error;

mod diagnostics;
mod logging;
mod schema;
mod validation;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};
pub use logging::{global_log_buffer, init_tracing, LogBuffer};
pub use schema::json_schema;

/// File names looked up by [`discover_config_path`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["sharp.toml", ".sharp.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SharpConfig {
    #[serde(default)]
    pub language: LanguageConfig,

    /// Per-refactoring switches, keyed by id (`RR0075`) or config key
    /// (`merge_if_statements`).
    #[serde(default)]
    #[schemars(schema_with = "schema::refactorings_schema")]
    pub refactorings: RefactoringsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LanguageConfig {
    /// C# language version of the documents: `"6"`, `"7.3"`, `"latest"`, ...
    ///
    /// Unset means the latest version the parser knows.
    #[serde(default)]
    pub version: Option<String>,
}

impl LanguageConfig {
    /// The configured version, falling back to [`CSharpLanguageVersion::LATEST`] when unset
    /// or unparseable.
    pub fn version(&self) -> CSharpLanguageVersion {
        self.version
            .as_deref()
            .and_then(CSharpLanguageVersion::parse)
            .unwrap_or(CSharpLanguageVersion::LATEST)
    }
}

/// Overrides on top of each refactoring's default state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RefactoringsConfig {
    pub overrides: BTreeMap<String, bool>,
}

impl RefactoringsConfig {
    /// The explicit setting for `id`, if any.
    ///
    /// An entry keyed by id wins over one keyed by config key.
    pub fn get(&self, id: RefactoringId) -> Option<bool> {
        let mut by_config_key = None;
        for (key, enabled) in &self.overrides {
            if RefactoringId::parse(key) != Some(id) {
                continue;
            }
            if key.trim().eq_ignore_ascii_case(id.id()) {
                return Some(*enabled);
            }
            by_config_key = Some(*enabled);
        }
        by_config_key
    }

    pub fn set(&mut self, id: RefactoringId, enabled: bool) {
        self.overrides.insert(id.config_key().to_owned(), enabled);
    }

    /// Keys that name no refactoring.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.overrides
            .keys()
            .map(String::as_str)
            .filter(|key| RefactoringId::parse(key).is_none())
    }
}

impl RefactoringSettings for RefactoringsConfig {
    fn is_enabled(&self, id: RefactoringId) -> bool {
        self.get(id).unwrap_or_else(|| id.enabled_by_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for all sharp targets, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr in addition to the in-memory buffer.
    #[serde(default)]
    pub stderr: bool,

    /// Append logs to this file. If it cannot be opened the other sinks stay active.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,

    /// Number of log lines kept in memory for bug reports.
    #[serde(default = "LoggingConfig::default_buffer_lines")]
    #[schemars(range(min = 1))]
    pub buffer_lines: usize,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_buffer_lines() -> usize {
        2_000
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" | "none" => "off".to_owned(),
            // Anything else is an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    pub(crate) fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level with `RUST_LOG` merged on top.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                let config_directives = Self::normalize_level_directives(&self.level);
                tracing_subscriber::EnvFilter::try_new(format!(
                    "{config_directives},{env_directives}"
                ))
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: false,
            file: None,
            buffer_lines: Self::default_buffer_lines(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // `Display` renders a source snippet; keep just the message.
        ConfigError::Toml(err.message().trim().to_owned())
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

impl SharpConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file and report unknown keys and invalid values alongside it.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<SharpConfig>(text)?;

        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            warnings: config.validate(),
        };
        for warning in &diagnostics.warnings {
            tracing::warn!(target: "sharp.config", warning = %warning, "invalid config value");
        }
        Ok((config, diagnostics))
    }

    pub fn language_version(&self) -> CSharpLanguageVersion {
        self.language.version()
    }
}

/// The config file of `workspace_root`, if one of [`CONFIG_FILE_NAMES`] exists there.
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
}

/// Load the configuration for a workspace root.
///
/// If no config is present, returns [`SharpConfig::default`] and `None`.
pub fn load_for_workspace(
    workspace_root: &Path,
) -> Result<(SharpConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        return Ok((SharpConfig::default(), None));
    };
    let config = SharpConfig::load_from_path(&path)?;
    Ok((config, Some(path)))
}

pub fn load_for_workspace_with_diagnostics(
    workspace_root: &Path,
) -> Result<(SharpConfig, Option<PathBuf>, ConfigDiagnostics), ConfigError> {
    let Some(path) = discover_config_path(workspace_root) else {
        return Ok((SharpConfig::default(), None, ConfigDiagnostics::default()));
    };
    let (config, diagnostics) = SharpConfig::load_from_path_with_diagnostics(&path)?;
    Ok((config, Some(path), diagnostics))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: SharpConfig = toml::from_str("").expect("parse");
        assert_eq!(config, SharpConfig::default());
        assert_eq!(config.language_version(), CSharpLanguageVersion::LATEST);
        assert_eq!(config.logging.level, "info");
        for id in RefactoringId::ALL {
            assert_eq!(config.refactorings.is_enabled(*id), id.enabled_by_default());
        }
    }

    #[test]
    fn overrides_by_id_and_config_key() {
        let config: SharpConfig = toml::from_str(
            r#"
[refactorings]
merge_if_statements = false
RR0038 = true
"#,
        )
        .expect("parse");

        assert!(!config.refactorings.is_enabled(RefactoringId::MergeIfStatements));
        assert!(config.refactorings.is_enabled(RefactoringId::ExpandInitializer));
        assert!(config.refactorings.is_enabled(RefactoringId::SplitAttributes));
    }

    #[test]
    fn id_entry_wins_over_config_key_entry() {
        let mut refactorings = RefactoringsConfig::default();
        refactorings
            .overrides
            .insert("merge_if_statements".to_owned(), true);
        refactorings.overrides.insert("RR0075".to_owned(), false);
        assert_eq!(refactorings.get(RefactoringId::MergeIfStatements), Some(false));

        refactorings.set(RefactoringId::SplitAttributes, false);
        assert_eq!(refactorings.get(RefactoringId::SplitAttributes), Some(false));
        assert_eq!(refactorings.get(RefactoringId::MergeAttributes), None);
    }

    #[test]
    fn language_version_parses_aliases() {
        let config: SharpConfig =
            toml::from_str("[language]\nversion = \"7.3\"\n").expect("parse");
        assert_eq!(config.language_version(), CSharpLanguageVersion::CSHARP_7_3);

        let config: SharpConfig =
            toml::from_str("[language]\nversion = \"latest\"\n").expect("parse");
        assert_eq!(config.language_version(), CSharpLanguageVersion::LATEST);
    }

    #[test]
    fn logging_level_normalizes_simple_levels() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("warn,sharp.refactor=trace"),
            "warn,sharp.refactor=trace"
        );
    }

    #[test]
    fn toml_errors_do_not_include_snippets() {
        let err = SharpConfig::load_from_str_with_diagnostics("[logging]\njson = \"yes\"\n")
            .expect_err("invalid type");
        let message = err.to_string();
        assert!(message.starts_with("failed to parse toml config: "), "{message}");
        assert!(!message.contains('|'), "{message}");
    }
}
