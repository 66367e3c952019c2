use sharp_refactor::{CSharpLanguageVersion, RefactoringId};

use crate::diagnostics::ConfigWarning;
use crate::{LoggingConfig, SharpConfig};

impl SharpConfig {
    /// Semantic checks that deserialization cannot express.
    ///
    /// Every problem is recoverable: the affected setting falls back to its default.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();
        validate_language(self, &mut out);
        validate_refactorings(self, &mut out);
        validate_logging(self, &mut out);
        out
    }
}

fn validate_language(config: &SharpConfig, out: &mut Vec<ConfigWarning>) {
    let Some(version) = config.language.version.as_deref() else {
        return;
    };
    if CSharpLanguageVersion::parse(version).is_none() {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "language.version".to_owned(),
            message: format!(
                "unknown C# version {version:?}; using {}",
                CSharpLanguageVersion::LATEST
            ),
        });
    }
}

fn validate_refactorings(config: &SharpConfig, out: &mut Vec<ConfigWarning>) {
    let overrides = &config.refactorings.overrides;
    out.extend(
        config
            .refactorings
            .unknown_keys()
            .map(|key| ConfigWarning::UnknownRefactoring {
                key: key.to_owned(),
            }),
    );

    for id in RefactoringId::ALL {
        let (Some(by_id), Some(by_key)) =
            (overrides.get(id.id()), overrides.get(id.config_key()))
        else {
            continue;
        };
        if by_id != by_key {
            out.push(ConfigWarning::ConflictingRefactoring {
                id: id.id().to_owned(),
                config_key: id.config_key().to_owned(),
            });
        }
    }
}

fn validate_logging(config: &SharpConfig, out: &mut Vec<ConfigWarning>) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }

    if config.logging.buffer_lines == 0 {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "logging.buffer_lines".to_owned(),
            message: "must be >= 1".to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unknown_and_conflicting_refactorings_are_reported() {
        let config: SharpConfig = toml::from_str(
            r#"
[refactorings]
RR0075 = false
merge_if_statements = true
merge_everything = true
"#,
        )
        .expect("parse");

        assert_eq!(
            config.validate(),
            vec![
                ConfigWarning::UnknownRefactoring {
                    key: "merge_everything".to_owned()
                },
                ConfigWarning::ConflictingRefactoring {
                    id: "RR0075".to_owned(),
                    config_key: "merge_if_statements".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn invalid_language_version_is_reported() {
        let config: SharpConfig =
            toml::from_str("[language]\nversion = \"next\"\n").expect("parse");
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ConfigWarning::InvalidValue { toml_path, .. } if toml_path == "language.version"
        ));
        assert_eq!(config.language_version(), CSharpLanguageVersion::LATEST);
    }

    #[test]
    fn valid_config_has_no_warnings() {
        let config: SharpConfig = toml::from_str(
            r#"
[language]
version = "6"

[refactorings]
add_braces = false

[logging]
level = "warn,sharp.refactor=trace"
"#,
        )
        .expect("parse");
        assert_eq!(config.validate(), Vec::new());
    }
}
