use std::fmt;

use serde::de::DeserializeOwned;

/// Problems found while loading a `sharp.toml`.
///
/// Loading is best effort: callers get a config whenever deserialization succeeds, and these
/// describe what was ignored or replaced by a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys the schema does not know, as dotted paths (`logging.levle`).
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A `[refactorings]` key that is neither an id nor a config key.
    UnknownRefactoring { key: String },
    /// The same refactoring is set by id and by config key with different values.
    ConflictingRefactoring {
        id: String,
        config_key: String,
    },
    InvalidValue {
        toml_path: String,
        message: String,
    },
    LoggingLevelInvalid {
        value: String,
        normalized: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnknownRefactoring { key } => {
                write!(f, "refactorings.{key}: unknown refactoring")
            }
            ConfigWarning::ConflictingRefactoring { id, config_key } => write!(
                f,
                "refactorings.{id} and refactorings.{config_key} disagree; {id} wins"
            ),
            ConfigWarning::InvalidValue { toml_path, message } => {
                write!(f, "{toml_path}: {message}")
            }
            ConfigWarning::LoggingLevelInvalid { value, normalized } => write!(
                f,
                "logging.level: {value:?} is not a valid filter ({normalized:?}); using info"
            ),
        }
    }
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(normalize_serde_ignored_path(path));
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

fn normalize_serde_ignored_path(path: serde_ignored::Path) -> String {
    // `serde_ignored` renders root paths with a leading `.` and sequence indices as `.0`.
    let raw = path.to_string();
    let raw = raw.trim_start_matches('.');
    raw.split('.')
        .enumerate()
        .fold(String::new(), |mut out, (idx, segment)| {
            let is_index =
                idx > 0 && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
            if is_index {
                out.push('[');
                out.push_str(segment);
                out.push(']');
                return out;
            }

            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
            out
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[test]
    fn unknown_key_paths_use_dotted_tables() {
        #[derive(Debug, Deserialize)]
        struct Root {
            #[allow(dead_code)]
            logging: Logging,
        }

        #[derive(Debug, Deserialize)]
        struct Logging {
            #[allow(dead_code)]
            #[serde(default)]
            level: String,
        }

        let text = r#"
typo = 1

[logging]
levle = "debug"
"#;

        let (_value, unknown) = deserialize_toml_with_unknown_keys::<Root>(text).expect("parse");
        assert_eq!(unknown, vec!["logging.levle", "typo"]);
    }
}
