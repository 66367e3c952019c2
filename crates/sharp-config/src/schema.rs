use schemars::schema::{InstanceType, ObjectValidation, RootSchema, Schema, SchemaObject};
use schemars::schema_for;
use sharp_refactor::RefactoringId;

use crate::SharpConfig;

/// JSON schema for `sharp.toml`, for editor TOML integration and CI validation.
///
/// `[refactorings]` only admits the known ids and config keys.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(SharpConfig)
}

pub(crate) fn refactorings_schema(_: &mut schemars::r#gen::SchemaGenerator) -> Schema {
    let mut properties = schemars::Map::new();
    for id in RefactoringId::ALL {
        for key in [id.id(), id.config_key()] {
            properties.insert(key.to_owned(), bool_schema(id.title()));
        }
    }

    Schema::Object(SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        object: Some(Box::new(ObjectValidation {
            properties,
            additional_properties: Some(Box::new(Schema::Bool(false))),
            ..Default::default()
        })),
        ..Default::default()
    })
}

fn bool_schema(description: &str) -> Schema {
    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Boolean.into()),
        ..Default::default()
    };
    schema.metadata().description = Some(description.to_owned());
    Schema::Object(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refactorings_accept_ids_and_config_keys_only() {
        let schema = serde_json::to_value(json_schema()).expect("serialize schema");
        let refactorings = &schema["properties"]["refactorings"];
        assert_eq!(refactorings["additionalProperties"], serde_json::json!(false));
        assert_eq!(
            refactorings["properties"]["RR0075"]["type"],
            serde_json::json!("boolean")
        );
        assert_eq!(
            refactorings["properties"]["merge_if_statements"]["type"],
            serde_json::json!("boolean")
        );
    }

    #[test]
    fn top_level_sections_are_described() {
        let schema = serde_json::to_value(json_schema()).expect("serialize schema");
        let properties = schema["properties"].as_object().expect("properties");
        let mut keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["language", "logging", "refactorings"]);
        assert_eq!(schema["additionalProperties"], serde_json::json!(false));
    }
}
