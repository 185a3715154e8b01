//! Document mapping.
//!
//! A schema is stored as a nested JSON tree:
//!
//! ```text
//! Schema       { name, models: [Model] }
//! Model        { version, isModifiable, entities: [Entity] }
//! Entity       { name, primaryKey, superEntity, isBaseClass,
//!                attributes: [Attribute], relationships: [Relationship] }
//! Attribute    { name, isIgnored, isIndexed, isRequired, hasDefault,
//!                defaultValue, type }
//! Relationship { name, destination, isMany }
//! ```
//!
//! Cross-references are stored by name. Loading is all-or-nothing: a
//! failed [`Schema::map`] leaves the schema exactly as it was.

mod decode;
mod encode;
mod fields;

use crate::config::SchemaConfig;
use crate::error::{FormatError, Result};
use crate::graph::{ModelId, Schema};
use serde_json::Value;
use tracing::info;

/// Document keys.
pub mod keys {
    pub const NAME: &str = "name";
    pub const MODELS: &str = "models";
    pub const VERSION: &str = "version";
    pub const IS_MODIFIABLE: &str = "isModifiable";
    pub const ENTITIES: &str = "entities";
    pub const PRIMARY_KEY: &str = "primaryKey";
    pub const SUPER_ENTITY: &str = "superEntity";
    pub const IS_BASE_CLASS: &str = "isBaseClass";
    pub const ATTRIBUTES: &str = "attributes";
    pub const RELATIONSHIPS: &str = "relationships";
    pub const IS_IGNORED: &str = "isIgnored";
    pub const IS_INDEXED: &str = "isIndexed";
    pub const IS_REQUIRED: &str = "isRequired";
    pub const HAS_DEFAULT: &str = "hasDefault";
    pub const DEFAULT_VALUE: &str = "defaultValue";
    pub const TYPE: &str = "type";
    pub const DESTINATION: &str = "destination";
    pub const IS_MANY: &str = "isMany";
}

const SCHEMA_PATH: &str = "schema";
const MODEL_PATH: &str = "model";

/// Parse JSON text into a document tree.
pub fn parse_document(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| {
        FormatError::Syntax {
            message: e.to_string(),
        }
        .into()
    })
}

impl Schema {
    /// Build a schema from a document tree.
    pub fn from_value(value: &Value) -> Result<Schema> {
        Self::from_value_with_config(value, SchemaConfig::default())
    }

    /// Build a schema with a custom configuration from a document tree.
    pub fn from_value_with_config(value: &Value, config: SchemaConfig) -> Result<Schema> {
        let mut schema = Schema::with_config(config);
        schema.map(value)?;
        Ok(schema)
    }

    /// Build a schema from JSON text.
    pub fn from_json_str(json: &str) -> Result<Schema> {
        Self::from_value(&parse_document(json)?)
    }

    /// Build a schema with a custom configuration from JSON text.
    pub fn from_json_str_with_config(json: &str, config: SchemaConfig) -> Result<Schema> {
        Self::from_value_with_config(&parse_document(json)?, config)
    }

    /// Replace the contents of this schema with a loaded document.
    ///
    /// Every stored model is created in order and adopts its stored version.
    /// The schema's own observers are kept and notified once. On error the
    /// schema is left unmodified.
    pub fn map(&mut self, value: &Value) -> Result<()> {
        let mut scratch = self.scratch();
        scratch.load(value, SCHEMA_PATH)?;

        let models = scratch.models().len();
        let entities: usize = scratch
            .models()
            .iter()
            .filter_map(|id| scratch.model(*id))
            .map(|m| m.entities().len())
            .sum();
        info!(name = %scratch.name(), models, entities, "loaded schema");

        self.replace_contents(scratch);
        Ok(())
    }

    /// Import a model document as a new model.
    ///
    /// With `increase_version` the new model keeps the successor version it
    /// was created with; otherwise it adopts the stored version.
    pub fn import_model(&mut self, value: &Value, increase_version: bool) -> Result<ModelId> {
        let id = self.create_model_with(|model| model.map(value, increase_version, MODEL_PATH))?;
        if let Some(model) = self.model(id) {
            info!(model = %id, version = %model.version(), entities = model.entities().len(), "imported model");
        }
        Ok(id)
    }

    /// Document tree of the whole schema.
    pub fn to_value(&self) -> Value {
        encode::schema(self)
    }

    /// Document tree of a single model.
    pub fn model_to_value(&self, model: ModelId) -> Option<Value> {
        self.model(model).map(|m| encode::model(self, m))
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }

    /// Indented JSON text.
    pub fn to_json_string_pretty(&self) -> String {
        format!("{:#}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ReferenceError};
    use crate::graph::AttributeType;
    use serde_json::json;

    fn blog() -> Value {
        json!({
            "name": "Blog",
            "models": [{
                "version": "3",
                "isModifiable": true,
                "entities": [
                    {
                        "name": "Post",
                        "primaryKey": "id",
                        "superEntity": null,
                        "isBaseClass": false,
                        "attributes": [
                            { "name": "id", "type": "Long", "isIndexed": false },
                            { "name": "title", "type": "String", "isRequired": true }
                        ],
                        "relationships": [
                            { "name": "author", "destination": "User", "isMany": false }
                        ]
                    },
                    {
                        "name": "User",
                        "primaryKey": null,
                        "superEntity": null,
                        "attributes": [],
                        "relationships": []
                    }
                ]
            }]
        })
    }

    #[test]
    fn test_load_resolves_forward_references() {
        let schema = Schema::from_value(&blog()).unwrap();
        let model = schema.current_model().unwrap();
        assert_eq!(schema.model(model).unwrap().version(), "3");

        let post = schema.entity_by_name(model, "Post").unwrap();
        let user = schema.entity_by_name(model, "User").unwrap();
        let author = schema.relationship_by_name(post, "author").unwrap();
        assert_eq!(schema.relationship(author).unwrap().destination(), Some(user));

        let id = schema.attribute_by_name(post, "id").unwrap();
        assert_eq!(schema.entity(post).unwrap().primary_key(), Some(id));
        // The stored flag is overridden by the primary key.
        assert!(schema.attribute(id).unwrap().is_indexed());

        let title = schema.attribute_by_name(post, "title").unwrap();
        let title = schema.attribute(title).unwrap();
        assert_eq!(title.attribute_type(), AttributeType::String);
        assert!(title.is_required());
    }

    #[test]
    fn test_missing_required_key_reports_path() {
        let mut doc = blog();
        doc["models"][0]["entities"][1]
            .as_object_mut()
            .unwrap()
            .remove("attributes");

        let err = Schema::from_value(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::MissingKey { ref path, key: "attributes" })
                if path == "schema.models[0].entities[1]"
        ));
    }

    #[test]
    fn test_unknown_super_entity_is_fatal() {
        let mut doc = blog();
        doc["models"][0]["entities"][0]["superEntity"] = json!("Ghost");

        let err = Schema::from_value(&doc).unwrap_err();
        assert!(matches!(
            err,
            Error::Reference(ReferenceError::UnknownSuperEntity { ref name, .. }) if name == "Ghost"
        ));
    }

    #[test]
    fn test_unknown_destination_becomes_none() {
        let mut doc = blog();
        doc["models"][0]["entities"][0]["relationships"][0]["destination"] = json!("Ghost");

        let schema = Schema::from_value(&doc).unwrap();
        let model = schema.current_model().unwrap();
        let post = schema.entity_by_name(model, "Post").unwrap();
        let author = schema.relationship_by_name(post, "author").unwrap();
        assert_eq!(schema.relationship(author).unwrap().destination(), None);
    }

    #[test]
    fn test_syntax_error() {
        let err = Schema::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::Syntax { .. })));
    }

    #[test]
    fn test_lenient_index_flag() {
        let doc = json!({
            "name": "S",
            "models": [{
                "version": "1",
                "isModifiable": false,
                "entities": [{
                    "name": "File",
                    "attributes": [{ "name": "data", "type": "Blob", "isIndexed": true, "isIgnored": "yes" }],
                    "relationships": []
                }]
            }]
        });
        let schema = Schema::from_value(&doc).unwrap();
        let model = schema.current_model().unwrap();
        assert!(!schema.model(model).unwrap().is_modifiable());

        let file = schema.entity_by_name(model, "File").unwrap();
        let data = schema.attribute_by_name(file, "data").unwrap();
        let data = schema.attribute(data).unwrap();
        assert!(!data.is_indexed());
        assert!(!data.is_ignored());
    }
}
