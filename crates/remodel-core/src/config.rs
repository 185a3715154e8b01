//! Schema editing configuration.

use crate::graph::{AttributeType, NodeKind};
use serde::{Deserialize, Serialize};

/// Defaults applied when the editor creates new nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaConfig {
    /// Version given to the first model of a schema.
    pub initial_model_version: String,

    /// Base name for auto-named entities.
    pub entity_base_name: String,

    /// Base name for auto-named attributes.
    pub attribute_base_name: String,

    /// Base name for auto-named relationships.
    pub relationship_base_name: String,

    /// Type of a freshly created attribute.
    pub default_attribute_type: AttributeType,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            initial_model_version: "1".to_string(),
            entity_base_name: NodeKind::Entity.label().to_string(),
            attribute_base_name: NodeKind::Attribute.label().to_string(),
            relationship_base_name: NodeKind::Relationship.label().to_string(),
            default_attribute_type: AttributeType::Unknown,
        }
    }
}

impl SchemaConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version of the first model.
    pub fn initial_model_version(mut self, version: impl Into<String>) -> Self {
        self.initial_model_version = version.into();
        self
    }

    /// Set the base name for auto-named entities.
    pub fn entity_base_name(mut self, name: impl Into<String>) -> Self {
        self.entity_base_name = name.into();
        self
    }

    /// Set the base name for auto-named attributes.
    pub fn attribute_base_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_base_name = name.into();
        self
    }

    /// Set the base name for auto-named relationships.
    pub fn relationship_base_name(mut self, name: impl Into<String>) -> Self {
        self.relationship_base_name = name.into();
        self
    }

    /// Set the type of freshly created attributes.
    pub fn default_attribute_type(mut self, ty: AttributeType) -> Self {
        self.default_attribute_type = ty;
        self
    }

    /// Base name used when auto-naming a node of `kind`.
    ///
    /// An empty configured base falls back to the kind label, since node
    /// names must be non-empty.
    pub(crate) fn base_name(&self, kind: NodeKind) -> &str {
        let configured = match kind {
            NodeKind::Entity => &self.entity_base_name,
            NodeKind::Attribute => &self.attribute_base_name,
            NodeKind::Relationship => &self.relationship_base_name,
            NodeKind::Schema | NodeKind::Model => return kind.label(),
        };
        if configured.is_empty() {
            kind.label()
        } else {
            configured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemaConfig::default();
        assert_eq!(config.initial_model_version, "1");
        assert_eq!(config.base_name(NodeKind::Entity), "Entity");
        assert_eq!(config.base_name(NodeKind::Attribute), "Attribute");
        assert_eq!(config.base_name(NodeKind::Relationship), "Relationship");
        assert_eq!(config.default_attribute_type, AttributeType::Unknown);
    }

    #[test]
    fn test_builder() {
        let config = SchemaConfig::new()
            .initial_model_version("0.1")
            .entity_base_name("Table")
            .default_attribute_type(AttributeType::String);

        assert_eq!(config.initial_model_version, "0.1");
        assert_eq!(config.base_name(NodeKind::Entity), "Table");
        assert_eq!(config.default_attribute_type, AttributeType::String);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SchemaConfig =
            serde_json::from_str(r#"{ "entityBaseName": "Class" }"#).unwrap();
        assert_eq!(config.entity_base_name, "Class");
        assert_eq!(config.attribute_base_name, "Attribute");
        assert_eq!(config.initial_model_version, "1");
    }

    #[test]
    fn test_empty_base_names_fall_back_to_kind_label() {
        let config: SchemaConfig = serde_json::from_str(
            r#"{ "entityBaseName": "", "relationshipBaseName": "" }"#,
        )
        .unwrap();
        assert_eq!(config.base_name(NodeKind::Entity), "Entity");
        assert_eq!(config.base_name(NodeKind::Relationship), "Relationship");

        let config = SchemaConfig::new().attribute_base_name("");
        assert_eq!(config.base_name(NodeKind::Attribute), "Attribute");
    }
}
