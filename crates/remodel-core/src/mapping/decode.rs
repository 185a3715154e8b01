//! Document tree to graph.
//!
//! Models load in two passes over their entities. The first pass names
//! each entity and builds its attributes, resolving the primary key by
//! name against the attributes just created. The second pass runs once
//! every entity of the model is committed and resolves super entities and
//! relationship destinations through the model's name index.

use super::fields::Fields;
use super::keys;
use crate::error::{ReferenceError, Result};
use crate::graph::{AttributeMut, AttributeType, EntityMut, ModelMut, RelationshipMut, Schema};
use serde_json::Value;
use tracing::warn;

impl Schema {
    /// Fill an empty schema from a schema document.
    pub(crate) fn load(&mut self, value: &Value, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        let name = fields.required_str(keys::NAME)?;
        let models = fields.required_array(keys::MODELS)?;

        self.set_name(name);
        for (index, value) in models.iter().enumerate() {
            let path = format!("{path}.{}[{index}]", keys::MODELS);
            self.create_model_with(|model| model.map(value, false, &path))?;
        }
        Ok(())
    }
}

impl ModelMut<'_> {
    /// Map a model document onto this (uncommitted) model.
    ///
    /// With `increase_version` the model keeps the version it was created
    /// with; otherwise it adopts the stored one.
    pub(crate) fn map(&mut self, value: &Value, increase_version: bool, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        let version = fields.required_str(keys::VERSION)?;
        let is_modifiable = fields.required_bool(keys::IS_MODIFIABLE)?;
        let entities = fields.required_array(keys::ENTITIES)?;

        if !increase_version {
            self.set_version(version);
        }
        self.set_modifiable(is_modifiable);

        let mut pending = Vec::with_capacity(entities.len());
        for (index, value) in entities.iter().enumerate() {
            let path = format!("{path}.{}[{index}]", keys::ENTITIES);
            let id = self.create_entity_with(|entity| entity.map_values_and_attributes(value, &path))?;
            pending.push((id, value, path));
        }

        for (id, value, path) in pending {
            EntityMut::new(self.schema, id).map_relationships_and_super_entity(value, &path)?;
        }
        Ok(())
    }
}

impl EntityMut<'_> {
    fn map_values_and_attributes(&mut self, value: &Value, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        self.set_name(fields.required_str(keys::NAME)?)?;
        if let Some(is_base_class) = fields.optional_bool(keys::IS_BASE_CLASS) {
            self.set_base_class(is_base_class);
        }

        let attributes = fields.required_array(keys::ATTRIBUTES)?;
        let primary_key = fields.optional_str(keys::PRIMARY_KEY);
        for (index, value) in attributes.iter().enumerate() {
            let path = format!("{path}.{}[{index}]", keys::ATTRIBUTES);
            let id = self.create_attribute_with(|attribute| attribute.map(value, &path))?;
            let is_key = primary_key.is_some()
                && primary_key == self.schema().attribute(id).map(|a| a.name());
            if is_key {
                self.set_primary_key(Some(id))?;
            }
        }
        Ok(())
    }

    fn map_relationships_and_super_entity(&mut self, value: &Value, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        let model = self.get().model();

        let super_entity = match fields.optional_str(keys::SUPER_ENTITY) {
            Some(name) if !name.is_empty() => {
                let found = self.schema().entity_by_name(model, name).ok_or_else(|| {
                    ReferenceError::UnknownSuperEntity {
                        path: fields.path().to_string(),
                        entity: self.get().name().to_string(),
                        name: name.to_string(),
                    }
                })?;
                Some(found)
            }
            _ => None,
        };
        self.set_super_entity(super_entity)?;

        let relationships = fields.required_array(keys::RELATIONSHIPS)?;
        for (index, value) in relationships.iter().enumerate() {
            let path = format!("{path}.{}[{index}]", keys::RELATIONSHIPS);
            self.create_relationship_with(|relationship| relationship.map(value, &path))?;
        }
        Ok(())
    }
}

impl AttributeMut<'_> {
    fn map(&mut self, value: &Value, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        self.set_name(fields.required_str(keys::NAME)?)?;

        if let Some(tag) = fields.optional_str(keys::TYPE) {
            self.set_type(AttributeType::from_tag(tag))?;
        }
        if let Some(is_ignored) = fields.optional_bool(keys::IS_IGNORED) {
            self.set_ignored(is_ignored);
        }
        if let Some(is_indexed) = fields.optional_bool(keys::IS_INDEXED) {
            if self.set_indexed(is_indexed).is_err() {
                self.remove_index();
            }
        }
        if let Some(is_required) = fields.optional_bool(keys::IS_REQUIRED) {
            self.set_required(is_required);
        }
        if let Some(has_default) = fields.optional_bool(keys::HAS_DEFAULT) {
            self.set_has_default(has_default);
        }
        if let Some(default_value) = fields.optional_str(keys::DEFAULT_VALUE) {
            self.set_default_value(default_value);
        }
        Ok(())
    }
}

impl RelationshipMut<'_> {
    /// Unknown destination names resolve to no destination.
    fn map(&mut self, value: &Value, path: &str) -> Result<()> {
        let fields = Fields::new(value, path)?;
        self.set_name(fields.required_str(keys::NAME)?)?;
        if let Some(is_many) = fields.optional_bool(keys::IS_MANY) {
            self.set_many(is_many);
        }

        let destination = fields.optional_str(keys::DESTINATION).and_then(|name| {
            let owner = self.get().entity();
            let model = self.schema().entity(owner)?.model();
            let found = self.schema().entity_by_name(model, name);
            if found.is_none() {
                warn!(path, relationship = %self.get().name(), destination = %name, "unresolved relationship destination");
            }
            found
        });
        self.set_destination(destination)?;
        Ok(())
    }
}
