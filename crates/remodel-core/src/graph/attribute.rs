//! Attributes: typed scalar fields owned by an entity.

use super::{naming, AttributeId, AttributeType, EntityId, NodeId, NodeKind, Schema};
use crate::error::ValidationError;
use crate::observe::Observable;
use tracing::debug;

/// A typed field of an entity.
#[derive(Debug)]
pub struct Attribute {
    pub(crate) id: AttributeId,
    pub(crate) entity: EntityId,
    pub(crate) name: String,
    pub(crate) attribute_type: AttributeType,
    pub(crate) is_ignored: bool,
    pub(crate) is_indexed: bool,
    pub(crate) is_required: bool,
    pub(crate) has_default: bool,
    pub(crate) default_value: String,
    pub(crate) observable: Observable,
}

impl Attribute {
    /// Identifier of this attribute.
    pub fn id(&self) -> AttributeId {
        self.id
    }

    /// Owning entity.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Attribute name, unique within its entity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type.
    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    /// Whether persistence skips this attribute.
    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    /// Whether the attribute is indexed.
    pub fn is_indexed(&self) -> bool {
        self.is_indexed
    }

    /// Whether a value is mandatory.
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Whether [`Attribute::default_value`] applies.
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Default value text.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Observers of this attribute.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

/// Mutable handle to an attribute.
pub struct AttributeMut<'a> {
    pub(crate) schema: &'a mut Schema,
    pub(crate) id: AttributeId,
}

impl<'a> AttributeMut<'a> {
    pub(crate) fn new(schema: &'a mut Schema, id: AttributeId) -> Self {
        Self { schema, id }
    }

    /// Identifier of the attribute being edited.
    pub fn id(&self) -> AttributeId {
        self.id
    }

    /// Current state of the attribute.
    pub fn get(&self) -> &Attribute {
        &self.schema.arena[self.id]
    }

    /// Read access to the whole schema.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Rename the attribute. Names are unique within the owning entity.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        let entity = self.get().entity;
        naming::check_name(
            NodeKind::Attribute,
            &name,
            self.schema.attribute_names_except(entity, Some(self.id)),
        )?;

        let attribute = &mut self.schema.arena[self.id];
        debug!(attribute = %self.id, from = %attribute.name, to = %name, "renamed attribute");
        attribute.name = name;
        self.notify();
        Ok(())
    }

    /// Change the type.
    ///
    /// Fails if the attribute is its entity's primary key and the new type
    /// cannot back one. An index is dropped when the new type cannot carry it.
    pub fn set_type(&mut self, attribute_type: AttributeType) -> Result<(), ValidationError> {
        if self.is_primary_key() && !attribute_type.can_be_primary_key() {
            return Err(ValidationError::PrimaryKeyType {
                attribute: self.get().name.clone(),
                type_tag: attribute_type.tag(),
            });
        }

        let attribute = &mut self.schema.arena[self.id];
        attribute.attribute_type = attribute_type;
        if !attribute_type.can_be_indexed() {
            attribute.is_indexed = false;
        }
        self.notify();
        Ok(())
    }

    /// Mark the attribute as skipped by persistence.
    pub fn set_ignored(&mut self, is_ignored: bool) {
        self.schema.arena[self.id].is_ignored = is_ignored;
        self.notify();
    }

    /// Add or drop the index.
    ///
    /// Only indexable types can be indexed, and the primary key cannot drop its index.
    pub fn set_indexed(&mut self, is_indexed: bool) -> Result<(), ValidationError> {
        let attribute = self.get();
        if is_indexed && !attribute.attribute_type.can_be_indexed() {
            return Err(ValidationError::NotIndexable {
                attribute: attribute.name.clone(),
                type_tag: attribute.attribute_type.tag(),
            });
        }
        if !is_indexed && self.is_primary_key() {
            return Err(ValidationError::PrimaryKeyIndex {
                attribute: attribute.name.clone(),
            });
        }

        self.schema.arena[self.id].is_indexed = is_indexed;
        self.notify();
        Ok(())
    }

    /// Make a value mandatory or optional.
    pub fn set_required(&mut self, is_required: bool) {
        self.schema.arena[self.id].is_required = is_required;
        self.notify();
    }

    /// Toggle whether the default value applies.
    pub fn set_has_default(&mut self, has_default: bool) {
        self.schema.arena[self.id].has_default = has_default;
        self.notify();
    }

    /// Replace the default value text.
    pub fn set_default_value(&mut self, default_value: impl Into<String>) {
        self.schema.arena[self.id].default_value = default_value.into();
        self.notify();
    }

    /// Drop the index without validation, used by the lenient loader.
    pub(crate) fn remove_index(&mut self) {
        self.schema.arena[self.id].is_indexed = false;
    }

    fn is_primary_key(&self) -> bool {
        let entity = self.get().entity;
        self.schema
            .entity(entity)
            .is_some_and(|e| e.primary_key == Some(self.id))
    }

    fn notify(&self) {
        self.schema.notify(NodeId::Attribute(self.id));
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::graph::{AttributeType, Schema};

    fn schema_with_entity() -> (Schema, crate::graph::EntityId) {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let entity = schema.model_mut(model).unwrap().create_entity();
        (schema, entity)
    }

    #[test]
    fn test_defaults() {
        let (mut schema, entity) = schema_with_entity();
        let id = schema.entity_mut(entity).unwrap().create_attribute();
        let attribute = schema.attribute(id).unwrap();

        assert_eq!(attribute.name(), "Attribute");
        assert_eq!(attribute.attribute_type(), AttributeType::Unknown);
        assert!(!attribute.is_ignored());
        assert!(!attribute.is_indexed());
        assert!(!attribute.is_required());
        assert!(!attribute.has_default());
        assert_eq!(attribute.default_value(), "");
        assert_eq!(attribute.entity(), entity);
    }

    #[test]
    fn test_rename_rejects_duplicates_and_empty() {
        let (mut schema, entity) = schema_with_entity();
        let mut handle = schema.entity_mut(entity).unwrap();
        let first = handle.create_attribute();
        let second = handle.create_attribute();

        let mut attribute = schema.attribute_mut(second).unwrap();
        assert!(matches!(
            attribute.set_name("Attribute"),
            Err(ValidationError::DuplicateName { .. })
        ));
        assert!(matches!(
            attribute.set_name(""),
            Err(ValidationError::EmptyName { .. })
        ));
        assert_eq!(attribute.get().name(), "Attribute1");

        // Renaming to its own name is fine.
        assert!(attribute.set_name("Attribute1").is_ok());
        assert!(attribute.set_name("title").is_ok());
        assert_eq!(schema.attribute(first).unwrap().name(), "Attribute");
        assert_eq!(schema.attribute(second).unwrap().name(), "title");
    }

    #[test]
    fn test_same_name_allowed_across_entities() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let a = handle.create_entity();
        let b = handle.create_entity();

        let on_a = schema.entity_mut(a).unwrap().create_attribute();
        let on_b = schema.entity_mut(b).unwrap().create_attribute();
        schema.attribute_mut(on_a).unwrap().set_name("id").unwrap();
        schema.attribute_mut(on_b).unwrap().set_name("id").unwrap();
    }

    #[test]
    fn test_index_requires_indexable_type() {
        let (mut schema, entity) = schema_with_entity();
        let id = schema.entity_mut(entity).unwrap().create_attribute();
        let mut attribute = schema.attribute_mut(id).unwrap();

        assert!(matches!(
            attribute.set_indexed(true),
            Err(ValidationError::NotIndexable { .. })
        ));
        attribute.set_type(AttributeType::String).unwrap();
        attribute.set_indexed(true).unwrap();
        assert!(attribute.get().is_indexed());

        // Switching to a non-indexable type drops the index.
        attribute.set_type(AttributeType::Blob).unwrap();
        assert!(!attribute.get().is_indexed());
    }

    #[test]
    fn test_primary_key_constraints_on_attribute() {
        let (mut schema, entity) = schema_with_entity();
        let id = schema
            .entity_mut(entity)
            .unwrap()
            .create_attribute_with(|a| a.set_type(AttributeType::Int))
            .unwrap();
        schema
            .entity_mut(entity)
            .unwrap()
            .set_primary_key(Some(id))
            .unwrap();

        let mut attribute = schema.attribute_mut(id).unwrap();
        assert!(matches!(
            attribute.set_indexed(false),
            Err(ValidationError::PrimaryKeyIndex { .. })
        ));
        assert!(matches!(
            attribute.set_type(AttributeType::Double),
            Err(ValidationError::PrimaryKeyType { .. })
        ));
        attribute.set_type(AttributeType::Long).unwrap();
        assert!(attribute.get().is_indexed());
    }

    #[test]
    fn test_plain_flags() {
        let (mut schema, entity) = schema_with_entity();
        let id = schema.entity_mut(entity).unwrap().create_attribute();
        let mut attribute = schema.attribute_mut(id).unwrap();
        attribute.set_ignored(true);
        attribute.set_required(true);
        attribute.set_has_default(true);
        attribute.set_default_value("42");

        let attribute = schema.attribute(id).unwrap();
        assert!(attribute.is_ignored());
        assert!(attribute.is_required());
        assert!(attribute.has_default());
        assert_eq!(attribute.default_value(), "42");
    }
}
