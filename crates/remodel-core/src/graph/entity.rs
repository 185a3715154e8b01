//! Entities: named nodes owning attributes and relationships.

use super::{
    naming, AttributeId, AttributeMut, EntityId, ModelId, ModelMut, NodeId, NodeKind,
    RelationshipId, RelationshipMut, Schema,
};
use crate::error::ValidationError;
use crate::observe::Observable;
use std::convert::Infallible;
use tracing::debug;

/// An entity of a model.
#[derive(Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) model: ModelId,
    pub(crate) name: String,
    pub(crate) is_base_class: bool,
    pub(crate) super_entity: Option<EntityId>,
    pub(crate) primary_key: Option<AttributeId>,
    pub(crate) attributes: Vec<AttributeId>,
    pub(crate) relationships: Vec<RelationshipId>,
    pub(crate) observable: Observable,
}

impl Entity {
    /// Identifier of this entity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Owning model.
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Entity name, unique within its model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the entity is a base class.
    pub fn is_base_class(&self) -> bool {
        self.is_base_class
    }

    /// Entity this one inherits from, if any.
    pub fn super_entity(&self) -> Option<EntityId> {
        self.super_entity
    }

    /// Primary key attribute, always one of [`Entity::attributes`].
    pub fn primary_key(&self) -> Option<AttributeId> {
        self.primary_key
    }

    /// Attributes in creation order.
    pub fn attributes(&self) -> &[AttributeId] {
        &self.attributes
    }

    /// Relationships in creation order.
    pub fn relationships(&self) -> &[RelationshipId] {
        &self.relationships
    }

    /// Observers of this entity.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

/// Mutable handle to an entity.
pub struct EntityMut<'a> {
    pub(crate) schema: &'a mut Schema,
    pub(crate) id: EntityId,
}

impl<'a> EntityMut<'a> {
    pub(crate) fn new(schema: &'a mut Schema, id: EntityId) -> Self {
        Self { schema, id }
    }

    /// Identifier of the entity being edited.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Read-only view of the entity.
    pub fn get(&self) -> &Entity {
        &self.schema.arena[self.id]
    }

    /// Schema the entity belongs to.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Rename the entity. Names are unique within the owning model.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        let model = self.get().model;
        naming::check_name(
            NodeKind::Entity,
            &name,
            self.schema.entity_names_except(model, Some(self.id)),
        )?;

        let entity = &mut self.schema.arena[self.id];
        debug!(entity = %self.id, from = %entity.name, to = %name, "renamed entity");
        entity.name = name;
        self.notify();
        Ok(())
    }

    /// Mark the entity as a base class or clear the flag.
    pub fn set_base_class(&mut self, is_base_class: bool) {
        self.schema.arena[self.id].is_base_class = is_base_class;
        self.notify();
    }

    /// Set or clear the entity this one inherits from.
    ///
    /// The super entity must belong to the same model and must not inherit,
    /// directly or transitively, from this entity.
    pub fn set_super_entity(&mut self, super_entity: Option<EntityId>) -> Result<(), ValidationError> {
        if let Some(target) = super_entity {
            let entity = self.get();
            let target_entity = self
                .schema
                .entity(target)
                .ok_or(ValidationError::UnknownNode(NodeId::Entity(target)))?;
            if target_entity.model != entity.model {
                return Err(ValidationError::ForeignEntity {
                    entity: entity.name.clone(),
                    target: target_entity.name.clone(),
                });
            }
            if self.schema.inherits_from(target, self.id) {
                return Err(ValidationError::InheritanceCycle {
                    entity: entity.name.clone(),
                    target: target_entity.name.clone(),
                });
            }
        }

        self.schema.arena[self.id].super_entity = super_entity;
        self.notify();
        Ok(())
    }

    /// Set or clear the primary key.
    ///
    /// The attribute must be one of this entity's attributes and of a type
    /// that can back a primary key. The chosen attribute becomes indexed.
    pub fn set_primary_key(&mut self, primary_key: Option<AttributeId>) -> Result<(), ValidationError> {
        if let Some(key) = primary_key {
            let entity = self.get();
            let attribute = self
                .schema
                .attribute(key)
                .ok_or(ValidationError::UnknownNode(NodeId::Attribute(key)))?;
            if !attribute.attribute_type.can_be_primary_key() {
                return Err(ValidationError::PrimaryKeyType {
                    attribute: attribute.name.clone(),
                    type_tag: attribute.attribute_type.tag(),
                });
            }
            if !entity.attributes.contains(&key) {
                return Err(ValidationError::PrimaryKeyOwner {
                    attribute: attribute.name.clone(),
                    entity: entity.name.clone(),
                });
            }
        }

        self.schema.arena[self.id].primary_key = primary_key;
        if let Some(key) = primary_key {
            self.schema.arena[key].is_indexed = true;
            self.schema.notify_local(NodeId::Attribute(key));
        }
        self.notify();
        Ok(())
    }

    /// Create an auto-named attribute.
    pub fn create_attribute(&mut self) -> AttributeId {
        match self.create_attribute_with(|_| Ok::<(), Infallible>(())) {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }

    /// Create an auto-named attribute and customize it before it is attached.
    ///
    /// If `build` fails the attribute is discarded and never becomes visible.
    pub fn create_attribute_with<E>(
        &mut self,
        build: impl FnOnce(&mut AttributeMut<'_>) -> Result<(), E>,
    ) -> Result<AttributeId, E> {
        let name = naming::unique_name(
            self.schema.config.base_name(NodeKind::Attribute),
            self.schema.attribute_names_except(self.id, None),
        );
        let attribute_type = self.schema.config.default_attribute_type;
        let id = self.schema.arena.insert_attribute(self.id, name, attribute_type);

        if let Err(err) = build(&mut AttributeMut::new(self.schema, id)) {
            self.schema.arena.purge_attribute(id);
            return Err(err);
        }

        self.schema.arena[self.id].attributes.push(id);
        debug!(entity = %self.id, attribute = %id, name = %self.schema.arena[id].name, "created attribute");
        self.notify();
        Ok(id)
    }

    /// Remove an attribute, clearing the primary key if it was the key.
    pub fn remove_attribute(&mut self, attribute: AttributeId) -> Result<(), ValidationError> {
        let entity = &mut self.schema.arena[self.id];
        let index = entity
            .attributes
            .iter()
            .position(|a| *a == attribute)
            .ok_or(ValidationError::NotAChild {
                parent: NodeId::Entity(self.id),
                child: NodeId::Attribute(attribute),
            })?;
        if entity.primary_key == Some(attribute) {
            entity.primary_key = None;
        }
        entity.attributes.remove(index);

        if let Some(removed) = self.schema.arena.purge_attribute(attribute) {
            debug!(entity = %self.id, attribute = %attribute, name = %removed.name, "removed attribute");
            removed.observable.notify(self.schema, NodeId::Attribute(attribute));
        }
        self.notify();
        Ok(())
    }

    /// Create an auto-named relationship.
    pub fn create_relationship(&mut self) -> RelationshipId {
        match self.create_relationship_with(|_| Ok::<(), Infallible>(())) {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }

    /// Create an auto-named relationship and customize it before it is attached.
    pub fn create_relationship_with<E>(
        &mut self,
        build: impl FnOnce(&mut RelationshipMut<'_>) -> Result<(), E>,
    ) -> Result<RelationshipId, E> {
        let name = naming::unique_name(
            self.schema.config.base_name(NodeKind::Relationship),
            self.schema.relationship_names_except(self.id, None),
        );
        let id = self.schema.arena.insert_relationship(self.id, name);

        if let Err(err) = build(&mut RelationshipMut::new(self.schema, id)) {
            self.schema.arena.purge_relationship(id);
            return Err(err);
        }

        self.schema.arena[self.id].relationships.push(id);
        debug!(entity = %self.id, relationship = %id, name = %self.schema.arena[id].name, "created relationship");
        self.notify();
        Ok(id)
    }

    /// Detach and delete one of this entity's relationships.
    pub fn remove_relationship(&mut self, relationship: RelationshipId) -> Result<(), ValidationError> {
        let entity = &mut self.schema.arena[self.id];
        let index = entity
            .relationships
            .iter()
            .position(|r| *r == relationship)
            .ok_or(ValidationError::NotAChild {
                parent: NodeId::Entity(self.id),
                child: NodeId::Relationship(relationship),
            })?;
        entity.relationships.remove(index);

        if let Some(removed) = self.schema.arena.purge_relationship(relationship) {
            debug!(entity = %self.id, relationship = %relationship, name = %removed.name, "removed relationship");
            removed
                .observable
                .notify(self.schema, NodeId::Relationship(relationship));
        }
        self.notify();
        Ok(())
    }

    /// Mutable handle to one of this entity's attributes.
    pub fn attribute_mut(&mut self, attribute: AttributeId) -> Option<AttributeMut<'_>> {
        if self.get().attributes.contains(&attribute) {
            Some(AttributeMut::new(self.schema, attribute))
        } else {
            None
        }
    }

    /// Mutable handle to one of this entity's relationships.
    pub fn relationship_mut(&mut self, relationship: RelationshipId) -> Option<RelationshipMut<'_>> {
        if self.get().relationships.contains(&relationship) {
            Some(RelationshipMut::new(self.schema, relationship))
        } else {
            None
        }
    }

    /// Remove this entity from its model.
    pub fn remove_from_model(self) -> Result<(), ValidationError> {
        let model = self.get().model;
        let id = self.id;
        ModelMut::new(self.schema, model).remove_entity(id)
    }

    fn notify(&self) {
        self.schema.notify(NodeId::Entity(self.id));
    }
}
