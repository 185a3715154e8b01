//! Relationships: named edges from an entity to a destination entity.

use super::{naming, EntityId, NodeId, NodeKind, RelationshipId, Schema};
use crate::error::ValidationError;
use crate::observe::Observable;
use tracing::debug;

/// An edge from the owning entity to an optional destination entity.
#[derive(Debug)]
pub struct Relationship {
    pub(crate) id: RelationshipId,
    pub(crate) entity: EntityId,
    pub(crate) name: String,
    pub(crate) is_many: bool,
    pub(crate) destination: Option<EntityId>,
    pub(crate) observable: Observable,
}

impl Relationship {
    /// Identifier of this relationship.
    pub fn id(&self) -> RelationshipId {
        self.id
    }

    /// Owning entity.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Relationship name, unique within its entity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` for to-many, `false` for to-one.
    pub fn is_many(&self) -> bool {
        self.is_many
    }

    /// Destination entity, cleared when that entity is removed.
    pub fn destination(&self) -> Option<EntityId> {
        self.destination
    }

    /// Observers of this relationship.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

/// Mutable handle to a relationship.
pub struct RelationshipMut<'a> {
    pub(crate) schema: &'a mut Schema,
    pub(crate) id: RelationshipId,
}

impl<'a> RelationshipMut<'a> {
    pub(crate) fn new(schema: &'a mut Schema, id: RelationshipId) -> Self {
        Self { schema, id }
    }

    /// Identifier of the relationship being edited.
    pub fn id(&self) -> RelationshipId {
        self.id
    }

    /// Read-only view of the relationship.
    pub fn get(&self) -> &Relationship {
        &self.schema.arena[self.id]
    }

    /// Schema the relationship belongs to.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Rename the relationship. Names are unique within the owning entity.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        let entity = self.get().entity;
        naming::check_name(
            NodeKind::Relationship,
            &name,
            self.schema.relationship_names_except(entity, Some(self.id)),
        )?;

        let relationship = &mut self.schema.arena[self.id];
        debug!(relationship = %self.id, from = %relationship.name, to = %name, "renamed relationship");
        relationship.name = name;
        self.notify();
        Ok(())
    }

    /// Switch between to-one and to-many.
    pub fn set_many(&mut self, is_many: bool) {
        self.schema.arena[self.id].is_many = is_many;
        self.notify();
    }

    /// Point the relationship at an entity of the same model, or clear it.
    pub fn set_destination(&mut self, destination: Option<EntityId>) -> Result<(), ValidationError> {
        if let Some(target) = destination {
            let owner = &self.schema.arena[self.get().entity];
            let target_entity = self
                .schema
                .entity(target)
                .ok_or(ValidationError::UnknownNode(NodeId::Entity(target)))?;
            if target_entity.model != owner.model {
                return Err(ValidationError::ForeignEntity {
                    entity: owner.name.clone(),
                    target: target_entity.name.clone(),
                });
            }
        }

        self.schema.arena[self.id].destination = destination;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        self.schema.notify(NodeId::Relationship(self.id));
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::graph::Schema;

    #[test]
    fn test_defaults_and_flags() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let entity = schema.model_mut(model).unwrap().create_entity();
        let id = schema.entity_mut(entity).unwrap().create_relationship();

        let relationship = schema.relationship(id).unwrap();
        assert_eq!(relationship.name(), "Relationship");
        assert!(!relationship.is_many());
        assert_eq!(relationship.destination(), None);

        schema.relationship_mut(id).unwrap().set_many(true);
        assert!(schema.relationship(id).unwrap().is_many());
    }

    #[test]
    fn test_destination_within_model() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let user = handle.create_entity();
        let post = handle.create_entity();
        let id = schema.entity_mut(post).unwrap().create_relationship();

        let mut relationship = schema.relationship_mut(id).unwrap();
        relationship.set_destination(Some(user)).unwrap();
        assert_eq!(relationship.get().destination(), Some(user));

        // Self references are allowed.
        relationship.set_destination(Some(post)).unwrap();
        relationship.set_destination(None).unwrap();
        assert_eq!(relationship.get().destination(), None);
    }

    #[test]
    fn test_destination_in_other_model_rejected() {
        let mut schema = Schema::new();
        let first = schema.create_model();
        let second = schema.create_model();
        let local = schema.model_mut(first).unwrap().create_entity();
        let foreign = schema.model_mut(second).unwrap().create_entity();
        let id = schema.entity_mut(local).unwrap().create_relationship();

        let mut relationship = schema.relationship_mut(id).unwrap();
        assert!(matches!(
            relationship.set_destination(Some(foreign)),
            Err(ValidationError::ForeignEntity { .. })
        ));
        assert_eq!(relationship.get().destination(), None);
    }

    #[test]
    fn test_rename_uniqueness() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let entity = schema.model_mut(model).unwrap().create_entity();
        let mut handle = schema.entity_mut(entity).unwrap();
        handle.create_relationship();
        let second = handle.create_relationship();

        let mut relationship = schema.relationship_mut(second).unwrap();
        assert!(relationship.set_name("Relationship").is_err());
        relationship.set_name("posts").unwrap();
        assert_eq!(
            schema.relationship_by_name(entity, "posts"),
            Some(second)
        );
    }
}
