//! Models: versioned containers of entities.

use super::{naming, EntityId, EntityMut, ModelId, NodeId, NodeKind, Schema};
use crate::error::ValidationError;
use crate::observe::Observable;
use std::convert::Infallible;
use tracing::debug;

/// A versioned set of entities.
#[derive(Debug)]
pub struct Model {
    pub(crate) id: ModelId,
    pub(crate) version: String,
    pub(crate) is_modifiable: bool,
    pub(crate) entities: Vec<EntityId>,
    pub(crate) observable: Observable,
}

impl Model {
    /// Identifier of this model.
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the editor may change this model version.
    pub fn is_modifiable(&self) -> bool {
        self.is_modifiable
    }

    /// Entities in creation order.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Observers of this model.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }
}

/// Mutable handle to a model.
pub struct ModelMut<'a> {
    pub(crate) schema: &'a mut Schema,
    pub(crate) id: ModelId,
}

impl<'a> ModelMut<'a> {
    pub(crate) fn new(schema: &'a mut Schema, id: ModelId) -> Self {
        Self { schema, id }
    }

    /// Identifier of the model being edited.
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Read-only view of the model.
    pub fn get(&self) -> &Model {
        &self.schema.arena[self.id]
    }

    /// Schema the model belongs to.
    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Replace the version label.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.schema.arena[self.id].version = version.into();
        self.notify();
    }

    /// Allow or forbid edits to the model.
    pub fn set_modifiable(&mut self, is_modifiable: bool) {
        self.schema.arena[self.id].is_modifiable = is_modifiable;
        self.notify();
    }

    /// Create an auto-named entity.
    pub fn create_entity(&mut self) -> EntityId {
        match self.create_entity_with(|_| Ok::<(), Infallible>(())) {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }

    /// Create an auto-named entity and customize it before it is attached.
    ///
    /// The entity joins the model only once `build` succeeds. On failure it is
    /// discarded together with any attributes and relationships created on it.
    pub fn create_entity_with<E>(
        &mut self,
        build: impl FnOnce(&mut EntityMut<'_>) -> Result<(), E>,
    ) -> Result<EntityId, E> {
        let name = naming::unique_name(
            self.schema.config.base_name(NodeKind::Entity),
            self.schema.entity_names_except(self.id, None),
        );
        let id = self.schema.arena.insert_entity(self.id, name);

        if let Err(err) = build(&mut EntityMut::new(self.schema, id)) {
            self.schema.arena.purge_entity(id);
            return Err(err);
        }

        self.schema.arena[self.id].entities.push(id);
        debug!(model = %self.id, entity = %id, name = %self.schema.arena[id].name, "created entity");
        self.notify();
        Ok(id)
    }

    /// Remove an entity.
    ///
    /// Every relationship destination and super entity reference to the
    /// removed entity elsewhere in the model is cleared first.
    pub fn remove_entity(&mut self, entity: EntityId) -> Result<(), ValidationError> {
        let index = self
            .get()
            .entities
            .iter()
            .position(|e| *e == entity)
            .ok_or(ValidationError::NotAChild {
                parent: NodeId::Model(self.id),
                child: NodeId::Entity(entity),
            })?;

        let arena = &mut self.schema.arena;
        let siblings = arena[self.id].entities.clone();
        for sibling in siblings {
            let other = &mut arena[sibling];
            if other.super_entity == Some(entity) {
                other.super_entity = None;
            }
            let relationships = other.relationships.clone();
            for relationship in relationships {
                let relationship = &mut arena[relationship];
                if relationship.destination == Some(entity) {
                    relationship.destination = None;
                }
            }
        }
        arena[self.id].entities.remove(index);

        if let Some(removed) = arena.purge_entity(entity) {
            debug!(model = %self.id, entity = %entity, name = %removed.name, "removed entity");
            removed.observable.notify(self.schema, NodeId::Entity(entity));
        }
        self.notify();
        Ok(())
    }

    /// Mutable handle to one of this model's entities.
    pub fn entity_mut(&mut self, entity: EntityId) -> Option<EntityMut<'_>> {
        if self.get().entities.contains(&entity) {
            Some(EntityMut::new(self.schema, entity))
        } else {
            None
        }
    }

    fn notify(&self) {
        self.schema.notify(NodeId::Model(self.id));
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::graph::Schema;
    use std::convert::Infallible;

    #[test]
    fn test_auto_names_reuse_first_free_suffix() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let a = handle.create_entity();
        let b = handle.create_entity();
        let c = handle.create_entity();

        let names: Vec<_> = [a, b, c]
            .iter()
            .map(|id| handle.schema().entity(*id).unwrap().name().to_string())
            .collect();
        assert_eq!(names, ["Entity", "Entity1", "Entity2"]);

        handle.remove_entity(b).unwrap();
        let d = handle.create_entity();
        assert_eq!(handle.schema().entity(d).unwrap().name(), "Entity1");
    }

    #[test]
    fn test_rename_uniqueness_within_model() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let a = handle.create_entity();
        let b = handle.create_entity();

        let mut entity = handle.entity_mut(b).unwrap();
        assert!(matches!(
            entity.set_name("Entity"),
            Err(ValidationError::DuplicateName { .. })
        ));
        entity.set_name("User").unwrap();
        assert_eq!(schema.entity_by_name(model, "User"), Some(b));
        assert_eq!(schema.entity_by_name(model, "Entity"), Some(a));
    }

    #[test]
    fn test_cascade_repair_on_removal() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let a = handle.create_entity();
        let b = handle.create_entity();
        let c = handle.create_entity();

        let mut entity_b = handle.entity_mut(b).unwrap();
        entity_b.set_super_entity(Some(a)).unwrap();
        let to_a = entity_b
            .create_relationship_with(|r| r.set_destination(Some(a)))
            .unwrap();
        let to_c = entity_b
            .create_relationship_with(|r| r.set_destination(Some(c)))
            .unwrap();

        handle.remove_entity(a).unwrap();

        assert_eq!(schema.entity(b).unwrap().super_entity(), None);
        assert_eq!(schema.relationship(to_a).unwrap().destination(), None);
        assert_eq!(schema.relationship(to_c).unwrap().destination(), Some(c));
        assert!(!schema.model(model).unwrap().entities().contains(&a));
        assert!(schema.is_deleted(a.into()));
    }

    #[test]
    fn test_removed_entity_children_are_deleted() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let entity = schema.model_mut(model).unwrap().create_entity();
        let mut handle = schema.entity_mut(entity).unwrap();
        let attribute = handle.create_attribute();
        let relationship = handle.create_relationship();

        schema.model_mut(model).unwrap().remove_entity(entity).unwrap();
        assert!(schema.is_deleted(attribute.into()));
        assert!(schema.is_deleted(relationship.into()));
        assert!(matches!(
            schema.model_mut(model).unwrap().remove_entity(entity),
            Err(ValidationError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_failed_build_discards_subtree() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let existing = schema.model_mut(model).unwrap().create_entity();
        schema
            .entity_mut(existing)
            .unwrap()
            .set_name("User")
            .unwrap();

        let mut created = Vec::new();
        let result = schema.model_mut(model).unwrap().create_entity_with(|entity| {
            created.push(entity.create_attribute());
            created.push(entity.create_attribute());
            entity.set_name("User")
        });

        assert!(result.is_err());
        assert_eq!(schema.model(model).unwrap().entities(), &[existing]);
        for attribute in created {
            assert!(schema.attribute(attribute).is_none());
        }
    }

    #[test]
    fn test_build_sees_committed_siblings_only() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let id = schema
            .model_mut(model)
            .unwrap()
            .create_entity_with(|entity| {
                assert!(entity.schema().entities_by_name(entity.get().model()).is_empty());
                Ok::<(), Infallible>(())
            })
            .unwrap();
        assert_eq!(schema.entities_by_name(model).len(), 1);
        assert_eq!(schema.entity(id).unwrap().name(), "Entity");
    }

    #[test]
    fn test_version_and_flags() {
        let mut schema = Schema::new();
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        assert_eq!(handle.get().version(), "1");
        assert!(handle.get().is_modifiable());

        handle.set_version("7");
        handle.set_modifiable(false);
        assert_eq!(handle.get().version(), "7");
        assert!(!handle.get().is_modifiable());
    }
}
