//! Node storage.

use super::{
    Attribute, AttributeId, AttributeType, Entity, EntityId, Model, ModelId, Relationship,
    RelationshipId,
};
use crate::observe::Observable;
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// Per-kind node tables keyed by never-reused identifiers.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    next_id: u64,
    pub(crate) models: HashMap<ModelId, Model>,
    pub(crate) entities: HashMap<EntityId, Entity>,
    pub(crate) attributes: HashMap<AttributeId, Attribute>,
    pub(crate) relationships: HashMap<RelationshipId, Relationship>,
}

impl Arena {
    /// Empty arena whose identifiers start after `next_id`.
    pub(crate) fn starting_at(next_id: u64) -> Self {
        Self {
            next_id,
            ..Self::default()
        }
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn insert_model(&mut self, version: String) -> ModelId {
        let id = ModelId(self.allocate());
        self.models.insert(
            id,
            Model {
                id,
                version,
                is_modifiable: true,
                entities: Vec::new(),
                observable: Observable::new(),
            },
        );
        id
    }

    pub(crate) fn insert_entity(&mut self, model: ModelId, name: String) -> EntityId {
        let id = EntityId(self.allocate());
        self.entities.insert(
            id,
            Entity {
                id,
                model,
                name,
                is_base_class: false,
                super_entity: None,
                primary_key: None,
                attributes: Vec::new(),
                relationships: Vec::new(),
                observable: Observable::new(),
            },
        );
        id
    }

    pub(crate) fn insert_attribute(
        &mut self,
        entity: EntityId,
        name: String,
        attribute_type: AttributeType,
    ) -> AttributeId {
        let id = AttributeId(self.allocate());
        self.attributes.insert(
            id,
            Attribute {
                id,
                entity,
                name,
                attribute_type,
                is_ignored: false,
                is_indexed: false,
                is_required: false,
                has_default: false,
                default_value: String::new(),
                observable: Observable::new(),
            },
        );
        id
    }

    pub(crate) fn insert_relationship(&mut self, entity: EntityId, name: String) -> RelationshipId {
        let id = RelationshipId(self.allocate());
        self.relationships.insert(
            id,
            Relationship {
                id,
                entity,
                name,
                is_many: false,
                destination: None,
                observable: Observable::new(),
            },
        );
        id
    }

    pub(crate) fn purge_attribute(&mut self, id: AttributeId) -> Option<Attribute> {
        self.attributes.remove(&id)
    }

    pub(crate) fn purge_relationship(&mut self, id: RelationshipId) -> Option<Relationship> {
        self.relationships.remove(&id)
    }

    /// Remove an entity together with its attributes and relationships.
    pub(crate) fn purge_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        for attribute in &entity.attributes {
            self.attributes.remove(attribute);
        }
        for relationship in &entity.relationships {
            self.relationships.remove(relationship);
        }
        Some(entity)
    }

    /// Remove a model together with everything it owns.
    pub(crate) fn purge_model(&mut self, id: ModelId) -> Option<Model> {
        let model = self.models.remove(&id)?;
        for entity in &model.entities {
            self.purge_entity(*entity);
        }
        Some(model)
    }
}

macro_rules! arena_index {
    ($id:ty, $node:ty, $table:ident) => {
        impl Index<$id> for Arena {
            type Output = $node;

            fn index(&self, id: $id) -> &$node {
                match self.$table.get(&id) {
                    Some(node) => node,
                    None => panic!("{id} is not a live node"),
                }
            }
        }

        impl IndexMut<$id> for Arena {
            fn index_mut(&mut self, id: $id) -> &mut $node {
                match self.$table.get_mut(&id) {
                    Some(node) => node,
                    None => panic!("{id} is not a live node"),
                }
            }
        }
    };
}

arena_index!(ModelId, Model, models);
arena_index!(EntityId, Entity, entities);
arena_index!(AttributeId, Attribute, attributes);
arena_index!(RelationshipId, Relationship, relationships);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut arena = Arena::default();
        let model = arena.insert_model("1".into());
        let first = arena.insert_entity(model, "A".into());
        arena.purge_entity(first);
        let second = arena.insert_entity(model, "A".into());

        assert_ne!(first, second);
        assert!(!arena.entities.contains_key(&first));
    }

    #[test]
    fn test_purge_model_removes_subtree() {
        let mut arena = Arena::default();
        let model = arena.insert_model("1".into());
        let entity = arena.insert_entity(model, "A".into());
        let attribute = arena.insert_attribute(entity, "id".into(), AttributeType::Int);
        let relationship = arena.insert_relationship(entity, "parent".into());
        arena[model].entities.push(entity);
        arena[entity].attributes.push(attribute);
        arena[entity].relationships.push(relationship);

        assert!(arena.purge_model(model).is_some());
        assert!(arena.models.is_empty());
        assert!(arena.entities.is_empty());
        assert!(arena.attributes.is_empty());
        assert!(arena.relationships.is_empty());
    }

    #[test]
    fn test_starting_at_continues_counter() {
        let mut arena = Arena::starting_at(40);
        let model = arena.insert_model("1".into());
        assert_eq!(model.get(), 40);
        assert_eq!(arena.next_id(), 41);
    }
}
