//! The schema root: owner of every node and of the notification tree.

use super::arena::Arena;
use super::{
    naming, Attribute, AttributeId, AttributeMut, Entity, EntityId, EntityMut, Model, ModelId,
    ModelMut, NodeId, Relationship, RelationshipId, RelationshipMut,
};
use crate::config::SchemaConfig;
use crate::error::ValidationError;
use crate::observe::{Observable, Observer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use tracing::{debug, trace};

/// A schema document: an ordered list of models and everything they own.
#[derive(Debug)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) models: Vec<ModelId>,
    pub(crate) arena: Arena,
    pub(crate) observable: Observable,
    pub(crate) config: SchemaConfig,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Create an empty schema with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SchemaConfig::default())
    }

    /// Create an empty schema.
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            name: String::new(),
            models: Vec::new(),
            arena: Arena::default(),
            observable: Observable::new(),
            config,
        }
    }

    /// Configuration used by the factories.
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Empty schema sharing this one's configuration and identifier sequence.
    pub(crate) fn scratch(&self) -> Schema {
        Schema {
            arena: Arena::starting_at(self.arena.next_id()),
            ..Schema::with_config(self.config.clone())
        }
    }

    /// Take over the contents of `other`, keeping this schema's observers.
    ///
    /// Every node of the previous contents becomes deleted.
    pub(crate) fn replace_contents(&mut self, other: Schema) {
        self.name = other.name;
        self.models = other.models;
        self.arena = other.arena;
        self.notify(NodeId::Schema);
    }

    /// Schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the schema.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.notify(NodeId::Schema);
    }

    /// Models in creation order.
    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// The most recently created model.
    pub fn current_model(&self) -> Option<ModelId> {
        self.models.last().copied()
    }

    /// Observers of the schema root.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    // ---- node access -------------------------------------------------

    /// Model by id, `None` once deleted.
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.arena.models.get(&id)
    }

    /// Entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.arena.entities.get(&id)
    }

    /// Attribute by id.
    pub fn attribute(&self, id: AttributeId) -> Option<&Attribute> {
        self.arena.attributes.get(&id)
    }

    /// Relationship by id.
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.arena.relationships.get(&id)
    }

    /// Mutable handle to a live model.
    pub fn model_mut(&mut self, id: ModelId) -> Option<ModelMut<'_>> {
        if self.arena.models.contains_key(&id) {
            Some(ModelMut::new(self, id))
        } else {
            None
        }
    }

    /// Mutable handle to a live entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        if self.arena.entities.contains_key(&id) {
            Some(EntityMut::new(self, id))
        } else {
            None
        }
    }

    /// Mutable handle to a live attribute.
    pub fn attribute_mut(&mut self, id: AttributeId) -> Option<AttributeMut<'_>> {
        if self.arena.attributes.contains_key(&id) {
            Some(AttributeMut::new(self, id))
        } else {
            None
        }
    }

    /// Mutable handle to a live relationship.
    pub fn relationship_mut(&mut self, id: RelationshipId) -> Option<RelationshipMut<'_>> {
        if self.arena.relationships.contains_key(&id) {
            Some(RelationshipMut::new(self, id))
        } else {
            None
        }
    }

    /// Check if a node has been removed (or never existed).
    pub fn is_deleted(&self, node: NodeId) -> bool {
        match node {
            NodeId::Schema => false,
            NodeId::Model(id) => !self.arena.models.contains_key(&id),
            NodeId::Entity(id) => !self.arena.entities.contains_key(&id),
            NodeId::Attribute(id) => !self.arena.attributes.contains_key(&id),
            NodeId::Relationship(id) => !self.arena.relationships.contains_key(&id),
        }
    }

    // ---- models ------------------------------------------------------

    /// Create a model versioned after the current one.
    pub fn create_model(&mut self) -> ModelId {
        match self.create_model_with(|_| Ok::<(), Infallible>(())) {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }

    /// Create a model and customize it before it is attached.
    ///
    /// The first model gets the configured initial version; later models get
    /// the successor of the current model's version.
    pub fn create_model_with<E>(
        &mut self,
        build: impl FnOnce(&mut ModelMut<'_>) -> Result<(), E>,
    ) -> Result<ModelId, E> {
        let version = match self.current_model() {
            Some(current) => naming::next_version(
                &self.arena[current].version,
                &self.config.initial_model_version,
            ),
            None => self.config.initial_model_version.clone(),
        };
        let id = self.arena.insert_model(version);

        if let Err(err) = build(&mut ModelMut::new(self, id)) {
            self.arena.purge_model(id);
            return Err(err);
        }

        self.models.push(id);
        debug!(model = %id, version = %self.arena[id].version, "created model");
        self.notify(NodeId::Schema);
        Ok(id)
    }

    /// Remove a model and everything it owns.
    pub fn remove_model(&mut self, model: ModelId) -> Result<(), ValidationError> {
        let index = self
            .models
            .iter()
            .position(|m| *m == model)
            .ok_or(ValidationError::NotAChild {
                parent: NodeId::Schema,
                child: NodeId::Model(model),
            })?;
        self.models.remove(index);

        if let Some(removed) = self.arena.purge_model(model) {
            debug!(model = %model, version = %removed.version, "removed model");
            removed.observable.notify(self, NodeId::Model(model));
        }
        self.notify(NodeId::Schema);
        Ok(())
    }

    // ---- name indexes --------------------------------------------------

    /// Committed entities of a model keyed by name.
    pub fn entities_by_name(&self, model: ModelId) -> HashMap<&str, EntityId> {
        self.model(model)
            .map(|m| {
                m.entities
                    .iter()
                    .map(|id| (self.arena[*id].name.as_str(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Entity of `model` named `name`.
    pub fn entity_by_name(&self, model: ModelId, name: &str) -> Option<EntityId> {
        self.model(model)?
            .entities
            .iter()
            .copied()
            .find(|id| self.arena[*id].name == name)
    }

    /// Committed attributes of an entity keyed by name.
    pub fn attributes_by_name(&self, entity: EntityId) -> HashMap<&str, AttributeId> {
        self.entity(entity)
            .map(|e| {
                e.attributes
                    .iter()
                    .map(|id| (self.arena[*id].name.as_str(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attribute of `entity` named `name`.
    pub fn attribute_by_name(&self, entity: EntityId, name: &str) -> Option<AttributeId> {
        self.entity(entity)?
            .attributes
            .iter()
            .copied()
            .find(|id| self.arena[*id].name == name)
    }

    /// Committed relationships of an entity keyed by name.
    pub fn relationships_by_name(&self, entity: EntityId) -> HashMap<&str, RelationshipId> {
        self.entity(entity)
            .map(|e| {
                e.relationships
                    .iter()
                    .map(|id| (self.arena[*id].name.as_str(), *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Relationship of `entity` named `name`.
    pub fn relationship_by_name(&self, entity: EntityId, name: &str) -> Option<RelationshipId> {
        self.entity(entity)?
            .relationships
            .iter()
            .copied()
            .find(|id| self.arena[*id].name == name)
    }

    pub(crate) fn entity_names_except(
        &self,
        model: ModelId,
        except: Option<EntityId>,
    ) -> impl Iterator<Item = &str> {
        self.model(model)
            .into_iter()
            .flat_map(|m| m.entities.iter())
            .filter(move |id| Some(**id) != except)
            .map(|id| self.arena[*id].name.as_str())
    }

    pub(crate) fn attribute_names_except(
        &self,
        entity: EntityId,
        except: Option<AttributeId>,
    ) -> impl Iterator<Item = &str> {
        self.entity(entity)
            .into_iter()
            .flat_map(|e| e.attributes.iter())
            .filter(move |id| Some(**id) != except)
            .map(|id| self.arena[*id].name.as_str())
    }

    pub(crate) fn relationship_names_except(
        &self,
        entity: EntityId,
        except: Option<RelationshipId>,
    ) -> impl Iterator<Item = &str> {
        self.entity(entity)
            .into_iter()
            .flat_map(|e| e.relationships.iter())
            .filter(move |id| Some(**id) != except)
            .map(|id| self.arena[*id].name.as_str())
    }

    /// Check if `entity` is `ancestor` or inherits from it transitively.
    pub fn inherits_from(&self, entity: EntityId, ancestor: EntityId) -> bool {
        let mut current = Some(entity);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            // Chains are acyclic; the bound only guards against corruption.
            steps += 1;
            if steps > self.arena.entities.len() {
                return false;
            }
            current = self.entity(id).and_then(|e| e.super_entity);
        }
        false
    }

    // ---- observation ---------------------------------------------------

    /// Observers registered directly on a node.
    pub fn observable_of(&self, node: NodeId) -> Option<&Observable> {
        match node {
            NodeId::Schema => Some(&self.observable),
            NodeId::Model(id) => self.model(id).map(|n| &n.observable),
            NodeId::Entity(id) => self.entity(id).map(|n| &n.observable),
            NodeId::Attribute(id) => self.attribute(id).map(|n| &n.observable),
            NodeId::Relationship(id) => self.relationship(id).map(|n| &n.observable),
        }
    }

    fn observable_of_mut(&mut self, node: NodeId) -> Option<&mut Observable> {
        match node {
            NodeId::Schema => Some(&mut self.observable),
            NodeId::Model(id) => self.arena.models.get_mut(&id).map(|n| &mut n.observable),
            NodeId::Entity(id) => self.arena.entities.get_mut(&id).map(|n| &mut n.observable),
            NodeId::Attribute(id) => self
                .arena
                .attributes
                .get_mut(&id)
                .map(|n| &mut n.observable),
            NodeId::Relationship(id) => self
                .arena
                .relationships
                .get_mut(&id)
                .map(|n| &mut n.observable),
        }
    }

    /// Register an observer on a node.
    ///
    /// Returns `false` if the node does not exist or the observer is already
    /// registered there.
    pub fn add_observer(&mut self, node: impl Into<NodeId>, observer: Rc<dyn Observer>) -> bool {
        self.observable_of_mut(node.into())
            .is_some_and(|observable| observable.add_observer(observer))
    }

    /// Unregister an observer from a node. Unknown observers are ignored.
    pub fn remove_observer(&mut self, node: impl Into<NodeId>, observer: &Rc<dyn Observer>) -> bool {
        self.observable_of_mut(node.into())
            .is_some_and(|observable| observable.remove_observer(observer))
    }

    /// Deliver a change on `node` to its observers and every ancestor's.
    ///
    /// Nodes that are not yet attached to the schema (inside a factory build
    /// step) do not notify.
    pub(crate) fn notify(&self, node: NodeId) {
        let Some(chain) = self.attached_chain(node) else {
            trace!(%node, "skipping notification for detached node");
            return;
        };
        for id in chain {
            if let Some(observable) = self.observable_of(id) {
                if !observable.is_empty() {
                    trace!(source = %id, observers = observable.len(), "notifying observers");
                }
                observable.notify(self, id);
            }
        }
    }

    /// Deliver a change to the node's own observers only.
    pub(crate) fn notify_local(&self, node: NodeId) {
        if self.attached_chain(node).is_none() {
            return;
        }
        if let Some(observable) = self.observable_of(node) {
            observable.notify(self, node);
        }
    }

    /// Path from `node` up to the schema, or `None` if any link is not a
    /// committed member of its owner.
    fn attached_chain(&self, node: NodeId) -> Option<Vec<NodeId>> {
        let mut chain = Vec::with_capacity(5);
        let mut current = node;
        loop {
            chain.push(current);
            current = match current {
                NodeId::Schema => return Some(chain),
                NodeId::Model(id) => {
                    if !self.models.contains(&id) {
                        return None;
                    }
                    NodeId::Schema
                }
                NodeId::Entity(id) => {
                    let owner = self.entity(id)?.model;
                    if !self.model(owner)?.entities.contains(&id) {
                        return None;
                    }
                    NodeId::Model(owner)
                }
                NodeId::Attribute(id) => {
                    let owner = self.attribute(id)?.entity;
                    if !self.entity(owner)?.attributes.contains(&id) {
                        return None;
                    }
                    NodeId::Entity(owner)
                }
                NodeId::Relationship(id) => {
                    let owner = self.relationship(id)?.entity;
                    if !self.entity(owner)?.relationships.contains(&id) {
                        return None;
                    }
                    NodeId::Entity(owner)
                }
            };
        }
    }
}
