//! Node identifiers.
//!
//! Identifiers are handed out from a single per-schema counter and are never
//! reused, so a stale identifier can never alias a newer node.

use std::fmt;

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u64);

        impl $name {
            /// Raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " #{}"), self.0)
            }
        }
    };
}

node_id!(
    /// Identifier of a [`Model`](super::Model).
    ModelId,
    "model"
);
node_id!(
    /// Identifier of an [`Entity`](super::Entity).
    EntityId,
    "entity"
);
node_id!(
    /// Identifier of an [`Attribute`](super::Attribute).
    AttributeId,
    "attribute"
);
node_id!(
    /// Identifier of a [`Relationship`](super::Relationship).
    RelationshipId,
    "relationship"
);

/// Kind of a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root document.
    Schema,
    /// A versioned model.
    Model,
    /// An entity within a model.
    Entity,
    /// An attribute of an entity.
    Attribute,
    /// A relationship of an entity.
    Relationship,
}

impl NodeKind {
    /// Base name used when auto-naming nodes of this kind.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Schema => "Schema",
            NodeKind::Model => "Model",
            NodeKind::Entity => "Entity",
            NodeKind::Attribute => "Attribute",
            NodeKind::Relationship => "Relationship",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Schema => write!(f, "schema"),
            NodeKind::Model => write!(f, "model"),
            NodeKind::Entity => write!(f, "entity"),
            NodeKind::Attribute => write!(f, "attribute"),
            NodeKind::Relationship => write!(f, "relationship"),
        }
    }
}

/// Any addressable node, including the schema root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The schema root.
    Schema,
    /// A model.
    Model(ModelId),
    /// An entity.
    Entity(EntityId),
    /// An attribute.
    Attribute(AttributeId),
    /// A relationship.
    Relationship(RelationshipId),
}

impl NodeId {
    /// Kind of the referenced node.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeId::Schema => NodeKind::Schema,
            NodeId::Model(_) => NodeKind::Model,
            NodeId::Entity(_) => NodeKind::Entity,
            NodeId::Attribute(_) => NodeKind::Attribute,
            NodeId::Relationship(_) => NodeKind::Relationship,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Schema => write!(f, "schema"),
            NodeId::Model(id) => id.fmt(f),
            NodeId::Entity(id) => id.fmt(f),
            NodeId::Attribute(id) => id.fmt(f),
            NodeId::Relationship(id) => id.fmt(f),
        }
    }
}

impl From<ModelId> for NodeId {
    fn from(id: ModelId) -> Self {
        NodeId::Model(id)
    }
}

impl From<EntityId> for NodeId {
    fn from(id: EntityId) -> Self {
        NodeId::Entity(id)
    }
}

impl From<AttributeId> for NodeId {
    fn from(id: AttributeId) -> Self {
        NodeId::Attribute(id)
    }
}

impl From<RelationshipId> for NodeId {
    fn from(id: RelationshipId) -> Self {
        NodeId::Relationship(id)
    }
}
