//! The in-memory schema graph.
//!
//! Nodes live in per-kind tables owned by [`Schema`] and are addressed by
//! copyable identifiers. Owners hold ordered lists of their children's
//! identifiers; every cross-reference (super entity, primary key,
//! relationship destination) is an `Option` identifier that removal
//! operations repair. Mutation goes through short-lived handles
//! ([`ModelMut`], [`EntityMut`], [`AttributeMut`], [`RelationshipMut`])
//! that validate first and notify after the change is applied.

mod arena;
mod attribute;
mod entity;
mod ids;
mod model;
mod naming;
mod relationship;
mod schema;
mod types;

pub use attribute::{Attribute, AttributeMut};
pub use entity::{Entity, EntityMut};
pub use ids::{AttributeId, EntityId, ModelId, NodeId, NodeKind, RelationshipId};
pub use model::{Model, ModelMut};
pub use naming::next_version;
pub use relationship::{Relationship, RelationshipMut};
pub use schema::Schema;
pub use types::AttributeType;
