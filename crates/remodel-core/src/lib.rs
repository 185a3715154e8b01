//! Remodel core: an editable, observable schema graph.
//!
//! A [`Schema`] holds versioned [`Model`]s of entities, attributes and
//! relationships. Every mutation is validated before it is applied and
//! announced to observers registered anywhere on the path from the changed
//! node to the schema root. The [`mapping`] module loads and saves the
//! graph as a JSON document tree.
//!
//! ```
//! use remodel_core::{AttributeType, Schema};
//!
//! let mut schema = Schema::new();
//! let model = schema.create_model();
//! let user = schema.model_mut(model).unwrap().create_entity();
//!
//! let mut entity = schema.entity_mut(user).unwrap();
//! entity.set_name("User").unwrap();
//! let id = entity
//!     .create_attribute_with(|a| {
//!         a.set_name("id")?;
//!         a.set_type(AttributeType::Long)
//!     })
//!     .unwrap();
//! entity.set_primary_key(Some(id)).unwrap();
//!
//! assert!(schema.attribute(id).unwrap().is_indexed());
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod observe;

pub use config::SchemaConfig;
pub use error::{Error, ErrorKind, FormatError, ReferenceError, Result, ValidationError};
pub use graph::{
    Attribute, AttributeId, AttributeMut, AttributeType, Entity, EntityId, EntityMut, Model,
    ModelId, ModelMut, NodeId, NodeKind, Relationship, RelationshipId, RelationshipMut, Schema,
};
pub use observe::{Observable, Observer};
