//! Core error types.

use crate::graph::{NodeId, NodeKind};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the schema graph and the mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A mutation would violate a structural invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A document is missing a required key or has the wrong shape.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A named cross-reference in a document could not be resolved.
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ValidationError`].
    Validation,
    /// See [`FormatError`].
    Format,
    /// See [`ReferenceError`].
    Reference,
}

impl Error {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Format(_) => ErrorKind::Format,
            Error::Reference(_) => ErrorKind::Reference,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Format => write!(f, "format"),
            ErrorKind::Reference => write!(f, "reference"),
        }
    }
}

/// Structural invariant violations. The target node is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Names must be non-empty.
    #[error("{kind} name must not be empty")]
    EmptyName {
        /// Kind of node being named.
        kind: NodeKind,
    },

    /// A sibling under the same owner already uses the name.
    #[error("{kind} name `{name}` is already in use")]
    DuplicateName {
        /// Kind of node being named.
        kind: NodeKind,
        /// The rejected name.
        name: String,
    },

    /// The attribute's type cannot back a primary key.
    #[error("attribute `{attribute}` of type {type_tag} cannot be a primary key")]
    PrimaryKeyType {
        /// Attribute name.
        attribute: String,
        /// Tag of the attribute's type.
        type_tag: &'static str,
    },

    /// The attribute belongs to another entity.
    #[error("attribute `{attribute}` does not belong to entity `{entity}`")]
    PrimaryKeyOwner {
        /// Attribute name.
        attribute: String,
        /// Entity the key was being assigned on.
        entity: String,
    },

    /// The primary key must stay indexed.
    #[error("attribute `{attribute}` is the primary key and must stay indexed")]
    PrimaryKeyIndex {
        /// Attribute name.
        attribute: String,
    },

    /// The attribute's type does not support an index.
    #[error("attribute `{attribute}` of type {type_tag} cannot be indexed")]
    NotIndexable {
        /// Attribute name.
        attribute: String,
        /// Tag of the attribute's type.
        type_tag: &'static str,
    },

    /// Entity references must stay inside the owning model.
    #[error("entity `{target}` is not part of the same model as `{entity}`")]
    ForeignEntity {
        /// Entity holding the reference.
        entity: String,
        /// Referenced entity.
        target: String,
    },

    /// An entity cannot inherit from itself, directly or transitively.
    #[error("making `{target}` the super entity of `{entity}` creates an inheritance cycle")]
    InheritanceCycle {
        /// Entity being modified.
        entity: String,
        /// Proposed super entity.
        target: String,
    },

    /// The node does not exist (never created or already removed).
    #[error("{0} does not exist")]
    UnknownNode(NodeId),

    /// The node is not a committed child of the receiver.
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        /// Receiver of the removal.
        parent: NodeId,
        /// Node passed for removal.
        child: NodeId,
    },
}

/// Shape errors found while mapping a document into the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The document is not syntactically valid.
    #[error("malformed document: {message}")]
    Syntax {
        /// Parser message.
        message: String,
    },

    /// A node in the document is not a key-value map.
    #[error("{path}: expected an object")]
    NotAnObject {
        /// Document path of the node.
        path: String,
    },

    /// A required key is absent.
    #[error("{path}: missing required key `{key}`")]
    MissingKey {
        /// Document path of the node.
        path: String,
        /// Missing key.
        key: &'static str,
    },

    /// A required key holds a value of the wrong type.
    #[error("{path}: key `{key}` must be {expected}")]
    WrongType {
        /// Document path of the node.
        path: String,
        /// Offending key.
        key: &'static str,
        /// Expected shape.
        expected: &'static str,
    },
}

/// Unresolvable named references found while mapping a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// `superEntity` names an entity that is not in the model.
    #[error("{path}: super entity `{name}` of `{entity}` does not exist")]
    UnknownSuperEntity {
        /// Document path of the entity.
        path: String,
        /// Entity carrying the reference.
        entity: String,
        /// Unresolved name.
        name: String,
    },
}
