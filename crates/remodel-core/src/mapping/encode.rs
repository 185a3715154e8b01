//! Graph to document tree.

use super::keys;
use crate::graph::{Attribute, Entity, Model, Relationship, Schema};
use serde_json::{json, Value};

pub(crate) fn schema(schema: &Schema) -> Value {
    let models: Vec<Value> = schema
        .models()
        .iter()
        .filter_map(|id| schema.model(*id))
        .map(|m| model(schema, m))
        .collect();
    json!({
        (keys::NAME): schema.name(),
        (keys::MODELS): models,
    })
}

pub(crate) fn model(schema: &Schema, model: &Model) -> Value {
    let entities: Vec<Value> = model
        .entities()
        .iter()
        .filter_map(|id| schema.entity(*id))
        .map(|e| entity(schema, e))
        .collect();
    json!({
        (keys::VERSION): model.version(),
        (keys::IS_MODIFIABLE): model.is_modifiable(),
        (keys::ENTITIES): entities,
    })
}

/// References are written as the referenced node's name, or null.
fn entity(schema: &Schema, entity: &Entity) -> Value {
    let super_entity = entity
        .super_entity()
        .and_then(|id| schema.entity(id))
        .map(Entity::name);
    let primary_key = entity
        .primary_key()
        .and_then(|id| schema.attribute(id))
        .map(Attribute::name);
    let attributes: Vec<Value> = entity
        .attributes()
        .iter()
        .filter_map(|id| schema.attribute(*id))
        .map(attribute)
        .collect();
    let relationships: Vec<Value> = entity
        .relationships()
        .iter()
        .filter_map(|id| schema.relationship(*id))
        .map(|r| relationship(schema, r))
        .collect();

    json!({
        (keys::NAME): entity.name(),
        (keys::PRIMARY_KEY): primary_key,
        (keys::SUPER_ENTITY): super_entity,
        (keys::IS_BASE_CLASS): entity.is_base_class(),
        (keys::ATTRIBUTES): attributes,
        (keys::RELATIONSHIPS): relationships,
    })
}

fn attribute(attribute: &Attribute) -> Value {
    json!({
        (keys::NAME): attribute.name(),
        (keys::IS_IGNORED): attribute.is_ignored(),
        (keys::IS_INDEXED): attribute.is_indexed(),
        (keys::IS_REQUIRED): attribute.is_required(),
        (keys::HAS_DEFAULT): attribute.has_default(),
        (keys::DEFAULT_VALUE): attribute.default_value(),
        (keys::TYPE): attribute.attribute_type().tag(),
    })
}

fn relationship(schema: &Schema, relationship: &Relationship) -> Value {
    let destination = relationship
        .destination()
        .and_then(|id| schema.entity(id))
        .map(Entity::name);
    json!({
        (keys::NAME): relationship.name(),
        (keys::DESTINATION): destination,
        (keys::IS_MANY): relationship.is_many(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributeType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entity_document_shape() {
        let mut s = Schema::new();
        s.set_name("Blog");
        let model_id = s.create_model();
        let mut handle = s.model_mut(model_id).unwrap();
        let base = handle.create_entity();
        let post = handle.create_entity();

        s.entity_mut(base).unwrap().set_name("Base").unwrap();
        let mut entity = s.entity_mut(post).unwrap();
        entity.set_name("Post").unwrap();
        entity.set_super_entity(Some(base)).unwrap();
        let id = entity
            .create_attribute_with(|a| {
                a.set_name("id")?;
                a.set_type(AttributeType::Long)
            })
            .unwrap();
        entity.set_primary_key(Some(id)).unwrap();
        entity
            .create_relationship_with(|r| {
                r.set_name("parent")?;
                r.set_destination(Some(base))
            })
            .unwrap();

        let value = schema(&s);
        assert_eq!(
            value["models"][0]["entities"][1],
            json!({
                "name": "Post",
                "primaryKey": "id",
                "superEntity": "Base",
                "isBaseClass": false,
                "attributes": [{
                    "name": "id",
                    "isIgnored": false,
                    "isIndexed": true,
                    "isRequired": false,
                    "hasDefault": false,
                    "defaultValue": "",
                    "type": "Long",
                }],
                "relationships": [{
                    "name": "parent",
                    "destination": "Base",
                    "isMany": false,
                }],
            })
        );
        assert_eq!(value["name"], "Blog");
        assert_eq!(value["models"][0]["version"], "1");
        assert_eq!(value["models"][0]["entities"][0]["superEntity"], Value::Null);
        assert_eq!(value["models"][0]["entities"][0]["primaryKey"], Value::Null);
    }
}
