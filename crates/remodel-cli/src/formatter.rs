//! Output formatters for schema listings.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use remodel_core::{Entity, EntityId, Schema};
use serde_json::{json, Value};

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Describe every entity of every model.
    fn format_schema(&self, schema: &Schema) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Every entity in document order, paired with its model's version.
fn entities(schema: &Schema) -> impl Iterator<Item = (&str, &Entity)> {
    schema
        .models()
        .iter()
        .filter_map(|id| schema.model(*id))
        .flat_map(move |model| {
            model
                .entities()
                .iter()
                .filter_map(move |id| schema.entity(*id))
                .map(move |entity| (model.version(), entity))
        })
}

fn entity_name(schema: &Schema, id: Option<EntityId>) -> Option<&str> {
    id.and_then(|id| schema.entity(id)).map(Entity::name)
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &Schema) -> String {
        let mut entity_table = Table::new();
        entity_table.set_header(vec!["Model", "Entity", "Super entity", "Primary key", "Base class"]);

        let mut attribute_table = Table::new();
        attribute_table.set_header(vec!["Entity", "Attribute", "Type", "Indexed", "Required", "Default"]);

        let mut relationship_table = Table::new();
        relationship_table.set_header(vec!["Entity", "Relationship", "Destination", "To-many"]);

        let mut listed = 0;
        for (version, entity) in entities(schema) {
            listed += 1;
            let primary_key = entity
                .primary_key()
                .and_then(|id| schema.attribute(id))
                .map(|a| a.name());
            entity_table.add_row(vec![
                Cell::new(version),
                Cell::new(entity.name()),
                Cell::new(entity_name(schema, entity.super_entity()).unwrap_or("-")),
                Cell::new(primary_key.unwrap_or("-")),
                Cell::new(entity.is_base_class()),
            ]);

            for attribute in entity.attributes().iter().filter_map(|id| schema.attribute(*id)) {
                let default = if attribute.has_default() {
                    attribute.default_value()
                } else {
                    "-"
                };
                attribute_table.add_row(vec![
                    Cell::new(entity.name()),
                    Cell::new(attribute.name()),
                    Cell::new(attribute.attribute_type()),
                    Cell::new(attribute.is_indexed()),
                    Cell::new(attribute.is_required()),
                    Cell::new(default),
                ]);
            }

            for relationship in entity
                .relationships()
                .iter()
                .filter_map(|id| schema.relationship(*id))
            {
                relationship_table.add_row(vec![
                    Cell::new(entity.name()),
                    Cell::new(relationship.name()),
                    Cell::new(entity_name(schema, relationship.destination()).unwrap_or("-")),
                    Cell::new(relationship.is_many()),
                ]);
            }
        }

        if listed == 0 {
            return format!("Schema `{}` has no entities", schema.name());
        }
        format!("{entity_table}\n\n{attribute_table}\n\n{relationship_table}")
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &Schema) -> String {
        let listed: Vec<Value> = entities(schema)
            .map(|(version, entity)| {
                let attributes: Vec<Value> = entity
                    .attributes()
                    .iter()
                    .filter_map(|id| schema.attribute(*id))
                    .map(|a| {
                        json!({
                            "name": a.name(),
                            "type": a.attribute_type().tag(),
                            "indexed": a.is_indexed(),
                            "required": a.is_required(),
                        })
                    })
                    .collect();
                let relationships: Vec<Value> = entity
                    .relationships()
                    .iter()
                    .filter_map(|id| schema.relationship(*id))
                    .map(|r| {
                        json!({
                            "name": r.name(),
                            "destination": entity_name(schema, r.destination()),
                            "many": r.is_many(),
                        })
                    })
                    .collect();
                json!({
                    "model": version,
                    "entity": entity.name(),
                    "superEntity": entity_name(schema, entity.super_entity()),
                    "attributes": attributes,
                    "relationships": relationships,
                })
            })
            .collect();
        serde_json::to_string_pretty(&listed).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remodel_core::AttributeType;

    fn sample() -> Schema {
        let mut schema = Schema::new();
        schema.set_name("Shop");
        let model = schema.create_model();
        let mut handle = schema.model_mut(model).unwrap();
        let customer = handle.create_entity();
        let order = handle.create_entity();
        schema.entity_mut(customer).unwrap().set_name("Customer").unwrap();

        let mut entity = schema.entity_mut(order).unwrap();
        entity.set_name("Order").unwrap();
        entity
            .create_attribute_with(|a| {
                a.set_name("total")?;
                a.set_type(AttributeType::Double)
            })
            .unwrap();
        entity
            .create_relationship_with(|r| {
                r.set_name("customer")?;
                r.set_destination(Some(customer))
            })
            .unwrap();
        schema
    }

    #[test]
    fn test_table_lists_every_node() {
        let output = TableFormatter.format_schema(&sample());
        for expected in ["Customer", "Order", "total", "Double", "customer"] {
            assert!(output.contains(expected), "missing {expected} in\n{output}");
        }
    }

    #[test]
    fn test_table_empty_schema() {
        let output = TableFormatter.format_schema(&Schema::new());
        assert_eq!(output, "Schema `` has no entities");
    }

    #[test]
    fn test_json_listing() {
        let output = JsonFormatter.format_schema(&sample());
        let listed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 2);
        assert_eq!(listed[1]["model"], "1");
        assert_eq!(listed[1]["attributes"][0]["type"], "Double");
        assert_eq!(listed[1]["relationships"][0]["destination"], "Customer");
        assert_eq!(listed[0]["superEntity"], Value::Null);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
