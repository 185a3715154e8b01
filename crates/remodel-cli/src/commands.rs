//! Command implementations.
//!
//! Each command returns the text to print on stdout.

use crate::formatter::Formatter;
use remodel_core::{Schema, SchemaConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Command execution error.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading or writing a document failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be loaded or changed.
    #[error("{}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: remodel_core::Error,
    },

    /// The document has no model to act on.
    #[error("{}: document contains no models", .0.display())]
    NoModel(PathBuf),
}

fn load(path: &Path, config: SchemaConfig) -> Result<Schema, CommandError> {
    let text = fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read document");
    Schema::from_json_str_with_config(&text, config).map_err(|source| CommandError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

fn write_or_return(text: String, output: Option<&Path>) -> Result<String, CommandError> {
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n")).map_err(|source| CommandError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "wrote document");
            Ok(String::new())
        }
        None => Ok(text),
    }
}

/// Load a document and summarize it.
pub fn check(path: &Path, config: SchemaConfig) -> Result<String, CommandError> {
    let schema = load(path, config)?;

    let mut entities = 0;
    let mut attributes = 0;
    let mut relationships = 0;
    for entity in schema
        .models()
        .iter()
        .filter_map(|id| schema.model(*id))
        .flat_map(|m| m.entities())
        .filter_map(|id| schema.entity(*id))
    {
        entities += 1;
        attributes += entity.attributes().len();
        relationships += entity.relationships().len();
    }

    Ok(format!(
        "{}: schema `{}` is valid ({} model(s), {} entit{}, {} attribute(s), {} relationship(s))",
        path.display(),
        schema.name(),
        schema.models().len(),
        entities,
        if entities == 1 { "y" } else { "ies" },
        attributes,
        relationships,
    ))
}

/// Describe the document's contents.
pub fn show(
    path: &Path,
    config: SchemaConfig,
    formatter: &dyn Formatter,
) -> Result<String, CommandError> {
    let schema = load(path, config)?;
    Ok(formatter.format_schema(&schema))
}

/// Re-emit a document as canonical pretty JSON.
pub fn fmt(path: &Path, output: Option<&Path>, config: SchemaConfig) -> Result<String, CommandError> {
    let schema = load(path, config)?;
    write_or_return(schema.to_json_string_pretty(), output)
}

/// Append a copy of the current model under the next version.
pub fn bump(path: &Path, output: Option<&Path>, config: SchemaConfig) -> Result<String, CommandError> {
    let mut schema = load(path, config)?;
    let current = schema
        .current_model()
        .ok_or_else(|| CommandError::NoModel(path.to_path_buf()))?;
    let document = schema
        .model_to_value(current)
        .ok_or_else(|| CommandError::NoModel(path.to_path_buf()))?;

    let bumped = schema
        .import_model(&document, true)
        .map_err(|source| CommandError::Schema {
            path: path.to_path_buf(),
            source,
        })?;
    if let (Some(from), Some(to)) = (schema.model(current), schema.model(bumped)) {
        info!(from = %from.version(), to = %to.version(), "bumped model version");
    }

    write_or_return(schema.to_json_string_pretty(), output)
}
