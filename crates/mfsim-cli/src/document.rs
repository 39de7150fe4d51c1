//! Reading and writing value item container documents.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use mfsim_model::ValueItemContainer;

/// Loads a container document from disk.
pub fn load_container(path: &Path) -> Result<ValueItemContainer> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Read container document");
    ValueItemContainer::from_xml_str(&text).with_context(|| format!("parse {}", path.display()))
}

/// Serializes a container in canonical form: items in vertical order,
/// versioned elements, two-space indentation.
pub fn render_container(container: &ValueItemContainer) -> Result<String> {
    let mut xml = container.to_xml_string().context("serialize container")?;
    xml.push('\n');
    Ok(xml)
}

/// XML of the schema item derived from `item_name`.
///
/// The schema is named `schema_name` when given, otherwise after the item.
pub fn render_schema(container: &ValueItemContainer, item_name: &str, schema_name: Option<&str>) -> Result<String> {
    let Some(item) = container.value_item(item_name) else {
        bail!("no value item named {item_name:?}");
    };
    let schema_name = schema_name.unwrap_or(item_name);
    let Some(schema) = item.schema_value_item(schema_name) else {
        bail!("value item {item_name:?} has no schema (requires a named matrix item with column names)");
    };
    let mut xml = schema.to_xml_string().context("serialize schema item")?;
    xml.push('\n');
    Ok(xml)
}

/// Writes a container document, replacing any existing file.
pub fn save_container(container: &ValueItemContainer, path: &Path) -> Result<()> {
    let xml = render_container(container)?;
    fs::write(path, &xml).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), items = container.size(), "Wrote container document");
    Ok(())
}
