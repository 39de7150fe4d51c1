//! Minimal XML element tree used by the versioned value item documents.
//!
//! Documents are small and written element by element, so the model builds
//! an in-memory [`XmlElement`] tree and reads it back with typed accessors.
//! Leaf text is kept verbatim; whitespace between child elements is dropped.

use std::str::FromStr;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::definitions::XML_VERSION;
use crate::error::{ModelError, Result};

/// Element name of the version child present in every document element.
pub const VERSION: &str = "Version";

/// An XML element with attributes, text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf element with text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Creates an element carrying the current version child.
    pub fn versioned(name: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(VERSION, XML_VERSION);
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets or replaces an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Appends a leaf child with text content.
    pub fn push_text(&mut self, name: &str, text: impl Into<String>) {
        self.children.push(XmlElement::with_text(name, text));
    }

    /// Appends a list element with one leaf per entry; nothing for an empty list.
    pub fn push_text_list<S: AsRef<str>>(&mut self, list_name: &str, item_name: &str, items: &[S]) {
        if items.is_empty() {
            return;
        }
        let mut list = XmlElement::new(list_name);
        for item in items {
            list.push_text(item_name, item.as_ref());
        }
        self.children.push(list);
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child with the given name, or a missing element error.
    pub fn required_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name)
            .ok_or_else(|| ModelError::missing(&self.name, name))
    }

    /// Text of a required child.
    pub fn child_text(&self, name: &str) -> Result<&str> {
        Ok(self.required_child(name)?.text())
    }

    /// Parses the text of a required child.
    pub fn parse_child<T: FromStr>(&self, name: &str) -> Result<T> {
        let text = self.child_text(name)?;
        text.trim()
            .parse::<T>()
            .map_err(|_| ModelError::invalid_value(name, text))
    }

    /// Reads a `true`/`false` child (case-insensitive).
    pub fn bool_child(&self, name: &str) -> Result<bool> {
        let text = self.child_text(name)?;
        match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ModelError::invalid_value(name, text)),
        }
    }

    /// Reads a column index child where negative values mean "none".
    pub fn optional_index_child(&self, name: &str) -> Result<Option<usize>> {
        let value: i64 = self.parse_child(name)?;
        Ok(usize::try_from(value).ok())
    }

    /// Texts of the leaves of an optional list child; empty if absent.
    pub fn text_list(&self, list_name: &str) -> Vec<String> {
        self.child(list_name)
            .map(|list| list.children.iter().map(|item| item.text.clone()).collect())
            .unwrap_or_default()
    }

    /// Fails unless the element has the expected name.
    pub fn expect_name(&self, expected: &str) -> Result<()> {
        if self.name == expected {
            Ok(())
        } else {
            Err(ModelError::UnexpectedElement {
                expected: expected.to_string(),
                found: self.name.clone(),
            })
        }
    }

    /// Fails unless the version child carries the current version string.
    pub fn check_version(&self) -> Result<()> {
        let found = self.child(VERSION).map(XmlElement::text).unwrap_or_default();
        if found == XML_VERSION {
            Ok(())
        } else {
            Err(ModelError::UnsupportedVersion {
                element: self.name.clone(),
                found: found.to_string(),
            })
        }
    }

    /// Serializes the element as an indented document with declaration.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_to(&mut writer)?;
        let bytes = writer.into_inner();
        String::from_utf8(bytes).map_err(|error| ModelError::invalid_value("document", error.to_string()))
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if self.children.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        } else {
            for child in &self.children {
                child.write_to(writer)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Parses a document into its root element.
pub fn parse_xml(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(empty) => {
                let element = element_from_start(&empty)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(mut element) = stack.pop() {
                    if !element.children.is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&reference).into_owned();
                    let resolved = match reference
                        .resolve_char_ref()
                        .map_err(|error| ModelError::invalid_value("reference", error.to_string()))?
                    {
                        Some(character) => character.to_string(),
                        None => resolve_predefined_entity(&name)
                            .map(str::to_string)
                            .ok_or_else(|| ModelError::invalid_value("reference", name.clone()))?,
                    };
                    current.text.push_str(&resolved);
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| ModelError::missing("document", "root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        let value = unescape(&raw)
            .map_err(|error| ModelError::invalid_value(key.clone(), error.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_text_survives_escaping() {
        let mut root = XmlElement::versioned("Root");
        root.push_text("Text", "a < b & \"c\"  ");
        root.push_text("Empty", "");
        let xml = root.to_xml_string().unwrap();
        let parsed = parse_xml(&xml).unwrap();
        assert_eq!(parsed, root);
        assert_eq!(parsed.child_text("Text").unwrap(), "a < b & \"c\"  ");
    }

    #[test]
    fn indentation_between_children_is_ignored() {
        let parsed = parse_xml("<A>\n  <B>1</B>\n  <C/>\n</A>").unwrap();
        assert_eq!(parsed.text(), "");
        assert_eq!(parsed.children().len(), 2);
        assert_eq!(parsed.parse_child::<i32>("B").unwrap(), 1);
        assert_eq!(parsed.child_text("C").unwrap(), "");
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut element = XmlElement::new("Format");
        element.push_text(VERSION, "Version 9.9.9");
        assert!(matches!(
            element.check_version(),
            Err(ModelError::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            XmlElement::new("Format").check_version(),
            Err(ModelError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn empty_lists_are_omitted() {
        let mut element = XmlElement::new("Root");
        element.push_text_list::<String>("Items", "Item", &[]);
        assert!(element.child("Items").is_none());
        element.push_text_list("Items", "Item", &["x", "y"]);
        assert_eq!(element.text_list("Items"), ["x", "y"]);
    }

    #[test]
    fn numeric_character_references_resolve() {
        let parsed = parse_xml("<A><B>x&#65;&amp;y</B></A>").unwrap();
        assert_eq!(parsed.child_text("B").unwrap(), "xA&y");
    }
}
