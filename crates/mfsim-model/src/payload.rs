//! Opaque payloads of `COMPARTMENT_CONTAINER` and `OBJECT` value items.
//!
//! The compartment sub-model is not interpreted here. A compartment payload
//! keeps its document subtree as written and an error flag reported by the
//! owner of that sub-model. Objects are referenced by handle only.

use crate::xml::XmlElement;

/// Element name of a compartment payload inside a value item document.
pub const COMPARTMENT_CONTAINER: &str = "CompartmentContainer";

/// Error message set on a value item whose compartments report an error.
pub const COMPARTMENT_ERROR_MESSAGE: &str = "Compartment definition contains errors.";

/// Compartment definition carried as an opaque document subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompartmentPayload {
    element: XmlElement,
    has_error: bool,
}

impl CompartmentPayload {
    /// Wraps a subtree; the element is renamed to `CompartmentContainer`.
    pub fn new(element: XmlElement) -> Self {
        let element = if element.name() == COMPARTMENT_CONTAINER {
            element
        } else {
            let mut renamed = XmlElement::new(COMPARTMENT_CONTAINER);
            renamed.push(element);
            renamed
        };
        Self {
            element,
            has_error: false,
        }
    }

    pub fn with_error(mut self, has_error: bool) -> Self {
        self.has_error = has_error;
        self
    }

    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn set_error(&mut self, has_error: bool) {
        self.has_error = has_error;
    }
}

/// Handle of an object kept in an external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Payload of a value item without cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Compartments(CompartmentPayload),
    Object(ObjectHandle),
}

impl Payload {
    pub fn compartments(&self) -> Option<&CompartmentPayload> {
        match self {
            Payload::Compartments(payload) => Some(payload),
            Payload::Object(_) => None,
        }
    }

    pub fn object(&self) -> Option<ObjectHandle> {
        match self {
            Payload::Object(handle) => Some(*handle),
            Payload::Compartments(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_root_is_wrapped() {
        let payload = CompartmentPayload::new(XmlElement::with_text("Compartments", "x"));
        assert_eq!(payload.element().name(), COMPARTMENT_CONTAINER);
        assert_eq!(payload.element().children()[0].name(), "Compartments");

        let payload = CompartmentPayload::new(XmlElement::new(COMPARTMENT_CONTAINER)).with_error(true);
        assert!(payload.element().children().is_empty());
        assert!(payload.has_error());
    }

    #[test]
    fn payload_accessors() {
        let payload = Payload::Object(ObjectHandle(7));
        assert_eq!(payload.object(), Some(ObjectHandle(7)));
        assert!(payload.compartments().is_none());
    }
}
