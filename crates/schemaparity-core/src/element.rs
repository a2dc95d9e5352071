//! Schema element data model
//!
//! Typed view of the semantic document inside a schema package. Everything
//! here is built once per comparison run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotation property that carries an auto-generated sequence number.
/// It has no meaning and is always ignored by comparisons.
pub const DISAMBIGUATOR: &str = "Disambiguator";

/// One schema object (table, column, constraint, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaElement {
    /// Element type, e.g. `SqlTable`
    #[serde(rename = "type")]
    pub element_type: String,

    /// Optional element name, e.g. `[dbo].[Users]`
    pub name: Option<String>,

    /// Property name -> value
    pub properties: BTreeMap<String, String>,

    /// Relationship name -> entries (entry order is not significant)
    pub relationships: BTreeMap<String, Vec<Entry>>,

    /// Attached annotations (several of the same type are allowed)
    pub annotations: Vec<Annotation>,

    /// Relationship name -> `References` name in the first entry of the
    /// first relationship with that name. Only consulted for identity.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub anchors: BTreeMap<String, String>,
}

impl SchemaElement {
    /// Create an element with no name, properties, relationships or annotations
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            name: None,
            properties: BTreeMap::new(),
            relationships: BTreeMap::new(),
            annotations: Vec::new(),
            anchors: BTreeMap::new(),
        }
    }

    /// Set the element name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add (or replace) a property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add (or replace) a relationship. The identity anchor is taken from the
    /// first relationship added under `name`.
    pub fn with_relationship(mut self, name: impl Into<String>, entries: Vec<Entry>) -> Self {
        let name = name.into();
        if !self.relationships.contains_key(&name) {
            if let Some(Entry::Reference { target_name, .. }) = entries.first() {
                self.anchors.insert(name.clone(), target_name.clone());
            }
        }
        self.relationships.insert(name, entries);
        self
    }

    /// Attach an annotation
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Target name referenced by the first entry of a relationship, if any
    pub fn first_reference(&self, relationship: &str) -> Option<&str> {
        self.anchors.get(relationship).map(String::as_str)
    }
}

/// A relationship entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    /// Named pointer to another element
    Reference {
        target_name: String,

        /// Set for references that point into another package
        external_source: Option<String>,
    },

    /// Nested element without an identity of its own
    Inline(Box<SchemaElement>),
}

impl Entry {
    /// Reference to an element of the same package
    pub fn reference(target_name: impl Into<String>) -> Self {
        Self::Reference {
            target_name: target_name.into(),
            external_source: None,
        }
    }

    /// Reference qualified by an external source
    pub fn external(target_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Reference {
            target_name: target_name.into(),
            external_source: Some(source.into()),
        }
    }

    /// Inline nested element
    pub fn inline(element: SchemaElement) -> Self {
        Self::Inline(Box::new(element))
    }
}

/// An annotation attached to an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type
    #[serde(rename = "type")]
    pub annotation_type: String,

    /// Annotation properties, including the disambiguator when present
    pub properties: BTreeMap<String, String>,
}

impl Annotation {
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Properties that take part in comparisons (disambiguator removed)
    pub fn semantic_properties(&self) -> Vec<(&str, &str)> {
        self.properties
            .iter()
            .filter(|(name, _)| name.as_str() != DISAMBIGUATOR)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }
}

/// Metadata block from the document header, keyed by `(category, type)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDataBlock {
    pub category: String,

    #[serde(rename = "type")]
    pub block_type: String,

    /// Metadata name -> value
    pub metadata: BTreeMap<String, String>,
}

impl CustomDataBlock {
    pub fn new(category: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            block_type: block_type.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

/// Parsed semantic document: header blocks plus the flat element list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDocument {
    /// Header metadata blocks (empty when the document has no header)
    pub header: Vec<CustomDataBlock>,

    /// Top-level model elements in document order
    pub elements: Vec<SchemaElement>,
}
