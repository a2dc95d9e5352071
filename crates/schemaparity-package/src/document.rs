//! Semantic document (model.xml) builder
//!
//! Converts the arena tree of the semantic document into the typed model.
//! Only nodes in the package serialization namespace are considered.

use crate::error::{PackageError, Result};
use crate::xml::parse_xml;
use schemaparity_core::{
    Annotation, CustomDataBlock, Entry, ModelDocument, NodeId, SchemaElement, XmlTree,
};
use std::collections::{BTreeMap, BTreeSet};

/// Namespace of every element in the semantic document
pub const DAC_NAMESPACE: &str = "http://schemas.microsoft.com/sqlserver/dac/Serialization/2012/02";

/// Parse the semantic document `file` from its text
pub fn parse_model_document(file: &str, text: &str) -> Result<ModelDocument> {
    let tree = parse_xml(file, text)?;
    build_model_document(file, &tree)
}

/// Build the typed document from an already parsed tree
pub fn build_model_document(file: &str, tree: &XmlTree) -> Result<ModelDocument> {
    let root = tree.root().ok_or_else(|| PackageError::MissingSection {
        file: file.to_string(),
        section: "root",
    })?;

    let header = match tree.first_child_named(root, DAC_NAMESPACE, "Header") {
        Some(header) => read_header(tree, header),
        None => Vec::new(),
    };

    let model = tree
        .first_child_named(root, DAC_NAMESPACE, "Model")
        .ok_or_else(|| PackageError::MissingSection {
            file: file.to_string(),
            section: "Model",
        })?;

    let elements: Vec<SchemaElement> = tree
        .children_named(model, DAC_NAMESPACE, "Element")
        .map(|id| read_element(tree, id))
        .collect();

    Ok(ModelDocument { header, elements })
}

fn attr(tree: &XmlTree, id: NodeId, name: &str) -> String {
    tree.node(id).attribute(name).unwrap_or("").to_string()
}

fn read_header(tree: &XmlTree, header: NodeId) -> Vec<CustomDataBlock> {
    tree.children_named(header, DAC_NAMESPACE, "CustomData")
        .map(|block| {
            let metadata: BTreeMap<String, String> = tree
                .children_named(block, DAC_NAMESPACE, "Metadata")
                .map(|m| (attr(tree, m, "Name"), attr(tree, m, "Value")))
                .collect();

            CustomDataBlock {
                category: attr(tree, block, "Category"),
                block_type: attr(tree, block, "Type"),
                metadata,
            }
        })
        .collect()
}

/// `Property` children as name -> value. The value comes from the `Value`
/// attribute, else from the trimmed text of a `Value` child element.
fn read_properties(tree: &XmlTree, id: NodeId) -> BTreeMap<String, String> {
    tree.children_named(id, DAC_NAMESPACE, "Property")
        .map(|prop| {
            let value = match tree.node(prop).attribute("Value") {
                Some(value) => value.to_string(),
                None => tree
                    .first_child_named(prop, DAC_NAMESPACE, "Value")
                    .map(|v| tree.node(v).text.trim().to_string())
                    .unwrap_or_default(),
            };
            (attr(tree, prop, "Name"), value)
        })
        .collect()
}

fn read_element(tree: &XmlTree, id: NodeId) -> SchemaElement {
    let node = tree.node(id);

    let relationships: BTreeMap<String, Vec<Entry>> = tree
        .children_named(id, DAC_NAMESPACE, "Relationship")
        .map(|rel| {
            let entries: Vec<Entry> = tree
                .children_named(rel, DAC_NAMESPACE, "Entry")
                .filter_map(|entry| read_entry(tree, entry))
                .collect();
            (attr(tree, rel, "Name"), entries)
        })
        .collect();

    let annotations: Vec<Annotation> = tree
        .children_named(id, DAC_NAMESPACE, "AttachedAnnotation")
        .map(|ann| Annotation {
            annotation_type: attr(tree, ann, "Type"),
            properties: read_properties(tree, ann),
        })
        .collect();

    SchemaElement {
        element_type: node.attribute("Type").unwrap_or("").to_string(),
        name: node.attribute("Name").map(str::to_string),
        properties: read_properties(tree, id),
        relationships,
        annotations,
        anchors: read_anchors(tree, id),
    }
}

/// `References` names of the first entry of each relationship. Only the first
/// relationship with a given name counts, and only its first `Entry`; an entry
/// without a reference or a reference without a `Name` gives no anchor.
fn read_anchors(tree: &XmlTree, id: NodeId) -> BTreeMap<String, String> {
    let mut seen = BTreeSet::new();
    let mut anchors = BTreeMap::new();

    for rel in tree.children_named(id, DAC_NAMESPACE, "Relationship") {
        let Some(name) = tree.node(rel).attribute("Name") else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }

        let target = tree
            .first_child_named(rel, DAC_NAMESPACE, "Entry")
            .and_then(|entry| tree.first_child_named(entry, DAC_NAMESPACE, "References"))
            .and_then(|reference| tree.node(reference).attribute("Name"));
        if let Some(target) = target {
            anchors.insert(name.to_string(), target.to_string());
        }
    }

    anchors
}

/// A `References` child wins over an inline `Element`; entries with neither are dropped
fn read_entry(tree: &XmlTree, entry: NodeId) -> Option<Entry> {
    if let Some(reference) = tree.first_child_named(entry, DAC_NAMESPACE, "References") {
        let node = tree.node(reference);
        return Some(Entry::Reference {
            target_name: node.attribute("Name").unwrap_or("").to_string(),
            external_source: node.attribute("ExternalSource").map(str::to_string),
        });
    }

    tree.first_child_named(entry, DAC_NAMESPACE, "Element")
        .map(|inline| Entry::inline(read_element(tree, inline)))
}
