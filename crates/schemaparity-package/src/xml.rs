//! XML reader producing the arena tree
//!
//! Namespaces are resolved here, once: every node carries its local name and
//! the URI it is bound to, so later stages never look at prefixes.

use crate::error::{PackageError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use schemaparity_core::{XmlTree, XmlTreeBuilder};
use std::collections::BTreeMap;

/// Parse `text` (the contents of `file`) into an [`XmlTree`]
pub fn parse_xml(file: &str, text: &str) -> Result<XmlTree> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = NsReader::from_str(text);
    let mut builder = XmlTreeBuilder::new();

    loop {
        let position = reader.buffer_position();
        let (namespace, event) = reader
            .read_resolved_event()
            .map(|(ns, event)| (resolved_uri(ns), event))
            .map_err(|e| xml_error(file, format!("{} at byte {}", e, position)))?;

        match event {
            Event::Start(_) | Event::Empty(_) if builder.depth() == 0 && builder.has_root() => {
                return Err(xml_error(
                    file,
                    format!("junk after document element at byte {}", position),
                ));
            }
            Event::Start(start) => {
                let (tag, attributes) = element_parts(file, &start)?;
                builder.start(tag, namespace, attributes);
            }
            Event::Empty(start) => {
                let (tag, attributes) = element_parts(file, &start)?;
                builder.start(tag, namespace, attributes);
                builder.end();
            }
            Event::End(_) => builder.end(),
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|e| xml_error(file, format!("{} at byte {}", e, position)))?;
                if builder.depth() == 0 && !content.trim().is_empty() {
                    return Err(xml_error(
                        file,
                        format!("text outside the document element at byte {}", position),
                    ));
                }
                builder.text(&content);
            }
            Event::CData(content) => {
                builder.text(&String::from_utf8_lossy(&content.into_inner()));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if builder.depth() > 0 {
        return Err(xml_error(file, "unexpected end of document".to_string()));
    }

    let tree = builder.finish();
    if tree.root().is_none() {
        return Err(xml_error(file, "document has no root element".to_string()));
    }

    Ok(tree)
}

fn resolved_uri(result: ResolveResult) -> Option<String> {
    match result {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

/// Local tag name and attributes (namespace declarations skipped)
fn element_parts(file: &str, start: &BytesStart) -> Result<(String, BTreeMap<String, String>)> {
    let tag = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(file, e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(file, e.to_string()))?
            .into_owned();
        attributes.insert(name, value);
    }

    Ok((tag, attributes))
}

fn xml_error(file: &str, message: String) -> PackageError {
    PackageError::Xml {
        file: file.to_string(),
        message,
    }
}
