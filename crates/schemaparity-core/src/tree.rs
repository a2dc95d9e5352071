//! Arena representation of a generic XML document
//!
//! Nodes live in one `Vec` and refer to their children by index. Trees are
//! assembled once through [`XmlTreeBuilder`] and are read-only afterwards.

use std::collections::BTreeMap;

/// Index of a node inside its [`XmlTree`]
pub type NodeId = usize;

/// One XML element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Local tag name (prefix removed)
    pub tag: String,

    /// Resolved namespace URI, if the element is bound to one
    pub namespace: Option<String>,

    /// Attributes by local name; namespace declarations are not included
    pub attributes: BTreeMap<String, String>,

    /// Text and CDATA content that precedes the first child element
    pub text: String,

    /// Child elements in document order
    pub children: Vec<NodeId>,
}

impl XmlNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// Whether this node has the given local name in the given namespace
    pub fn is(&self, namespace: &str, tag: &str) -> bool {
        self.tag == tag && self.namespace.as_deref() == Some(namespace)
    }
}

/// Immutable XML element tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlTree {
    nodes: Vec<XmlNode>,
    root: Option<NodeId>,
}

impl XmlTree {
    /// Root element, `None` for a document without elements
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child elements of `id` with the given namespace and local name
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        namespace: &'a str,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(move |child| self.nodes[*child].is(namespace, tag))
    }

    /// First child element of `id` with the given namespace and local name
    pub fn first_child_named(&self, id: NodeId, namespace: &str, tag: &str) -> Option<NodeId> {
        self.children_named(id, namespace, tag).next()
    }
}

/// Incremental construction of an [`XmlTree`] from start/text/end events
#[derive(Debug, Default)]
pub struct XmlTreeBuilder {
    tree: XmlTree,
    open: Vec<NodeId>,
}

impl XmlTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new element as a child of the innermost open element
    pub fn start(
        &mut self,
        tag: impl Into<String>,
        namespace: Option<String>,
        attributes: BTreeMap<String, String>,
    ) -> NodeId {
        let id = self.tree.nodes.len();
        self.tree.nodes.push(XmlNode {
            tag: tag.into(),
            namespace,
            attributes,
            text: String::new(),
            children: Vec::new(),
        });

        match self.open.last() {
            Some(parent) => self.tree.nodes[*parent].children.push(id),
            None if self.tree.root.is_none() => self.tree.root = Some(id),
            // Rejected by the reader before it gets here
            None => {}
        }

        self.open.push(id);
        id
    }

    /// Append character data to the innermost open element.
    /// Only content seen before its first child element is retained.
    pub fn text(&mut self, content: &str) {
        if let Some(current) = self.open.last() {
            let node = &mut self.tree.nodes[*current];
            if node.children.is_empty() {
                node.text.push_str(content);
            }
        }
    }

    /// Close the innermost open element
    pub fn end(&mut self) {
        self.open.pop();
    }

    /// Number of elements still open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Whether the document element has been opened
    pub fn has_root(&self) -> bool {
        self.tree.root.is_some()
    }

    pub fn finish(self) -> XmlTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:test";

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn builds_parent_child_links() {
        let mut builder = XmlTreeBuilder::new();
        let root = builder.start("Root", Some(NS.to_string()), BTreeMap::new());
        builder.start("Child", Some(NS.to_string()), attrs(&[("Name", "a")]));
        builder.end();
        builder.start("Child", None, attrs(&[("Name", "b")]));
        builder.end();
        builder.end();
        let tree = builder.finish();

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.node(root).children.len(), 2);

        let named: Vec<NodeId> = tree.children_named(root, NS, "Child").collect();
        assert_eq!(named.len(), 1);
        assert_eq!(tree.node(named[0]).attribute("Name"), Some("a"));
    }

    #[test]
    fn keeps_only_leading_text() {
        let mut builder = XmlTreeBuilder::new();
        builder.start("Value", None, BTreeMap::new());
        builder.text("  SELECT 1 ");
        builder.start("Inner", None, BTreeMap::new());
        builder.end();
        builder.text("tail");
        builder.end();
        let tree = builder.finish();

        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).text, "  SELECT 1 ");
    }

    #[test]
    fn empty_document_has_no_root() {
        let tree = XmlTreeBuilder::new().finish();
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    }
}
